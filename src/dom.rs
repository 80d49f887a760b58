//! Browser bindings: the fetch-backed fragment source, the document adapter
//! and the small listener/timer/observer helpers the widgets share.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use url::Url;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Element, EventTarget, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    Response,
};

use crate::components::notice;
use crate::error::LoadError;
use crate::loader::{Document, FragmentSource, MountPoint};

// -- Fragment loading --

/// Fetches fragments with `window.fetch`, resolving relative locations
/// against the page URL.
pub struct FetchSource {
    base: Option<Url>,
}

impl FetchSource {
    pub fn for_current_page() -> Self {
        let base = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .and_then(|href| Url::parse(&href).ok());
        Self { base }
    }
}

impl FragmentSource for FetchSource {
    async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        let url = resolve_location(self.base.as_ref(), location)?;
        let window =
            web_sys::window().ok_or_else(|| LoadError::Transport("No window available".to_string()))?;

        let response: Response = JsFuture::from(window.fetch_with_str(url.as_str()))
            .await
            .map_err(|e| LoadError::Transport(js_message(&e)))?
            .dyn_into()
            .map_err(|_| LoadError::Transport("fetch did not resolve to a Response".to_string()))?;

        if !response.ok() {
            return Err(LoadError::Fetch {
                status: response.status(),
            });
        }

        let body = response.text().map_err(|e| LoadError::Transport(js_message(&e)))?;
        JsFuture::from(body)
            .await
            .map_err(|e| LoadError::Transport(js_message(&e)))?
            .as_string()
            .ok_or_else(|| LoadError::Transport("Response body is not text".to_string()))
    }
}

/// Absolute locations are used as-is; anything else is joined onto `base`.
pub fn resolve_location(base: Option<&Url>, location: &str) -> Result<Url, LoadError> {
    match Url::parse(location) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| {
                LoadError::Transport(format!("Cannot resolve '{}' without a page URL", location))
            })?;
            base.join(location)
                .map_err(|e| LoadError::Transport(format!("Invalid fragment URL '{}': {}", location, e)))
        }
        Err(e) => Err(LoadError::Transport(format!(
            "Invalid fragment URL '{}': {}",
            location, e
        ))),
    }
}

#[derive(Clone)]
pub struct BrowserDocument {
    inner: web_sys::Document,
}

impl BrowserDocument {
    pub fn current() -> Option<Self> {
        document().map(|inner| Self { inner })
    }
}

impl Document for BrowserDocument {
    type Mount = Element;

    fn mount_point(&self, id: &str) -> Option<Element> {
        self.inner.get_element_by_id(id)
    }
}

impl MountPoint for Element {
    fn replace_markup(&self, markup: &str) {
        self.set_inner_html(markup);
    }

    fn show_error(&self, description: &str) {
        notice::render_load_error(self, description);
    }
}

// -- Lookup --

pub fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn by_id_as<T: JsCast>(id: &str) -> Option<T> {
    by_id(id)?.dyn_into::<T>().ok()
}

pub fn query_all(selector: &str) -> Vec<Element> {
    document()
        .and_then(|d| d.query_selector_all(selector).ok())
        .map(elements)
        .unwrap_or_default()
}

pub fn query_all_within(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

pub fn query_within(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

fn elements(list: web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

// -- Classes and styles --

pub fn add_classes(el: &Element, classes: &[&str]) {
    let list = el.class_list();
    for class in classes {
        let _ = list.add_1(class);
    }
}

pub fn remove_classes(el: &Element, classes: &[&str]) {
    let list = el.class_list();
    for class in classes {
        let _ = list.remove_1(class);
    }
}

pub fn toggle_class(el: &Element, class: &str) -> bool {
    el.class_list().toggle(class).unwrap_or(false)
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

/// Set an inline style property. Works for HTML and SVG elements alike.
pub fn set_style(el: &Element, property: &str, value: &str) {
    let Ok(style) = js_sys::Reflect::get(el, &JsValue::from_str("style")) else {
        return;
    };
    if let Ok(style) = style.dyn_into::<web_sys::CssStyleDeclaration>() {
        let _ = style.set_property(property, value);
    }
}

pub fn set_styles(el: &Element, properties: &[(&str, &str)]) {
    for (property, value) in properties {
        set_style(el, property, value);
    }
}

// -- Events and timers --

/// Attach `handler` for `event` on `target` for the lifetime of the page.
/// Events that are not an `E` are ignored.
pub fn listen<E>(target: &EventTarget, event: &str, mut handler: impl FnMut(E) + 'static)
where
    E: JsCast + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    });
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        warn!(event, error = %js_message(&e), "Failed to add event listener");
    }
    closure.forget();
}

/// Run `f` once after `delay_ms`. Returns the timer handle.
pub fn set_timeout(delay_ms: i32, f: impl FnOnce() + 'static) -> Option<i32> {
    let window = web_sys::window()?;
    let callback = Closure::once_into_js(f);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)
        .ok()
}

pub fn clear_timeout(handle: i32) {
    if let Some(window) = web_sys::window() {
        window.clear_timeout_with_handle(handle);
    }
}

/// Call `frame` on every animation frame until it returns `false`.
pub fn animate(mut frame: impl FnMut() -> bool + 'static) {
    let handle: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = handle.clone();

    *handle.borrow_mut() = Some(Closure::new(move || {
        if frame() {
            if let Some(callback) = next.borrow().as_ref() {
                request_frame(callback);
            }
        } else {
            // drop our own closure once this call returns
            let _ = next.borrow_mut().take();
        }
    }));

    let first = handle.borrow();
    if let Some(callback) = first.as_ref() {
        request_frame(callback);
    }
}

fn request_frame(callback: &Closure<dyn FnMut()>) {
    if let Some(window) = web_sys::window() {
        let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
    }
}

/// Run `f` once the DOM is parsed (immediately if it already is).
pub fn on_ready(f: impl FnOnce() + 'static) {
    let Some(document) = document() else {
        return;
    };
    let state = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|v| v.as_string());

    if state.as_deref() == Some("loading") {
        let mut f = Some(f);
        listen::<web_sys::Event>(&document, "DOMContentLoaded", move |_| {
            if let Some(f) = f.take() {
                f();
            }
        });
    } else {
        f();
    }
}

// -- Intersection observers --

pub struct ObserverOptions<'a> {
    pub threshold: f64,
    pub root_margin: &'a str,
}

/// Observe `targets` and call `on_visible` each time one of them enters the
/// viewport. The observer is passed along so callers can `unobserve`.
pub fn observe_visible(
    targets: &[Element],
    options: ObserverOptions<'_>,
    mut on_visible: impl FnMut(&Element, &IntersectionObserver) + 'static,
) -> Option<IntersectionObserver> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    on_visible(&entry.target(), &observer);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(options.root_margin);

    let observer = match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => observer,
        Err(e) => {
            warn!(error = %js_message(&e), "IntersectionObserver unavailable");
            return None;
        }
    };
    callback.forget();

    for target in targets {
        observer.observe(target);
    }
    Some(observer)
}

/// Best-effort text for a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://primeautomations.example/products/index.html").unwrap()
    }

    #[test]
    fn test_relative_location_joins_page_url() {
        let url = resolve_location(Some(&page()), "components/navbar.html").unwrap();
        assert_eq!(url.as_str(), "https://primeautomations.example/products/components/navbar.html");
    }

    #[test]
    fn test_root_relative_location() {
        let url = resolve_location(Some(&page()), "/components/navbar.html").unwrap();
        assert_eq!(url.as_str(), "https://primeautomations.example/components/navbar.html");
    }

    #[test]
    fn test_absolute_location_ignores_base() {
        let url = resolve_location(None, "https://cdn.example/frag.html").unwrap();
        assert_eq!(url.host_str(), Some("cdn.example"));
    }

    #[test]
    fn test_relative_without_base_is_transport_failure() {
        let err = resolve_location(None, "components/navbar.html").unwrap_err();
        assert!(matches!(err, LoadError::Transport(_)));
    }

    #[test]
    fn test_malformed_url_is_transport_failure() {
        let err = resolve_location(Some(&page()), "http://[::1").unwrap_err();
        assert!(matches!(err, LoadError::Transport(msg) if msg.contains("Invalid fragment URL")));
    }
}
