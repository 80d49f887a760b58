use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom;

/// Shown in a mount point whose fragment failed to load.
#[component]
pub fn LoadErrorNotice(
    /// Failure text, e.g. "HTTP error! status: 404"
    #[prop(into)]
    description: String,
) -> impl IntoView {
    view! {
        <div class="p-4 text-red-500">"Error loading component: " {description}</div>
    }
}

/// Polite screen-reader announcement.
#[component]
pub fn LiveAnnouncement(#[prop(into)] text: String) -> impl IntoView {
    view! {
        <div aria-live="polite" aria-atomic="true" class="sr-only">{text}</div>
    }
}

/// Replaces the inline newsletter form after a subscription.
#[component]
pub fn SubscribedNotice(#[prop(into)] email: String) -> impl IntoView {
    view! {
        <div class="mt-4 p-3 bg-green-100 text-green-700 rounded-lg">{thank_you_message(&email)}</div>
    }
}

pub fn thank_you_message(email: &str) -> String {
    format!("Thank you for subscribing! You will receive updates at: {}", email)
}

/// Swap the contents of `mount` for a [`LoadErrorNotice`].
pub fn render_load_error(mount: &web_sys::Element, description: &str) {
    let Ok(parent) = mount.clone().dyn_into::<web_sys::HtmlElement>() else {
        return;
    };
    parent.set_inner_html("");
    let description = description.to_string();
    leptos::mount::mount_to(parent, move || view! { <LoadErrorNotice description=description /> })
        .forget();
}

/// Append a [`LiveAnnouncement`] to the body and remove it after `duration_ms`.
pub fn announce(text: String, duration_ms: i32) {
    let Some(document) = dom::document() else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };
    let Ok(holder) = document
        .create_element("div")
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().map_err(Into::into))
    else {
        return;
    };
    if body.append_child(&holder).is_err() {
        return;
    }

    let handle = leptos::mount::mount_to(holder.clone(), move || view! { <LiveAnnouncement text=text /> });
    dom::set_timeout(duration_ms, move || {
        drop(handle);
        holder.remove();
    });
}

/// Put a [`SubscribedNotice`] where `form` was, and put the form back after
/// `duration_ms`. Does nothing if the form is not attached to the page.
pub fn show_subscribed(form: &web_sys::HtmlFormElement, email: String, duration_ms: i32) {
    let Some(document) = dom::document() else {
        return;
    };
    let Some(parent) = form.parent_node() else {
        return;
    };
    let Ok(holder) = document
        .create_element("div")
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().map_err(Into::into))
    else {
        return;
    };
    if parent.replace_child(&holder, form).is_err() {
        return;
    }

    let handle = leptos::mount::mount_to(holder.clone(), move || view! { <SubscribedNotice email=email /> });
    let form = form.clone();
    dom::set_timeout(duration_ms, move || {
        drop(handle);
        if let Some(parent) = holder.parent_node() {
            let _ = parent.replace_child(&form, &holder);
        }
        form.reset();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thank_you_message_names_email() {
        assert_eq!(
            thank_you_message("ada@example.com"),
            "Thank you for subscribing! You will receive updates at: ada@example.com"
        );
    }
}
