use web_sys::{HtmlImageElement, MouseEvent};

use crate::dom;

/// A row of tabs, each revealing the content block with the same key.
/// Tabs carry `data-tab`, content blocks carry `data-content`.
pub struct TabGroup {
    pub tab_selector: &'static str,
    pub content_selector: &'static str,
    pub active_classes: &'static [&'static str],
    pub inactive_classes: &'static [&'static str],
}

pub static GALLERY: TabGroup = TabGroup {
    tab_selector: ".gallery-tab",
    content_selector: ".gallery-content",
    active_classes: &["active"],
    inactive_classes: &[],
};

pub static UPDATES: TabGroup = TabGroup {
    tab_selector: ".update-tab",
    content_selector: ".update-content",
    active_classes: &["active", "text-white", "bg-gradient-to-r", "from-deep-sea-green", "to-green"],
    inactive_classes: &["text-gray-700"],
};

/// Content is shown only for the tab whose key it carries.
pub fn is_shown(tab_key: Option<&str>, content_key: Option<&str>) -> bool {
    content_key.is_some() && content_key == tab_key
}

impl TabGroup {
    pub fn bind(&'static self) {
        let tabs = dom::query_all(self.tab_selector);
        let contents = dom::query_all(self.content_selector);

        for tab in &tabs {
            let all_tabs = tabs.clone();
            let contents = contents.clone();
            let clicked = tab.clone();
            dom::listen::<MouseEvent>(tab, "click", move |_| {
                for other in &all_tabs {
                    dom::remove_classes(other, self.active_classes);
                    dom::add_classes(other, self.inactive_classes);
                }
                dom::add_classes(&clicked, self.active_classes);
                dom::remove_classes(&clicked, self.inactive_classes);

                let key = clicked.get_attribute("data-tab");
                for content in &contents {
                    let content_key = content.get_attribute("data-content");
                    if is_shown(key.as_deref(), content_key.as_deref()) {
                        dom::remove_classes(content, &["hidden"]);
                        dom::add_classes(content, &["active"]);
                    } else {
                        dom::add_classes(content, &["hidden"]);
                        dom::remove_classes(content, &["active"]);
                    }
                }
            });
        }
    }
}

pub fn init_gallery() {
    GALLERY.bind();

    // Thumbnails swap the main image of their own gallery panel
    for item in dom::query_all(".gallery-item") {
        let clicked = item.clone();
        dom::listen::<MouseEvent>(&item, "click", move |_| {
            let Some(source) = clicked.get_attribute("data-image") else {
                return;
            };
            let main_image = clicked
                .closest(".gallery-content")
                .ok()
                .flatten()
                .and_then(|panel| dom::query_within(&panel, "img"))
                .and_then(|img| wasm_bindgen::JsCast::dyn_into::<HtmlImageElement>(img).ok());
            if let Some(image) = main_image {
                image.set_src(&source);
            }
        });
    }
}

pub fn init_updates() {
    UPDATES.bind();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_keys_are_shown() {
        assert!(is_shown(Some("photos"), Some("photos")));
        assert!(!is_shown(Some("photos"), Some("videos")));
    }

    #[test]
    fn test_missing_content_key_is_hidden() {
        assert!(!is_shown(None, None));
        assert!(!is_shown(Some("photos"), None));
    }

    #[test]
    fn test_update_tabs_swap_text_color() {
        assert!(UPDATES.active_classes.contains(&"text-white"));
        assert_eq!(UPDATES.inactive_classes, &["text-gray-700"]);
        assert!(GALLERY.inactive_classes.is_empty());
    }
}
