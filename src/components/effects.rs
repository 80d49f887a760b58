//! Page-wide effects that are not tied to one mount point.

use wasm_bindgen::JsCast;
use web_sys::{HtmlImageElement, MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::dom::{self, ObserverOptions};

const REVEAL_CLASS: &str = "animate-fade-in-up";
const REVEAL_TARGETS: &str = "section, .product-card, .news-card, .event-card";
const FADING_CARDS: &str = ".event-card, .news-card";

pub fn init() {
    reveal_on_scroll();
    lazy_images();
    smooth_anchors();
    card_hover(".event-card", ".event-image");
    card_hover(".news-card", ".news-image");
}

/// Fragment ids are only meaningful as in-page targets when non-empty.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

fn reveal_on_scroll() {
    for card in dom::query_all(FADING_CARDS) {
        dom::set_styles(
            &card,
            &[
                ("opacity", "0"),
                ("transform", "translateY(30px)"),
                ("transition", "opacity 0.6s ease-out, transform 0.6s ease-out"),
            ],
        );
    }

    dom::observe_visible(
        &dom::query_all(REVEAL_TARGETS),
        ObserverOptions {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px",
        },
        |el, _| {
            dom::add_classes(el, &[REVEAL_CLASS]);
            if el.matches(FADING_CARDS).unwrap_or(false) {
                dom::set_styles(el, &[("opacity", "1"), ("transform", "translateY(0)")]);
            }
        },
    );
}

fn lazy_images() {
    let images = dom::query_all("img[data-src]");
    if images.is_empty() {
        return;
    }
    dom::observe_visible(
        &images,
        ObserverOptions {
            threshold: 0.0,
            root_margin: "0px",
        },
        |el, observer| {
            if let Some(img) = el.dyn_ref::<HtmlImageElement>() {
                if let Some(source) = img.get_attribute("data-src") {
                    img.set_src(&source);
                }
                dom::remove_classes(img, &["lazy"]);
            }
            observer.unobserve(el);
        },
    );
}

fn smooth_anchors() {
    for anchor in dom::query_all("a[href^=\"#\"]") {
        let link = anchor.clone();
        dom::listen::<MouseEvent>(&anchor, "click", move |ev| {
            ev.prevent_default();
            let Some(target) = link
                .get_attribute("href")
                .as_deref()
                .and_then(anchor_target)
                .and_then(dom::by_id)
            else {
                return;
            };
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);
        });
    }
}

fn card_hover(card_selector: &str, image_selector: &'static str) {
    for card in dom::query_all(card_selector) {
        let hovered = card.clone();
        dom::listen::<MouseEvent>(&card, "mouseenter", move |_| {
            if let Some(image) = dom::query_within(&hovered, image_selector) {
                dom::set_style(&image, "transform", "scale(1.05)");
            }
        });
        let left = card.clone();
        dom::listen::<MouseEvent>(&card, "mouseleave", move |_| {
            if let Some(image) = dom::query_within(&left, image_selector) {
                dom::set_style(&image, "transform", "scale(1)");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_target() {
        assert_eq!(anchor_target("#contact"), Some("contact"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("contact.html"), None);
    }
}
