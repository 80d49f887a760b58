use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;
use web_sys::{Element, KeyboardEvent, MouseEvent};

use crate::components::notice;
use crate::dom;

pub const SHOW_ALL: &str = "all";

const ACTIVE_CLASSES: [&str; 3] = ["active", "bg-deep-sea-green", "text-white"];
const INACTIVE_CLASSES: [&str; 2] = ["bg-white", "text-gray-700"];
const FADE_IN_CLASS: &str = "animate-fade-in-up";
const CARD_STAGGER_MS: i32 = 100;
const HIDE_AFTER_MS: i32 = 300;
const ANNOUNCE_MS: i32 = 1000;

/// Whether a card with `category` is shown under `filter`.
pub fn matches(filter: &str, category: Option<&str>) -> bool {
    filter == SHOW_ALL || category == Some(filter)
}

/// Screen-reader text after switching to `filter`.
pub fn announcement(filter: &str) -> String {
    format!("Showing {} products", filter)
}

/// Enter and Space activate a filter button from the keyboard.
pub fn is_activation_key(key: &str) -> bool {
    key == "Enter" || key == " "
}

struct ProductFilter {
    buttons: Vec<Element>,
    cards: Vec<Element>,
    active: RefCell<String>,
}

impl ProductFilter {
    fn select(&self, button: &Element) {
        let filter = button.get_attribute("data-filter").unwrap_or_default();
        self.mark_active(button);
        self.filter_cards(&filter);
        notice::announce(announcement(&filter), ANNOUNCE_MS);
        let previous = self.active.replace(filter.clone());
        debug!(from = %previous, to = %filter, "Product filter changed");
    }

    fn mark_active(&self, active: &Element) {
        for button in &self.buttons {
            if button == active {
                dom::add_classes(button, &ACTIVE_CLASSES);
                dom::remove_classes(button, &INACTIVE_CLASSES);
                let _ = button.set_attribute("aria-pressed", "true");
            } else {
                dom::remove_classes(button, &ACTIVE_CLASSES);
                dom::add_classes(button, &INACTIVE_CLASSES);
                let _ = button.set_attribute("aria-pressed", "false");
            }
        }
    }

    fn filter_cards(&self, filter: &str) {
        for (index, card) in self.cards.iter().enumerate() {
            let category = card.get_attribute("data-category");
            if matches(filter, category.as_deref()) {
                show_card(card, index);
            } else {
                hide_card(card);
            }
        }
    }

    fn show_all(&self) {
        for (index, card) in self.cards.iter().enumerate() {
            show_card(card, index);
        }
    }
}

fn show_card(card: &Element, index: usize) {
    dom::set_styles(
        card,
        &[("opacity", "0"), ("transform", "translateY(20px)"), ("display", "block")],
    );
    // force a reflow so the transition starts from the reset styles
    let _ = card.client_height();

    let target = card.clone();
    dom::set_timeout(index as i32 * CARD_STAGGER_MS, move || {
        dom::set_styles(
            &target,
            &[
                ("opacity", "1"),
                ("transform", "translateY(0)"),
                ("transition", "all 0.5s ease-out"),
            ],
        );
    });
    dom::add_classes(card, &[FADE_IN_CLASS]);
}

fn hide_card(card: &Element) {
    dom::set_styles(
        card,
        &[
            ("opacity", "0"),
            ("transform", "translateY(20px)"),
            ("transition", "all 0.3s ease-in"),
        ],
    );
    let target = card.clone();
    dom::set_timeout(HIDE_AFTER_MS, move || {
        dom::set_style(&target, "display", "none");
    });
    dom::remove_classes(card, &[FADE_IN_CLASS]);
}

pub fn init() {
    let filter = Rc::new(ProductFilter {
        buttons: dom::query_all(".filter-btn"),
        cards: dom::query_all(".product-card"),
        active: RefCell::new(SHOW_ALL.to_string()),
    });
    if filter.buttons.is_empty() && filter.cards.is_empty() {
        return;
    }

    for button in &filter.buttons {
        let f = filter.clone();
        let clicked = button.clone();
        dom::listen::<MouseEvent>(button, "click", move |ev| {
            ev.prevent_default();
            f.select(&clicked);
        });

        let f = filter.clone();
        let pressed = button.clone();
        dom::listen::<KeyboardEvent>(button, "keydown", move |ev| {
            if is_activation_key(&ev.key()) {
                ev.prevent_default();
                f.select(&pressed);
            }
        });
    }

    filter.show_all();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_everything() {
        assert!(matches("all", Some("sensors")));
        assert!(matches("all", None));
    }

    #[test]
    fn test_category_must_match_exactly() {
        assert!(matches("sensors", Some("sensors")));
        assert!(!matches("sensors", Some("controllers")));
        assert!(!matches("sensors", None));
        assert!(!matches("Sensors", Some("sensors")));
    }

    #[test]
    fn test_announcement_text() {
        assert_eq!(announcement("all"), "Showing all products");
        assert_eq!(announcement("plc"), "Showing plc products");
    }

    #[test]
    fn test_activation_keys() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Tab"));
    }
}
