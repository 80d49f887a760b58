use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, KeyboardEvent, MouseEvent};

use crate::config::NavbarConfig;
use crate::dom;

/// Present on `#mobile-menu` while it is slid off screen.
const MENU_CLOSED_CLASS: &str = "-translate-x-full";
const SCROLLED_CLASSES: [&str; 2] = ["navbar-scrolled", "navbar-bg-animate"];
const ICON_ANIMATION_MS: i32 = 300;

/// Whether the bar should switch to its compact, scrolled look.
pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// A link is active when its href names the current page file, or is
/// `index.html` while at the site root.
pub fn is_active_link(href: &str, pathname: &str) -> bool {
    let page = pathname.rsplit('/').next().unwrap_or("");
    href == page || (pathname == "/" && href == "index.html")
}

/// CSS `animation-delay` for the n-th mobile menu item.
pub fn stagger_delay(index: usize) -> String {
    format!("{}s", index as f64 * 0.1)
}

/// Desktop layouts have no slide-out menu, so an open one is closed.
pub fn should_close_on_resize(inner_width: f64, breakpoint: f64, menu_open: bool) -> bool {
    menu_open && inner_width >= breakpoint
}

#[derive(Clone)]
struct MobileMenu {
    menu: Element,
    icon: Option<Element>,
}

impl MobileMenu {
    fn is_open(&self) -> bool {
        !dom::has_class(&self.menu, MENU_CLOSED_CLASS)
    }

    fn toggle(&self) {
        dom::toggle_class(&self.menu, MENU_CLOSED_CLASS);

        if let Some(icon) = &self.icon {
            dom::toggle_class(icon, "fa-bars");
            dom::toggle_class(icon, "fa-times");
            dom::toggle_class(icon, "rotate");
            dom::add_classes(icon, &["menu-icon-animate"]);
            let icon = icon.clone();
            dom::set_timeout(ICON_ANIMATION_MS, move || {
                dom::remove_classes(&icon, &["menu-icon-animate"]);
            });
        }

        if self.is_open() {
            for (index, item) in dom::query_all_within(&self.menu, ".mobile-nav-link")
                .iter()
                .enumerate()
            {
                let delay = stagger_delay(index);
                dom::set_styles(
                    item,
                    &[
                        ("animation-delay", delay.as_str()),
                        ("animation", "slideInLeft 0.4s ease-out forwards"),
                    ],
                );
            }
        }
    }

    fn close(&self) {
        dom::add_classes(&self.menu, &[MENU_CLOSED_CLASS]);
        if let Some(icon) = &self.icon {
            dom::add_classes(icon, &["fa-bars"]);
            dom::remove_classes(icon, &["fa-times", "rotate"]);
        }
    }
}

pub fn init(config: &NavbarConfig) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navbar = dom::by_id("navbar");
    let menu = dom::by_id("mobile-menu").map(|menu| MobileMenu {
        menu,
        icon: dom::by_id("menu-icon"),
    });

    if let (Some(button), Some(menu)) = (dom::by_id("mobile-menu-button"), menu.clone()) {
        dom::listen::<MouseEvent>(&button, "click", move |_| menu.toggle());
    }

    if let Some(navbar) = navbar.clone() {
        let threshold = config.scroll_threshold;
        let win = window.clone();
        dom::listen::<web_sys::Event>(&window, "scroll", move |_| {
            let scroll_y = win.scroll_y().unwrap_or(0.0);
            if is_scrolled(scroll_y, threshold) {
                dom::add_classes(&navbar, &SCROLLED_CLASSES);
            } else {
                dom::remove_classes(&navbar, &SCROLLED_CLASSES);
            }
        });
    }

    mark_active_links(&window);

    for item in dom::query_all(".nav-link, .dropdown-btn, .nav-cta") {
        let target = item.clone();
        dom::listen::<MouseEvent>(&item, "mouseenter", move |_| {
            dom::add_classes(&target, &["nav-glow"]);
        });
        let target = item.clone();
        dom::listen::<MouseEvent>(&item, "mouseleave", move |_| {
            dom::remove_classes(&target, &["nav-glow"]);
        });
    }

    let Some(menu) = menu else {
        return;
    };
    let Some(document) = dom::document() else {
        return;
    };

    // Click outside the bar and the menu closes it
    if let Some(navbar) = navbar {
        let menu = menu.clone();
        dom::listen::<MouseEvent>(&document, "click", move |ev| {
            if !menu.is_open() {
                return;
            }
            let target = ev.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
            let inside = navbar.contains(target.as_ref()) || menu.menu.contains(target.as_ref());
            if !inside {
                menu.close();
            }
        });
    }

    {
        let menu = menu.clone();
        dom::listen::<KeyboardEvent>(&document, "keydown", move |ev| {
            if ev.key() == "Escape" && menu.is_open() {
                menu.close();
            }
        });
    }

    for anchor in dom::query_all("a[href^=\"#\"]") {
        let menu = menu.clone();
        dom::listen::<MouseEvent>(&anchor, "click", move |_| {
            if menu.is_open() {
                menu.close();
            }
        });
    }

    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let breakpoint = config.desktop_breakpoint;
    let debounce = config.resize_debounce_ms;
    let win = window.clone();
    dom::listen::<web_sys::Event>(&window, "resize", move |_| {
        if let Some(handle) = pending.take() {
            dom::clear_timeout(handle);
        }
        let menu = menu.clone();
        let win = win.clone();
        let handle = dom::set_timeout(debounce, move || {
            let width = win
                .inner_width()
                .ok()
                .and_then(|w| w.as_f64())
                .unwrap_or(0.0);
            if should_close_on_resize(width, breakpoint, menu.is_open()) {
                menu.close();
            }
        });
        pending.set(handle);
    });
}

fn mark_active_links(window: &web_sys::Window) {
    let Ok(pathname) = window.location().pathname() else {
        return;
    };
    for link in dom::query_all(".nav-link, .mobile-nav-link") {
        let Some(href) = link.get_attribute("href") else {
            continue;
        };
        if !is_active_link(&href, &pathname) {
            continue;
        }
        dom::add_classes(&link, &["active"]);
        if dom::has_class(&link, "nav-cta") || dom::has_class(&link, "mobile-nav-cta") {
            dom::add_classes(&link, &["nav-pulse"]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrolled_only_past_threshold() {
        assert!(!is_scrolled(0.0, 50.0));
        assert!(!is_scrolled(50.0, 50.0));
        assert!(is_scrolled(50.5, 50.0));
    }

    #[test]
    fn test_active_link_matches_last_segment() {
        assert!(is_active_link("products.html", "/site/products.html"));
        assert!(is_active_link("contact.html", "/contact.html"));
        assert!(!is_active_link("products.html", "/site/contact.html"));
    }

    #[test]
    fn test_index_is_active_at_root() {
        assert!(is_active_link("index.html", "/"));
        assert!(!is_active_link("about.html", "/"));
    }

    #[test]
    fn test_empty_href_matches_directory_path() {
        // "/blog/" ends with an empty segment
        assert!(is_active_link("", "/blog/"));
    }

    #[test]
    fn test_stagger_delay() {
        assert_eq!(stagger_delay(0), "0s");
        assert_eq!(stagger_delay(3), format!("{}s", 3.0 * 0.1));
    }

    #[test]
    fn test_close_on_resize_needs_open_menu_and_desktop_width() {
        assert!(should_close_on_resize(1024.0, 768.0, true));
        assert!(should_close_on_resize(768.0, 768.0, true));
        assert!(!should_close_on_resize(500.0, 768.0, true));
        assert!(!should_close_on_resize(1024.0, 768.0, false));
    }
}
