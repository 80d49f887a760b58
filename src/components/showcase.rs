use web_sys::{HtmlImageElement, MouseEvent};

use crate::dom;

const FADE_OUT_MS: i32 = 300;
const FADE_IN_MS: i32 = 600;

/// Text options on the left swap the showcase image on the right.
pub fn init() {
    let options = dom::query_all(".text-option");
    let Some(image) = dom::by_id_as::<HtmlImageElement>("showcase-image") else {
        return;
    };

    for option in &options {
        let all = options.clone();
        let clicked = option.clone();
        let image = image.clone();
        dom::listen::<MouseEvent>(option, "click", move |_| {
            for other in &all {
                dom::remove_classes(other, &["active"]);
            }
            dom::add_classes(&clicked, &["active"]);

            let Some(source) = clicked.get_attribute("data-image") else {
                return;
            };
            dom::add_classes(&image, &["fade-out"]);

            let swap = image.clone();
            dom::set_timeout(FADE_OUT_MS, move || {
                swap.set_src(&source);
                dom::remove_classes(&swap, &["fade-out"]);
                dom::add_classes(&swap, &["fade-in"]);
            });
            let settle = image.clone();
            dom::set_timeout(FADE_IN_MS, move || {
                dom::remove_classes(&settle, &["fade-in"]);
            });
        });
    }
}
