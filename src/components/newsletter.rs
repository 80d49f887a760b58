use wasm_bindgen::JsCast;
use web_sys::{HtmlButtonElement, HtmlFormElement, HtmlInputElement};

use crate::components::notice;
use crate::config::NewsletterConfig;
use crate::dom;

const SUBSCRIBING_LABEL: &str = r#"<i class="fas fa-spinner fa-spin mr-2"></i>Subscribing..."#;
const SUBSCRIBED_LABEL: &str = r#"<i class="fas fa-check mr-2"></i>Subscribed!"#;

/// Footer signup (`#newsletterForm`) and the inline news-page signup
/// (`#newsletter-form`). Neither talks to a server.
pub fn init(config: &NewsletterConfig) {
    if let Some(form) = dom::by_id_as::<HtmlFormElement>("newsletterForm") {
        bind_footer_form(form, config.clone());
    }
    if let Some(form) = dom::by_id_as::<HtmlFormElement>("newsletter-form") {
        bind_inline_form(form, config.notice_ms);
    }
}

fn bind_footer_form(form: HtmlFormElement, config: NewsletterConfig) {
    let target = form.clone();
    dom::listen::<web_sys::Event>(&form, "submit", move |ev| {
        ev.prevent_default();
        let Some(button) = dom::query_within(&target, "button[type=\"submit\"]")
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            return;
        };
        let original_label = button.inner_html();
        button.set_inner_html(SUBSCRIBING_LABEL);
        button.set_disabled(true);

        let form = target.clone();
        let reset_delay = config.reset_delay_ms;
        dom::set_timeout(config.send_delay_ms, move || {
            form.reset();
            button.set_inner_html(SUBSCRIBED_LABEL);
            dom::set_timeout(reset_delay, move || {
                button.set_inner_html(&original_label);
                button.set_disabled(false);
            });
        });
    });
}

fn bind_inline_form(form: HtmlFormElement, notice_ms: i32) {
    let target = form.clone();
    dom::listen::<web_sys::Event>(&form, "submit", move |ev| {
        ev.prevent_default();
        let email = dom::query_within(&target, "input[type=\"email\"]")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();
        if email.is_empty() {
            return;
        }
        notice::show_subscribed(&target, email, notice_ms);
    });
}
