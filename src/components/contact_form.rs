//! Contact form validation and the simulated send.

use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use crate::config::ContactFormConfig;
use crate::dom;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const FIELD_ERROR_CLASS: &str = "border-red-500";
const SENDING_LABEL: &str = r#"<i class="fas fa-spinner fa-spin mr-2"></i> Sending..."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Subject,
    Message,
    Agree,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Subject,
        Field::Message,
        Field::Agree,
    ];

    /// Element id of the input.
    pub fn id(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
            Field::Agree => "agree",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    /// Element id of the inline error text.
    pub fn error_id(self) -> String {
        format!("{}Error", self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub agreed: bool,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Length the way the browser reports `value.length`, in UTF-16 code units.
fn js_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Check one text field as typed, trimmed first. `Agree` is a checkbox and
/// always passes here.
pub fn check_text(field: Field, value: &str, min_message_len: usize) -> Option<String> {
    let value = value.trim();
    let message = match field {
        Field::FirstName if value.is_empty() => "Please enter your first name".to_string(),
        Field::LastName if value.is_empty() => "Please enter your last name".to_string(),
        Field::Subject if value.is_empty() => "Please enter a subject".to_string(),
        Field::Email if value.is_empty() => "Please enter your email address".to_string(),
        Field::Email if !is_valid_email(value) => "Please enter a valid email address".to_string(),
        Field::Message if value.is_empty() => "Please enter your message".to_string(),
        Field::Message if js_length(value) < min_message_len => {
            format!("Message must be at least {} characters long", min_message_len)
        }
        _ => return None,
    };
    Some(message)
}

/// Check one text field on submit. Only the emptiness test trims the email;
/// the pattern sees the raw value.
fn check_submitted(field: Field, value: &str, min_message_len: usize) -> Option<String> {
    if field == Field::Email && !value.trim().is_empty() && !is_valid_email(value) {
        return Some("Please enter a valid email address".to_string());
    }
    check_text(field, value, min_message_len)
}

/// Every problem with the submission, in form order.
pub fn validate(submission: &ContactSubmission, min_message_len: usize) -> Vec<FieldError> {
    let texts = [
        (Field::FirstName, &submission.first_name),
        (Field::LastName, &submission.last_name),
        (Field::Email, &submission.email),
        (Field::Subject, &submission.subject),
        (Field::Message, &submission.message),
    ];

    let mut errors: Vec<FieldError> = texts
        .into_iter()
        .filter_map(|(field, value)| {
            check_submitted(field, value, min_message_len).map(|message| FieldError { field, message })
        })
        .collect();

    if !submission.agreed {
        errors.push(FieldError {
            field: Field::Agree,
            message: "You must agree to the terms".to_string(),
        });
    }
    errors
}

// -- DOM glue --

fn field_value(field: Field) -> String {
    let Some(el) = dom::by_id(field.id()) else {
        return String::new();
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    el.dyn_ref::<HtmlTextAreaElement>()
        .map(|area| area.value())
        .unwrap_or_default()
}

fn read_submission() -> ContactSubmission {
    ContactSubmission {
        first_name: field_value(Field::FirstName),
        last_name: field_value(Field::LastName),
        email: field_value(Field::Email),
        subject: field_value(Field::Subject),
        message: field_value(Field::Message),
        agreed: dom::by_id_as::<HtmlInputElement>(Field::Agree.id())
            .map(|input| input.checked())
            .unwrap_or(false),
    }
}

fn show_error(field: Field, message: &str) {
    if let Some(input) = dom::by_id(field.id()) {
        dom::add_classes(&input, &[FIELD_ERROR_CLASS]);
    }
    if let Some(error) = dom::by_id(&field.error_id()) {
        error.set_text_content(Some(message));
        dom::remove_classes(&error, &["hidden"]);
    }
}

fn clear_error(input: &Element, field: Field) {
    if let Some(error) = dom::by_id(&field.error_id()) {
        if !dom::has_class(&error, "hidden") {
            dom::add_classes(&error, &["hidden"]);
            dom::remove_classes(input, &[FIELD_ERROR_CLASS]);
        }
    }
}

struct ContactForm {
    form: HtmlFormElement,
    success: Option<Element>,
    failure: Option<Element>,
    config: ContactFormConfig,
}

impl ContactForm {
    fn reset_errors(&self) {
        for error in dom::query_all_within(&self.form, ".text-red-500") {
            dom::add_classes(&error, &["hidden"]);
        }
        for input in dom::query_all_within(&self.form, "input, textarea") {
            dom::remove_classes(&input, &[FIELD_ERROR_CLASS]);
        }
        for message in self.success.iter().chain(self.failure.iter()) {
            dom::add_classes(message, &["hidden"]);
        }
    }

    fn on_submit(self: &Rc<Self>) {
        self.reset_errors();
        let errors = validate(&read_submission(), self.config.min_message_len);
        if errors.is_empty() {
            self.send();
            return;
        }
        for error in &errors {
            show_error(error.field, &error.message);
        }
    }

    fn send(self: &Rc<Self>) {
        let Some(button) = dom::query_within(&self.form, "button[type=\"submit\"]")
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            return;
        };
        let original_label = button.inner_html();
        button.set_inner_html(SENDING_LABEL);
        button.set_disabled(true);
        info!("Sending contact form");

        let this = self.clone();
        dom::set_timeout(self.config.send_delay_ms, move || {
            dom::set_style(&this.form, "display", "none");
            if let Some(success) = &this.success {
                dom::remove_classes(success, &["hidden"]);
            }

            let reset_delay = this.config.reset_delay_ms;
            dom::set_timeout(reset_delay, move || {
                this.form.reset();
                dom::set_style(&this.form, "display", "block");
                if let Some(success) = &this.success {
                    dom::add_classes(success, &["hidden"]);
                }
                button.set_inner_html(&original_label);
                button.set_disabled(false);
            });
        });
    }
}

pub fn init(config: &ContactFormConfig) {
    let Some(form) = dom::by_id_as::<HtmlFormElement>("contactForm") else {
        return;
    };
    let contact = Rc::new(ContactForm {
        form,
        success: dom::by_id("successMessage"),
        failure: dom::by_id("errorMessage"),
        config: config.clone(),
    });

    let on_submit = contact.clone();
    dom::listen::<web_sys::Event>(&contact.form, "submit", move |ev| {
        ev.prevent_default();
        on_submit.on_submit();
    });

    for input in dom::query_all_within(&contact.form, "input, textarea") {
        let Some(field) = Field::from_id(&input.id()) else {
            continue;
        };

        let min_len = config.min_message_len;
        dom::listen::<web_sys::Event>(&input, "blur", move |_| {
            if let Some(message) = check_text(field, &field_value(field), min_len) {
                show_error(field, &message);
            }
        });

        let typed = input.clone();
        dom::listen::<web_sys::Event>(&input, "input", move |_| clear_error(&typed, field));
    }

    if let Some(agree) = dom::by_id_as::<HtmlInputElement>(Field::Agree.id()) {
        let checkbox = agree.clone();
        dom::listen::<web_sys::Event>(&agree, "change", move |_| {
            if checkbox.checked() {
                if let Some(error) = dom::by_id(&Field::Agree.error_id()) {
                    dom::add_classes(&error, &["hidden"]);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ContactSubmission {
        ContactSubmission {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Automation quote".to_string(),
            message: "Please call me back about conveyors.".to_string(),
            agreed: true,
        }
    }

    #[test]
    fn test_valid_submission_has_no_errors() {
        assert!(validate(&valid(), 10).is_empty());
    }

    #[test]
    fn test_empty_submission_reports_every_field_in_order() {
        let errors = validate(&ContactSubmission::default(), 10);
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, Field::ALL.to_vec());
        assert_eq!(errors[0].message, "Please enter your first name");
        assert_eq!(errors[2].message, "Please enter your email address");
        assert_eq!(errors[5].message, "You must agree to the terms");
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let mut submission = valid();
        submission.subject = "   ".to_string();
        let errors = validate(&submission, 10);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Subject);
        assert_eq!(errors[0].message, "Please enter a subject");
    }

    #[test]
    fn test_invalid_email() {
        let mut submission = valid();
        submission.email = "ada@example".to_string();
        let errors = validate(&submission, 10);
        assert_eq!(errors[0].message, "Please enter a valid email address");
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@@b.de"));
        assert!(!is_valid_email("@b.de"));
        assert!(!is_valid_email("plain"));
    }

    #[test]
    fn test_short_message_uses_configured_minimum() {
        let mut submission = valid();
        submission.message = "  too short ".to_string();
        let errors = validate(&submission, 20);
        assert_eq!(errors[0].field, Field::Message);
        assert_eq!(errors[0].message, "Message must be at least 20 characters long");

        assert!(validate(&submission, 9).is_empty());
    }

    #[test]
    fn test_submitted_email_is_matched_untrimmed() {
        let mut submission = valid();
        submission.email = " ada@example.com ".to_string();
        let errors = validate(&submission, 10);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Email);
        assert_eq!(errors[0].message, "Please enter a valid email address");

        // leaving the field trims it first
        assert_eq!(check_text(Field::Email, " ada@example.com ", 10), None);
    }

    #[test]
    fn test_message_length_counts_utf16_units() {
        // five astral-plane characters are ten UTF-16 code units
        let message = "\u{1F600}".repeat(5);
        assert_eq!(check_text(Field::Message, &message, 10), None);
        assert_eq!(
            check_text(Field::Message, &message, 11).as_deref(),
            Some("Message must be at least 11 characters long")
        );
    }

    #[test]
    fn test_check_text_ignores_checkbox() {
        assert_eq!(check_text(Field::Agree, "", 10), None);
    }

    #[test]
    fn test_field_ids() {
        assert_eq!(Field::from_id("firstName"), Some(Field::FirstName));
        assert_eq!(Field::from_id("phone"), None);
        assert_eq!(Field::Message.error_id(), "messageError");
    }
}
