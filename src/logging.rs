use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::JsValue;

use crate::error::SiteError;

/// Install the global subscriber: an `EnvFilter` built from `filter`
/// feeding the browser console.
pub fn init(filter: &str) -> Result<(), SiteError> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| SiteError::Logging(format!("Invalid log filter '{}': {}", filter, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(ConsoleLayer)
        .try_init()
        .map_err(|e| SiteError::Logging(e.to_string()))
}

/// Forwards events to `console.error`/`warn`/`info`/`debug` by level.
pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let line = format_line(metadata.level(), metadata.target(), &visitor.message, &visitor.fields);
        let value = JsValue::from_str(&line);

        match *metadata.level() {
            Level::ERROR => web_sys::console::error_1(&value),
            Level::WARN => web_sys::console::warn_1(&value),
            Level::INFO => web_sys::console::info_1(&value),
            _ => web_sys::console::debug_1(&value),
        }
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push((field.name(), format!("{:?}", value)));
        }
    }
}

/// `LEVEL target: message key=value ...`
fn format_line(level: &Level, target: &str, message: &str, fields: &[(&str, String)]) -> String {
    let mut line = format!("{} {}: {}", level, target, message);
    for (name, value) in fields {
        let _ = write!(line, " {}={}", name, value);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_without_fields() {
        let line = format_line(&Level::INFO, "prime_site::app", "Site ready", &[]);
        assert_eq!(line, "INFO prime_site::app: Site ready");
    }

    #[test]
    fn test_format_line_appends_fields_in_order() {
        let fields = vec![
            ("component", "navbar".to_string()),
            ("error", "HTTP error! status: 404".to_string()),
        ];
        let line = format_line(&Level::ERROR, "prime_site::loader", "Error loading component", &fields);
        assert_eq!(
            line,
            "ERROR prime_site::loader: Error loading component component=navbar error=HTTP error! status: 404"
        );
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let err = init("prime_site=verbose").unwrap_err();
        assert!(matches!(err, SiteError::Logging(_)));
    }
}
