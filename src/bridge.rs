//! `window.loadComponent(id, url)` for page scripts that predate the wasm bundle.

use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;

use crate::dom::{self, BrowserDocument, FetchSource};
use crate::error::{LoadError, SiteError};
use crate::loader::{FragmentLoader, LoadOutcome};

pub type BrowserLoader = FragmentLoader<FetchSource, BrowserDocument>;

/// What the JS promise resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub id: String,
    /// `mounted`, `already-loaded`, `in-flight`, `mount-missing` or `failed`
    pub status: String,
    pub error: Option<String>,
}

impl LoadReport {
    pub fn new(id: &str, result: &Result<LoadOutcome, LoadError>) -> Self {
        match result {
            Ok(outcome) => Self {
                id: id.to_string(),
                status: outcome_status(*outcome).to_string(),
                error: None,
            },
            Err(err) => Self {
                id: id.to_string(),
                status: "failed".to_string(),
                error: Some(err.to_string()),
            },
        }
    }
}

fn outcome_status(outcome: LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Mounted => "mounted",
        LoadOutcome::AlreadyLoaded => "already-loaded",
        LoadOutcome::InFlight => "in-flight",
        LoadOutcome::MountMissing => "mount-missing",
    }
}

/// Install `window.loadComponent`. The returned promise never rejects;
/// failures are already shown in the page.
pub fn expose(loader: Rc<BrowserLoader>) -> Result<(), SiteError> {
    let window = web_sys::window().ok_or_else(|| SiteError::Dom("No window available".to_string()))?;

    let closure = Closure::<dyn Fn(String, String) -> js_sys::Promise>::new(move |id: String, url: String| {
        let loader = loader.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let result = loader.load(&id, &url).await;
            serde_wasm_bindgen::to_value(&LoadReport::new(&id, &result))
                .map_err(|e| JsValue::from_str(&e.to_string()))
        })
    });

    js_sys::Reflect::set(&window, &JsValue::from_str("loadComponent"), closure.as_ref())
        .map_err(|e| SiteError::Dom(format!("Failed to install loadComponent: {}", dom::js_message(&e))))?;
    closure.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_for_success() {
        let report = LoadReport::new("navbar", &Ok(LoadOutcome::Mounted));
        assert_eq!(report.status, "mounted");
        assert_eq!(report.error, None);
    }

    #[test]
    fn test_report_for_failure_carries_description() {
        let report = LoadReport::new("navbar", &Err(LoadError::Fetch { status: 500 }));
        assert_eq!(report.status, "failed");
        assert_eq!(report.error.as_deref(), Some("HTTP error! status: 500"));
    }

    #[test]
    fn test_statuses_match_outcome_serialization() {
        for outcome in [
            LoadOutcome::Mounted,
            LoadOutcome::AlreadyLoaded,
            LoadOutcome::InFlight,
            LoadOutcome::MountMissing,
        ] {
            let json = serde_json::to_value(outcome).unwrap();
            assert_eq!(json, serde_json::Value::String(outcome_status(outcome).to_string()));
        }
    }
}
