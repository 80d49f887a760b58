use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::bridge::{self, BrowserLoader};
use crate::components::{effects, Component};
use crate::config::{SiteConfig, OVERRIDE_SCRIPT_ID};
use crate::dom::{self, BrowserDocument, FetchSource};
use crate::error::LoadError;
use crate::loader::{FragmentLoader, InitializerTable, LoadOutcome};

/// Boot the site: config, logging, fragment loading, widgets.
pub fn start() {
    let (config, config_warning) = load_config();

    if let Err(e) = crate::logging::init(&config.log_filter) {
        web_sys::console::error_1(&e.to_string().into());
    }
    if let Some(warning) = config_warning {
        warn!("{}, using built-in defaults", warning);
    }

    let Some(document) = BrowserDocument::current() else {
        web_sys::console::error_1(&"No document available".into());
        return;
    };

    let config = Rc::new(config);
    let loader: Rc<BrowserLoader> = Rc::new(FragmentLoader::new(
        FetchSource::for_current_page(),
        document,
        initializers(&config),
    ));

    if let Err(e) = bridge::expose(loader.clone()) {
        warn!("{}", e);
    }

    for fragment in config.fragments.clone() {
        let loader = loader.clone();
        let config = config.clone();
        spawn_local(async move {
            // failures are already logged and shown in the mount point
            let result = loader.load(&fragment.id, &fragment.source).await;
            let Some(component) = fragment.component() else {
                return;
            };
            if needs_page_init(&result) {
                debug!(component = component.mount_id(), "Fragment not mounted, initializing page markup");
                dom::on_ready(move || component.init(&config));
            }
        });
    }

    dom::on_ready(move || {
        let managed = config.loader_managed();
        for component in Component::ALL {
            if !managed.contains(&component) {
                component.init(&config);
            }
        }
        effects::init();
        info!(fragments = config.fragments.len(), "Site ready");
    });
}

/// Every known component, initialized against the freshly mounted markup.
fn initializers(config: &Rc<SiteConfig>) -> InitializerTable {
    Component::ALL
        .into_iter()
        .fold(InitializerTable::new(), |table, component| {
            let config = config.clone();
            table.register(component, move || component.init(&config))
        })
}

/// Whether a configured fragment's widget still has to be wired up against
/// the page's own markup, because the loader never ran its initializer.
fn needs_page_init(result: &Result<LoadOutcome, LoadError>) -> bool {
    matches!(result, Ok(LoadOutcome::MountMissing) | Err(_))
}

/// The page's JSON override if present and valid, otherwise the embedded
/// defaults. Problems are returned for logging once logging is up.
fn load_config() -> (SiteConfig, Option<String>) {
    let embedded = match SiteConfig::embedded() {
        Ok(config) => config,
        Err(e) => return (SiteConfig::default(), Some(e.to_string())),
    };

    let Some(raw) = dom::by_id(OVERRIDE_SCRIPT_ID).and_then(|el| el.text_content()) else {
        return (embedded, None);
    };
    match SiteConfig::from_json(&raw) {
        Ok(config) => (config, None),
        Err(e) => (embedded, Some(e.to_string())),
    }
}
