//! Fetches HTML fragments into named mount points, once per mount point,
//! and runs the mount point's initializer afterwards.

pub mod initializers;
pub mod registry;

use serde::Serialize;
use tracing::{debug, error, info};

pub use crate::error::LoadError;
pub use initializers::{Initializer, InitializerTable};
pub use registry::{MountRegistry, MountState};

use registry::Admission;

/// Where fragment markup comes from.
#[allow(async_fn_in_trait)]
pub trait FragmentSource {
    /// Retrieve the full text body at `location`.
    async fn fetch(&self, location: &str) -> Result<String, LoadError>;
}

/// The page the fragments are mounted into.
pub trait Document {
    type Mount: MountPoint;

    /// Look up a mount point by element id.
    fn mount_point(&self, id: &str) -> Option<Self::Mount>;
}

pub trait MountPoint {
    /// Replace the contents with `markup`, interpreted as trusted HTML.
    fn replace_markup(&self, markup: &str);

    /// Replace the contents with the visible load-failure notice.
    fn show_error(&self, description: &str);
}

/// Successful results of [`FragmentLoader::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadOutcome {
    /// Markup injected and the initializer (if any) has run.
    Mounted,
    /// Already mounted earlier; nothing was done.
    AlreadyLoaded,
    /// Another load of the same identifier is still running; nothing was done.
    InFlight,
    /// Fetched, but the page has no such element. Content discarded.
    MountMissing,
}

pub struct FragmentLoader<S, D> {
    source: S,
    document: D,
    registry: MountRegistry,
    initializers: InitializerTable,
}

impl<S, D> FragmentLoader<S, D>
where
    S: FragmentSource,
    D: Document,
{
    pub fn new(source: S, document: D, initializers: InitializerTable) -> Self {
        Self {
            source,
            document,
            registry: MountRegistry::new(),
            initializers,
        }
    }

    pub fn registry(&self) -> &MountRegistry {
        &self.registry
    }

    /// Fetch `location` into the element `id` unless it is already there.
    ///
    /// Failures are logged and rendered into the mount point before being
    /// returned; callers that only care about the page can ignore the result.
    pub async fn load(&self, id: &str, location: &str) -> Result<LoadOutcome, LoadError> {
        match self.registry.begin(id) {
            Admission::AlreadyLoaded => {
                debug!(component = id, "Component already loaded");
                return Ok(LoadOutcome::AlreadyLoaded);
            }
            Admission::InFlight => {
                debug!(component = id, "Component load already in flight");
                return Ok(LoadOutcome::InFlight);
            }
            Admission::Proceed => {}
        }
        let pending = PendingLoad::new(&self.registry, id);

        let markup = match self.source.fetch(location).await {
            Ok(markup) => markup,
            Err(err) => {
                pending.settle();
                self.fail(id, &err);
                return Err(err);
            }
        };

        let Some(mount) = self.document.mount_point(id) else {
            drop(pending);
            debug!(component = id, source = location, "No mount point, discarding fragment");
            return Ok(LoadOutcome::MountMissing);
        };

        pending.settle();
        mount.replace_markup(&markup);
        self.registry.mark_loaded(id);
        info!(component = id, source = location, bytes = markup.len(), "Component mounted");

        if let Some(component) = self.initializers.dispatch(id) {
            debug!(component = component.mount_id(), "Component initialized");
        }

        Ok(LoadOutcome::Mounted)
    }

    fn fail(&self, id: &str, err: &LoadError) {
        self.registry.mark_failed(id);
        error!(component = id, error = %err, "Error loading component");
        if let Some(mount) = self.document.mount_point(id) {
            mount.show_error(&err.to_string());
        }
    }
}

/// Holds an identifier in `Loading` for the span of one fetch. Unless
/// settled, dropping it (including when the `load` future is dropped
/// mid-fetch) puts the identifier back to `Unloaded`.
struct PendingLoad<'a> {
    registry: &'a MountRegistry,
    id: &'a str,
    settled: bool,
}

impl<'a> PendingLoad<'a> {
    fn new(registry: &'a MountRegistry, id: &'a str) -> Self {
        Self {
            registry,
            id,
            settled: false,
        }
    }

    /// The caller records the final state itself.
    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.registry.forget(self.id);
        }
    }
}
