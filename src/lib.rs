pub mod app;
pub mod bridge;
pub mod components;
pub mod config;
pub mod dom;
mod error;
pub mod loader;
pub mod logging;

pub use config::SiteConfig;
pub use error::{LoadError, SiteError};
pub use loader::{Document, FragmentLoader, FragmentSource, LoadOutcome, MountPoint, MountRegistry};
