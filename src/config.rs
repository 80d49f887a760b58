use serde::{Deserialize, Serialize};

use crate::components::Component;
use crate::error::SiteError;

const EMBEDDED_CONFIG: &str = include_str!("../site.toml");

/// Element id of the optional JSON override block on a page.
pub const OVERRIDE_SCRIPT_ID: &str = "site-config";

/// Everything the bootstrap needs to know about the page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// `EnvFilter` directive string, e.g. "info" or "prime_site::loader=debug".
    pub log_filter: String,
    /// Fragments fetched into their mount points at boot.
    pub fragments: Vec<FragmentConfig>,
    pub navbar: NavbarConfig,
    pub contact_form: ContactFormConfig,
    pub newsletter: NewsletterConfig,
    pub stats: StatsConfig,
    pub partners: PartnersConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            fragments: Vec::new(),
            navbar: NavbarConfig::default(),
            contact_form: ContactFormConfig::default(),
            newsletter: NewsletterConfig::default(),
            stats: StatsConfig::default(),
            partners: PartnersConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FragmentConfig {
    /// Mount point element id.
    pub id: String,
    /// URL or path, resolved against the page URL.
    pub source: String,
}

impl FragmentConfig {
    pub fn component(&self) -> Option<Component> {
        Component::from_mount_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavbarConfig {
    pub scroll_threshold: f64,
    pub desktop_breakpoint: f64,
    pub resize_debounce_ms: i32,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 50.0,
            desktop_breakpoint: 768.0,
            resize_debounce_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactFormConfig {
    pub send_delay_ms: i32,
    pub reset_delay_ms: i32,
    pub min_message_len: usize,
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            send_delay_ms: 1500,
            reset_delay_ms: 5000,
            min_message_len: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub send_delay_ms: i32,
    pub reset_delay_ms: i32,
    /// How long the thank-you notice replaces the inline form.
    pub notice_ms: i32,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            send_delay_ms: 1500,
            reset_delay_ms: 2000,
            notice_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsConfig {
    pub counter_duration_ms: u32,
    pub bar_stagger_ms: i32,
    pub ring_stagger_ms: i32,
    pub replay_delay_ms: i32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            counter_duration_ms: 2000,
            bar_stagger_ms: 100,
            ring_stagger_ms: 150,
            replay_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PartnersConfig {
    /// Pixels advanced per animation frame.
    pub scroll_speed: f64,
}

impl Default for PartnersConfig {
    fn default() -> Self {
        Self { scroll_speed: 1.0 }
    }
}

impl SiteConfig {
    /// The defaults compiled into the bundle from `site.toml`.
    pub fn embedded() -> Result<Self, SiteError> {
        Self::from_toml(EMBEDDED_CONFIG)
    }

    pub fn from_toml(content: &str) -> Result<Self, SiteError> {
        toml::from_str(content).map_err(|e| SiteError::Config(format!("Invalid site.toml: {}", e)))
    }

    pub fn from_json(content: &str) -> Result<Self, SiteError> {
        serde_json::from_str(content)
            .map_err(|e| SiteError::Config(format!("Invalid site-config JSON: {}", e)))
    }

    /// Components whose markup arrives through the fragment loader. Their
    /// initializers run from the loader, not from the page bootstrap.
    pub fn loader_managed(&self) -> Vec<Component> {
        let mut managed = Vec::new();
        for component in self.fragments.iter().filter_map(FragmentConfig::component) {
            if !managed.contains(&component) {
                managed.push(component);
            }
        }
        managed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = SiteConfig::embedded().unwrap();
        assert_eq!(config.log_filter, "info");
        assert!(config.fragments.is_empty());
        assert_eq!(config.navbar, NavbarConfig::default());
        assert_eq!(config.contact_form, ContactFormConfig::default());
        assert_eq!(config.newsletter, NewsletterConfig::default());
        assert_eq!(config.stats, StatsConfig::default());
        assert_eq!(config.partners, PartnersConfig::default());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config = SiteConfig::from_toml("log_filter = \"debug\"").unwrap();
        assert_eq!(config.log_filter, "debug");
        assert!(config.fragments.is_empty());
        assert_eq!(config.navbar.scroll_threshold, 50.0);
        assert_eq!(config.contact_form.min_message_len, 10);
    }

    #[test]
    fn test_json_override_partial_section() {
        let json = r#"{
            "fragments": [{ "id": "contact-form", "source": "/components/contact.html" }],
            "contact_form": { "send_delay_ms": 10 }
        }"#;
        let config = SiteConfig::from_json(json).unwrap();
        assert_eq!(config.fragments.len(), 1);
        assert_eq!(config.contact_form.send_delay_ms, 10);
        assert_eq!(config.contact_form.reset_delay_ms, 5000);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = SiteConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }

    #[test]
    fn test_fragment_without_source_is_rejected() {
        let err = SiteConfig::from_toml("[[fragments]]\nid = \"navbar\"\n").unwrap_err();
        assert!(err.to_string().contains("Invalid site.toml"));
    }

    #[test]
    fn test_nothing_is_loader_managed_by_default() {
        let config = SiteConfig::embedded().unwrap();
        assert!(config.loader_managed().is_empty());
    }

    #[test]
    fn test_loader_managed_skips_unknown_and_repeated_ids() {
        let config = SiteConfig::from_toml(
            r#"
            [[fragments]]
            id = "navbar"
            source = "components/navbar.html"

            [[fragments]]
            id = "footer"
            source = "components/footer.html"

            [[fragments]]
            id = "navbar"
            source = "components/navbar-alt.html"
            "#,
        )
        .unwrap();
        // "footer" has no initializer
        assert_eq!(config.loader_managed(), vec![Component::Navbar]);
    }
}
