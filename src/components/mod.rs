pub mod contact_form;
pub mod effects;
pub mod navbar;
pub mod newsletter;
pub mod notice;
pub mod partners;
pub mod product_filter;
pub mod showcase;
pub mod stats;
pub mod tabs;

use crate::config::SiteConfig;

/// Mount points that have interactive behavior to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Navbar,
    Carousel,
    Partners,
    ContactForm,
    Stats,
    Products,
    Gallery,
    Updates,
    Newsletter,
}

impl Component {
    pub const ALL: [Component; 9] = [
        Component::Navbar,
        Component::Carousel,
        Component::Partners,
        Component::ContactForm,
        Component::Stats,
        Component::Products,
        Component::Gallery,
        Component::Updates,
        Component::Newsletter,
    ];

    /// Element id of the component's mount point.
    pub fn mount_id(self) -> &'static str {
        match self {
            Component::Navbar => "navbar",
            Component::Carousel => "carousel",
            Component::Partners => "partners",
            Component::ContactForm => "contact-form",
            Component::Stats => "stats",
            Component::Products => "products",
            Component::Gallery => "gallery",
            Component::Updates => "updates",
            Component::Newsletter => "newsletter",
        }
    }

    pub fn from_mount_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.mount_id() == id)
    }

    /// Wire up the component's behavior against whatever is in the page now.
    pub fn init(self, config: &SiteConfig) {
        match self {
            Component::Navbar => navbar::init(&config.navbar),
            Component::Carousel => showcase::init(),
            Component::Partners => partners::init(&config.partners),
            Component::ContactForm => contact_form::init(&config.contact_form),
            Component::Stats => stats::init(&config.stats),
            Component::Products => product_filter::init(),
            Component::Gallery => tabs::init_gallery(),
            Component::Updates => tabs::init_updates(),
            Component::Newsletter => newsletter::init(&config.newsletter),
        }
    }
}
