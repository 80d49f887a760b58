use std::cell::RefCell;
use std::collections::HashMap;

/// Lifecycle of one mount point identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

/// What `begin` decided for a new load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    Proceed,
    AlreadyLoaded,
    InFlight,
}

/// Per-page record of which mount points have been filled.
///
/// An identifier reaches `Loaded` at most once and never leaves it.
/// `Failed` and `Unloaded` identifiers can always be loaded again.
#[derive(Debug, Default)]
pub struct MountRegistry {
    states: RefCell<HashMap<String, MountState>>,
}

impl MountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the identifier's fragment has been mounted.
    pub fn contains(&self, id: &str) -> bool {
        self.state(id) == MountState::Loaded
    }

    pub fn state(&self, id: &str) -> MountState {
        self.states
            .borrow()
            .get(id)
            .copied()
            .unwrap_or(MountState::Unloaded)
    }

    /// Identifiers in the `Loaded` state, sorted.
    pub fn loaded(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .states
            .borrow()
            .iter()
            .filter(|(_, state)| **state == MountState::Loaded)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub(crate) fn begin(&self, id: &str) -> Admission {
        let mut states = self.states.borrow_mut();
        match states.get(id) {
            Some(MountState::Loaded) => Admission::AlreadyLoaded,
            Some(MountState::Loading) => Admission::InFlight,
            _ => {
                states.insert(id.to_string(), MountState::Loading);
                Admission::Proceed
            }
        }
    }

    pub(crate) fn mark_loaded(&self, id: &str) {
        self.states
            .borrow_mut()
            .insert(id.to_string(), MountState::Loaded);
    }

    pub(crate) fn mark_failed(&self, id: &str) {
        self.states
            .borrow_mut()
            .insert(id.to_string(), MountState::Failed);
    }

    /// Back to `Unloaded`, as if no load had been attempted.
    pub(crate) fn forget(&self, id: &str) {
        self.states.borrow_mut().remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_id_is_unloaded() {
        let registry = MountRegistry::new();
        assert_eq!(registry.state("navbar"), MountState::Unloaded);
        assert!(!registry.contains("navbar"));
    }

    #[test]
    fn test_begin_then_loaded() {
        let registry = MountRegistry::new();
        assert_eq!(registry.begin("navbar"), Admission::Proceed);
        assert_eq!(registry.state("navbar"), MountState::Loading);
        assert!(!registry.contains("navbar"));

        registry.mark_loaded("navbar");
        assert!(registry.contains("navbar"));
        assert_eq!(registry.begin("navbar"), Admission::AlreadyLoaded);
        assert_eq!(registry.state("navbar"), MountState::Loaded);
    }

    #[test]
    fn test_second_begin_while_loading_is_in_flight() {
        let registry = MountRegistry::new();
        assert_eq!(registry.begin("stats"), Admission::Proceed);
        assert_eq!(registry.begin("stats"), Admission::InFlight);
    }

    #[test]
    fn test_failed_can_be_retried() {
        let registry = MountRegistry::new();
        registry.begin("carousel");
        registry.mark_failed("carousel");
        assert_eq!(registry.state("carousel"), MountState::Failed);
        assert!(!registry.contains("carousel"));
        assert_eq!(registry.begin("carousel"), Admission::Proceed);
    }

    #[test]
    fn test_forget_returns_to_unloaded() {
        let registry = MountRegistry::new();
        registry.begin("footer");
        registry.forget("footer");
        assert_eq!(registry.state("footer"), MountState::Unloaded);
        assert!(registry.loaded().is_empty());
    }

    #[test]
    fn test_loaded_lists_only_loaded_ids() {
        let registry = MountRegistry::new();
        for id in ["stats", "navbar", "footer"] {
            registry.begin(id);
        }
        registry.mark_loaded("stats");
        registry.mark_loaded("navbar");
        registry.mark_failed("footer");
        assert_eq!(registry.loaded(), vec!["navbar".to_string(), "stats".to_string()]);
    }
}
