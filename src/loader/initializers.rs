use std::collections::HashMap;
use std::fmt;

use crate::components::Component;

/// Zero-argument setup run right after a component's markup is mounted.
pub type Initializer = Box<dyn Fn()>;

/// Fixed mapping from known mount points to their initializers.
///
/// Built once with `register` and then only read.
#[derive(Default)]
pub struct InitializerTable {
    entries: HashMap<Component, Initializer>,
}

impl InitializerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the initializer for `component`.
    pub fn register(mut self, component: Component, init: impl Fn() + 'static) -> Self {
        self.entries.insert(component, Box::new(init));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the initializer for the mount point `id`, if there is one.
    /// Returns the component that was initialized.
    pub fn dispatch(&self, id: &str) -> Option<Component> {
        let component = Component::from_mount_id(id)?;
        let init = self.entries.get(&component)?;
        init();
        Some(component)
    }
}

impl fmt::Debug for InitializerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(|c| c.mount_id()).collect();
        keys.sort_unstable();
        f.debug_struct("InitializerTable").field("entries", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn counting(counter: &Rc<Cell<u32>>) -> impl Fn() + 'static {
        let counter = counter.clone();
        move || counter.set(counter.get() + 1)
    }

    #[test]
    fn test_dispatch_runs_matching_initializer_once() {
        let navbar = Rc::new(Cell::new(0));
        let stats = Rc::new(Cell::new(0));
        let table = InitializerTable::new()
            .register(Component::Navbar, counting(&navbar))
            .register(Component::Stats, counting(&stats));

        assert_eq!(table.dispatch("navbar"), Some(Component::Navbar));
        assert_eq!(navbar.get(), 1);
        assert_eq!(stats.get(), 0);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let navbar = Rc::new(Cell::new(0));
        let table = InitializerTable::new().register(Component::Navbar, counting(&navbar));

        assert_eq!(table.dispatch("footer"), None);
        assert_eq!(table.dispatch(""), None);
        assert_eq!(navbar.get(), 0);
    }

    #[test]
    fn test_known_component_without_entry_is_noop() {
        let table = InitializerTable::new();
        assert!(table.is_empty());
        assert_eq!(table.dispatch("contact-form"), None);
    }

    #[test]
    fn test_register_replaces_previous_entry() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let table = InitializerTable::new()
            .register(Component::Carousel, counting(&first))
            .register(Component::Carousel, counting(&second));

        assert_eq!(table.len(), 1);
        table.dispatch("carousel");
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_debug_lists_registered_ids() {
        let table = InitializerTable::new()
            .register(Component::Stats, || {})
            .register(Component::Navbar, || {});
        assert_eq!(format!("{:?}", table), "InitializerTable { entries: [\"navbar\", \"stats\"] }");
    }
}
