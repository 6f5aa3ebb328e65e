//! Filter registry.
//!
//! Creates one value slot per catalog entry at session start. Slots are
//! never destroyed; external filter UIs write into them and the composer
//! reads all of them. A filter UI writes only its own slot and reads
//! other components' state through the composed query or the result
//! store, never through a sibling slot.

use std::sync::Arc;

use facet_core::{FilterCatalog, ParamValue};
use facet_reactive::Cell;

/// One named, independently-settable input to the composite query.
#[derive(Clone)]
pub struct FilterSlot {
    name: String,
    sort_order: i64,
    value: Arc<Cell<Option<ParamValue>>>,
}

impl FilterSlot {
    /// Component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog sort order.
    pub fn sort_order(&self) -> i64 {
        self.sort_order
    }

    /// The slot's reactive value. `None` means "filter not applied".
    pub fn value(&self) -> &Arc<Cell<Option<ParamValue>>> {
        &self.value
    }
}

/// Catalog-driven collection of filter slots.
pub struct FilterRegistry {
    /// Slots in catalog order.
    slots: Vec<FilterSlot>,
}

impl FilterRegistry {
    /// Create one slot per catalog entry, all starting unset.
    pub fn new(catalog: &FilterCatalog) -> Self {
        let slots = catalog
            .iter()
            .map(|descriptor| FilterSlot {
                name: descriptor.name.clone(),
                sort_order: descriptor.sort_order,
                value: Arc::new(Cell::new(None)),
            })
            .collect();
        Self { slots }
    }

    /// Slots in catalog order.
    pub fn slots_ordered(&self) -> &[FilterSlot] {
        &self.slots
    }

    /// Look up a slot by component name.
    pub fn slot(&self, name: &str) -> Option<&FilterSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Write a filter value. Returns false for unknown names.
    pub fn set(&self, name: &str, value: Option<ParamValue>) -> bool {
        match self.slot(name) {
            Some(slot) => {
                slot.value.set(value);
                true
            }
            None => {
                tracing::debug!("Ignoring write to unknown filter slot: {}", name);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::FilterDescriptor;
    use serde_json::json;

    fn test_catalog() -> FilterCatalog {
        FilterCatalog::new(vec![
            FilterDescriptor::new("term", 20),
            FilterDescriptor::new("type", 10),
        ])
    }

    #[test]
    fn test_slots_follow_catalog_order() {
        let registry = FilterRegistry::new(&test_catalog());
        let names: Vec<_> = registry
            .slots_ordered()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["type", "term"]);
    }

    #[test]
    fn test_slots_start_unset() {
        let registry = FilterRegistry::new(&test_catalog());
        assert!(registry.slot("type").unwrap().value().get().is_none());
    }

    #[test]
    fn test_set_known_slot() {
        let registry = FilterRegistry::new(&test_catalog());
        assert!(registry.set("type", Some(json!("heritage"))));
        assert_eq!(
            registry.slot("type").unwrap().value().get(),
            Some(json!("heritage"))
        );
    }

    #[test]
    fn test_set_unknown_slot_is_rejected() {
        let registry = FilterRegistry::new(&test_catalog());
        assert!(!registry.set("bogus", Some(json!(1))));
    }
}
