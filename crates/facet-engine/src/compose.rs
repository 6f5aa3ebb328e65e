//! Query composition.

use std::collections::BTreeMap;

use facet_core::{CanonicalQuery, ParamValue};

use crate::registry::FilterSlot;

/// Ambient parameters not tied to any filter (pagination and the like).
pub type AmbientParams = BTreeMap<String, ParamValue>;

/// Merge every applied filter value plus the ambient parameters into one
/// canonical query.
///
/// Unset slots are omitted entirely: "filter not applied" must not
/// serialize as JSON null or an empty string, so a slot that was
/// initialized and never touched leaves the canonical form unchanged. A
/// filter and an ambient parameter sharing a name resolve in the filter's
/// favor.
pub fn compose(slots: &[FilterSlot], ambient: &AmbientParams) -> CanonicalQuery {
    let mut query = CanonicalQuery::new();
    for (key, value) in ambient {
        query.insert(key.clone(), value.clone());
    }
    for slot in slots {
        if let Some(value) = slot.value().get() {
            query.insert(slot.name(), value);
        }
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FilterRegistry;
    use facet_core::{FilterCatalog, FilterDescriptor};
    use serde_json::json;

    fn test_registry() -> FilterRegistry {
        FilterRegistry::new(&FilterCatalog::new(vec![
            FilterDescriptor::new("type", 10),
            FilterDescriptor::new("term", 20),
            FilterDescriptor::new("map", 30),
        ]))
    }

    #[test]
    fn test_compose_is_assignment_order_independent() {
        let first = test_registry();
        first.set("type", Some(json!("heritage")));
        first.set("term", Some(json!("bridge")));

        let second = test_registry();
        second.set("term", Some(json!("bridge")));
        second.set("type", Some(json!("heritage")));

        let ambient = AmbientParams::new();
        assert_eq!(
            compose(first.slots_ordered(), &ambient).serialize(),
            compose(second.slots_ordered(), &ambient).serialize()
        );
    }

    #[test]
    fn test_unset_slots_are_omitted() {
        let registry = test_registry();
        registry.set("type", Some(json!("heritage")));

        let query = compose(registry.slots_ordered(), &AmbientParams::new());
        assert!(query.contains_key("type"));
        assert!(!query.contains_key("term"));
        assert!(!query.contains_key("map"));
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn test_cleared_slot_disappears_from_query() {
        let registry = test_registry();
        registry.set("type", Some(json!("heritage")));
        registry.set("type", None);

        let query = compose(registry.slots_ordered(), &AmbientParams::new());
        assert!(query.is_empty());
        assert!(!query.serialize().contains("null"));
    }

    #[test]
    fn test_ambient_params_are_merged() {
        let registry = test_registry();
        registry.set("type", Some(json!("heritage")));

        let mut ambient = AmbientParams::new();
        ambient.insert("paging-filter".to_string(), json!("2"));

        let query = compose(registry.slots_ordered(), &ambient);
        assert_eq!(query.get("paging-filter"), Some(&json!("2")));
        assert_eq!(query.get("type"), Some(&json!("heritage")));
    }

    #[test]
    fn test_filters_win_name_collisions() {
        let registry = test_registry();
        registry.set("type", Some(json!("heritage")));

        let mut ambient = AmbientParams::new();
        ambient.insert("type".to_string(), json!("stale"));

        let query = compose(registry.slots_ordered(), &ambient);
        assert_eq!(query.get("type"), Some(&json!("heritage")));
    }
}
