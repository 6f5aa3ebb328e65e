//! Shared session state.
//!
//! One explicit, ownership-clear object handed by `Arc` to every consumer
//! at construction time - no ambient lookup. Mutation goes through the
//! reactive cells; consumers treat reads as snapshots refreshed on each
//! notification.

use std::sync::Arc;

use facet_core::ParamValue;
use facet_reactive::Cell;

/// Cross-component session state shared by the search surface.
pub struct SharedSearchState {
    /// Currently selected filter tab.
    pub selected_tab: Arc<Cell<String>>,

    /// Whether the result list is expanded.
    pub results_expanded: Arc<Cell<bool>>,

    /// Resource instance currently under the pointer, if any.
    pub hovered_instance: Arc<Cell<Option<String>>>,

    /// Deep-link payload for the map component, if any.
    pub map_link: Arc<Cell<Option<ParamValue>>>,
}

impl SharedSearchState {
    /// Create with default values.
    pub fn new() -> Self {
        Self {
            selected_tab: Arc::new(Cell::new("map-filter".to_string())),
            results_expanded: Arc::new(Cell::new(true)),
            hovered_instance: Arc::new(Cell::new(None)),
            map_link: Arc::new(Cell::new(None)),
        }
    }
}

impl Default for SharedSearchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = SharedSearchState::new();
        assert_eq!(state.selected_tab.get(), "map-filter");
        assert!(state.results_expanded.get());
        assert!(state.hovered_instance.get().is_none());
        assert!(state.map_link.get().is_none());
    }
}
