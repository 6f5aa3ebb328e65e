//! Filter catalog descriptors.

use serde::{Deserialize, Serialize};

/// One entry in the filter catalog.
///
/// Descriptors only name and order the filter slots; the values themselves
/// live in the engine's registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    /// Component name, unique within a catalog.
    pub name: String,

    /// Iteration order, ascending.
    pub sort_order: i64,
}

impl FilterDescriptor {
    /// Create a new descriptor.
    pub fn new(name: impl Into<String>, sort_order: i64) -> Self {
        Self {
            name: name.into(),
            sort_order,
        }
    }
}

/// Static catalog of available filter components.
///
/// Iteration follows `sort_order` ascending with ties broken by name, so
/// the order is a deterministic total order regardless of insertion order.
/// Built through [`FilterCatalog::new`] only, which establishes that
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCatalog {
    entries: Vec<FilterDescriptor>,
}

impl FilterCatalog {
    /// Build a catalog; entries are sorted on construction.
    pub fn new(mut entries: Vec<FilterDescriptor>) -> Self {
        entries.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { entries }
    }

    /// Descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.entries.iter()
    }

    /// Check whether a component name is in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|d| d.name == name)
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
