//! The canonical query representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::encoding::percent_encode;

/// A single query parameter value.
pub type ParamValue = serde_json::Value;

/// The single deterministic, serializable representation of "what to
/// search for".
///
/// Keys live in a `BTreeMap`, so iteration and serialization follow a
/// stable total key order: two queries are equal iff their serialized
/// forms are byte-identical, and the derived `Eq` agrees with that by
/// construction.
///
/// A canonical query is derived, not stored - it is recomputed from the
/// filter slots on every change, which is why consumers compare it by
/// serialized form rather than by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalQuery {
    params: BTreeMap<String, ParamValue>,
}

impl CanonicalQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
        self.params.insert(key.into(), value);
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Check whether a parameter is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the query has no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.params.iter()
    }

    /// Canonical JSON form, used for equality comparison.
    ///
    /// Stable key ordering comes from the `BTreeMap`, so identical queries
    /// always produce byte-identical strings.
    pub fn serialize(&self) -> String {
        // a map with string keys and JSON values cannot fail to serialize
        serde_json::to_string(&self.params).unwrap_or_default()
    }

    /// URL query-string form: `k1=v1&k2=v2`, percent-encoded, spaces as
    /// `%20`.
    ///
    /// String values encode their raw content; any other JSON value
    /// encodes its compact JSON form.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    ParamValue::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("{}={}", percent_encode(key), percent_encode(&text))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl FromIterator<(String, ParamValue)> for CanonicalQuery {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}
