//! Backend response shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw result payload for one filter component.
pub type ResultPayload = serde_json::Value;

/// A completed backend search response.
///
/// Wire shape: every component's payload keyed by component name, plus a
/// server-assigned freshness timestamp at the top level:
///
/// ```json
/// { "type": { ... }, "term": { ... }, "timestamp": "T2" }
/// ```
///
/// A response may carry any subset of components; the result store merges
/// it partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Per-component result payloads.
    #[serde(flatten)]
    pub results: HashMap<String, ResultPayload>,

    /// Server freshness timestamp. Opaque to the client.
    pub timestamp: String,
}

impl SearchResponse {
    /// Create an empty response with the given timestamp.
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            results: HashMap::new(),
            timestamp: timestamp.into(),
        }
    }

    /// Builder-style payload insertion.
    pub fn with_result(mut self, component: impl Into<String>, payload: ResultPayload) -> Self {
        self.results.insert(component.into(), payload);
        self
    }
}
