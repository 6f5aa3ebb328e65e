//! Shared result store.
//!
//! Mutation = notification: `merge` broadcasts the new snapshot, so the
//! store cannot be updated without consumers hearing about it.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::watch;

use facet_core::{ResultPayload, SearchResponse};

/// Snapshot of the store: per-component payloads plus freshness
/// timestamp.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Last-known payload per component name.
    pub entries: HashMap<String, ResultPayload>,

    /// Timestamp of the most recent completed request, if any.
    pub timestamp: Option<String>,
}

impl ResultSet {
    /// Payload for one component.
    pub fn get(&self, component: &str) -> Option<&ResultPayload> {
        self.entries.get(component)
    }

    /// Number of components with a payload.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no component has reported yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keyed mapping from component name to that component's latest result
/// payload.
///
/// ## Partial updates
///
/// `merge` overwrites only the keys present in a response; a component
/// that returned nothing this round keeps its previous payload. Backends
/// may answer per-component, so a full replace would erase
/// concurrently-valid data.
///
/// ## Thread safety
///
/// `parking_lot::RwLock` for the data, `tokio::sync::watch` for change
/// broadcast. Single writer (the orchestrator); consumers read snapshots.
pub struct ResultStore {
    inner: RwLock<ResultSet>,
    tx: watch::Sender<ResultSet>,
    rx: watch::Receiver<ResultSet>,
}

impl ResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(ResultSet::default());
        Self {
            inner: RwLock::new(ResultSet::default()),
            tx,
            rx,
        }
    }

    /// Left-biased partial update from a completed response.
    ///
    /// Overwrites every key present in the response, preserves the rest,
    /// sets the freshness timestamp, and broadcasts the new snapshot.
    pub fn merge(&self, response: &SearchResponse) {
        let snapshot = {
            let mut inner = self.inner.write();
            for (component, payload) in &response.results {
                inner.entries.insert(component.clone(), payload.clone());
            }
            inner.timestamp = Some(response.timestamp.clone());
            tracing::debug!(
                "Merged {} component payload(s), timestamp {}",
                response.results.len(),
                response.timestamp
            );
            inner.clone()
        };
        let _ = self.tx.send(snapshot);
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ResultSet {
        self.inner.read().clone()
    }

    /// Subscribe to store changes. Clone the receiver per subscriber.
    pub fn subscribe(&self) -> watch::Receiver<ResultSet> {
        self.rx.clone()
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}
