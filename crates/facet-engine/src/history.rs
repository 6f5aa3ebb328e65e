//! History synchronization.
//!
//! Reflects the canonical query into an external address-bar abstraction
//! and, at startup, seeds the initial query from it. The current entry is
//! always replaced, never pushed: rapid edits must not pile up history
//! entries per keystroke.

use std::sync::Arc;

use parking_lot::RwLock;

use facet_core::{percent_decode, CanonicalQuery};

/// External navigable-history collaborator.
pub trait HistoryPort: Send + Sync {
    /// Replace the current entry's query string. Must not navigate or
    /// reload.
    fn replace_url(&self, query_string: &str);

    /// Read the current entry's query string (with or without a leading
    /// `?`).
    fn read_url(&self) -> String;
}

/// In-process history for tests and headless embedding.
#[derive(Default)]
pub struct MemoryHistory {
    current: RwLock<String>,
}

impl MemoryHistory {
    /// Create with an empty query string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create seeded with an initial query string.
    pub fn with_query(initial: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(initial.into()),
        }
    }

    /// Current query string.
    pub fn current(&self) -> String {
        self.current.read().clone()
    }
}

impl HistoryPort for MemoryHistory {
    fn replace_url(&self, query_string: &str) {
        *self.current.write() = query_string.to_string();
    }

    fn read_url(&self) -> String {
        self.current()
    }
}

/// Split a raw query string into decoded key/value pairs.
///
/// Splits on `&` then `=`. Empty entries, entries without `=`, and
/// entries with an empty key are skipped, so malformed input degrades to
/// fewer pairs instead of failing startup.
pub fn parse_query_string(raw: &str) -> Vec<(String, String)> {
    raw.trim_start_matches('?')
        .split('&')
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            Some((percent_decode(key), percent_decode(value)))
        })
        .collect()
}

/// Keeps the address bar in step with the canonical query.
pub struct HistorySynchronizer {
    port: Arc<dyn HistoryPort>,
}

impl HistorySynchronizer {
    /// Wrap a history port.
    pub fn new(port: Arc<dyn HistoryPort>) -> Self {
        Self { port }
    }

    /// Parse the current URL's pairs for startup seeding.
    pub fn seed(&self) -> Vec<(String, String)> {
        parse_query_string(&self.port.read_url())
    }

    /// Replace the current entry with the query's URL form.
    pub fn sync(&self, query: &CanonicalQuery) {
        let query_string = query.to_query_string();
        tracing::debug!("Replacing history entry: {}", query_string);
        self.port.replace_url(&query_string);
    }
}
