//! Fetch-service port.
//!
//! The transport is an external collaborator behind a trait so it can be
//! swapped and mocked. Like the rest of the engine it returns boxed
//! futures and leaves spawning to the caller.

use futures::future::BoxFuture;

use facet_core::{CanonicalQuery, SearchError, SearchResponse};

/// Asynchronous search transport.
pub trait SearchBackend: Send + Sync {
    /// Execute one search.
    ///
    /// The orchestrator may abort the returned future when a newer query
    /// supersedes it. Abortion is advisory: a transport that cannot stop
    /// an operation may still deliver its result, which the orchestrator's
    /// request-id gate then discards.
    fn search(
        &self,
        query: CanonicalQuery,
    ) -> BoxFuture<'static, Result<SearchResponse, SearchError>>;
}

// =============================================================================
// Mock Backend for Testing
// =============================================================================
