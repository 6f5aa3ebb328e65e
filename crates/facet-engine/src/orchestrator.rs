//! Search orchestrator.
//!
//! The state machine that reacts to canonical-query changes: cancel any
//! outstanding request, issue a new fetch, and on completion merge
//! results into the store or surface the failure.
//!
//! ## Staleness gate
//!
//! Transport-level cancellation is advisory - an aborted operation's
//! result can still arrive. Correctness therefore rests on the request-id
//! comparison alone: only the response whose id equals the current id may
//! mutate shared state. Every completion clears its own transport handle;
//! everything else it might do is id-gated.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable, Aborted};
use parking_lot::Mutex;
use tokio::sync::watch;

use facet_core::{Alert, CanonicalQuery, SearchError, SearchResponse};
use facet_reactive::Cell;

use crate::backend::SearchBackend;
use crate::history::HistorySynchronizer;
use crate::results::ResultStore;

// =============================================================================
// Phases
// =============================================================================

/// Orchestrator lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorPhase {
    /// No query issued yet.
    Idle,
    /// The request with this id is in flight.
    Pending(u64),
    /// The most recent request completed, successfully or not.
    Settled,
}

// =============================================================================
// Internal state
// =============================================================================

/// The one in-flight request, with its advisory cancellation handle.
struct InFlight {
    id: u64,
    query: CanonicalQuery,
    abort: AbortHandle,
}

struct OrchestratorState {
    phase: OrchestratorPhase,

    /// Serialized form of the last issued query. Compared as a string,
    /// not by reference: the canonical query is recomputed on every slot
    /// change even when the effective query repeats.
    last_issued: Option<String>,

    /// Monotonic request-id allocator. Never reset.
    next_id: u64,

    /// Id of the only request allowed to mutate shared state.
    current_id: u64,

    in_flight: Option<InFlight>,
}

struct OrchestratorInner {
    backend: Arc<dyn SearchBackend>,
    results: Arc<ResultStore>,
    history: HistorySynchronizer,
    state: Mutex<OrchestratorState>,
    loading: Arc<Cell<bool>>,
    alert_tx: watch::Sender<Option<Alert>>,
    alert_rx: watch::Receiver<Option<Alert>>,
    request_timeout: Option<Duration>,
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Reacts to canonical-query changes; sole writer of the result store.
///
/// Cheap to clone - clones share the same state. Fetches are spawned on
/// the ambient tokio runtime, so `submit` must be called from within one.
#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<OrchestratorInner>,
}

impl SearchOrchestrator {
    /// Create an orchestrator over a backend, a result store, and a
    /// history synchronizer.
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        results: Arc<ResultStore>,
        history: HistorySynchronizer,
        request_timeout: Option<Duration>,
    ) -> Self {
        let (alert_tx, alert_rx) = watch::channel(None);
        Self {
            inner: Arc::new(OrchestratorInner {
                backend,
                results,
                history,
                state: Mutex::new(OrchestratorState {
                    phase: OrchestratorPhase::Idle,
                    last_issued: None,
                    next_id: 0,
                    current_id: 0,
                    in_flight: None,
                }),
                loading: Arc::new(Cell::new(false)),
                alert_tx,
                alert_rx,
                request_timeout,
            }),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> OrchestratorPhase {
        self.inner.state.lock().phase
    }

    /// Whether the current request is still in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.loading.get()
    }

    /// The reactive loading flag.
    pub fn loading(&self) -> Arc<Cell<bool>> {
        self.inner.loading.clone()
    }

    /// User-visible failure channel; a successful request clears it.
    pub fn alerts(&self) -> watch::Receiver<Option<Alert>> {
        self.inner.alert_rx.clone()
    }

    /// The shared result store.
    pub fn results(&self) -> &Arc<ResultStore> {
        &self.inner.results
    }

    /// React to a canonical-query change.
    ///
    /// A repeat of the last issued query (compared by serialized form) is
    /// ignored outright: no fetch, no cancellation, no history write.
    /// Otherwise any outstanding request is aborted, a new monotonic id
    /// is allocated, and the fetch is spawned.
    pub fn submit(&self, query: CanonicalQuery) {
        let serialized = query.serialize();
        let (id, registration) = {
            let mut state = self.inner.state.lock();
            if state.last_issued.as_deref() == Some(serialized.as_str()) {
                tracing::debug!("Query unchanged, skipping fetch");
                return;
            }

            // supersede the outstanding request; advisory only, the id
            // gate in apply_response is what protects shared state
            if let Some(in_flight) = state.in_flight.take() {
                tracing::debug!("Aborting superseded request {}", in_flight.id);
                in_flight.abort.abort();
            }

            state.next_id += 1;
            let id = state.next_id;
            state.current_id = id;
            state.phase = OrchestratorPhase::Pending(id);
            state.last_issued = Some(serialized);

            let (abort, registration) = AbortHandle::new_pair();
            state.in_flight = Some(InFlight {
                id,
                query: query.clone(),
                abort,
            });
            (id, registration)
        };

        let fetch = Abortable::new(self.inner.backend.search(query), registration);
        self.inner.loading.set(true);
        tracing::debug!("Issued request {}", id);

        let inner = self.inner.clone();
        let timeout = self.inner.request_timeout;
        tokio::spawn(async move {
            let outcome = match timeout {
                Some(duration) => match tokio::time::timeout(duration, fetch).await {
                    Ok(completed) => flatten_abort(completed),
                    Err(_) => Err(SearchError::Timeout { duration }),
                },
                None => flatten_abort(fetch.await),
            };
            inner.apply_response(id, outcome);
        });
    }

    /// Apply one request's completion. See [`OrchestratorInner::apply_response`].
    #[cfg(test)]
    pub(crate) fn apply_response(&self, id: u64, outcome: Result<SearchResponse, SearchError>) {
        self.inner.apply_response(id, outcome);
    }
}

impl OrchestratorInner {
    /// Apply one request's completion.
    ///
    /// Clears the pending transport handle for `id` no matter what, then
    /// enforces the gate: a completion whose id does not equal the
    /// current id is discarded without touching the result store, the
    /// alert channel, the loading flag, or history.
    fn apply_response(&self, id: u64, outcome: Result<SearchResponse, SearchError>) {
        let settled_query = {
            let mut state = self.state.lock();

            let mut settled_query = None;
            if state.in_flight.as_ref().map(|f| f.id) == Some(id) {
                settled_query = state.in_flight.take().map(|f| f.query);
            }

            if id != state.current_id {
                tracing::debug!("Dropping stale response for request {}", id);
                return;
            }

            state.phase = OrchestratorPhase::Settled;
            settled_query
        };

        self.loading.set(false);

        match outcome {
            Ok(response) => {
                tracing::debug!("Request {} completed", id);
                self.results.merge(&response);
                // success clears any prior failure indicator
                let _ = self.alert_tx.send(None);
                if let Some(query) = &settled_query {
                    self.history.sync(query);
                }
            }
            Err(SearchError::Cancelled) => {
                // suppressed entirely: no alert, no store or history write
                tracing::debug!("Request {} cancelled", id);
            }
            Err(SearchError::Transport { message }) => {
                tracing::debug!("Request {} failed: {}", id, message);
                let _ = self.alert_tx.send(Some(Alert::request_failed(message)));
                if let Some(query) = &settled_query {
                    self.history.sync(query);
                }
            }
            Err(err) => {
                tracing::debug!("Request {} failed: {}", id, err);
                let _ = self
                    .alert_tx
                    .send(Some(Alert::request_failed(err.to_string())));
                if let Some(query) = &settled_query {
                    self.history.sync(query);
                }
            }
        }
    }
}

fn flatten_abort(
    result: Result<Result<SearchResponse, SearchError>, Aborted>,
) -> Result<SearchResponse, SearchError> {
    match result {
        Ok(inner) => inner,
        Err(Aborted) => Err(SearchError::Cancelled),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::history::MemoryHistory;
    use serde_json::json;

    fn test_orchestrator(
        backend: &MockBackend,
        timeout: Option<Duration>,
    ) -> (SearchOrchestrator, Arc<MemoryHistory>) {
        let port = Arc::new(MemoryHistory::new());
        let orchestrator = SearchOrchestrator::new(
            Arc::new(backend.clone()),
            Arc::new(ResultStore::new()),
            HistorySynchronizer::new(port.clone()),
            timeout,
        );
        (orchestrator, port)
    }

    fn query(pairs: &[(&str, &str)]) -> CanonicalQuery {
        let mut query = CanonicalQuery::new();
        for (key, value) in pairs {
            query.insert(*key, json!(value));
        }
        query
    }

    async fn settled(orchestrator: &SearchOrchestrator) {
        let mut rx = orchestrator.results().subscribe();
        // only a change from here on counts
        rx.borrow_and_update();
        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("store change within deadline")
            .expect("store sender alive");
    }

    #[tokio::test]
    async fn test_success_merges_and_settles() {
        let backend = MockBackend::new();
        backend.push_response(Ok(SearchResponse::new("T1").with_result("type", json!(1))));
        let (orchestrator, history) = test_orchestrator(&backend, None);

        orchestrator.submit(query(&[("type", "heritage")]));
        settled(&orchestrator).await;

        let snapshot = orchestrator.results().snapshot();
        assert_eq!(snapshot.get("type"), Some(&json!(1)));
        assert_eq!(snapshot.timestamp.as_deref(), Some("T1"));
        assert_eq!(orchestrator.phase(), OrchestratorPhase::Settled);
        assert!(!orchestrator.is_loading());
        assert_eq!(history.current(), "type=heritage");
        assert!(orchestrator.alerts().borrow().is_none());
    }

    #[tokio::test]
    async fn test_repeat_query_is_debounced() {
        let backend = MockBackend::new();
        backend.push_response(Ok(SearchResponse::new("T1")));
        let (orchestrator, _) = test_orchestrator(&backend, None);

        orchestrator.submit(query(&[("type", "heritage")]));
        settled(&orchestrator).await;

        // an equal query recomputed from scratch must not refetch
        orchestrator.submit(query(&[("type", "heritage")]));
        tokio::task::yield_now().await;

        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let backend = MockBackend::new();
        backend.push_response(Ok(SearchResponse::new("T1").with_result("type", json!(1))));
        let (orchestrator, _) = test_orchestrator(&backend, None);

        orchestrator.submit(query(&[("type", "heritage")]));
        settled(&orchestrator).await;

        // a transport that cannot cancel may deliver a dead request's
        // response; the gate must drop it whole
        orchestrator.apply_response(
            999,
            Ok(SearchResponse::new("T9").with_result("type", json!(9))),
        );

        let snapshot = orchestrator.results().snapshot();
        assert_eq!(snapshot.get("type"), Some(&json!(1)));
        assert_eq!(snapshot.timestamp.as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_superseded_request_never_lands() {
        let backend = MockBackend::new();
        let release_first =
            backend.push_gated(Ok(SearchResponse::new("T1").with_result("type", json!("old"))));
        let release_second = backend.push_gated(Ok(SearchResponse::new("T2")
            .with_result("type", json!("new"))
            .with_result("term", json!("bridge"))));
        let (orchestrator, history) = test_orchestrator(&backend, None);

        orchestrator.submit(query(&[("type", "heritage")]));
        orchestrator.submit(query(&[("type", "heritage"), ("term", "bridge")]));

        // second answer arrives first
        release_second.send(()).expect("task waiting on gate");
        settled(&orchestrator).await;

        // first answer limps in afterwards; abort already killed the
        // future, and even its delivery would be gated out
        let _ = release_first.send(());
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let snapshot = orchestrator.results().snapshot();
        assert_eq!(snapshot.get("type"), Some(&json!("new")));
        assert_eq!(snapshot.get("term"), Some(&json!("bridge")));
        assert_eq!(snapshot.timestamp.as_deref(), Some("T2"));
        assert_eq!(history.current(), "term=bridge&type=heritage");
    }

    #[tokio::test]
    async fn test_transport_failure_raises_alert() {
        let backend = MockBackend::new();
        backend.push_response(Err(SearchError::Transport {
            message: "index unavailable".to_string(),
        }));
        let (orchestrator, _) = test_orchestrator(&backend, None);
        let mut alerts = orchestrator.alerts();

        orchestrator.submit(query(&[("type", "heritage")]));

        tokio::time::timeout(Duration::from_secs(1), alerts.changed())
            .await
            .expect("alert within deadline")
            .expect("alert sender alive");

        let alert = alerts.borrow().clone().expect("alert present");
        assert_eq!(alert.message, "index unavailable");
        assert_eq!(orchestrator.phase(), OrchestratorPhase::Settled);
        assert!(orchestrator.results().snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_success_clears_prior_alert() {
        let backend = MockBackend::new();
        backend.push_response(Err(SearchError::Transport {
            message: "boom".to_string(),
        }));
        backend.push_response(Ok(SearchResponse::new("T1")));
        let (orchestrator, _) = test_orchestrator(&backend, None);
        let mut alerts = orchestrator.alerts();

        orchestrator.submit(query(&[("type", "a")]));
        tokio::time::timeout(Duration::from_secs(1), alerts.changed())
            .await
            .expect("deadline")
            .expect("alive");
        assert!(alerts.borrow().is_some());

        orchestrator.submit(query(&[("type", "b")]));
        settled(&orchestrator).await;
        assert!(alerts.borrow().is_none());
    }

    #[tokio::test]
    async fn test_cancellation_has_no_user_visible_effect() {
        let backend = MockBackend::new();
        backend.push_response(Err(SearchError::Cancelled));
        let (orchestrator, history) = test_orchestrator(&backend, None);

        orchestrator.submit(query(&[("type", "heritage")]));
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(orchestrator.alerts().borrow().is_none());
        assert!(orchestrator.results().snapshot().is_empty());
        assert_eq!(history.current(), "");
        assert_eq!(orchestrator.phase(), OrchestratorPhase::Settled);
        assert!(!orchestrator.is_loading());
    }

    #[tokio::test]
    async fn test_loading_tracks_current_request_only() {
        let backend = MockBackend::new();
        let release_first = backend.push_gated(Ok(SearchResponse::new("T1")));
        let release_second = backend.push_gated(Ok(SearchResponse::new("T2")));
        let (orchestrator, _) = test_orchestrator(&backend, None);

        orchestrator.submit(query(&[("type", "a")]));
        assert!(orchestrator.is_loading());

        orchestrator.submit(query(&[("type", "b")]));
        assert!(orchestrator.is_loading());

        // the superseded request's fate does not clear the flag
        drop(release_first);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(orchestrator.is_loading());

        release_second.send(()).expect("task waiting on gate");
        settled(&orchestrator).await;
        assert!(!orchestrator.is_loading());
    }

    #[tokio::test]
    async fn test_timeout_is_surfaced_like_transport_failure() {
        let backend = MockBackend::new();
        // never released: only the deadline can finish this request
        let _gate = backend.push_gated(Ok(SearchResponse::new("T1")));
        let (orchestrator, _) = test_orchestrator(&backend, Some(Duration::from_millis(20)));
        let mut alerts = orchestrator.alerts();

        orchestrator.submit(query(&[("type", "heritage")]));

        tokio::time::timeout(Duration::from_secs(1), alerts.changed())
            .await
            .expect("alert within deadline")
            .expect("alert sender alive");

        let alert = alerts.borrow().clone().expect("alert present");
        assert!(alert.message.contains("timed out"));
        assert_eq!(orchestrator.phase(), OrchestratorPhase::Settled);
    }

    #[tokio::test]
    async fn test_request_ids_increase_monotonically() {
        let backend = MockBackend::new();
        backend.push_response(Ok(SearchResponse::new("T1")));
        let release = backend.push_gated(Ok(SearchResponse::new("T2")));
        let (orchestrator, _) = test_orchestrator(&backend, None);

        assert_eq!(orchestrator.phase(), OrchestratorPhase::Idle);

        orchestrator.submit(query(&[("type", "a")]));
        settled(&orchestrator).await;

        orchestrator.submit(query(&[("type", "b")]));
        assert_eq!(orchestrator.phase(), OrchestratorPhase::Pending(2));

        release.send(()).expect("task waiting on gate");
        settled(&orchestrator).await;
        assert_eq!(orchestrator.phase(), OrchestratorPhase::Settled);
    }
}
