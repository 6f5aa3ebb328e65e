//! Engine facade.
//!
//! Wires the registry, composer, orchestrator, result store, and history
//! synchronizer together: seeds initial state from the current URL,
//! derives the canonical query from every slot, and issues the initial
//! fetch.

use std::sync::Arc;

use tokio::sync::watch;

use facet_core::{Alert, CanonicalQuery, EngineConfig, FilterCatalog, ParamValue};
use facet_reactive::{Cell, Computed, Observe};

use crate::backend::SearchBackend;
use crate::compose::{compose, AmbientParams};
use crate::history::{HistoryPort, HistorySynchronizer};
use crate::orchestrator::SearchOrchestrator;
use crate::registry::FilterRegistry;
use crate::results::ResultSet;
use crate::state::SharedSearchState;

/// The assembled search engine.
///
/// Construction requires an ambient tokio runtime: fetches are spawned on
/// it, including the initial one.
pub struct SearchEngine {
    registry: Arc<FilterRegistry>,
    ambient: Arc<Cell<AmbientParams>>,
    query: Arc<Computed<CanonicalQuery>>,
    orchestrator: SearchOrchestrator,
    state: Arc<SharedSearchState>,
}

impl SearchEngine {
    /// Assemble an engine over a filter catalog, a backend, and a history
    /// port.
    ///
    /// The current URL seeds initial filter values before any
    /// subscription exists: pairs whose key names a catalog filter seed
    /// that slot, every other pair becomes an ambient parameter, and an
    /// unparsable query string degrades to an empty initial query.
    pub fn new(
        catalog: FilterCatalog,
        backend: Arc<dyn SearchBackend>,
        history: Arc<dyn HistoryPort>,
        config: &EngineConfig,
    ) -> Self {
        let registry = Arc::new(FilterRegistry::new(&catalog));
        let synchronizer = HistorySynchronizer::new(history);

        let mut ambient_params = AmbientParams::new();
        for (key, value) in synchronizer.seed() {
            if registry.slot(&key).is_some() {
                registry.set(&key, Some(ParamValue::String(value)));
            } else {
                ambient_params.insert(key, ParamValue::String(value));
            }
        }
        let ambient = Arc::new(Cell::new(ambient_params));

        let orchestrator = SearchOrchestrator::new(
            backend,
            Arc::new(crate::results::ResultStore::new()),
            synchronizer,
            config.search.request_timeout(),
        );

        // the canonical query recomputes on every slot or ambient change;
        // the computed cell's equality gate already drops recomputations
        // that leave the effective query untouched
        let query = {
            let compute_registry = registry.clone();
            let compute_ambient = ambient.clone();
            let mut deps: Vec<&dyn Observe> = registry
                .slots_ordered()
                .iter()
                .map(|slot| slot.value().as_ref() as &dyn Observe)
                .collect();
            deps.push(ambient.as_ref());
            Arc::new(Computed::new(&deps, move || {
                compose(compute_registry.slots_ordered(), &compute_ambient.get())
            }))
        };

        // every canonical-query change reaches the orchestrator
        {
            let orchestrator = orchestrator.clone();
            query.subscribe(move |new, _old| {
                orchestrator.submit(new.clone());
            });
        }

        // issue the initial query for the seeded state
        orchestrator.submit(query.get());

        Self {
            registry,
            ambient,
            query,
            orchestrator,
            state: Arc::new(SharedSearchState::new()),
        }
    }

    /// Write a filter value; `None` clears the filter. Returns false for
    /// names outside the catalog.
    pub fn set_filter(&self, name: &str, value: Option<ParamValue>) -> bool {
        self.registry.set(name, value)
    }

    /// Write an ambient parameter; `None` removes it.
    pub fn set_param(&self, key: &str, value: Option<ParamValue>) {
        let mut params = self.ambient.get();
        match value {
            Some(value) => {
                params.insert(key.to_string(), value);
            }
            None => {
                params.remove(key);
            }
        }
        self.ambient.set(params);
    }

    /// Snapshot of the current canonical query.
    pub fn query(&self) -> CanonicalQuery {
        self.query.get()
    }

    /// URL form of the current canonical query.
    pub fn query_string(&self) -> String {
        self.query.with(|q| q.to_query_string())
    }

    /// Subscribe to result-store changes.
    pub fn results(&self) -> watch::Receiver<ResultSet> {
        self.orchestrator.results().subscribe()
    }

    /// Subscribe to user-visible failure notifications.
    pub fn alerts(&self) -> watch::Receiver<Option<Alert>> {
        self.orchestrator.alerts()
    }

    /// Whether the current request is still in flight.
    pub fn is_loading(&self) -> bool {
        self.orchestrator.is_loading()
    }

    /// The shared session state object.
    pub fn state(&self) -> Arc<SharedSearchState> {
        self.state.clone()
    }

    /// The filter registry.
    pub fn registry(&self) -> &Arc<FilterRegistry> {
        &self.registry
    }

    /// The orchestrator.
    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.orchestrator
    }
}

// =============================================================================
// Tests
// =============================================================================
