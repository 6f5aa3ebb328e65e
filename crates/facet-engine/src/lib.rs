//! Search orchestration engine.
//!
//! Aggregates the state of independently-evolving filter components into
//! one canonical query, issues that query asynchronously to a backend,
//! merges results into a shared store, and keeps the address bar in step -
//! while guaranteeing that only the most recent query's results are ever
//! observed, even under rapid successive edits.
//!
//! ## Data Flow
//!
//! ```text
//! Filter UIs (external)
//!        │ set
//!        ▼
//! ┌───────────────┐     ┌──────────────────┐
//! │ Filter slots   │────▶│ Canonical query  │ (computed, equality-deduped)
//! │ + ambient params│    └────────┬─────────┘
//! └───────────────┘              │ change
//!                                ▼
//!                       ┌──────────────────┐
//!                       │   Orchestrator   │ abort stale, allocate id,
//!                       └────────┬─────────┘ spawn fetch
//!                                │ id-gated completion
//!                 ┌──────────────┼───────────────┐
//!                 ▼              ▼               ▼
//!          ┌────────────┐ ┌────────────┐ ┌──────────────┐
//!          │ Result store│ │ Alert chan │ │ History sync │
//!          └────────────┘ └────────────┘ └──────────────┘
//! ```
//!
//! The startup inverse runs once: the current URL's query string seeds the
//! filter slots and ambient parameters before any subscription exists.

mod backend;
mod compose;
mod engine;
mod history;
mod orchestrator;
mod registry;
mod results;
mod state;

pub use backend::SearchBackend;
pub use compose::{compose, AmbientParams};
pub use engine::SearchEngine;
pub use history::{parse_query_string, HistoryPort, HistorySynchronizer, MemoryHistory};
pub use orchestrator::{OrchestratorPhase, SearchOrchestrator};
pub use registry::{FilterRegistry, FilterSlot};
pub use results::{ResultSet, ResultStore};
pub use state::SharedSearchState;
