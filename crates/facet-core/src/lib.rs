//! Core types for the facet search engine.
//!
//! This crate contains shared data structures used across all facet crates:
//! - Filter catalog descriptors
//! - The canonical query representation
//! - Backend response shapes
//! - Configuration types
//! - Error types

mod config;
mod encoding;
mod error;
mod filter;
mod query;
mod response;

pub use config::{config_dir, ensure_config_dir, EngineConfig, SearchConfig};
pub use encoding::{percent_decode, percent_encode};
pub use error::{Alert, ConfigError, SearchError};
pub use filter::{FilterCatalog, FilterDescriptor};
pub use query::{CanonicalQuery, ParamValue};
pub use response::{ResultPayload, SearchResponse};
