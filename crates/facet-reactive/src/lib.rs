//! Reactive value cells.
//!
//! The primitive the rest of the engine is built on: a named slot holding
//! a current value, notifying subscribers of changes, plus derived cells
//! that recompute when any dependency changes.
//!
//! The key property throughout: mutation = notification. A cell cannot
//! change without its subscribers hearing about it, and a `set` that does
//! not actually change the value notifies no one.

mod cell;
mod computed;

pub use cell::{Cell, Observe};
pub use computed::Computed;
