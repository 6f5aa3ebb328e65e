//! Derived cells.

use std::sync::Arc;

use crate::cell::{Cell, Observe};

/// A cell whose value is derived from other reactive values.
///
/// The recompute closure runs once eagerly at construction and again
/// whenever any dependency notifies. Results land in an inner [`Cell`], so
/// subscribers receive only the derived value, and a recomputation that
/// produces an equal value notifies no one (the equality gate is inherited
/// from [`Cell::set`]).
pub struct Computed<T> {
    cell: Arc<Cell<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Computed<T> {
    /// Build a derived cell over `deps`.
    ///
    /// `deps` only wires change notification; `compute` must capture its
    /// own handles to the dependency values it reads.
    pub fn new(deps: &[&dyn Observe], compute: impl Fn() -> T + Send + Sync + 'static) -> Self {
        let cell = Arc::new(Cell::new(compute()));
        let compute: Arc<dyn Fn() -> T + Send + Sync> = Arc::new(compute);
        for dep in deps {
            let cell = cell.clone();
            let compute = compute.clone();
            dep.watch(Arc::new(move || cell.set(compute())));
        }
        Self { cell }
    }

    /// Current derived value.
    pub fn get(&self) -> T {
        self.cell.get()
    }

    /// Read the derived value in place without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with(f)
    }

    /// Register a listener invoked with `(new, old)` on every derived
    /// change.
    pub fn subscribe(&self, listener: impl Fn(&T, &T) + Send + Sync + 'static) {
        self.cell.subscribe(listener);
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Observe for Computed<T> {
    fn watch(&self, hook: Arc<dyn Fn() + Send + Sync>) {
        self.cell.watch(hook);
    }
}
