//! Single-value reactive cells.

use std::sync::Arc;

use parking_lot::RwLock;

type Listener<T> = Arc<dyn Fn(&T, &T) + Send + Sync>;

/// A named slot holding a current value and notifying subscribers of
/// changes.
///
/// ## Notification semantics
///
/// - `set` notifies only if the new value differs from the current one
///   under `PartialEq`; `set_by` takes a caller-supplied equality;
///   `replace` always notifies.
/// - Listeners run synchronously, in subscription order, and receive
///   `(new, old)`. `old` is the value immediately before the triggering
///   assignment, so a listener always sees the prior value even when
///   several assignments happen back-to-back.
///
/// ## Thread safety
///
/// Value and subscriber list live behind `parking_lot::RwLock` (never
/// poisons). Both locks are released before listeners run, so a listener
/// may read this cell, subscribe, or set other cells.
pub struct Cell<T> {
    value: RwLock<T>,
    listeners: RwLock<Vec<Listener<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Cell<T> {
    /// Create a cell with an initial value.
    pub fn new(initial: T) -> Self {
        Self {
            value: RwLock::new(initial),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Read the value in place without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// Assign a new value, notifying subscribers only if it differs from
    /// the current one.
    pub fn set(&self, new: T)
    where
        T: PartialEq,
    {
        self.set_by(new, |current, candidate| current == candidate);
    }

    /// Assign with a caller-supplied equality.
    pub fn set_by(&self, new: T, eq: impl Fn(&T, &T) -> bool) {
        let old = {
            let mut value = self.value.write();
            if eq(&value, &new) {
                return;
            }
            std::mem::replace(&mut *value, new.clone())
        };
        self.notify(&new, &old);
    }

    /// Assign unconditionally, notifying regardless of equality.
    pub fn replace(&self, new: T) {
        let old = std::mem::replace(&mut *self.value.write(), new.clone());
        self.notify(&new, &old);
    }

    /// Register a listener invoked with `(new, old)` on every change.
    pub fn subscribe(&self, listener: impl Fn(&T, &T) + Send + Sync + 'static) {
        self.listeners.write().push(Arc::new(listener));
    }

    fn notify(&self, new: &T, old: &T) {
        // snapshot under the lock, invoke outside it: a listener may
        // subscribe or trigger further sets
        let listeners: Vec<Listener<T>> = self.listeners.read().clone();
        for listener in &listeners {
            listener(new, old);
        }
    }
}

/// Value-agnostic change notification.
///
/// Lets derived cells wire themselves to dependencies of differing value
/// types without dynamic capability probing: one concrete cell type, one
/// explicit interface.
pub trait Observe: Send + Sync {
    /// Register a hook invoked after every observed change.
    fn watch(&self, hook: Arc<dyn Fn() + Send + Sync>);
}

impl<T: Clone + Send + Sync + 'static> Observe for Cell<T> {
    fn watch(&self, hook: Arc<dyn Fn() + Send + Sync>) {
        self.subscribe(move |_, _| hook());
    }
}
