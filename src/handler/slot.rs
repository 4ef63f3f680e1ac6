//! The mutable handler slot shared by queue and proxy.
//!
//! Swaps take the write lock; execution units take the read lock, clone
//! the `Arc`, drop the lock, then invoke. The observed handler is therefore
//! pinned at invocation time: a swap that completes before an execution
//! unit reaches its invocation point is always observed by that unit.

use std::sync::{Arc, RwLock};

use super::Handler;

/// Single mutable slot holding the currently active handler, plus the
/// default supplied at construction (if any).
pub(crate) struct HandlerSlot<V, R> {
    /// Handler supplied at construction. `None` only for a proxy built
    /// without a default.
    default: Option<Arc<dyn Handler<V, R>>>,
    /// Currently active handler.
    current: RwLock<Option<Arc<dyn Handler<V, R>>>>,
}

impl<V, R> HandlerSlot<V, R> {
    /// Create a slot with the given handler as both default and current.
    pub(crate) fn new(handler: Arc<dyn Handler<V, R>>) -> Self {
        Self {
            default: Some(Arc::clone(&handler)),
            current: RwLock::new(Some(handler)),
        }
    }

    /// Create an empty slot: no default, no current handler.
    pub(crate) fn empty() -> Self {
        Self {
            default: None,
            current: RwLock::new(None),
        }
    }

    /// Replace the current handler.
    pub(crate) fn replace(&self, handler: Arc<dyn Handler<V, R>>) {
        let mut current = self.current.write().expect("handler slot poisoned");
        *current = Some(handler);
    }

    /// Restore the default handler.
    ///
    /// # Panics
    ///
    /// Panics if the slot was built without a default - there is nothing
    /// to restore, and continuing would silently run the wrong handler.
    pub(crate) fn restore_default(&self) {
        let default = self
            .default
            .as_ref()
            .expect("no default handler to restore");
        self.replace(Arc::clone(default));
    }

    /// Read the current handler, pinning it for one invocation.
    pub(crate) fn get(&self) -> Option<Arc<dyn Handler<V, R>>> {
        self.current
            .read()
            .expect("handler slot poisoned")
            .as_ref()
            .map(Arc::clone)
    }
}
