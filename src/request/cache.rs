//! Compute-once slot for state derived from other request fields.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Lazily computed, shared value.
///
/// The first caller of [`Derived::get_or_compute`] runs the computation;
/// racing callers block until it finishes and all receive the same `Arc`.
/// Invalidation is done by replacing the whole slot, never by mutating it.
pub struct Derived<T> {
    slot: OnceLock<Arc<T>>,
}

impl<T> Derived<T> {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    pub fn get_or_compute<F>(&self, compute: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        Arc::clone(self.slot.get_or_init(|| Arc::new(compute())))
    }

    /// The cached value, if it has been computed.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.get().cloned()
    }
}

impl<T> Default for Derived<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        let slot = OnceLock::new();
        if let Some(value) = self.slot.get() {
            let _ = slot.set(Arc::clone(value));
        }
        Self { slot }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(value) => f.debug_tuple("Derived").field(value).finish(),
            None => f.write_str("Derived(<pending>)"),
        }
    }
}
