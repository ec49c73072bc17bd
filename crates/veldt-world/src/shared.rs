//! The single mutual-exclusion boundary around the world state.
//!
//! Both the RPC handlers and the background tick mutate the same
//! [`EcosystemState`]; all of them go through [`SharedEcosystem`], which
//! holds one `std::sync::Mutex`. A standard (not async) mutex is the right
//! tool here: every operation on the state is synchronous and the lock is
//! never held across an await.
//!
//! Contention note: the tick's consumption scan holds the lock for the
//! whole O(entity count) walk, so large populations serialize against
//! concurrent RPC handlers.

use std::sync::{Arc, Mutex, PoisonError};

use crate::state::EcosystemState;

/// Cloneable handle to the locked world state.
#[derive(Debug, Clone)]
pub struct SharedEcosystem {
    inner: Arc<Mutex<EcosystemState>>,
}

impl SharedEcosystem {
    /// Wrap a freshly built state.
    pub fn new(state: EcosystemState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Run `f` with the state lock held for the full duration of the
    /// closure. The closure must not suspend.
    ///
    /// A poisoned lock is absorbed: every state operation leaves the world
    /// consistent, so the state behind a poisoned mutex is still valid.
    pub fn with<T>(&self, f: impl FnOnce(&mut EcosystemState) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
