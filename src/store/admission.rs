//! Bounded admission in front of the connection pool.
//!
//! The pool hands out at most `max_connections` leases; callers beyond that wait.
//! The gate caps in-flight store calls at `max_connections + max_waiting` and
//! rejects the rest immediately instead of queueing them.

use super::StoreError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Clone, Debug)]
pub struct Admission {
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl Admission {
    pub fn new(capacity: usize) -> Self {
        Admission {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Take a slot for the duration of one store call, or fail with `Busy`.
    pub fn try_enter(&self) -> Result<OwnedSemaphorePermit, StoreError> {
        self.slots.clone().try_acquire_owned().map_err(|_| {
            tracing::warn!(capacity = self.capacity, "admission gate full");
            StoreError::Busy
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }
}
