//! Admission gate: a counting semaphore bounding in-flight documents.
//!
//! One gate is built per batch run and owned by that run, so concurrent runs
//! (and tests) never share a limit. A [`GatePermit`] returns its slot when it
//! is dropped, whether the document succeeded, failed, or its task panicked.

use crate::error::PdfSumError;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting gate with a fixed capacity of at least one.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: NonZeroUsize,
}

/// One admitted slot. Released on drop.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    /// Create a gate admitting at most `capacity` holders at once.
    pub fn new(capacity: usize) -> Result<Self, PdfSumError> {
        Ok(Self::with_capacity(Self::validate(capacity)?))
    }

    /// Check that `capacity` is a usable gate size.
    pub fn validate(capacity: usize) -> Result<NonZeroUsize, PdfSumError> {
        if capacity > Semaphore::MAX_PERMITS {
            return Err(PdfSumError::InvalidConfig(format!(
                "Concurrency must be ≤ {}, got {}",
                Semaphore::MAX_PERMITS,
                capacity
            )));
        }
        NonZeroUsize::new(capacity)
            .ok_or_else(|| PdfSumError::InvalidConfig("Concurrency must be ≥ 1".into()))
    }

    /// Infallible constructor for an already validated capacity. Values above
    /// the semaphore limit are capped to it.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let permits = capacity.get().min(Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            capacity,
        }
    }

    /// Wait for a free slot. Waiters are admitted in FIFO order.
    pub async fn acquire(&self) -> Result<GatePermit, PdfSumError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| PdfSumError::Internal(format!("Admission gate closed: {e}")))?;
        Ok(GatePermit { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
