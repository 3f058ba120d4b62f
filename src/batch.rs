//! Bounded batch runner: fan documents out under an admission gate.
//!
//! ## Scheduling
//!
//! Every item is spawned as its own tokio task up front. A task first waits
//! for a [`crate::gate::GatePermit`], then runs the item processor, and the
//! permit is dropped when the task ends. At most `capacity` processors are
//! therefore active at once no matter how many items are queued.
//!
//! ## Ordering
//!
//! Tasks finish in whatever order the network allows. Each task returns its
//! submission index and the outcome is slotted back into place, so the
//! [`BatchResult`] always follows the input order.

use crate::error::{ItemError, PdfSumError};
use crate::gate::AdmissionGate;
use crate::output::{BatchResult, Outcome, WorkItem};
use crate::processor::ItemProcessor;
use std::num::NonZeroUsize;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Runs an [`ItemProcessor`] over many items with a concurrency cap.
#[derive(Clone)]
pub struct BatchRunner {
    processor: ItemProcessor,
    capacity: NonZeroUsize,
}

impl BatchRunner {
    /// Fails with [`PdfSumError::InvalidConfig`] when `capacity` is 0.
    pub fn new(processor: ItemProcessor, capacity: usize) -> Result<Self, PdfSumError> {
        let capacity = AdmissionGate::validate(capacity)?;
        Ok(Self {
            processor,
            capacity,
        })
    }

    /// Runner whose capacity is the processor config's `concurrency`.
    pub fn from_config(processor: ItemProcessor) -> Result<Self, PdfSumError> {
        let capacity = processor.config().concurrency;
        Self::new(processor, capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Process every item and return one outcome per item, in input order.
    ///
    /// Item failures are recorded as [`Outcome::Failure`]; this method itself
    /// cannot fail once the runner has been built.
    pub async fn run(&self, items: Vec<WorkItem>) -> BatchResult {
        let total = items.len();
        let start = Instant::now();
        let progress = self.processor.config().progress_callback.clone();
        info!(
            "Starting to process {} documents (concurrency {})",
            total, self.capacity
        );
        if let Some(ref cb) = progress {
            cb.on_batch_start(total);
        }

        let gate = AdmissionGate::with_capacity(self.capacity);

        let mut tasks = JoinSet::new();
        for (index, item) in items.iter().cloned().enumerate() {
            let gate = gate.clone();
            let processor = self.processor.clone();
            tasks.spawn(async move {
                let outcome = match gate.acquire().await {
                    Ok(_permit) => processor.process(&item).await,
                    Err(e) => Outcome::Failure {
                        identifier: item.identifier(),
                        error: e.to_string(),
                    },
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<Outcome>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => error!("Processing task failed: {}", e),
            }
        }

        // A slot is still empty only if its task panicked.
        let outcomes: Vec<Outcome> = slots
            .into_iter()
            .zip(&items)
            .map(|(slot, item)| {
                slot.unwrap_or_else(|| Outcome::Failure {
                    identifier: item.identifier(),
                    error: ItemError::Aborted {
                        detail: "task panicked".into(),
                    }
                    .to_string(),
                })
            })
            .collect();
        let result = BatchResult::new(outcomes);

        info!(
            "Processing complete. Successes: {}, Failures: {} ({}ms)",
            result.success_count(),
            result.failure_count(),
            start.elapsed().as_millis()
        );
        if let Some(ref cb) = progress {
            cb.on_batch_complete(total, result.success_count());
        }
        result
    }
}
