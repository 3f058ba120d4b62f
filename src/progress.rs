//! Progress-callback trait for batch and per-document events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::SummaryConfigBuilder::progress_callback`] to receive
//! events as the runner works through the input directory. Callers can
//! forward them to a terminal progress bar, a channel, or a log without the
//! library knowing how the host application reports progress.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfsum::{BatchProgressCallback, SummaryConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_item_complete(&self, identifier: &str, _output_path: &std::path::Path) {
//!         let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{done}: {identifier}");
//!     }
//! }
//!
//! let config = SummaryConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the runner and the item processor as documents are handled.
///
/// Implementations must be `Send + Sync`: items run on separate tokio tasks,
/// so the per-item methods may be called concurrently and out of order.
/// All methods default to no-ops.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before any document is scheduled.
    fn on_batch_start(&self, total_items: usize) {
        let _ = total_items;
    }

    /// Called when a document has been admitted by the gate and work begins.
    fn on_item_start(&self, identifier: &str) {
        let _ = identifier;
    }

    /// Called when a summary has been written.
    fn on_item_complete(&self, identifier: &str, output_path: &Path) {
        let _ = (identifier, output_path);
    }

    /// Called when a document fails at any stage.
    fn on_item_error(&self, identifier: &str, error: &str) {
        let _ = (identifier, error);
    }

    /// Called once after every document has produced an outcome.
    fn on_batch_complete(&self, total_items: usize, success_count: usize) {
        let _ = (total_items, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummaryConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_item_start(&self, _identifier: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_item_complete(&self, _identifier: &str, _output_path: &Path) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_item_error(&self, _identifier: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_item_start("a.pdf");
        cb.on_item_complete("a.pdf", Path::new("/out/a_summary.md"));
        cb.on_item_error("b.pdf", "boom");
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn tracking_callback_through_arc_dyn() {
        let tracker = Arc::new(TrackingCallback::default());
        let cb: ProgressCallback = tracker.clone();
        cb.on_item_start("a.pdf");
        cb.on_item_complete("a.pdf", Path::new("/out/a_summary.md"));
        cb.on_item_start("b.pdf");
        cb.on_item_error("b.pdf", "LLM API error");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }
}
