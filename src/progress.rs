//! Progress-callback trait for per-card generation events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::GeneratorConfigBuilder::progress_callback`] to receive
//! events as the pipeline fills and rasterizes each card.
//!
//! # Example
//!
//! ```rust
//! use cardsmith::{GenerationProgressCallback, GeneratorConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rasterized: AtomicUsize,
//! }
//!
//! impl GenerationProgressCallback for CountingCallback {
//!     fn on_rasterize_complete(&self, index: usize, total: usize, name: &str) {
//!         self.rasterized.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index + 1, total, name);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { rasterized: AtomicUsize::new(0) });
//!
//! let config = GeneratorConfig::builder()
//!     .progress_callback(counter as Arc<dyn GenerationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the generation pipeline as it processes each card.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Indices are 0-based positions in row order.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called once after the sheet is loaded, before any card is filled.
    fn on_run_start(&self, total_cards: usize) {
        let _ = total_cards;
    }

    /// Called when the sheet has more cards than the grid has cells.
    ///
    /// The run continues; compositing will fail once every card has been
    /// rasterized.
    fn on_capacity_exceeded(&self, cards: usize, capacity: usize) {
        let _ = (cards, capacity);
    }

    /// Called after a card's SVG has been written.
    fn on_card_filled(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called just before a card's SVG is handed to the rasterizer.
    fn on_rasterize_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called once the rasterizer returns for a card.
    fn on_rasterize_complete(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called once after the merged grid has been saved.
    fn on_run_complete(&self, cards: usize, rasterized: usize) {
        let _ = (cards, rasterized);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GeneratorConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        filled: AtomicUsize,
        overflow: Mutex<Option<(usize, usize)>>,
        names: Mutex<Vec<String>>,
    }

    impl GenerationProgressCallback for TrackingCallback {
        fn on_capacity_exceeded(&self, cards: usize, capacity: usize) {
            *self.overflow.lock().unwrap() = Some((cards, capacity));
        }

        fn on_card_filled(&self, _index: usize, _total: usize, name: &str) {
            self.filled.fetch_add(1, Ordering::SeqCst);
            self.names.lock().unwrap().push(name.to_string());
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(3);
        cb.on_capacity_exceeded(71, 70);
        cb.on_card_filled(0, 3, "Wolf");
        cb.on_rasterize_start(0, 3, "Wolf");
        cb.on_rasterize_complete(0, 3, "Wolf");
        cb.on_run_complete(3, 3);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_card_filled(0, 2, "Wolf");
        tracker.on_card_filled(1, 2, "Owl");
        tracker.on_capacity_exceeded(71, 70);
        // untouched defaults stay silent
        tracker.on_rasterize_start(0, 2, "Wolf");

        assert_eq!(tracker.filled.load(Ordering::SeqCst), 2);
        assert_eq!(*tracker.overflow.lock().unwrap(), Some((71, 70)));
        assert_eq!(*tracker.names.lock().unwrap(), vec!["Wolf", "Owl"]);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_run_start(10);
        cb.on_card_filled(0, 10, "Bear");
    }
}
