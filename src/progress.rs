//! Progress-callback trait for per-page OCR events.
//!
//! Inject an [`Arc<dyn OcrProgress>`] via
//! [`crate::config::OcrConfigBuilder::progress`] to receive events as the
//! aggregator walks the document. Pages are processed strictly one at a
//! time, so events for a run arrive in order; the trait is still
//! `Send + Sync` because the pipeline hops between runtime threads.
//!
//! All methods have default no-op implementations so callers only override
//! what they care about.

use std::sync::Arc;

/// Called by the aggregator as it processes each page.
pub trait OcrProgress: Send + Sync {
    /// Called once, after the page count is known and before page 1 starts.
    fn on_document_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before the first OCR attempt for a page.
    fn on_page_start(&self, page: usize, total_pages: usize) {
        let _ = (page, total_pages);
    }

    /// Called before each retry attempt (attempt ≥ 2) for a page.
    fn on_page_retry(&self, page: usize, attempt: u32, max_attempts: u32) {
        let _ = (page, attempt, max_attempts);
    }

    /// Called when a page's text has been extracted.
    fn on_page_done(&self, page: usize, total_pages: usize, chars: usize) {
        let _ = (page, total_pages, chars);
    }

    /// Called when a page exhausts its attempts. The run aborts after this.
    fn on_page_failed(&self, page: usize, error: &str) {
        let _ = (page, error);
    }

    /// Called once after the last page succeeds. Not called on failure.
    fn on_document_done(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl OcrProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::OcrConfig`].
pub type ProgressHook = Arc<dyn OcrProgress>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingProgress {
        starts: AtomicUsize,
        dones: AtomicUsize,
        retries: AtomicUsize,
    }

    impl OcrProgress for TrackingProgress {
        fn on_page_start(&self, _page: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_retry(&self, _page: usize, _attempt: u32, _max: u32) {
            self.retries.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_done(&self, _page: usize, _total: usize, _chars: usize) {
            self.dones.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_progress_does_not_panic() {
        let p = NoopProgress;
        p.on_document_start(3);
        p.on_page_start(1, 3);
        p.on_page_retry(1, 2, 3);
        p.on_page_done(1, 3, 42);
        p.on_page_failed(2, "boom");
        p.on_document_done(3);
    }

    #[test]
    fn tracking_progress_receives_events() {
        let tracker = TrackingProgress {
            starts: AtomicUsize::new(0),
            dones: AtomicUsize::new(0),
            retries: AtomicUsize::new(0),
        };

        tracker.on_page_start(1, 2);
        tracker.on_page_retry(1, 2, 3);
        tracker.on_page_done(1, 2, 100);
        tracker.on_page_start(2, 2);
        tracker.on_page_done(2, 2, 50);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.dones.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.retries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_progress_works() {
        let p: Arc<dyn OcrProgress> = Arc::new(NoopProgress);
        p.on_document_start(10);
        p.on_page_done(1, 10, 512);
    }
}
