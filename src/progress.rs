//! Progress-callback trait for per-file batch events.
//!
//! Inject an `Arc<dyn BatchProgressCallback>` via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! an event before and after each file in a batch. The CLI installs an
//! implementation that prints the progress and output-path lines; library
//! callers can forward events anywhere else without the library knowing how
//! the host application communicates.
//!
//! All methods have default no-op implementations so callers only override
//! what they care about. The batch runs files strictly in order, so
//! implementations never see interleaved events.

use std::path::Path;
use std::sync::Arc;

use crate::error::Sws2RstError;
use crate::output::ConversionOutput;

/// Called by [`crate::convert_batch`] as it works through the input list.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before the first file is processed.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file enters the pipeline.
    ///
    /// `index` is 0-based; `total` is the batch size.
    fn on_file_start(&self, path: &Path, index: usize, total: usize) {
        let _ = (path, index, total);
    }

    /// Called when a file converted successfully.
    fn on_file_complete(&self, output: &ConversionOutput) {
        let _ = output;
    }

    /// Called when a file failed; the batch stops after this event.
    fn on_file_error(&self, path: &Path, error: &Sws2RstError) {
        let _ = (path, error);
    }

    /// Called once after the batch stops, successfully or not.
    fn on_batch_complete(&self, completed: usize, total: usize) {
        let _ = (completed, total);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Tracking {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl BatchProgressCallback for Tracking {
        fn on_file_start(&self, _path: &Path, _index: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_complete(&self, _output: &ConversionOutput) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_error(&self, _path: &Path, _error: &Sws2RstError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_file_start(Path::new("a.sws"), 0, 2);
        cb.on_file_error(
            Path::new("a.sws"),
            &Sws2RstError::ArchiveNotFound {
                path: PathBuf::from("a.sws"),
            },
        );
        cb.on_batch_complete(0, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let t = Tracking::default();
        t.on_file_start(Path::new("a.sws"), 0, 1);
        t.on_file_error(
            Path::new("a.sws"),
            &Sws2RstError::ArchiveNotFound {
                path: PathBuf::from("a.sws"),
            },
        );
        assert_eq!(t.starts.load(Ordering::SeqCst), 1);
        assert_eq!(t.completes.load(Ordering::SeqCst), 0);
        assert_eq!(t.errors.load(Ordering::SeqCst), 1);
    }
}
