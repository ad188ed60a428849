//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::PreprocessConfigBuilder::progress_callback`] to receive
//! events as the batch runner processes each file. The CLI turns them into a
//! progress bar and the per-file error lines.
//!
//! # Example
//!
//! ```rust
//! use corpus_prep::{BatchProgressCallback, PreprocessConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     failed: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_file_error(&self, file_name: &str, error: &str) {
//!         self.failed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Error in {file_name}: {error}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { failed: AtomicUsize::new(0) });
//!
//! let config = PreprocessConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch runner as it processes each file.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` the file
/// events arrive from several blocking-pool threads at once. All methods
/// have default no-op implementations.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the source directory has been listed.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is read.
    fn on_file_start(&self, file_name: &str) {
        let _ = file_name;
    }

    /// Called when a file has been normalized and written.
    ///
    /// # Arguments
    /// * `file_name`: base name of the file
    /// * `output_bytes`: byte length of the written UTF-8 text
    fn on_file_complete(&self, file_name: &str, output_bytes: usize) {
        let _ = (file_name, output_bytes);
    }

    /// Called when a file fails; the batch continues.
    fn on_file_error(&self, file_name: &str, error: &str) {
        let _ = (file_name, error);
    }

    /// Called once after all files have been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PreprocessConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
