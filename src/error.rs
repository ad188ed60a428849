//! Error types for the corpus-prep library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PrepError`] is **fatal**: the run cannot proceed at all (source
//!   directory missing, destination cannot be created, malformed segmenter
//!   input). Returned as `Err(PrepError)` from the top-level functions.
//!
//! * [`FileError`] is **non-fatal**: a single file failed (wrong encoding,
//!   unreadable, unwritable) but every other file in the batch is fine.
//!   Stored inside [`crate::output::FileResult`].
//!
//! A declaration that does not literally match the legacy pattern is not an
//! error at all: the text passes through unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the corpus-prep library.
///
/// File-level failures use [`FileError`] and are stored in
/// [`crate::output::FileResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PrepError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source directory does not exist or is not a directory.
    #[error("Source directory not found: '{path}'\nCheck the path exists and is a directory.")]
    SourceDirNotFound { path: PathBuf },

    /// Source directory exists but could not be listed.
    #[error("Failed to list source directory '{path}': {source}")]
    SourceDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Destination directory is missing and could not be created.
    #[error("Failed to create destination directory '{path}': {source}")]
    DestinationCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some files succeeded but at least one failed.
    ///
    /// Returned by [`crate::output::BatchReport::into_result`] when the
    /// caller wants to treat any file failure as an error.
    #[error("{failed}/{total} files failed during preprocessing")]
    PartialFailure {
        processed: usize,
        failed: usize,
        total: usize,
    },

    // ── Segmenter errors ──────────────────────────────────────────────────
    /// Batch input for the sentence splitter is not the expected JSON shape.
    #[error("Invalid sentence-splitter input: {detail}\nExpected a JSON array of {{\"id\": …, \"text\": \"…\"}} objects.")]
    InvalidSegmentInput { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single file.
///
/// Stored alongside [`crate::output::FileResult`] when a file fails.
/// The batch continues with the next file.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The bytes are not valid in the encoding implied by the file name.
    #[error("{file}: cannot decode as {encoding}: {detail}")]
    Decode {
        file: String,
        encoding: String,
        detail: String,
    },

    /// The file could not be read.
    #[error("{file}: read failed: {detail}")]
    Read { file: String, detail: String },

    /// The normalized text could not be written to the destination.
    #[error("{file}: write failed: {detail}")]
    Write { file: String, detail: String },
}

impl FileError {
    /// Name of the file this error belongs to.
    pub fn file(&self) -> &str {
        match self {
            FileError::Decode { file, .. }
            | FileError::Read { file, .. }
            | FileError::Write { file, .. } => file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_display() {
        let e = PrepError::PartialFailure {
            processed: 9,
            failed: 1,
            total: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("1/10"), "got: {msg}");
    }

    #[test]
    fn source_dir_not_found_display() {
        let e = PrepError::SourceDirNotFound {
            path: PathBuf::from("/no/such/dir"),
        };
        assert!(e.to_string().contains("/no/such/dir"));
    }

    #[test]
    fn decode_error_display_names_file_and_encoding() {
        let e = FileError::Decode {
            file: "7.xml".into(),
            encoding: "utf-8".into(),
            detail: "invalid utf-8 sequence at byte 12".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("7.xml"));
        assert!(msg.contains("utf-8"));
        assert!(msg.contains("byte 12"));
    }

    #[test]
    fn file_accessor_covers_every_variant() {
        let read = FileError::Read {
            file: "a.xml".into(),
            detail: "gone".into(),
        };
        let write = FileError::Write {
            file: "b.xml".into(),
            detail: "read-only".into(),
        };
        assert_eq!(read.file(), "a.xml");
        assert_eq!(write.file(), "b.xml");
    }

    #[test]
    fn segment_input_display_mentions_shape() {
        let e = PrepError::InvalidSegmentInput {
            detail: "expected value at line 1 column 1".into(),
        };
        assert!(e.to_string().contains("\"id\""));
    }
}
