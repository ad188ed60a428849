//! Streaming batch API: emit file results as they complete.
//!
//! Unlike [`crate::preprocess::preprocess_dir`], which returns only after
//! every file has been attempted, [`preprocess_stream`] yields each
//! [`FileResult`] as soon as its file is written (or has failed). With
//! `concurrency > 1` results arrive in completion order, not name order.

use crate::config::PreprocessConfig;
use crate::error::PrepError;
use crate::output::FileResult;
use crate::preprocess::{prepare_batch, process_blocking};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-file results.
pub type FileStream = Pin<Box<dyn Stream<Item = FileResult> + Send>>;

/// Preprocess a directory, streaming file results as they are ready.
///
/// The directory listing is captured before this function returns; files
/// added afterwards are not picked up. Progress callbacks fire per file, but
/// `on_batch_complete` is left to the caller since the stream may be dropped
/// early.
///
/// # Returns
/// - `Ok(FileStream)`: one [`FileResult`] per `*.xml` file
/// - `Err(PrepError)`: fatal error (source missing, destination not creatable)
pub async fn preprocess_stream(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    config: &PreprocessConfig,
) -> Result<FileStream, PrepError> {
    let source = source.as_ref();
    let destination = destination.as_ref().to_path_buf();
    info!("Starting streaming preprocessing: {}", source.display());

    let files = prepare_batch(source, &destination, config)?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(files.len());
    }

    let cb = config.progress_callback.clone();
    let s = stream::iter(files.into_iter().map(move |path| {
        let dest = destination.clone();
        let cb = cb.clone();
        async move { process_blocking(path, dest, cb).await }
    }))
    .buffer_unordered(config.concurrency);

    Ok(Box::pin(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn stream_yields_one_result_per_file() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("1.xml"), "<p>&alpha;</p>").unwrap();
        fs::write(src.path().join("2.xml"), b"<p>\xE9</p>").unwrap();
        fs::write(src.path().join("skip.txt"), "x").unwrap();

        let config = PreprocessConfig::default();
        let mut results: Vec<FileResult> = preprocess_stream(src.path(), dst.path(), &config)
            .await
            .unwrap()
            .collect()
            .await;
        results.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(!results[1].is_ok(), "2.xml is not valid UTF-8");
    }

    #[tokio::test]
    async fn stream_fails_fast_on_missing_source() {
        let dst = TempDir::new().unwrap();
        let err = preprocess_stream("/definitely/not/here", dst.path(), &PreprocessConfig::default())
            .await
            .err()
            .expect("missing source must be fatal");
        assert!(matches!(err, PrepError::SourceDirNotFound { .. }));
    }
}
