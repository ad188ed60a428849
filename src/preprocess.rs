//! File and directory preprocessing entry points.
//!
//! [`preprocess_file`] runs the pipeline for one path and returns the text;
//! [`preprocess_file_to`] also writes it. [`preprocess_dir`] applies the
//! latter to every `*.xml` file directly inside a directory and collects a
//! [`BatchReport`]. Use [`crate::stream::preprocess_stream`] to receive file
//! results as they complete instead.

use crate::config::PreprocessConfig;
use crate::error::{FileError, PrepError};
use crate::output::{BatchReport, BatchStats, FileResult};
use crate::pipeline::encoding::{
    detect_encoding, detect_encoding_for_path, normalise_line_endings, SourceEncoding,
};
use crate::pipeline::normalize::{normalize_text, NormalizedDocument};
use crate::progress::ProgressCallback;
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extension matched by the directory scan (the `*.xml` glob).
pub const SOURCE_EXTENSION: &str = ".xml";

/// A normalized file that has not been written yet.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub file_name: String,
    pub encoding: SourceEncoding,
    /// Size of the raw file on disk.
    pub input_bytes: usize,
    pub document: NormalizedDocument,
}

/// Read and normalize one file.
///
/// Detects the encoding from the file name, decodes the bytes, normalizes
/// line endings, rewrites the declaration and decodes references.
///
/// # Errors
/// [`FileError::Read`] if the file cannot be read, [`FileError::Decode`] if
/// its bytes do not match the encoding implied by its name.
pub fn preprocess_file(path: impl AsRef<Path>) -> Result<PreparedDocument, FileError> {
    let path = path.as_ref();
    prepare(path, file_name_of(path), detect_encoding_for_path(path)).map_err(|(error, _)| error)
}

/// Normalize `path` and write the result as UTF-8 to `dest_dir/<file name>`.
///
/// Never fails as a whole: errors are recorded in the returned
/// [`FileResult`]. The write is atomic, so a failed file leaves no output.
pub fn preprocess_file_to(path: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> FileResult {
    let start = Instant::now();
    let path = path.as_ref();
    let file_name = file_name_of(path);
    let encoding = detect_encoding(&file_name);

    let outcome = prepare(path, file_name.clone(), encoding).and_then(|prepared| {
        match write_atomic(dest_dir.as_ref(), &prepared.file_name, &prepared.document.text) {
            Ok(target) => Ok((prepared, target)),
            Err(error) => Err((error, prepared.input_bytes)),
        }
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok((prepared, target)) => FileResult {
            file_name,
            source: path.to_path_buf(),
            destination: Some(target),
            encoding,
            declaration_rewritten: prepared.document.declaration_rewritten,
            input_bytes: prepared.input_bytes,
            output_bytes: prepared.document.text.len(),
            duration_ms,
            error: None,
        },
        Err((error, input_bytes)) => {
            warn!("Error in {}: {}", path.display(), error);
            FileResult {
                file_name,
                source: path.to_path_buf(),
                destination: None,
                encoding,
                declaration_rewritten: false,
                input_bytes,
                output_bytes: 0,
                duration_ms,
                error: Some(error),
            }
        }
    }
}

/// Read, decode and normalize one file. A failure carries the number of
/// bytes read before it (0 if the file could not be read).
fn prepare(
    path: &Path,
    file_name: String,
    encoding: SourceEncoding,
) -> Result<PreparedDocument, (FileError, usize)> {
    debug!("{}: reading as {}", path.display(), encoding);

    let bytes = std::fs::read(path).map_err(|e| {
        let error = FileError::Read {
            file: file_name.clone(),
            detail: e.to_string(),
        };
        (error, 0)
    })?;
    let input_bytes = bytes.len();

    let raw = encoding.decode(bytes).map_err(|e| {
        let error = FileError::Decode {
            file: file_name.clone(),
            encoding: encoding.label().to_string(),
            detail: e.to_string(),
        };
        (error, input_bytes)
    })?;
    let text = normalise_line_endings(&raw);
    let document = normalize_text(encoding, &text);

    Ok(PreparedDocument {
        file_name,
        encoding,
        input_bytes,
        document,
    })
}

/// Preprocess every `*.xml` file directly inside `source` into `destination`.
///
/// # Returns
/// `Ok(BatchReport)` once every file has been attempted, even if some failed
/// (check `report.stats.failed_files` or call
/// [`BatchReport::into_result`]).
///
/// # Errors
/// Only fatal errors: the source directory is missing or unreadable, or the
/// destination directory cannot be created.
pub async fn preprocess_dir(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    config: &PreprocessConfig,
) -> Result<BatchReport, PrepError> {
    let total_start = Instant::now();
    let source = source.as_ref();
    let destination = destination.as_ref();
    info!(
        "Starting preprocessing: {} → {}",
        source.display(),
        destination.display()
    );

    let files = prepare_batch(source, destination, config)?;
    info!("Found {} source files", files.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(files.len());
    }

    let dest = destination.to_path_buf();
    let mut results: Vec<FileResult> = stream::iter(files.into_iter().map(|path| {
        let dest = dest.clone();
        let cb = config.progress_callback.clone();
        async move { process_blocking(path, dest, cb).await }
    }))
    .buffer_unordered(config.concurrency)
    .collect()
    .await;

    results.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    let mut stats = BatchStats::from_files(&results);
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Preprocessing complete: {}/{} files, {} failed, {}ms total",
        stats.processed_files, stats.total_files, stats.failed_files, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(stats.total_files, stats.processed_files);
    }

    Ok(BatchReport {
        files: results,
        stats,
    })
}

/// Synchronous wrapper around [`preprocess_dir`].
///
/// Creates a temporary tokio runtime internally.
pub fn preprocess_dir_sync(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    config: &PreprocessConfig,
) -> Result<BatchReport, PrepError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PrepError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(preprocess_dir(source, destination, config))
}

/// List the `*.xml` files directly inside `source`, sorted by name.
///
/// Like a shell glob, names starting with `.` are skipped. Only regular
/// files (or links to them) are returned.
pub fn list_source_files(source: impl AsRef<Path>) -> Result<Vec<PathBuf>, PrepError> {
    let source = source.as_ref();
    if !source.is_dir() {
        return Err(PrepError::SourceDirNotFound {
            path: source.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(source).map_err(|e| PrepError::SourceDirUnreadable {
        path: source.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PrepError::SourceDirUnreadable {
            path: source.to_path_buf(),
            source: e,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !name.ends_with(SOURCE_EXTENSION) {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            debug!("Skipping non-file entry {}", path.display());
        }
    }
    files.sort();
    Ok(files)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Validate the directories and capture the file list once.
pub(crate) fn prepare_batch(
    source: &Path,
    destination: &Path,
    config: &PreprocessConfig,
) -> Result<Vec<PathBuf>, PrepError> {
    let files = list_source_files(source)?;

    if config.create_destination && !destination.is_dir() {
        std::fs::create_dir_all(destination).map_err(|e| PrepError::DestinationCreateFailed {
            path: destination.to_path_buf(),
            source: e,
        })?;
        debug!("Created destination directory {}", destination.display());
    }

    Ok(files)
}

/// Run [`preprocess_file_to`] on the blocking pool and fire the callbacks.
pub(crate) async fn process_blocking(
    path: PathBuf,
    dest: PathBuf,
    cb: Option<ProgressCallback>,
) -> FileResult {
    let file_name = file_name_of(&path);
    if let Some(ref cb) = cb {
        cb.on_file_start(&file_name);
    }

    let source = path.clone();
    let result = match tokio::task::spawn_blocking(move || preprocess_file_to(&path, &dest)).await {
        Ok(result) => result,
        Err(e) => {
            warn!("Error in {}: worker task failed: {}", source.display(), e);
            FileResult {
                file_name: file_name.clone(),
                encoding: detect_encoding(&file_name),
                source,
                destination: None,
                declaration_rewritten: false,
                input_bytes: 0,
                output_bytes: 0,
                duration_ms: 0,
                error: Some(FileError::Read {
                    file: file_name.clone(),
                    detail: format!("worker task failed: {e}"),
                }),
            }
        }
    };

    if let Some(ref cb) = cb {
        match &result.error {
            None => cb.on_file_complete(&result.file_name, result.output_bytes),
            Some(e) => cb.on_file_error(&result.file_name, &e.to_string()),
        }
    }
    result
}

/// Write `text` to `dest_dir/file_name` via a temp file in the same directory.
fn write_atomic(dest_dir: &Path, file_name: &str, text: &str) -> Result<PathBuf, FileError> {
    let write_err = |e: std::io::Error| FileError::Write {
        file: file_name.to_string(),
        detail: e.to_string(),
    };
    let target = dest_dir.join(file_name);

    let mut tmp = tempfile::NamedTempFile::new_in(dest_dir).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.persist(&target).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} ({} bytes)", target.display(), text.len());
    Ok(target)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
