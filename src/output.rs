//! Result types of a preprocessing run.

use crate::error::{FileError, PrepError};
use crate::pipeline::encoding::SourceEncoding;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome for one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// Base name, identical for source and destination.
    pub file_name: String,
    pub source: PathBuf,
    /// Written file; `None` when the file failed.
    pub destination: Option<PathBuf>,
    /// Encoding inferred from the file name.
    pub encoding: SourceEncoding,
    /// Whether `encoding="ISO-8859-1"` was replaced.
    pub declaration_rewritten: bool,
    /// Size of the raw source file (0 if it could not be read).
    pub input_bytes: usize,
    /// Size of the UTF-8 output (0 on failure).
    pub output_bytes: usize,
    pub duration_ms: u64,
    /// Set when the file failed.
    pub error: Option<FileError>,
}

impl FileResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate numbers for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// `*.xml` files found in the source directory.
    pub total_files: usize,
    pub processed_files: usize,
    pub failed_files: usize,
    /// Files read as ISO-8859-1, successful or not.
    pub legacy_files: usize,
    /// Legacy files whose declaration was rewritten.
    pub rewritten_declarations: usize,
    pub total_duration_ms: u64,
}

impl BatchStats {
    /// Compute the per-file counts from `files`; the duration is left at 0.
    pub fn from_files(files: &[FileResult]) -> Self {
        Self {
            total_files: files.len(),
            processed_files: files.iter().filter(|f| f.is_ok()).count(),
            failed_files: files.iter().filter(|f| !f.is_ok()).count(),
            legacy_files: files.iter().filter(|f| f.encoding.is_legacy()).count(),
            rewritten_declarations: files.iter().filter(|f| f.declaration_rewritten).count(),
            total_duration_ms: 0,
        }
    }
}

/// Everything a batch run produced, sorted by file name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub files: Vec<FileResult>,
    pub stats: BatchStats,
}

impl BatchReport {
    /// Iterate over the failed files.
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| !f.is_ok())
    }

    /// Treat any failed file as an error.
    pub fn into_result(self) -> Result<Self, PrepError> {
        if self.stats.failed_files > 0 {
            return Err(PrepError::PartialFailure {
                processed: self.stats.processed_files,
                failed: self.stats.failed_files,
                total: self.stats.total_files,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, encoding: SourceEncoding, error: Option<FileError>) -> FileResult {
        FileResult {
            file_name: name.into(),
            source: PathBuf::from("in").join(name),
            destination: error.is_none().then(|| PathBuf::from("out").join(name)),
            encoding,
            declaration_rewritten: encoding.is_legacy() && error.is_none(),
            input_bytes: 10,
            output_bytes: if error.is_none() { 12 } else { 0 },
            duration_ms: 1,
            error,
        }
    }

    fn sample() -> Vec<FileResult> {
        vec![
            result("1.xml", SourceEncoding::Utf8, None),
            result("15.xml", SourceEncoding::Latin1, None),
            result(
                "7.xml",
                SourceEncoding::Utf8,
                Some(FileError::Decode {
                    file: "7.xml".into(),
                    encoding: "utf-8".into(),
                    detail: "bad byte".into(),
                }),
            ),
        ]
    }

    #[test]
    fn stats_from_files() {
        let stats = BatchStats::from_files(&sample());
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.processed_files, 2);
        assert_eq!(stats.failed_files, 1);
        assert_eq!(stats.legacy_files, 1);
        assert_eq!(stats.rewritten_declarations, 1);
    }

    #[test]
    fn into_result_reports_partial_failure() {
        let files = sample();
        let stats = BatchStats::from_files(&files);
        let report = BatchReport { files, stats };
        assert_eq!(report.failures().count(), 1);
        match report.into_result() {
            Err(PrepError::PartialFailure { failed, total, .. }) => {
                assert_eq!((failed, total), (1, 3));
            }
            other => panic!("expected PartialFailure, got {other:?}"),
        }
    }

    #[test]
    fn report_serialises_to_json() {
        let files = sample();
        let stats = BatchStats::from_files(&files);
        let json = serde_json::to_string(&BatchReport { files, stats }).unwrap();
        assert!(json.contains("\"encoding\":\"iso-8859-1\""), "got: {json}");
        assert!(json.contains("\"failed_files\":1"));
    }
}
