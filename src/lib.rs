//! # corpus-prep
//!
//! Prepare a corpus of scholarly XML editions for downstream text
//! processing, and split the extracted text into German sentences.
//!
//! ## Pipeline Overview
//!
//! ```text
//! <source dir>/*.xml
//!  │
//!  ├─ 1. Detect   encoding from the numeric file-name suffix (10/15/16/23 → ISO-8859-1)
//!  ├─ 2. Decode   bytes → text, CRLF → LF
//!  ├─ 3. Declare  encoding="ISO-8859-1" → encoding="UTF-8" for legacy files
//!  ├─ 4. Entities HTML5 named/numeric references + Greek letter names → characters
//!  └─ 5. Write    UTF-8 file of the same name in <destination dir>
//!
//! text ──▶ Segmenter ──▶ sentences
//! ```
//!
//! Per-file failures never stop a batch: they are collected in the
//! [`BatchReport`] and the remaining files are still written.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use corpus_prep::{preprocess_dir, PreprocessConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PreprocessConfig::default();
//!     let report = preprocess_dir("raw/", "prepared/", &config).await?;
//!     for failed in report.failures() {
//!         eprintln!("Error in {}", failed.source.display());
//!     }
//!     eprintln!("{}/{} files written",
//!         report.stats.processed_files,
//!         report.stats.total_files);
//!     Ok(())
//! }
//! ```
//!
//! ```rust
//! use corpus_prep::Segmenter;
//!
//! let sentences = Segmenter::german().split("Das ist ein Satz usw. der weiter geht. Ende.");
//! assert_eq!(sentences.len(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `preprocess-xml` and `split-sentences` binaries |
//!
//! ```toml
//! corpus-prep = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod preprocess;
pub mod progress;
pub mod sentences;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PreprocessConfig, PreprocessConfigBuilder};
pub use error::{FileError, PrepError};
pub use output::{BatchReport, BatchStats, FileResult};
pub use pipeline::encoding::{detect_encoding, SourceEncoding};
pub use pipeline::entities::decode_entities;
pub use pipeline::declaration::rewrite_declaration;
pub use pipeline::normalize::{normalize_text, NormalizedDocument};
pub use preprocess::{
    list_source_files, preprocess_dir, preprocess_dir_sync, preprocess_file, preprocess_file_to,
    PreparedDocument,
};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use sentences::{split_json, split_paragraph_sentences, Segmenter, SentenceSplit, SentencesById};
pub use stream::{preprocess_stream, FileStream};
