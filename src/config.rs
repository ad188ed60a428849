//! Configuration for batch preprocessing.
//!
//! Every knob of a directory run lives in [`PreprocessConfig`], built via
//! its [`PreprocessConfigBuilder`]. The per-file transformation itself has
//! no configuration: the legacy file set and the entity tables are fixed.

use crate::error::PrepError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Configuration for a directory preprocessing run.
///
/// Built via [`PreprocessConfig::builder()`] or using
/// [`PreprocessConfig::default()`].
///
/// # Example
/// ```rust
/// use corpus_prep::PreprocessConfig;
///
/// let config = PreprocessConfig::builder()
///     .concurrency(8)
///     .create_destination(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PreprocessConfig {
    /// Number of files processed at once. Default: 4. `1` processes the
    /// batch strictly one file after another.
    pub concurrency: usize,

    /// Create the destination directory (and parents) if missing. Default: true.
    ///
    /// When false, a missing destination makes every file fail with a write
    /// error instead of aborting the run.
    pub create_destination: bool,

    /// Optional progress events for each file.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            create_destination: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PreprocessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessConfig")
            .field("concurrency", &self.concurrency)
            .field("create_destination", &self.create_destination)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl PreprocessConfig {
    /// Create a new builder for `PreprocessConfig`.
    pub fn builder() -> PreprocessConfigBuilder {
        PreprocessConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PreprocessConfig`].
#[derive(Debug)]
pub struct PreprocessConfigBuilder {
    config: PreprocessConfig,
}

impl PreprocessConfigBuilder {
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn create_destination(mut self, v: bool) -> Self {
        self.config.create_destination = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PreprocessConfig, PrepError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(PrepError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.concurrency > 256 {
            return Err(PrepError::InvalidConfig(format!(
                "Concurrency must be ≤ 256, got {}",
                c.concurrency
            )));
        }
        Ok(self.config)
    }
}
