//! Configuration types for post generation.
//!
//! All generator behaviour is controlled through [`GenerateConfig`], built
//! via its [`GenerateConfigBuilder`]. The transformation pipeline itself has
//! no knobs; everything here concerns where documents come from, where the
//! collection goes, and how the run is scheduled.

use crate::error::Md2JsonError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Default directory holding the Markdown posts.
pub const DEFAULT_INPUT_DIR: &str = "content/posts";

/// Default location of the generated JSON collection.
pub const DEFAULT_OUTPUT_PATH: &str = "dist/posts.json";

/// Configuration for a generation run.
///
/// Built via [`GenerateConfig::builder()`] or using
/// [`GenerateConfig::default()`].
///
/// # Example
/// ```rust
/// use md2json::GenerateConfig;
///
/// let config = GenerateConfig::builder()
///     .input_dir("site/posts")
///     .output_path("public/posts.json")
///     .concurrency(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.concurrency, 4);
/// ```
#[derive(Clone)]
pub struct GenerateConfig {
    /// Directory scanned (non-recursively) for `*.md` files.
    pub input_dir: PathBuf,

    /// Where [`crate::generate::generate_to_file`] writes the collection.
    pub output_path: PathBuf,

    /// Number of documents read and converted at once. Default: 8.
    pub concurrency: usize,

    /// Keep posts marked `draft: true`. Default: false.
    pub include_drafts: bool,

    /// Pretty-print the JSON with two-space indentation. Default: true.
    pub pretty: bool,

    /// Optional per-document event sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            concurrency: 8,
            include_drafts: false,
            pretty: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GenerateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateConfig")
            .field("input_dir", &self.input_dir)
            .field("output_path", &self.output_path)
            .field("concurrency", &self.concurrency)
            .field("include_drafts", &self.include_drafts)
            .field("pretty", &self.pretty)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn GenerateProgressCallback>"),
            )
            .finish()
    }
}

impl GenerateConfig {
    /// Create a builder starting from the defaults.
    pub fn builder() -> GenerateConfigBuilder {
        GenerateConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerateConfig`].
#[derive(Debug)]
pub struct GenerateConfigBuilder {
    config: GenerateConfig,
}

impl GenerateConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn include_drafts(mut self, v: bool) -> Self {
        self.config.include_drafts = v;
        self
    }

    pub fn pretty(mut self, v: bool) -> Self {
        self.config.pretty = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<GenerateConfig, Md2JsonError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(Md2JsonError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.input_dir.as_os_str().is_empty() {
            return Err(Md2JsonError::InvalidConfig(
                "Input directory must not be empty".into(),
            ));
        }
        if c.output_path.as_os_str().is_empty() {
            return Err(Md2JsonError::InvalidConfig(
                "Output path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
