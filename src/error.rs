//! Error types for the md2json library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Md2JsonError`] (**fatal**): the run cannot proceed at all (missing
//!   posts directory, unwritable output, invalid configuration). Returned as
//!   `Err(Md2JsonError)` from the top-level `generate*` functions.
//!
//! * [`DocumentError`] (**non-fatal**): a single document could not be read,
//!   but every other document is fine. Collected in
//!   [`crate::output::GenerateOutput::failures`] so callers can decide
//!   whether one unreadable file should fail the whole collection.
//!
//! The transformation pipeline itself ([`crate::pipeline`]) never fails:
//! malformed front matter or markup degrades to the most literal output.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the md2json library.
#[derive(Debug, Error)]
pub enum Md2JsonError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The posts directory does not exist.
    #[error("Posts directory not found: '{path}'\nCheck the path exists and is a directory.")]
    DirectoryNotFound { path: PathBuf },

    /// The posts directory exists but could not be listed.
    #[error("Failed to read directory '{path}': {source}")]
    DirectoryReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single file requested by `inspect` could not be read.
    #[error("Failed to read '{path}': {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some documents were processed but at least one failed.
    ///
    /// Returned by [`crate::output::GenerateOutput::into_result`] when the
    /// caller wants to treat any document failure as an error.
    #[error("{failed}/{total} documents failed to load")]
    PartialFailure { failed: usize, total: usize },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the JSON output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The post collection could not be serialised.
    #[error("Failed to serialise posts: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Scaffolding errors ────────────────────────────────────────────────
    /// A post with the same slug already exists.
    #[error("Post already exists: '{path}'")]
    PostExists { path: PathBuf },

    /// The title produces an empty slug.
    #[error("Invalid title '{title}': it must contain at least one letter or digit")]
    InvalidTitle { title: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("{file}: read failed: {detail}")]
    ReadFailed { file: String, detail: String },
}

impl DocumentError {
    /// File name of the document that failed.
    pub fn file(&self) -> &str {
        match self {
            DocumentError::ReadFailed { file, .. } => file,
        }
    }
}
