//! Progress-callback trait for per-document generation events.
//!
//! Inject an [`Arc<dyn GenerateProgressCallback>`] via
//! [`crate::config::GenerateConfigBuilder::progress_callback`] to receive
//! events as the generator processes each document.
//!
//! # Example
//!
//! ```rust
//! use md2json::{GenerateConfig, GenerateProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     published: AtomicUsize,
//! }
//!
//! impl GenerateProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, file: &str, slug: &str) {
//!         self.published.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{file} -> {slug}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { published: AtomicUsize::new(0) });
//!
//! let config = GenerateConfig::builder()
//!     .progress_callback(counter as Arc<dyn GenerateProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the generator as it processes each document.
///
/// Documents are processed concurrently, so every method may be called from
/// several tasks at once. All methods default to no-ops.
pub trait GenerateProgressCallback: Send + Sync {
    /// Called once after the directory listing, before any document is read.
    fn on_generate_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called when a document was converted into a post.
    fn on_document_complete(&self, file: &str, slug: &str) {
        let _ = (file, slug);
    }

    /// Called when a draft was left out.
    fn on_document_skipped(&self, file: &str) {
        let _ = file;
    }

    /// Called when a document could not be read.
    fn on_document_error(&self, file: &str, error: &str) {
        let _ = (file, error);
    }

    /// Called once after every document has been attempted.
    fn on_generate_complete(&self, total_documents: usize, published: usize) {
        let _ = (total_documents, published);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerateProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GenerateConfig`].
pub type ProgressCallback = Arc<dyn GenerateProgressCallback>;
