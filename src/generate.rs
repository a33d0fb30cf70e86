//! Directory-level entry points: read every post, write one JSON collection.
//!
//! The pipeline in [`crate::pipeline`] is a pure function of one document.
//! This module supplies the I/O around it: listing the posts directory,
//! reading files concurrently, collecting non-fatal per-document failures,
//! ordering the result and writing it atomically.

use crate::config::GenerateConfig;
use crate::error::{DocumentError, Md2JsonError};
use crate::output::{GenerateOutput, GenerateStats, Inspection};
use crate::pipeline::frontmatter::parse_front_matter;
use crate::pipeline::record::{is_draft, process_document, process_document_with_drafts, Post};
use crate::progress::GenerateProgressCallback;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What happened to one document.
enum Outcome {
    Published(Post),
    Draft,
    Failed(DocumentError),
}

/// Read every `*.md` file in `config.input_dir` and convert it to a [`Post`].
///
/// # Returns
/// `Ok(GenerateOutput)` even if some documents could not be read (check
/// `output.failures`, or call [`GenerateOutput::into_result`]).
///
/// # Errors
/// Returns `Err(Md2JsonError)` only for fatal errors:
/// - The input directory does not exist
/// - The input directory cannot be listed
pub async fn generate(config: &GenerateConfig) -> Result<GenerateOutput, Md2JsonError> {
    let start = Instant::now();
    let dir = config.input_dir.as_path();
    info!("Reading posts from: {}", dir.display());

    // ── Step 1: List documents ───────────────────────────────────────────
    let files = list_markdown_files(dir).await?;
    info!("Found {} post(s)", files.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_generate_start(files.len());
    }

    // ── Step 2: Read and convert concurrently ────────────────────────────
    let callback = config.progress_callback.as_deref();
    let mut outcomes: Vec<(usize, Outcome)> =
        stream::iter(files.iter().enumerate().map(|(idx, file)| {
            let path = dir.join(file);
            async move {
                let outcome = load_document(file, &path, config.include_drafts, callback).await;
                (idx, outcome)
            }
        }))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    // Completion order is arbitrary; restore file-name order before sorting
    // by date so equal dates come out deterministically.
    outcomes.sort_by_key(|(idx, _)| *idx);

    // ── Step 3: Collect ──────────────────────────────────────────────────
    let mut posts = Vec::new();
    let mut failures = Vec::new();
    let mut drafts = 0;
    for (_, outcome) in outcomes {
        match outcome {
            Outcome::Published(post) => posts.push(post),
            Outcome::Draft => drafts += 1,
            Outcome::Failed(e) => failures.push(e),
        }
    }

    sort_newest_first(&mut posts);

    let stats = GenerateStats {
        total_documents: files.len(),
        published: posts.len(),
        drafts,
        failed: failures.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Generated {} post(s) from {} document(s) in {}ms",
        stats.published, stats.total_documents, stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_generate_complete(stats.total_documents, stats.published);
    }

    Ok(GenerateOutput {
        posts,
        failures,
        stats,
    })
}

/// Generate the collection and write it to `config.output_path`.
pub async fn generate_to_file(config: &GenerateConfig) -> Result<GenerateStats, Md2JsonError> {
    let output = generate(config).await?;
    write_collection(&output, &config.output_path, config.pretty).await?;
    Ok(output.stats)
}

/// Write the post collection as JSON.
///
/// Uses atomic write (temp file + rename) to prevent partial files, and
/// creates missing parent directories.
pub async fn write_collection(
    output: &GenerateOutput,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), Md2JsonError> {
    let path = path.as_ref();
    let json = output.to_json(pretty)?;
    let write_err = |source| Md2JsonError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    info!("Generated: {} ({} posts)", path.display(), output.posts.len());
    Ok(())
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(config: &GenerateConfig) -> Result<GenerateOutput, Md2JsonError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Md2JsonError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(config))
}

/// Parse a single document without writing anything.
///
/// Drafts are converted too; [`Inspection::draft`] tells them apart.
pub async fn inspect(path: impl AsRef<Path>) -> Result<Inspection, Md2JsonError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| Md2JsonError::FileReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    let raw = String::from_utf8_lossy(&bytes);
    let file_name = file_name_of(path);

    let (metadata, _) = parse_front_matter(&raw);
    Ok(Inspection {
        draft: is_draft(&metadata),
        post: process_document_with_drafts(&file_name, &raw),
        metadata,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Names of the `*.md` entries in `dir`, sorted.
async fn list_markdown_files(dir: &Path) -> Result<Vec<String>, Md2JsonError> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => {
            return Err(Md2JsonError::DirectoryNotFound {
                path: dir.to_path_buf(),
            })
        }
    }

    let read_err = |source| Md2JsonError::DirectoryReadFailed {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let name = entry.file_name();
        match name.to_str() {
            Some(name) if name.ends_with(".md") => names.push(name.to_string()),
            Some(_) => {}
            None => warn!("Skipping non UTF-8 file name: {:?}", name),
        }
    }

    names.sort();
    Ok(names)
}

async fn load_document(
    file: &str,
    path: &Path,
    include_drafts: bool,
    callback: Option<&dyn GenerateProgressCallback>,
) -> Outcome {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            let err = DocumentError::ReadFailed {
                file: file.to_string(),
                detail: e.to_string(),
            };
            if let Some(cb) = callback {
                cb.on_document_error(file, &err.to_string());
            }
            return Outcome::Failed(err);
        }
    };
    let raw = String::from_utf8_lossy(&bytes);

    let post = if include_drafts {
        Some(process_document_with_drafts(file, &raw))
    } else {
        process_document(file, &raw)
    };

    match post {
        Some(post) => {
            debug!("  Processed: {}", post.slug);
            if let Some(cb) = callback {
                cb.on_document_complete(file, &post.slug);
            }
            Outcome::Published(post)
        }
        None => {
            info!("  Skipping draft: {}", file);
            if let Some(cb) = callback {
                cb.on_document_skipped(file);
            }
            Outcome::Draft
        }
    }
}

/// Newest first by `date`. Stable, so equal dates keep their order.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
