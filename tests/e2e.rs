//! End-to-end integration tests for md2json.
//!
//! Each test builds a posts directory in a temp dir, runs the generator
//! through the public API and checks the resulting collection.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use md2json::{
    generate, generate_sync, generate_to_file, inspect, GenerateConfig, GenerateProgressCallback,
    Md2JsonError, MetaValue, Post,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// A posts directory with two published posts, one draft and one non-post.
fn sample_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let posts = tmp.path().join("posts");
    fs::create_dir_all(&posts).unwrap();

    write(
        &posts,
        "older.md",
        "---\ntitle: \"Older\"\ndate: 2023-12-01\ntags:\n  - \"rust\"\n  - 'cli'\n---\n\nOld *news*.\n",
    );
    write(
        &posts,
        "newer.md",
        "---\ntitle: Newer\ndate: 2024-02-10\nslug: the-newest\nsummary: \"Fresh\"\ntags: [\"web\"]\nfeatured: true\n---\n\n## Section\n\n![cover](https://cdn.example.com/filters:cover()/img.jpg)\n",
    );
    write(
        &posts,
        "wip.md",
        "---\ntitle: Work in progress\ndate: 2024-03-01\ndraft: true\n---\nNot yet.\n",
    );
    write(&posts, "notes.txt", "not markdown");
    tmp
}

fn config_for(tmp: &TempDir) -> GenerateConfig {
    GenerateConfig::builder()
        .input_dir(tmp.path().join("posts"))
        .output_path(tmp.path().join("dist/posts.json"))
        .concurrency(2)
        .build()
        .unwrap()
}

fn slugs(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
}

// ── generate ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_collection() {
    init_tracing();
    let tmp = sample_site();
    let output = generate(&config_for(&tmp)).await.expect("generate should succeed");

    assert_eq!(slugs(&output.posts), ["the-newest", "older"]);
    assert!(output.failures.is_empty());
    assert_eq!(output.stats.total_documents, 3);
    assert_eq!(output.stats.published, 2);
    assert_eq!(output.stats.drafts, 1);
    assert_eq!(output.stats.failed, 0);

    let newer = &output.posts[0];
    assert_eq!(newer.title, "Newer");
    assert_eq!(newer.summary, "Fresh");
    assert_eq!(newer.tags, ["web"]);
    assert!(newer.featured);
    assert!(newer.content.starts_with("<h2>Section</h2>\n<img src=\"https://cdn.example.com/filters:cover()/img.jpg\""));

    let older = &output.posts[1];
    assert_eq!(older.tags, ["rust", "cli"]);
    assert!(!older.featured);
    assert_eq!(older.content, "<p>Old <em>news</em>.</p>");
}

#[tokio::test]
async fn test_generate_with_drafts() {
    let tmp = sample_site();
    let config = GenerateConfig::builder()
        .input_dir(tmp.path().join("posts"))
        .include_drafts(true)
        .build()
        .unwrap();
    let output = generate(&config).await.unwrap();

    assert_eq!(slugs(&output.posts), ["wip", "the-newest", "older"]);
    assert_eq!(output.stats.drafts, 0);
}

#[tokio::test]
async fn test_missing_directory_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let config = GenerateConfig::builder()
        .input_dir(tmp.path().join("nope"))
        .build()
        .unwrap();
    let err = generate(&config).await.unwrap_err();
    assert!(matches!(err, Md2JsonError::DirectoryNotFound { .. }));
}

#[tokio::test]
async fn test_empty_directory_gives_empty_collection() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("posts")).unwrap();
    let output = generate(&config_for(&tmp)).await.unwrap();
    assert!(output.posts.is_empty());
    assert_eq!(output.to_json(true).unwrap(), "[]");
}

#[tokio::test]
async fn test_unreadable_document_is_not_fatal() {
    let tmp = sample_site();
    // A directory with a .md name is listed but cannot be read as a file.
    fs::create_dir_all(tmp.path().join("posts/broken.md")).unwrap();

    let output = generate(&config_for(&tmp)).await.unwrap();
    assert_eq!(output.posts.len(), 2);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].file(), "broken.md");

    let err = output.into_result().unwrap_err();
    assert!(matches!(err, Md2JsonError::PartialFailure { failed: 1, total: 4 }));
}

#[tokio::test]
async fn test_equal_dates_keep_file_name_order() {
    let tmp = TempDir::new().unwrap();
    let posts = tmp.path().join("posts");
    fs::create_dir_all(&posts).unwrap();
    for name in ["c.md", "a.md", "b.md"] {
        write(&posts, name, "---\ndate: 2024-01-01\n---\nx");
    }

    let output = generate(&config_for(&tmp)).await.unwrap();
    assert_eq!(slugs(&output.posts), ["a", "b", "c"]);
}

// ── generate_to_file ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_to_file_writes_pretty_json() {
    let tmp = sample_site();
    let config = config_for(&tmp);
    let stats = generate_to_file(&config).await.unwrap();
    assert_eq!(stats.published, 2);

    let json = fs::read_to_string(&config.output_path).unwrap();
    assert!(json.starts_with("[\n  {\n    \"title\": \"Newer\""));
    assert!(!tmp.path().join("dist/posts.json.tmp").exists());

    let parsed: Vec<Post> = serde_json::from_str(&json).unwrap();
    assert_eq!(slugs(&parsed), ["the-newest", "older"]);
}

#[tokio::test]
async fn test_generate_to_file_compact() {
    let tmp = sample_site();
    let config = GenerateConfig::builder()
        .input_dir(tmp.path().join("posts"))
        .output_path(tmp.path().join("out.json"))
        .pretty(false)
        .build()
        .unwrap();
    generate_to_file(&config).await.unwrap();

    let json = fs::read_to_string(&config.output_path).unwrap();
    assert!(json.starts_with("[{\"title\":\"Newer\""));
    assert!(!json.contains('\n'));
}

// ── progress callbacks ───────────────────────────────────────────────────────

#[derive(Default)]
struct Counter {
    total: AtomicUsize,
    complete: AtomicUsize,
    skipped: AtomicUsize,
    errors: AtomicUsize,
    published: AtomicUsize,
}

impl GenerateProgressCallback for Counter {
    fn on_generate_start(&self, total_documents: usize) {
        self.total.store(total_documents, Ordering::SeqCst);
    }
    fn on_document_complete(&self, _file: &str, _slug: &str) {
        self.complete.fetch_add(1, Ordering::SeqCst);
    }
    fn on_document_skipped(&self, _file: &str) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }
    fn on_document_error(&self, _file: &str, _error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
    fn on_generate_complete(&self, _total_documents: usize, published: usize) {
        self.published.store(published, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_progress_callback_events() {
    let tmp = sample_site();
    fs::create_dir_all(tmp.path().join("posts/broken.md")).unwrap();
    let counter = Arc::new(Counter::default());

    let config = GenerateConfig::builder()
        .input_dir(tmp.path().join("posts"))
        .progress_callback(counter.clone() as Arc<dyn GenerateProgressCallback>)
        .build()
        .unwrap();
    generate(&config).await.unwrap();

    assert_eq!(counter.total.load(Ordering::SeqCst), 4);
    assert_eq!(counter.complete.load(Ordering::SeqCst), 2);
    assert_eq!(counter.skipped.load(Ordering::SeqCst), 1);
    assert_eq!(counter.errors.load(Ordering::SeqCst), 1);
    assert_eq!(counter.published.load(Ordering::SeqCst), 2);
}

// ── sync wrapper & inspect ───────────────────────────────────────────────────

#[test]
fn test_generate_sync() {
    let tmp = sample_site();
    let output = generate_sync(&config_for(&tmp)).unwrap();
    assert_eq!(output.posts.len(), 2);
}

#[tokio::test]
async fn test_inspect_draft() {
    let tmp = sample_site();
    let inspection = inspect(tmp.path().join("posts/wip.md")).await.unwrap();

    assert!(inspection.draft);
    assert_eq!(inspection.metadata.get("draft"), Some(&MetaValue::Bool(true)));
    assert_eq!(inspection.post.slug, "wip");
    assert_eq!(inspection.post.content, "<p>Not yet.</p>");
}

#[tokio::test]
async fn test_inspect_missing_file() {
    let err = inspect("/definitely/not/here.md").await.unwrap_err();
    assert!(matches!(err, Md2JsonError::FileReadFailed { .. }));
}
