//! # md2json
//!
//! Convert a directory of Markdown posts with front matter into a single
//! JSON collection that a static front end can render.
//!
//! ## Pipeline Overview
//!
//! ```text
//! content/posts/*.md
//!  │
//!  ├─ 1. List     every *.md file in the posts directory
//!  ├─ 2. Parse    front matter → typed metadata + body
//!  ├─ 3. Convert  body → HTML (fixed Markdown subset, nested-paren links)
//!  ├─ 4. Record   metadata + HTML → Post (drafts dropped)
//!  └─ 5. Output   newest first → dist/posts.json
//! ```
//!
//! Steps 2–4 are pure functions in [`pipeline`] and can be used on their own:
//!
//! ```rust
//! use md2json::{markdown_to_html, parse_front_matter};
//!
//! let (meta, body) = parse_front_matter("---\ntitle: \"Hi\"\ndraft: false\n---\n**bold**");
//! assert_eq!(meta.get_str("title"), Some("Hi"));
//! assert_eq!(meta.get_bool("draft"), Some(false));
//! assert_eq!(markdown_to_html(body), "<p><strong>bold</strong></p>");
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2json::{generate_to_file, GenerateConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GenerateConfig::builder()
//!         .input_dir("content/posts")
//!         .output_path("dist/posts.json")
//!         .build()?;
//!     let stats = generate_to_file(&config).await?;
//!     eprintln!("{} posts, {} drafts skipped", stats.published, stats.drafts);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2json` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! md2json = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod scaffold;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerateConfig, GenerateConfigBuilder};
pub use error::{DocumentError, Md2JsonError};
pub use generate::{generate, generate_sync, generate_to_file, inspect, write_collection};
pub use output::{GenerateOutput, GenerateStats, Inspection};
pub use pipeline::frontmatter::{parse_front_matter, FrontMatter, MetaValue};
pub use pipeline::html::markdown_to_html;
pub use pipeline::record::{process_document, Post};
pub use progress::{GenerateProgressCallback, NoopProgressCallback, ProgressCallback};
pub use scaffold::{create_post, slugify};
