//! CLI binary for md2json.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GenerateConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use md2json::{
    create_post, generate, inspect, scaffold, write_collection, GenerateConfig,
    GenerateProgressCallback, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per document.
/// Documents complete out of order, so the bar only counts.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl GenerateProgressCallback for CliProgressCallback {
    fn on_generate_start(&self, total_documents: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} posts",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_documents as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
    }

    fn on_document_complete(&self, file: &str, slug: &str) {
        self.bar
            .println(format!("  {} {:<32} {}", green("✓"), file, dim(slug)));
        self.bar.inc(1);
    }

    fn on_document_skipped(&self, file: &str) {
        self.bar
            .println(format!("  {} {:<32} {}", dim("–"), file, dim("draft")));
        self.bar.inc(1);
    }

    fn on_document_error(&self, file: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.bar
            .println(format!("  {} {:<32} {}", red("✗"), file, red(error)));
        self.bar.inc(1);
    }

    fn on_generate_complete(&self, total_documents: usize, published: usize) {
        self.bar.finish_and_clear();
        let failed = self.errors.load(Ordering::SeqCst);
        eprintln!(
            "{} {}/{} documents published{}",
            if failed == 0 { green("✔") } else { cyan("⚠") },
            bold(&published.to_string()),
            total_documents,
            if failed == 0 {
                String::new()
            } else {
                format!("  ({} failed)", red(&failed.to_string()))
            },
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Build dist/posts.json from content/posts/*.md
  md2json generate

  # Custom locations, include drafts, compact JSON
  md2json generate --input site/posts --output public/posts.json --drafts --compact

  # Fail when any post cannot be read
  md2json generate --strict

  # Scaffold a new draft post (content/posts/my-new-post.md)
  md2json new "My New Post"

  # Show how one file is parsed and converted
  md2json inspect content/posts/my-new-post.md

FRONT MATTER:
  ---
  title: "Post title"
  date: 2024-01-15
  slug: "post-title"        (default: file name)
  summary: "One line"
  tags: ["rust", "web"]     (or one "  - tag" per line)
  draft: false              (true = left out of the collection)
  featured: false
  ---
"#;

/// Convert Markdown posts with front matter into a JSON collection.
#[derive(Parser, Debug)]
#[command(
    name = "md2json",
    version,
    about = "Convert Markdown posts with front matter into a JSON collection",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "MD2JSON_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "MD2JSON_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read every post and write the JSON collection.
    Generate {
        /// Directory containing the `*.md` posts.
        #[arg(short, long, env = "MD2JSON_INPUT", default_value = md2json::config::DEFAULT_INPUT_DIR)]
        input: PathBuf,

        /// JSON file to write.
        #[arg(short, long, env = "MD2JSON_OUTPUT", default_value = md2json::config::DEFAULT_OUTPUT_PATH)]
        output: PathBuf,

        /// Number of posts processed at once.
        #[arg(short, long, env = "MD2JSON_CONCURRENCY", default_value_t = 8)]
        concurrency: usize,

        /// Keep posts marked `draft: true`.
        #[arg(long, env = "MD2JSON_DRAFTS")]
        drafts: bool,

        /// Write JSON without indentation.
        #[arg(long, env = "MD2JSON_COMPACT")]
        compact: bool,

        /// Exit with an error (and write nothing) if any post cannot be read.
        #[arg(long, env = "MD2JSON_STRICT")]
        strict: bool,

        /// Disable progress bar.
        #[arg(long, env = "MD2JSON_NO_PROGRESS")]
        no_progress: bool,
    },

    /// Scaffold a new draft post.
    New {
        /// Post title; the file name is derived from it.
        title: String,

        /// Directory the post is created in.
        #[arg(short, long, env = "MD2JSON_INPUT", default_value = md2json::config::DEFAULT_INPUT_DIR)]
        dir: PathBuf,
    },

    /// Print the parsed metadata and post record of one file as JSON.
    Inspect {
        /// Markdown file to inspect.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = matches!(
        cli.command,
        Command::Generate {
            no_progress: false,
            ..
        }
    ) && !cli.quiet;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Generate {
            input,
            output,
            concurrency,
            drafts,
            compact,
            strict,
            ..
        } => {
            let progress: Option<ProgressCallback> = if show_progress {
                Some(CliProgressCallback::new() as Arc<dyn GenerateProgressCallback>)
            } else {
                None
            };

            let mut builder = GenerateConfig::builder()
                .input_dir(input)
                .output_path(output)
                .concurrency(concurrency)
                .include_drafts(drafts)
                .pretty(!compact);
            if let Some(cb) = progress {
                builder = builder.progress_callback(cb);
            }
            let config = builder.build().context("Invalid configuration")?;

            let mut result = generate(&config).await.context("Generation failed")?;
            if strict {
                result = result.into_result().context("Generation failed")?;
            }
            write_collection(&result, &config.output_path, config.pretty)
                .await
                .context("Failed to write collection")?;

            if !cli.quiet {
                eprintln!(
                    "{}  {} posts  {}ms  →  {}",
                    if result.failures.is_empty() {
                        green("✔")
                    } else {
                        cyan("⚠")
                    },
                    result.stats.published,
                    result.stats.duration_ms,
                    bold(&config.output_path.display().to_string()),
                );
                for failure in &result.failures {
                    eprintln!("   {} {}", red("✗"), failure);
                }
            }
        }

        Command::New { title, dir } => {
            let path = create_post(&dir, &title, scaffold::today())
                .with_context(|| format!("Failed to create post in {}", dir.display()))?;
            if !cli.quiet {
                eprintln!("{} Post created: {}", green("✔"), bold(&path.display().to_string()));
                eprintln!(
                    "   {}",
                    dim("Edit the file and change \"draft: true\" to \"draft: false\" when it is ready.")
                );
            }
        }

        Command::Inspect { file } => {
            let inspection = inspect(&file)
                .await
                .with_context(|| format!("Failed to inspect {}", file.display()))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&inspection).context("Failed to serialise output")?
            );
        }
    }

    Ok(())
}
