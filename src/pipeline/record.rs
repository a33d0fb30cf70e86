//! Post records: the JSON shape consumed by the site front end.

use super::frontmatter::{parse_front_matter, FrontMatter, MetaValue};
use super::html::markdown_to_html;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    /// `slug` from the front matter, else the file name without `.md`.
    pub slug: String,
    /// `YYYY-MM-DD`, or empty when absent.
    pub date: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub featured: bool,
    /// Body converted to HTML.
    pub content: String,
}

/// `true` when the front matter says `draft: true` (unquoted).
pub fn is_draft(meta: &FrontMatter) -> bool {
    matches!(meta.get("draft"), Some(MetaValue::Bool(true)))
}

/// Slug derived from a file name: `hello-world.md` → `hello-world`.
pub fn slug_from_file_name(file_name: &str) -> &str {
    file_name.strip_suffix(".md").unwrap_or(file_name)
}

/// Build a record from parsed metadata and converted HTML.
///
/// Returns `None` for drafts. Missing or mistyped fields take their
/// defaults: empty strings, no tags, not featured.
pub fn build_post(file_name: &str, meta: &FrontMatter, content: String) -> Option<Post> {
    if is_draft(meta) {
        return None;
    }
    Some(assemble(file_name, meta, content))
}

fn assemble(file_name: &str, meta: &FrontMatter, content: String) -> Post {
    let text = |key: &str| meta.get_str(key).unwrap_or_default().to_string();
    let slug = match meta.get_str("slug") {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => slug_from_file_name(file_name).to_string(),
    };

    Post {
        title: text("title"),
        slug,
        date: text("date"),
        summary: text("summary"),
        tags: meta.get_list("tags").map(<[String]>::to_vec).unwrap_or_default(),
        featured: meta.get_bool("featured") == Some(true),
        content,
    }
}

/// Parse, convert and assemble one document. `None` for drafts.
pub fn process_document(file_name: &str, raw: &str) -> Option<Post> {
    let (meta, body) = parse_front_matter(raw);
    if is_draft(&meta) {
        debug!("{} is a draft", file_name);
        return None;
    }
    Some(assemble(file_name, &meta, markdown_to_html(body)))
}

/// Like [`process_document`] but keeps drafts.
pub fn process_document_with_drafts(file_name: &str, raw: &str) -> Post {
    let (meta, body) = parse_front_matter(raw);
    assemble(file_name, &meta, markdown_to_html(body))
}
