//! Scaffolding for new posts: slug generation and the starter template.
//!
//! New posts start as drafts so they never leak into the generated
//! collection before the author flips `draft: true` to `draft: false`.

use crate::error::Md2JsonError;
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use unicode_normalization::UnicodeNormalization;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Turn a title into a URL slug: `"Ação & Reação!"` → `"acao-reacao"`.
///
/// Accents are removed by decomposing (NFD) and dropping combining marks;
/// anything else outside `a-z`, `0-9`, whitespace and `-` is dropped.
pub fn slugify(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();
    RE_WHITESPACE.replace_all(cleaned.trim(), "-").into_owned()
}

/// Today's date (UTC), as written into new posts.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Starter document for a new post.
pub fn post_template(title: &str, date: NaiveDate, slug: &str) -> String {
    format!(
        r#"---
title: "{title}"
date: {date}
slug: "{slug}"
summary: ""
tags: []
draft: true
featured: false
---

## Introduction

Write the introduction of your post here.

## Development

Main content goes here.

## Conclusion

Close with the key takeaways.
"#,
        date = date.format("%Y-%m-%d"),
    )
}

/// Write a new draft named `<slug>.md` into `dir` and return its path.
///
/// # Errors
/// - [`Md2JsonError::InvalidTitle`] when the title has no letters or digits
/// - [`Md2JsonError::PostExists`] when the file is already there
/// - [`Md2JsonError::OutputWriteFailed`] when the file cannot be written
pub fn create_post(
    dir: impl AsRef<Path>,
    title: &str,
    date: NaiveDate,
) -> Result<PathBuf, Md2JsonError> {
    let slug = slugify(title);
    if slug.trim_matches('-').is_empty() {
        return Err(Md2JsonError::InvalidTitle {
            title: title.to_string(),
        });
    }

    let dir = dir.as_ref();
    let path = dir.join(format!("{slug}.md"));
    let write_err = |source| Md2JsonError::OutputWriteFailed {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    // `create_new` fails instead of truncating a file that appeared meanwhile.
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(Md2JsonError::PostExists { path: path.clone() });
        }
        Err(e) => return Err(write_err(e)),
    };
    file.write_all(post_template(title, date, &slug).as_bytes())
        .map_err(write_err)?;

    info!("Created post: {}", path.display());
    Ok(path)
}
