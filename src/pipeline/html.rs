//! Markdown → HTML conversion for post bodies.
//!
//! This is a small, fixed subset of Markdown, not CommonMark. The body is
//! rewritten by a sequence of passes, each a pure `&str → String` function:
//!
//! 0. Normalise line endings (CRLF / CR → LF)
//! 1. Fenced code blocks → `<pre><code class="language-…">`
//! 2. Inline code → `<code>`
//! 3. Headings `#` … `####` → `<h1>` … `<h4>`
//! 4. Emphasis `***` / `**` / `*` → `<strong><em>` / `<strong>` / `<em>`
//! 5. List items `- ` / `* ` → `<li>`
//! 6. `---` lines → `<hr>`
//! 7. Links and images (see [`super::links`])
//! 8. Runs of `<li>` → one `<ul>`
//! 9. Blank-line separated blocks → `<p>` unless already block-level
//!
//! ## Rule Order
//!
//! Passes 1 and 2 swap the HTML they produce for opaque placeholders, which
//! pass 9 swaps back. Later passes therefore never rewrite code content and a
//! blank line inside a fenced block does not split it into paragraphs.
//! Headings run from four hashes down to one so `####` is never read as an
//! `###` heading, and emphasis runs from three asterisks down to one.

use super::links::replace_links;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Convert a post body to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let s = normalise_line_endings(markdown);
    let mut stash = CodeStash::for_input(&s);

    let s = fenced_code_blocks(&s, &mut stash);
    let s = inline_code(&s, &mut stash);
    let s = headings(&s);
    let s = emphasis(&s);
    let s = list_items(&s);
    let s = horizontal_rules(&s);
    let s = replace_links(&s);
    let s = group_list_items(&s);
    wrap_paragraphs(&s, &stash)
}

/// Escape `&`, `<` and `>`. `&` goes first so the entities introduced for
/// `<` and `>` are not escaped again.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ── Code stash ───────────────────────────────────────────────────────────────

/// Rendered code fragments, referenced from the text by index.
///
/// Placeholders are `<marker><index><marker>`, where the marker is a
/// private-use character that does not occur in the input, so text that
/// merely looks like a placeholder is never restored.
#[derive(Debug)]
struct CodeStash {
    marker: char,
    placeholder: Regex,
    fragments: Vec<String>,
}

impl CodeStash {
    fn for_input(input: &str) -> Self {
        let marker = ('\u{E000}'..='\u{F8FF}')
            .chain('\u{F0000}'..='\u{FFFFD}')
            .find(|c| !input.contains(*c))
            .unwrap_or('\u{E000}');
        let m = regex::escape(&marker.to_string());
        Self {
            marker,
            placeholder: Regex::new(&format!(r"{m}(\d+){m}")).expect("placeholder regex"),
            fragments: Vec::new(),
        }
    }

    fn push(&mut self, html: String) -> String {
        self.fragments.push(html);
        format!("{m}{}{m}", self.fragments.len() - 1, m = self.marker)
    }

    fn restore(&self, input: &str) -> String {
        self.placeholder
            .replace_all(input, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| self.fragments.get(n))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

// ── Pass 0: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Pass 1: Fenced code blocks ───────────────────────────────────────────────

static RE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```([A-Za-z0-9_]*)\n(.*?)```").expect("fence regex"));

fn fenced_code_blocks(input: &str, stash: &mut CodeStash) -> String {
    RE_FENCE
        .replace_all(input, |caps: &Captures<'_>| {
            let lang = &caps[1];
            let class = if lang.is_empty() {
                String::new()
            } else {
                format!(" class=\"language-{lang}\"")
            };
            stash.push(format!(
                "<pre><code{class}>{}</code></pre>",
                escape_html(caps[2].trim())
            ))
        })
        .into_owned()
}

// ── Pass 2: Inline code ──────────────────────────────────────────────────────

static RE_INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("code regex"));

fn inline_code(input: &str, stash: &mut CodeStash) -> String {
    RE_INLINE_CODE
        .replace_all(input, |caps: &Captures<'_>| {
            stash.push(format!("<code>{}</code>", escape_html(&caps[1])))
        })
        .into_owned()
}

// ── Pass 3: Headings ─────────────────────────────────────────────────────────

static RE_HEADINGS: Lazy<[(Regex, &'static str); 4]> = Lazy::new(|| {
    [
        (heading_regex(4), "<h4>$1</h4>"),
        (heading_regex(3), "<h3>$1</h3>"),
        (heading_regex(2), "<h2>$1</h2>"),
        (heading_regex(1), "<h1>$1</h1>"),
    ]
});

fn heading_regex(level: usize) -> Regex {
    Regex::new(&format!(r"(?m)^#{{{level}}}\s+(.+)$")).expect("heading regex")
}

fn headings(input: &str) -> String {
    RE_HEADINGS
        .iter()
        .fold(input.to_string(), |s, (re, rep)| re.replace_all(&s, *rep).into_owned())
}

// ── Pass 4: Emphasis ─────────────────────────────────────────────────────────

static RE_BOLD_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").expect("bold italic regex"));
static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold regex"));
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("italic regex"));

fn emphasis(input: &str) -> String {
    let s = RE_BOLD_ITALIC.replace_all(input, "<strong><em>$1</em></strong>");
    let s = RE_BOLD.replace_all(&s, "<strong>$1</strong>");
    RE_ITALIC.replace_all(&s, "<em>$1</em>").into_owned()
}

// ── Pass 5: List items ───────────────────────────────────────────────────────

static RE_LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[-*]\s+(.+)$").expect("list item regex"));

fn list_items(input: &str) -> String {
    RE_LIST_ITEM.replace_all(input, "<li>$1</li>").into_owned()
}

// ── Pass 6: Horizontal rules ─────────────────────────────────────────────────

static RE_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^---$").expect("rule regex"));

fn horizontal_rules(input: &str) -> String {
    RE_RULE.replace_all(input, "<hr>").into_owned()
}

// ── Pass 8: Group list items ─────────────────────────────────────────────────

// Items may be separated by one newline; a trailing newline stays outside.
static RE_LIST_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<li>.*?</li>(?:\n?<li>.*?</li>)*").expect("list run regex")
});

fn group_list_items(input: &str) -> String {
    RE_LIST_RUN
        .replace_all(input, |caps: &Captures<'_>| format!("<ul>{}</ul>", &caps[0]))
        .into_owned()
}

// ── Pass 9: Paragraphs ───────────────────────────────────────────────────────

static RE_BLOCK_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("split regex"));

static RE_BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<(h[1-6]|ul|ol|li|pre|hr|blockquote|img)").expect("block tag regex")
});

fn wrap_paragraphs(input: &str, stash: &CodeStash) -> String {
    RE_BLOCK_SPLIT
        .split(input)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            let restored = stash.restore(block);
            if RE_BLOCK_TAG.is_match(&restored) {
                restored
            } else {
                format!("<p>{}</p>", restored.replace('\n', " "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Tests ────────────────────────────────────────────────────────────────────
