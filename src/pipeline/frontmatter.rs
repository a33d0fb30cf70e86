//! Front matter: split a document into typed metadata and its body.
//!
//! A document may start with a block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Hello"
//! date: 2024-01-15
//! tags:
//!   - rust
//!   - "web"
//! draft: false
//! ---
//! Body text starts here.
//! ```
//!
//! This is not a YAML parser. Each line of the block is read on its own as
//! `key: value`, and the value is typed by a handful of fixed rules (block
//! sequence, flow sequence, boolean, date, string). Anything that does not
//! fit degrades to a default instead of failing, so [`parse_front_matter`]
//! is total over all inputs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A single typed metadata value.
///
/// Serialises as plain JSON (string, bool or array). The variant is not
/// recoverable from that form, so there is no `Deserialize` impl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Plain scalar, one layer of surrounding quotes removed.
    String(String),
    /// Unquoted `true` / `false`.
    Bool(bool),
    /// `YYYY-MM-DD`, kept verbatim. Calendar validity is not checked.
    Date(String),
    /// Block sequence or a flow sequence that decoded cleanly.
    List(Vec<String>),
    /// A `[...]` value that failed to decode, kept as written.
    Raw(String),
}

impl MetaValue {
    /// Text of any scalar variant. `None` for booleans and lists.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) | MetaValue::Date(s) | MetaValue::Raw(s) => Some(s),
            MetaValue::Bool(_) | MetaValue::List(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetaValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Metadata extracted from a document's front matter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    entries: HashMap<String, MetaValue>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    /// String, date or raw value for `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key)?.as_list()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert a value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) -> Option<MetaValue> {
        self.entries.insert(key.into(), value)
    }
}

static RE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---\r?\n?(.*)\z").expect("front matter regex")
});

// Keys are ASCII word characters and hyphens, starting with a word character.
static RE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_-]*):\s*(.*)").expect("key regex"));

static RE_LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+-\s+").expect("item regex"));

static RE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex"));

/// Split `raw` into its front matter and the body that follows it.
///
/// Without a leading `---` block the metadata is empty and the body is the
/// whole input. The body is returned exactly as it follows the closing
/// delimiter.
pub fn parse_front_matter(raw: &str) -> (FrontMatter, &str) {
    let Some(caps) = RE_BLOCK.captures(raw) else {
        return (FrontMatter::new(), raw);
    };
    let (Some(block), Some(body)) = (caps.get(1), caps.get(2)) else {
        return (FrontMatter::new(), raw);
    };

    (parse_block(block.as_str()), body.as_str())
}

fn parse_block(block: &str) -> FrontMatter {
    let lines: Vec<&str> = block
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    let mut meta = FrontMatter::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = RE_KEY.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let key = &caps[1];
        let rest = caps[2].trim();
        i += 1;

        let value = if rest.is_empty() {
            let mut items = Vec::new();
            while let Some(m) = lines.get(i).and_then(|l| RE_LIST_ITEM.find(l)) {
                items.push(strip_quotes(&lines[i][m.end()..]).to_string());
                i += 1;
            }
            MetaValue::List(items)
        } else if rest.starts_with('[') {
            parse_flow_sequence(rest)
        } else if rest == "true" {
            MetaValue::Bool(true)
        } else if rest == "false" {
            MetaValue::Bool(false)
        } else if RE_DATE.is_match(rest) {
            MetaValue::Date(rest.to_string())
        } else {
            MetaValue::String(strip_quotes(rest).to_string())
        };

        if meta.insert(key, value).is_some() {
            debug!("front matter key '{}' repeated; last value wins", key);
        }
    }

    meta
}

/// Decode `[a, 'b', "c"]` as a JSON array after turning single quotes into
/// double quotes. Falls back to the raw text.
fn parse_flow_sequence(rest: &str) -> MetaValue {
    let json = rest.replace('\'', "\"");
    match serde_json::from_str::<Vec<serde_json::Value>>(&json) {
        Ok(values) => MetaValue::List(
            values
                .into_iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        Err(e) => {
            debug!("flow sequence {:?} kept as raw text: {}", rest, e);
            MetaValue::Raw(rest.to_string())
        }
    }
}

/// Remove one leading and one trailing quote character, each independently.
fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix(['"', '\'']).unwrap_or(s);
    s.strip_suffix(['"', '\'']).unwrap_or(s)
}
