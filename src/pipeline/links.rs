//! Link and image extraction with nested-parenthesis support.
//!
//! `[text](url)` and `![alt](url)` cannot be matched with a regex alone
//! when the URL itself contains parentheses, as image CDNs commonly do:
//!
//! ```text
//! ![cover](https://cdn.example.com/filters:cover()/img.jpg)
//! ```
//!
//! A `\(([^)]*)\)` pattern would stop at the first inner `)`. Instead the
//! text is scanned once, left to right, and the target is read by
//! [`scan_balanced_url`] which tracks parenthesis depth.

/// Presentational attributes applied to every image.
pub const IMAGE_STYLE: &str = "max-width:100%;height:auto;border-radius:8px;margin:16px 0;";

/// Read a link target starting at byte `start`.
///
/// Every `(` raises the depth and every `)` at depth > 0 lowers it; both are
/// part of the URL. The first `)` at depth 0 ends the target and is not
/// included. Returns the URL and the byte index of that closing `)`, or
/// `s.len()` when the input ends first.
pub fn scan_balanced_url(s: &str, start: usize) -> (&str, usize) {
    let start = start.min(s.len());
    let mut depth = 0usize;

    for (offset, byte) in s.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' if depth == 0 => {
                let end = start + offset;
                return (&s[start..end], end);
            }
            b')' => depth -= 1,
            _ => {}
        }
    }

    (&s[start..], s.len())
}

/// Replace every `![alt](url)` with `<img>` and every `[text](url)` with `<a>`.
///
/// An opening bracket without a `]` immediately followed by `(` is copied
/// through as literal text.
pub fn replace_links(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len() + 64);
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'!' && bytes.get(i + 1) == Some(&b'[') {
            if let Some((alt, url, end)) = bracket_target(input, i + 2) {
                out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\" style=\"{}\">",
                    escape_attr(url),
                    escape_attr(alt),
                    IMAGE_STYLE
                ));
                i = end + 1;
                continue;
            }
        }

        // `[` right after `!` belongs to an image that did not match
        if bytes[i] == b'[' && (i == 0 || bytes[i - 1] != b'!') {
            if let Some((text, url, end)) = bracket_target(input, i + 1) {
                out.push_str(&format!("<a href=\"{}\">{}</a>", escape_attr(url), text));
                i = end + 1;
                continue;
            }
        }

        // Not a delimiter: copy one whole character
        match input[i..].chars().next() {
            Some(ch) => {
                out.push(ch);
                i += ch.len_utf8();
            }
            None => break,
        }
    }

    out
}

/// Find `label](target` from `label_start`: the first `]` after the label
/// start must be followed directly by `(`. Returns label, target and the
/// index of the closing `)` (or the input length when unterminated).
fn bracket_target(s: &str, label_start: usize) -> Option<(&str, &str, usize)> {
    let label_end = label_start + s.get(label_start..)?.find(']')?;
    if s.as_bytes().get(label_end + 1) != Some(&b'(') {
        return None;
    }
    let (url, end) = scan_balanced_url(s, label_end + 2);
    Some((&s[label_start..label_end], url, end))
}

fn escape_attr(value: &str) -> String {
    value.replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple() {
        let s = "(https://a.com) tail";
        assert_eq!(scan_balanced_url(s, 1), ("https://a.com", 14));
    }

    #[test]
    fn test_scan_nested_parens() {
        let s = "x(a(b)c(d(e))f)rest";
        let (url, end) = scan_balanced_url(s, 2);
        assert_eq!(url, "a(b)c(d(e))f");
        assert_eq!(&s[end..end + 1], ")");
        assert_eq!(&s[end + 1..], "rest");
    }

    #[test]
    fn test_scan_unterminated_reads_to_end() {
        let s = "url(with(open";
        assert_eq!(scan_balanced_url(s, 0), ("url(with(open", s.len()));
    }

    #[test]
    fn test_scan_start_past_end() {
        assert_eq!(scan_balanced_url("abc", 10), ("", 3));
    }

    #[test]
    fn test_link() {
        assert_eq!(
            replace_links("see [docs](https://docs.rs) now"),
            "see <a href=\"https://docs.rs\">docs</a> now"
        );
    }

    #[test]
    fn test_image_with_cdn_filters() {
        let out = replace_links("![alt](https://cdn.example.com/filters:cover()/img.jpg)");
        assert_eq!(
            out,
            format!(
                "<img src=\"https://cdn.example.com/filters:cover()/img.jpg\" alt=\"alt\" style=\"{IMAGE_STYLE}\">"
            )
        );
    }

    #[test]
    fn test_link_with_parens_in_url() {
        let out = replace_links("[wiki](https://en.wikipedia.org/wiki/Rust_(language)).");
        assert_eq!(
            out,
            "<a href=\"https://en.wikipedia.org/wiki/Rust_(language)\">wiki</a>."
        );
    }

    #[test]
    fn test_unterminated_link_does_not_panic() {
        let out = replace_links("[text](url");
        assert_eq!(out, "<a href=\"url\">text</a>");
    }

    #[test]
    fn test_bracket_without_target_is_literal() {
        assert_eq!(replace_links("[not a link] here"), "[not a link] here");
        assert_eq!(replace_links("[a] (b)"), "[a] (b)");
        assert_eq!(replace_links("unclosed [bracket"), "unclosed [bracket");
        assert_eq!(replace_links("![alt] only"), "![alt] only");
    }

    #[test]
    fn test_failed_image_does_not_become_link() {
        assert_eq!(replace_links("![x] [y](z)"), "![x] <a href=\"z\">y</a>");
    }

    #[test]
    fn test_multiple_and_multibyte() {
        let out = replace_links("café [a](1) — [b](2)");
        assert_eq!(out, "café <a href=\"1\">a</a> — <a href=\"2\">b</a>");
    }

    #[test]
    fn test_quotes_in_target_are_escaped() {
        let out = replace_links("[x](a\"b)");
        assert_eq!(out, "<a href=\"a&quot;b\">x</a>");
    }

    #[test]
    fn test_trailing_bang() {
        assert_eq!(replace_links("wow!"), "wow!");
        assert_eq!(replace_links("!["), "![");
    }
}
