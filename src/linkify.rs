// src/linkify.rs
//
// Bare URL auto-linking. Purely lexical: whitespace-delimited tokens that
// start with http:// or https:// are wrapped in an anchor. Tokens are
// rejoined with a single space.
//
// - Separators are Unicode whitespace plus the information separators
//   U+001C..U+001F.

const URL_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Wrap bare URLs in `<a href="...">...</a>`.
///
/// The token is used verbatim for both the target and the visible text.
/// Runs of whitespace collapse to one space and leading/trailing whitespace
/// is dropped.
pub fn fix_urls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let tokens = text.split(is_separator).filter(|t| !t.is_empty());
    for (n, token) in tokens.enumerate() {
        if n > 0 {
            out.push(' ');
        }
        if is_bare_url(token) {
            out.push_str("<a href=\"");
            out.push_str(token);
            out.push_str("\">");
            out.push_str(token);
            out.push_str("</a>");
        } else {
            out.push_str(token);
        }
    }
    out
}

#[inline]
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

#[inline]
fn is_bare_url(token: &str) -> bool {
    URL_PREFIXES.iter().any(|p| token.starts_with(p))
}
