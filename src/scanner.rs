// src/scanner.rs
//
// Tag event source: a permissive single-pass scanner that turns a markup
// string into start/end/self-closing tag, entity and data events.
//
// - Tags:
//     • `<` + ASCII letter opens a start tag; it ends at the first `>` outside a quoted
//       attribute value. An unquoted `<` before that `>` makes the first `<` literal.
//     • A start tag whose source ends with `/>` is reported as start-end (self-closing).
//     • `</` + ASCII letter opens an end tag; it ends at the next `>`. Only the name is kept.
//     • Tag and attribute names are ASCII-lowercased; attribute values are unquoted and
//       have character references decoded.
// - Comments, declarations (`<!...>`) and processing instructions (`<?...>`) are dropped.
// - RAW-TEXT tags (script, style): content is data until the matching end tag. Without
//   one, the content is scanned as ordinary markup.
// - `&name` / `&#NN` / `&#xHH` are entity events; a trailing `;` is consumed.
// - Everything else is data. Any `<` or `&` that does not open a construct is literal.
//
// UTF-8 safe: every slice boundary sits on an ASCII structural byte.

use memchr::{memchr, memchr2, memmem};
use tracing::debug;

use crate::entities::{decode_text, scan_reference};

/// One `name[=value]` pair from a start tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// A structural event, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagEvent<'a> {
    StartTag {
        name: String,
        attrs: Vec<Attribute>,
        /// Exact source text of the tag, `<` through `>`.
        raw: &'a str,
    },
    StartEndTag {
        name: String,
        attrs: Vec<Attribute>,
        raw: &'a str,
    },
    EndTag {
        name: String,
    },
    /// Reference name without `&` or `;`, e.g. `amp` or `#x41`.
    Entity {
        name: &'a str,
    },
    Data(&'a str),
}

/// Anything that can turn markup into a sequence of tag events.
pub trait EventSource {
    fn scan<'a>(&self, markup: &'a str) -> Vec<TagEvent<'a>>;
}

/// Default event source.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlScanner;

impl EventSource for HtmlScanner {
    fn scan<'a>(&self, markup: &'a str) -> Vec<TagEvent<'a>> {
        scan(markup)
    }
}

/* =============================== Core sets =============================== */

fn is_raw_text(name: &str) -> bool {
    matches!(name, "script" | "style")
}

/* ============================ Utility predicates ========================= */

#[inline]
fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' || b == b'\x0c'
}

/// Bytes that end a tag name.
#[inline]
fn ends_tag_name(b: u8) -> bool {
    is_ws(b) || b == b'/' || b == b'>'
}

/// Bytes that end an attribute name.
#[inline]
fn ends_attr_name(b: u8) -> bool {
    ends_tag_name(b) || b == b'='
}

/* =============================== Tag parsing ============================= */

/// Find the '>' for a tag starting at `i` (s[i] == '<').
///
/// Quotes only count when they open an attribute value (after `=` and optional
/// whitespace); a stray `'` or `"` is an ordinary byte. An unquoted `<` means
/// this was never a tag.
fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    let n = s.len();
    i += 1;
    let mut quote: u8 = 0;
    let mut after_eq = false;
    while i < n {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if after_eq && (b == b'"' || b == b'\'') {
            quote = b;
            after_eq = false;
        } else if b == b'>' {
            return Some(i);
        } else if b == b'<' {
            return None;
        } else if b == b'=' {
            after_eq = true;
        } else if !is_ws(b) {
            after_eq = false;
        }
        i += 1;
    }
    None
}

/// Read a tag name starting at `i`; returns (lowercased name, index after it).
fn read_tag_name(tag: &str, mut i: usize) -> (String, usize) {
    let bytes = tag.as_bytes();
    let start = i;
    while i < bytes.len() && !ends_tag_name(bytes[i]) {
        i += 1;
    }
    (tag[start..i].to_ascii_lowercase(), i)
}

/// Attribute scanner over the part of a start tag after its name:
/// [name] ( '=' [value] )?, value quoted or unquoted.
fn parse_attributes(tag: &str, from: usize) -> Vec<Attribute> {
    let bytes = tag.as_bytes();
    // Stop before the closing '>'.
    let len = bytes.len().saturating_sub(1);
    let mut attrs = Vec::new();
    let mut i = from;

    while i < len {
        // skip whitespace and slashes
        while i < len && (is_ws(bytes[i]) || bytes[i] == b'/') {
            i += 1;
        }
        if i >= len {
            break;
        }

        // attribute name; a stray '=' is taken as the first name byte
        let name_start = i;
        i += 1;
        while i < len && !ends_attr_name(bytes[i]) {
            i += 1;
        }
        let name = tag[name_start..i].to_ascii_lowercase();

        // skip whitespace
        let mut j = i;
        while j < len && is_ws(bytes[j]) {
            j += 1;
        }

        // optional "= value"
        let mut value = None;
        if j < len && bytes[j] == b'=' {
            j += 1;
            while j < len && is_ws(bytes[j]) {
                j += 1;
            }
            if j < len && (bytes[j] == b'"' || bytes[j] == b'\'') {
                let q = bytes[j];
                let value_start = j + 1;
                let value_end = memchr(q, &bytes[value_start..len])
                    .map(|off| value_start + off)
                    .unwrap_or(len);
                value = Some(decode_text(&tag[value_start..value_end]).into_owned());
                j = (value_end + 1).min(len);
            } else {
                let value_start = j;
                while j < len && !is_ws(bytes[j]) {
                    j += 1;
                }
                value = Some(decode_text(&tag[value_start..j]).into_owned());
            }
            i = j;
        }

        attrs.push(Attribute { name, value });
    }
    attrs
}

/* ============================== Scanner ================================= */

struct Scanner<'a> {
    src: &'a str,
    events: Vec<TagEvent<'a>>,
    /// Start of literal text not yet reported.
    text_start: usize,
}

impl<'a> Scanner<'a> {
    fn flush_text(&mut self, upto: usize) {
        if self.text_start < upto {
            self.events.push(TagEvent::Data(&self.src[self.text_start..upto]));
        }
    }

    fn push(&mut self, at: usize, next: usize, event: TagEvent<'a>) {
        self.flush_text(at);
        self.events.push(event);
        self.text_start = next;
    }

    /// Skip over a construct that produces no event.
    fn skip(&mut self, at: usize, next: usize) {
        self.flush_text(at);
        self.text_start = next;
    }

    /// Report pending RAW-TEXT content up to `end` (its matching `</name`) as data.
    fn raw_text(&mut self, end: usize) {
        self.flush_text(end);
        self.text_start = end;
    }
}

/// Index of the `</name` that closes a RAW-TEXT element whose content starts at `i`.
fn find_raw_text_end(bytes: &[u8], i: usize, name: &str) -> Option<usize> {
    let n = bytes.len();
    let mut j = i;
    while let Some(off) = memchr(b'<', &bytes[j..]) {
        let pos = j + off;
        let after = pos + 2 + name.len();
        if bytes[pos + 1..].starts_with(b"/")
            && after <= n
            && bytes[pos + 2..after].eq_ignore_ascii_case(name.as_bytes())
            && (after == n || ends_tag_name(bytes[after]))
        {
            return Some(pos);
        }
        j = pos + 1;
    }
    None
}

fn scan(src: &str) -> Vec<TagEvent<'_>> {
    let bytes = src.as_bytes();
    let n = bytes.len();
    let mut sc = Scanner {
        src,
        events: Vec::new(),
        text_start: 0,
    };
    let mut i = 0usize;

    while i < n {
        let Some(off) = memchr2(b'<', b'&', &bytes[i..]) else {
            break;
        };
        let pos = i + off;

        // Character references
        if bytes[pos] == b'&' {
            match scan_reference(bytes, pos) {
                Some((name_end, next)) => {
                    let name = &src[pos + 1..name_end];
                    sc.push(pos, next, TagEvent::Entity { name });
                    i = next;
                }
                None => i = pos + 1,
            }
            continue;
        }

        let rest = &bytes[pos..];

        // Comments
        if rest.starts_with(b"<!--") {
            match memmem::find(&rest[4..], b"-->") {
                Some(end) => {
                    i = pos + 4 + end + 3;
                    sc.skip(pos, i);
                }
                None => {
                    debug!(offset = pos, "unterminated comment kept as text");
                    i = pos + 1;
                }
            }
            continue;
        }

        // Declarations and processing instructions
        if rest.starts_with(b"<!") || rest.starts_with(b"<?") {
            match memchr2(b'>', b'<', &rest[1..]).map(|e| e + 1) {
                Some(end) if rest[end] == b'>' => {
                    i = pos + end + 1;
                    sc.skip(pos, i);
                }
                _ => i = pos + 1,
            }
            continue;
        }

        // End tags
        if rest.starts_with(b"</") {
            if rest.get(2) == Some(&b'>') {
                i = pos + 3;
                sc.skip(pos, i);
                continue;
            }
            if !rest.get(2).is_some_and(|b| b.is_ascii_alphabetic()) {
                i = pos + 1;
                continue;
            }
            let Some(end) = memchr(b'>', rest).map(|e| pos + e) else {
                debug!(offset = pos, "unterminated end tag kept as text");
                i = pos + 1;
                continue;
            };
            let (name, _) = read_tag_name(&src[pos..=end], 2);
            i = end + 1;
            sc.push(pos, i, TagEvent::EndTag { name });
            continue;
        }

        // Start tags
        if rest.get(1).is_some_and(|b| b.is_ascii_alphabetic()) {
            let Some(end) = find_tag_end(bytes, pos) else {
                debug!(offset = pos, "unterminated start tag kept as text");
                i = pos + 1;
                continue;
            };
            let raw = &src[pos..=end];
            let (name, after_name) = read_tag_name(raw, 1);
            let attrs = parse_attributes(raw, after_name);
            i = end + 1;

            if raw.ends_with("/>") {
                sc.push(pos, i, TagEvent::StartEndTag { name, attrs, raw });
                continue;
            }

            let raw_text = is_raw_text(&name).then(|| name.clone());
            sc.push(pos, i, TagEvent::StartTag { name, attrs, raw });
            if let Some(element) = raw_text {
                match find_raw_text_end(bytes, i, &element) {
                    Some(close) => {
                        sc.raw_text(close);
                        i = close;
                    }
                    // Without its end tag the content is ordinary markup.
                    None => debug!(element = %element, "raw text element never closed"),
                }
            }
            continue;
        }

        // literal '<'
        i = pos + 1;
    }

    sc.flush_text(n);
    sc.events
}
