// src/lines.rs
//
// Plain text -> Normal / LineBreak segments. No markup is interpreted here.

use crate::segment::Segment;

/// Replacement for two consecutive spaces: space + non-breaking space.
const SPACE_NBSP: &str = " \u{a0}";

/// Split plain text into line segments.
///
/// Every pair of consecutive spaces becomes a space followed by a
/// non-breaking space so the renderer keeps the gap. Each line except the
/// last is followed by a `LineBreak`; empty lines produce only the break.
pub fn text_to_segments(text: &str) -> Vec<Segment> {
    let text = text.replace("  ", SPACE_NBSP);
    let lines = split_lines(&text);
    let Some((last, rest)) = lines.split_last() else {
        return Vec::new();
    };

    let mut segments = Vec::with_capacity(lines.len() * 2);
    for line in rest {
        if !line.is_empty() {
            segments.push(Segment::plain(*line));
        }
        segments.push(Segment::line_break());
    }
    if !last.is_empty() {
        segments.push(Segment::plain(*last));
    }
    segments
}

#[inline]
fn is_line_terminator(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split on line terminators (`\r\n` counts once). A trailing terminator does
/// not start an extra empty line, and empty input has no lines at all.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_terminator(c) {
            continue;
        }
        lines.push(&text[start..i]);
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                end = j + 1;
            }
        }
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}
