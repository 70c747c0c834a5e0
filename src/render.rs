// src/render.rs
//
// Output formats for the command-line tool.

use crate::error::Result;
use crate::segment::{Segment, SegmentKind};

/// `B I U L` flag columns, kind, then the escaped text; links add `-> target`.
///
/// ```text
/// B - - L link  "here" -> http://example.com/
/// ```
pub fn render_text(segments: &[Segment]) -> String {
    let mut out = String::new();
    for seg in segments {
        let flag = |on: bool, c: char| if on { c } else { '-' };
        out.push(flag(seg.is_bold, 'B'));
        out.push(' ');
        out.push(flag(seg.is_italic, 'I'));
        out.push(' ');
        out.push(flag(seg.is_underline, 'U'));
        out.push(' ');
        out.push(flag(seg.kind == SegmentKind::Link, 'L'));
        out.push(' ');
        out.push_str(match seg.kind {
            SegmentKind::Normal => "text ",
            SegmentKind::LineBreak => "break",
            SegmentKind::Link => "link ",
        });
        out.push(' ');
        out.push_str(&format!("{:?}", seg.text));
        if let Some(target) = &seg.link_target {
            out.push_str(" -> ");
            out.push_str(target);
        }
        out.push('\n');
    }
    out
}

/// Pretty-printed JSON array, newline terminated.
pub fn render_json(segments: &[Segment]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(segments)?;
    out.push('\n');
    Ok(out)
}
