// src/segment.rs
//
// Output records handed to the chat rendering layer.

use serde::Serialize;

/// What a segment represents to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Normal,
    LineBreak,
    Link,
}

/// Bold/italic/underline flags active for a piece of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// One styled unit of message text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
}

impl Segment {
    /// Unstyled `Normal` text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::default())
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            kind: SegmentKind::Normal,
            is_bold: style.bold,
            is_italic: style.italic,
            is_underline: style.underline,
            link_target: None,
        }
    }

    /// A hard line break. Its text is always a single `\n`.
    pub fn line_break() -> Self {
        Self {
            text: "\n".to_owned(),
            kind: SegmentKind::LineBreak,
            is_bold: false,
            is_italic: false,
            is_underline: false,
            link_target: None,
        }
    }

    pub fn link(text: impl Into<String>, target: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            kind: SegmentKind::Link,
            is_bold: style.bold,
            is_italic: style.italic,
            is_underline: style.underline,
            link_target: Some(target.into()),
        }
    }

    pub fn style(&self) -> Style {
        Style {
            bold: self.is_bold,
            italic: self.is_italic,
            underline: self.is_underline,
        }
    }

    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_break_is_a_single_newline() {
        let seg = Segment::line_break();
        assert_eq!(seg.kind, SegmentKind::LineBreak);
        assert_eq!(seg.text, "\n");
        assert!(seg.is_line_break());
        assert_eq!(seg.style(), Style::default());
    }

    #[test]
    fn link_carries_target_and_style() {
        let style = Style {
            bold: true,
            ..Style::default()
        };
        let seg = Segment::link("here", "http://example.com/", style);
        assert_eq!(seg.kind, SegmentKind::Link);
        assert_eq!(seg.link_target.as_deref(), Some("http://example.com/"));
        assert!(seg.is_bold);
        assert!(!seg.is_italic);
    }

    #[test]
    fn serializes_kind_in_snake_case_and_omits_missing_target() {
        let json = serde_json::to_string(&Segment::line_break()).unwrap();
        assert!(json.contains(r#""kind":"line_break""#));
        assert!(!json.contains("link_target"));
    }
}
