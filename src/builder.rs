// src/builder.rs
//
// Segment state machine: folds tag events into the minimal list of styled
// segments.
//
// - b / i / u are independent on/off switches, not a counted stack.
// - <a href> starts link capture: data and entities go to a buffer until </a>,
//   which emits one atomic Link segment.
// - <br/> emits a LineBreak.
// - The first <html> start tag is the injected root wrapper and vanishes; later
//   ones are literal. Every </html> vanishes.
// - Any other tag is kept as its source text.
// - Text extends the last segment when its style snapshot matches and the last
//   segment is not a line break; otherwise it opens a new segment.

use tracing::trace;

use crate::entities::decode_reference;
use crate::scanner::{Attribute, TagEvent};
use crate::segment::{Segment, Style};

/// Element name used to wrap markup before scanning.
pub const ROOT_TAG: &str = "html";

/// Style in effect for a piece of text at the moment it is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Snapshot<'s> {
    style: Style,
    link_target: Option<&'s str>,
}

impl Snapshot<'_> {
    /// Whether text with this snapshot may be appended onto `last`.
    fn continues(&self, last: &Segment) -> bool {
        !last.is_line_break()
            && last.style() == self.style
            && last.link_target.as_deref() == self.link_target
    }
}

#[derive(Debug)]
struct LinkCapture {
    target: String,
    text: String,
}

/// Where a text contribution came from; only used for tracing.
#[derive(Clone, Copy, Debug)]
enum Origin {
    Data,
    Entity,
    StartTag,
    StartEndTag,
    EndTag,
}

/// Event-driven segment builder. One instance per parse.
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    style: Style,
    link: Option<LinkCapture>,
    root_tag_seen: bool,
    segments: Vec<Segment>,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a whole event sequence.
    pub fn build<'a, I>(events: I) -> Vec<Segment>
    where
        I: IntoIterator<Item = TagEvent<'a>>,
    {
        let mut builder = Self::new();
        for event in events {
            builder.feed(event);
        }
        builder.finish()
    }

    pub fn feed(&mut self, event: TagEvent<'_>) {
        match event {
            TagEvent::StartTag { name, attrs, raw } => self.start_tag(&name, &attrs, raw),
            TagEvent::StartEndTag { name, raw, .. } => {
                if name == "br" {
                    trace!("line break");
                    self.segments.push(Segment::line_break());
                } else {
                    self.literal(raw, Origin::StartEndTag);
                }
            }
            TagEvent::EndTag { name } => self.end_tag(&name),
            TagEvent::Entity { name } => {
                if let Some(link) = self.link.as_mut() {
                    trace!(entity = name, "link text");
                    link.text.push('&');
                    link.text.push_str(name);
                } else {
                    let decoded = decode_reference(name);
                    self.extend(&decoded, Origin::Entity);
                }
            }
            TagEvent::Data(text) => {
                if let Some(link) = self.link.as_mut() {
                    trace!(data = text, "link text");
                    link.text.push_str(text);
                } else {
                    self.extend(text, Origin::Data);
                }
            }
        }
    }

    /// Segments built so far. A link still open at this point is dropped.
    pub fn finish(self) -> Vec<Segment> {
        if let Some(link) = &self.link {
            trace!(href = %link.target, "unclosed link discarded");
        }
        self.segments
    }

    fn start_tag(&mut self, name: &str, attrs: &[Attribute], raw: &str) {
        match name {
            "b" => self.style.bold = true,
            "i" => self.style.italic = true,
            "u" => self.style.underline = true,
            "a" => {
                let href = attrs
                    .iter()
                    .find(|a| a.name == "href")
                    .and_then(|a| a.value.as_deref());
                if let Some(target) = href {
                    self.link = Some(LinkCapture {
                        target: target.to_owned(),
                        text: String::new(),
                    });
                } else if let Some(link) = self.link.as_mut() {
                    // Nested anchor without href: restart the text, keep the target.
                    link.text.clear();
                }
            }
            ROOT_TAG if !self.root_tag_seen => self.root_tag_seen = true,
            _ => self.literal(raw, Origin::StartTag),
        }
    }

    fn end_tag(&mut self, name: &str) {
        match name {
            "b" => self.style.bold = false,
            "i" => self.style.italic = false,
            "u" => self.style.underline = false,
            "a" => {
                if let Some(LinkCapture { target, text }) = self.link.take() {
                    trace!(href = %target, %text, "link");
                    self.segments.push(Segment::link(text, target, self.style));
                }
            }
            // Includes any literal </html> in the input; only the wrapper is expected.
            ROOT_TAG => {}
            _ => {
                let literal = format!("</{name}>");
                self.literal(&literal, Origin::EndTag);
            }
        }
    }

    /// Source text of a tag the builder does not interpret.
    fn literal(&mut self, raw: &str, origin: Origin) {
        match self.link.as_mut() {
            Some(link) => {
                trace!(?origin, raw, "link text");
                link.text.push_str(raw);
            }
            None => self.extend(raw, origin),
        }
    }

    fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            style: self.style,
            link_target: self.link.as_ref().map(|l| l.target.as_str()),
        }
    }

    /// Merge step: append onto the last segment or start a new one.
    fn extend(&mut self, text: &str, origin: Origin) {
        let snapshot = self.snapshot();
        let merge = self
            .segments
            .last()
            .is_some_and(|last| snapshot.continues(last));
        let style = snapshot.style;

        if merge {
            if let Some(last) = self.segments.last_mut() {
                trace!(?origin, text, "append");
                last.text.push_str(text);
                return;
            }
        }
        trace!(?origin, text, "new segment");
        self.segments.push(Segment::styled(text, style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{EventSource, HtmlScanner};
    use crate::segment::SegmentKind;

    fn build(markup: &str) -> Vec<Segment> {
        let wrapped = format!("<{ROOT_TAG}>{markup}</{ROOT_TAG}>");
        SegmentBuilder::build(HtmlScanner.scan(&wrapped))
    }

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(build("hello world"), vec![Segment::plain("hello world")]);
    }

    #[test]
    fn style_runs_split_exactly_at_tags() {
        let segs = build("A&<b>B</b>&C&D&E");
        assert_eq!(texts(&segs), vec!["A&", "B", "&C&D&E"]);
        assert!(!segs[0].is_bold);
        assert!(segs[1].is_bold);
        assert!(!segs[2].is_bold);
    }

    #[test]
    fn entities_decode_and_merge() {
        let segs = build("&lt;html-encoded test&gt;");
        assert_eq!(texts(&segs), vec!["<html-encoded test>"]);
        assert_eq!(texts(&build("A&amp;B&amp;C")), vec!["A&B&C"]);
    }

    #[test]
    fn flags_are_switches_not_a_stack() {
        let segs = build("<b>x<b>y</b>z</b>");
        assert_eq!(texts(&segs), vec!["xy", "z"]);
        assert!(segs[0].is_bold);
        assert!(!segs[1].is_bold);
    }

    #[test]
    fn combined_styles() {
        let segs = build("<b><i>bi</i></b><u>u</u>");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].style(), Style { bold: true, italic: true, underline: false });
        assert_eq!(segs[1].style(), Style { bold: false, italic: false, underline: true });
    }

    #[test]
    fn link_is_atomic_and_keeps_entities_literal() {
        let segs = build(r#"go <b><a href="http://x/?a&amp;b">t&amp;<i>u</i></a></b>!"#);
        assert_eq!(texts(&segs), vec!["go ", "t&ampu", "!"]);
        let link = &segs[1];
        assert_eq!(link.kind, SegmentKind::Link);
        assert_eq!(link.link_target.as_deref(), Some("http://x/?a&b"));
        // Style at the closing tag applies.
        assert!(link.is_bold);
        assert!(!link.is_italic);
    }

    #[test]
    fn text_after_link_never_merges_into_it() {
        let segs = build(r#"<a href="u">l</a>l"#);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].kind, SegmentKind::Normal);
        assert_eq!(segs[1].link_target, None);
    }

    #[test]
    fn adjacent_links_stay_separate() {
        let segs = build(r#"<a href="1">a</a><a href="1">a</a>"#);
        assert_eq!(segs.len(), 2);
    }

    #[test]
    fn unknown_tags_inside_links_join_link_text() {
        let segs = build(r#"<a href="u"><img src="p"/>x<q>y</q></a>"#);
        assert_eq!(texts(&segs), vec![r#"<img src="p"/>x<q>y</q>"#]);
        assert_eq!(segs[0].kind, SegmentKind::Link);
    }

    #[test]
    fn nested_anchor_without_href_restarts_text() {
        let segs = build(r#"<a href="u">lost<a name="n">kept</a>"#);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "kept");
        assert_eq!(segs[0].link_target.as_deref(), Some("u"));
    }

    #[test]
    fn stray_link_close_and_hrefless_anchor_emit_nothing() {
        assert_eq!(texts(&build("a</a>b")), vec!["ab"]);
        assert_eq!(texts(&build(r#"<a name="n">a</a>b"#)), vec!["ab"]);
    }

    #[test]
    fn unclosed_link_is_dropped() {
        assert_eq!(texts(&build(r#"x <a href="u">y"#)), vec!["x "]);
    }

    #[test]
    fn line_breaks_split_runs() {
        let segs = build("a<br/>b<br />c");
        assert_eq!(texts(&segs), vec!["a", "\n", "b", "\n", "c"]);
        assert_eq!(segs[1].kind, SegmentKind::LineBreak);
        assert_eq!(build("<br/><br/>").len(), 2);
    }

    #[test]
    fn line_break_inside_bold_text() {
        let segs = build("<b>a<br/>b</b>");
        assert_eq!(texts(&segs), vec!["a", "\n", "b"]);
        assert!(!segs[1].is_bold);
        assert!(segs[2].is_bold);
    }

    #[test]
    fn unknown_tags_are_literal_and_merge() {
        assert_eq!(texts(&build("abc <some@email.com>")), vec!["abc <some@email.com>"]);
        assert_eq!(texts(&build("<in a=abc fake tag>")), vec!["<in a=abc fake tag>"]);
        assert_eq!(texts(&build("<br>x")), vec!["<br>x"]);
        assert_eq!(texts(&build("<p>x</p>")), vec!["<p>x</p>"]);
    }

    #[test]
    fn apostrophe_in_bogus_tag_keeps_later_styles() {
        let segs = build("see <x don't> it's <b>y</b>");
        assert_eq!(texts(&segs), vec!["see <x don't> it's ", "y"]);
        assert!(!segs[0].is_bold);
        assert!(segs[1].is_bold);
    }

    #[test]
    fn unclosed_script_shows_its_text_without_the_wrapper() {
        assert_eq!(texts(&build("<script>x")), vec!["<script>x"]);
        assert_eq!(texts(&build("hi <style>b")), vec!["hi <style>b"]);
    }

    #[test]
    fn end_tag_literal_drops_attributes() {
        assert_eq!(texts(&build(r#"</in "a"="xyz" fake tag>"#)), vec!["</in>"]);
    }

    #[test]
    fn root_wrapper_is_invisible_and_later_roots_are_literal() {
        let segs = build("<html><html><b></html></b><b>ABC</b>");
        assert_eq!(texts(&segs), vec!["<html><html>", "ABC"]);
        assert!(segs[1].is_bold);
    }

    #[test]
    fn without_wrapper_the_first_root_tag_is_consumed() {
        let segs = SegmentBuilder::build(HtmlScanner.scan("<html>x"));
        assert_eq!(texts(&segs), vec!["x"]);
    }

    #[test]
    fn empty_input() {
        assert!(build("").is_empty());
    }

    #[test]
    fn feed_one_event_at_a_time() {
        let mut builder = SegmentBuilder::new();
        builder.feed(TagEvent::Data("a"));
        builder.feed(TagEvent::StartTag {
            name: "u".into(),
            attrs: Vec::new(),
            raw: "<u>",
        });
        builder.feed(TagEvent::Entity { name: "gt" });
        builder.feed(TagEvent::EndTag { name: "u".into() });
        builder.feed(TagEvent::Entity { name: "bogus" });
        let segs = builder.finish();
        assert_eq!(texts(&segs), vec!["a", ">", "&bogus"]);
        assert!(segs[1].is_underline);
    }
}
