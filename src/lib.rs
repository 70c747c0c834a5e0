// src/lib.rs
//
// chatmarkup — lightweight chat markup to styled message segments
//
// - Plain text: `text_to_segments` splits lines, keeping double spaces as
//   space + non-breaking space.
// - Markup: `markup_to_segments` auto-links bare http(s) URLs, wraps the text in
//   a root <html> element, scans it into tag events and folds those into the
//   fewest segments that keep every style boundary.
// - Recognized: <b> <i> <u> <a href> <br/>, named and numeric character
//   references. Other tags pass through as literal text.

pub mod builder;
pub mod entities;
pub mod error;
pub mod lines;
pub mod linkify;
pub mod render;
pub mod scanner;
pub mod segment;

pub use builder::{SegmentBuilder, ROOT_TAG};
pub use error::{Error, Result};
pub use lines::text_to_segments;
pub use linkify::fix_urls;
pub use scanner::{Attribute, EventSource, HtmlScanner, TagEvent};
pub use segment::{Segment, SegmentKind, Style};

/// Knobs for [`MarkupParser`].
#[derive(Clone, Debug)]
pub struct MarkupOptions {
    /// Wrap bare `http://` / `https://` tokens in anchors before scanning.
    pub autolink: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self { autolink: true }
    }
}

/// Markup pipeline over a pluggable event source.
#[derive(Clone, Debug, Default)]
pub struct MarkupParser<S = HtmlScanner> {
    source: S,
    options: MarkupOptions,
}

impl MarkupParser<HtmlScanner> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: EventSource> MarkupParser<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            options: MarkupOptions::default(),
        }
    }

    pub fn options(mut self, options: MarkupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn parse(&self, markup: &str) -> Vec<Segment> {
        let linked;
        let text = if self.options.autolink {
            linked = fix_urls(markup);
            linked.as_str()
        } else {
            markup
        };
        // Without a closing boundary a trailing reference can be lost by
        // scanners that wait for more input.
        let wrapped = format!("<{ROOT_TAG}>{text}</{ROOT_TAG}>");
        let events = self.source.scan(&wrapped);
        tracing::debug!(events = events.len(), "scanned markup");
        SegmentBuilder::build(events)
    }
}

/// Parse chat markup with the default scanner and auto-linking.
pub fn markup_to_segments(markup: &str) -> Vec<Segment> {
    MarkupParser::new().parse(markup)
}
