use chatmarkup::{fix_urls, markup_to_segments, text_to_segments, Segment, SegmentKind};

/// (input, auto-linked form, expected segment count)
const CASES: &[(&str, &str, usize)] = &[
    ("hello world", "hello world", 1),
    (
        "http://www.google.com/",
        r#"<a href="http://www.google.com/">http://www.google.com/</a>"#,
        1,
    ),
    (
        "https://www.google.com/?a=b&c=d&e=f",
        r#"<a href="https://www.google.com/?a=b&c=d&e=f">https://www.google.com/?a=b&c=d&e=f</a>"#,
        1,
    ),
    ("&lt;html-encoded test&gt;", "&lt;html-encoded test&gt;", 1),
    ("A&B&C&D&E", "A&B&C&D&E", 1),
    ("A&<b>B</b>&C&D&E", "A&<b>B</b>&C&D&E", 3),
    ("A&amp;B&amp;C&amp;D&amp;E", "A&amp;B&amp;C&amp;D&amp;E", 1),
    ("C&L", "C&L", 1),
    ("<in a fake tag>", "<in a fake tag>", 1),
    (
        r#"<img src="http://i.imgur.com/E3gxs.gif"/>"#,
        r#"<img src="http://i.imgur.com/E3gxs.gif"/>"#,
        1,
    ),
    (
        r#"<img src="http://i.imgur.com/E3gxs.gif" />"#,
        r#"<img src="http://i.imgur.com/E3gxs.gif" />"#,
        1,
    ),
    (
        r#"<img src="http://i.imgur.com/E3gxs.gif" abc />"#,
        r#"<img src="http://i.imgur.com/E3gxs.gif" abc />"#,
        1,
    ),
    (r#"<in "a"="abc" fake tag>"#, r#"<in "a"="abc" fake tag>"#, 1),
    ("<in a=abc fake tag>", "<in a=abc fake tag>", 1),
    ("abc <some@email.com>", "abc <some@email.com>", 1),
    (r#"</in "a"="xyz" fake tag>"#, r#"</in "a"="xyz" fake tag>"#, 1),
    (
        "<html><html><b></html></b><b>ABC</b>",
        "<html><html><b></html></b><b>ABC</b>",
        2,
    ),
    (
        "go here: http://www.google.com/",
        r#"go here: <a href="http://www.google.com/">http://www.google.com/</a>"#,
        2,
    ),
    (
        r#"go here: <a href="http://google.com/">http://www.google.com/</a>"#,
        r#"go here: <a href="http://google.com/">http://www.google.com/</a>"#,
        2,
    ),
    (
        "go here: http://www.google.com/ abc",
        r#"go here: <a href="http://www.google.com/">http://www.google.com/</a> abc"#,
        3,
    ),
    (
        "http://i.imgur.com/E3gxs.gif",
        r#"<a href="http://i.imgur.com/E3gxs.gif">http://i.imgur.com/E3gxs.gif</a>"#,
        1,
    ),
];

#[test]
fn fix_urls_matches_corpus() {
    for (input, linked, _) in CASES {
        assert_eq!(fix_urls(input), *linked, "input: {input}");
    }
}

#[test]
fn segment_counts_match_corpus() {
    for (input, _, count) in CASES {
        let segments = markup_to_segments(input);
        assert_eq!(segments.len(), *count, "input: {input}\n{segments:#?}");
    }
}

#[test]
fn link_segment_uses_anchor_text_not_href() {
    let segs = markup_to_segments(r#"go here: <a href="http://google.com/">http://www.google.com/</a>"#);
    assert_eq!(segs[0].kind, SegmentKind::Normal);
    assert_eq!(segs[0].text, "go here: ");
    assert_eq!(segs[1].kind, SegmentKind::Link);
    assert_eq!(segs[1].text, "http://www.google.com/");
    assert_eq!(segs[1].link_target.as_deref(), Some("http://google.com/"));
}

#[test]
fn link_text_keeps_query_ampersands() {
    let url = "https://www.google.com/?a=b&c=d&e=f";
    let segs = markup_to_segments(url);
    assert_eq!(segs[0].kind, SegmentKind::Link);
    assert_eq!(segs[0].text, url);
    assert_eq!(segs[0].link_target.as_deref(), Some(url));
}

#[test]
fn decoded_entities_outside_links() {
    assert_eq!(markup_to_segments("&lt;html-encoded test&gt;")[0].text, "<html-encoded test>");
    assert_eq!(markup_to_segments("A&amp;B&amp;C&amp;D&amp;E")[0].text, "A&B&C&D&E");
    assert_eq!(markup_to_segments("C&L")[0].text, "C&L");
}

#[test]
fn root_wrapper_never_shows() {
    for input in [
        "plain",
        "<b>x</b>",
        "a &amp; b",
        "x<br/>y",
        "<u>&E",
        "<script>x",
        "hi <style>b",
        "x <b",
        "<!x",
    ] {
        for seg in markup_to_segments(input) {
            assert!(!seg.text.contains("html"), "input: {input} -> {seg:?}");
        }
    }
}

#[test]
fn trailing_reference_is_kept() {
    let segs = markup_to_segments("<u>&E");
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].text, "&E");
    assert!(segs[0].is_underline);
}

#[test]
fn one_segment_per_style_run() {
    let segs = markup_to_segments("a<b>b</b><b>b</b><i>c</i>d<br/>d<br/><u>e</u>");
    let texts: Vec<&str> = segs.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "bb", "c", "d", "\n", "d", "\n", "e"]);
}

#[test]
fn line_splitter_double_space() {
    let segs = text_to_segments("a  b");
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].kind, SegmentKind::Normal);
    assert_eq!(segs[0].text, "a \u{a0}b");
}

const FRAGMENTS: &[&str] = &[
    "<b>",
    "</b>",
    "<i>",
    "</i>",
    "<br/>",
    r#"<a href="u">"#,
    "</a>",
    "&amp;",
    "&x",
    "<script>",
    "</script>",
    "<!--",
    "<",
    "x",
    "'",
];

/// Every concatenation of up to `max` fragments.
fn fragment_inputs(max: usize) -> Vec<String> {
    let mut all = Vec::new();
    let mut layer = vec![String::new()];
    for _ in 0..max {
        let mut next = Vec::with_capacity(layer.len() * FRAGMENTS.len());
        for prefix in &layer {
            for frag in FRAGMENTS {
                next.push(format!("{prefix}{frag}"));
            }
        }
        all.extend(next.iter().cloned());
        layer = next;
    }
    all
}

fn mergeable(a: &Segment, b: &Segment) -> bool {
    a.kind == SegmentKind::Normal
        && b.kind == SegmentKind::Normal
        && a.style() == b.style()
        && a.link_target == b.link_target
}

#[test]
fn generated_inputs_keep_segments_minimal_and_wrapper_hidden() {
    let inputs = fragment_inputs(4);
    assert_eq!(inputs.len(), 15 + 15 * 15 + 15 * 15 * 15 + 15 * 15 * 15 * 15);
    for input in &inputs {
        let segs = markup_to_segments(input);
        for seg in &segs {
            assert!(!seg.text.contains("html"), "input: {input} -> {segs:#?}");
            assert!(
                seg.kind != SegmentKind::Normal || !seg.text.is_empty(),
                "empty segment for input: {input} -> {segs:#?}"
            );
            assert!(
                seg.kind == SegmentKind::Link || seg.link_target.is_none(),
                "target outside a link for input: {input} -> {segs:#?}"
            );
        }
        for pair in segs.windows(2) {
            assert!(
                !mergeable(&pair[0], &pair[1]),
                "unmerged run for input: {input} -> {segs:#?}"
            );
        }
    }
}
