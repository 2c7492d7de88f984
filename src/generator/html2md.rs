//! Review text to Markdown.
//!
//! Reviews carry a small subset of HTML. Rather than parsing a DOM, the text
//! goes through a fixed list of regex substitutions, applied strictly in
//! order. Later rules see the output of earlier ones, so the order in
//! [`RULES`] is part of the behaviour:
//!
//! 1. character references are decoded first, so `&lt;b&gt;` ends up as a
//!    literal `<b>` that the tag rules then treat like any other tag
//! 2. headings are rewritten before the catch-all strip, which would
//!    otherwise eat them
//! 3. trimming runs last; runs of blank lines inside the text are kept
//!
//! Headings are shifted down one level: `<h1>` becomes `##`, `<h6>` becomes
//! `#######`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::entities;

static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</p>").expect("hardcoded line break regex"));

static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<p>").expect("hardcoded paragraph regex"));

/// One pattern per level, h6 first.
static HEADING_RES: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    (1..=6)
        .rev()
        .map(|level| {
            let re = Regex::new(&format!(r"(?i)<h{level}>(.*?)</h{level}>"))
                .expect("hardcoded heading regex");
            let replacement = format!("{} ${{1}}", "#".repeat(level + 1));
            (re, replacement)
        })
        .collect()
});

static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:b|strong)>").expect("hardcoded bold regex"));

static ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:i|em)>").expect("hardcoded italic regex"));

static UNDERLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?u>").expect("hardcoded underline regex"));

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<a href="(.*?)">(.*?)</a>"#).expect("hardcoded link regex")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("hardcoded tag regex"));

/// A single substitution step of the conversion.
pub struct Rule {
    pub name: &'static str,
    pub description: &'static str,
    pub apply: fn(&str) -> String,
}

/// All rules, applied in order by [`convert`].
pub static RULES: &[Rule] = &[
    Rule {
        name: "entities",
        description: "Decode HTML character references",
        apply: unescape_entities,
    },
    Rule {
        name: "line_breaks",
        description: "Replace <br> and </p> with a paragraph break",
        apply: line_breaks,
    },
    Rule {
        name: "paragraph_opens",
        description: "Replace bare <p> with a paragraph break",
        apply: paragraph_opens,
    },
    Rule {
        name: "headings",
        description: "Rewrite <h1>..<h6> as ## .. ####### headings",
        apply: headings,
    },
    Rule {
        name: "bold",
        description: "Replace <b>/<strong> with **",
        apply: bold,
    },
    Rule {
        name: "italics",
        description: "Replace <i>/<em> with *",
        apply: italics,
    },
    Rule {
        name: "underline",
        description: "Replace <u> with _",
        apply: underline,
    },
    Rule {
        name: "links",
        description: "Rewrite <a href=\"URL\">TEXT</a> as [TEXT](URL)",
        apply: links,
    },
    Rule {
        name: "strip_tags",
        description: "Remove every remaining tag",
        apply: strip_tags,
    },
    Rule {
        name: "trim",
        description: "Trim surrounding whitespace",
        apply: trim,
    },
];

/// Convert review HTML to Markdown.
///
/// Total over all inputs; anything unrecognised is either passed through or,
/// if it looks like a tag, dropped. An absent review should be passed as `""`.
pub fn convert(raw_html: &str) -> String {
    let mut text = raw_html.to_string();
    for rule in RULES {
        let next = (rule.apply)(&text);
        if next != text {
            tracing::trace!(rule = rule.name, "Conversion rule applied");
        }
        text = next;
    }
    text
}

pub fn unescape_entities(text: &str) -> String {
    entities::decode(text).into_owned()
}

pub fn line_breaks(text: &str) -> String {
    LINE_BREAK_RE.replace_all(text, "\n\n").into_owned()
}

pub fn paragraph_opens(text: &str) -> String {
    PARAGRAPH_RE.replace_all(text, "\n\n").into_owned()
}

pub fn headings(text: &str) -> String {
    let mut text = text.to_string();
    for (re, replacement) in HEADING_RES.iter() {
        text = re.replace_all(&text, replacement.as_str()).into_owned();
    }
    text
}

pub fn bold(text: &str) -> String {
    BOLD_RE.replace_all(text, "**").into_owned()
}

pub fn italics(text: &str) -> String {
    ITALIC_RE.replace_all(text, "*").into_owned()
}

pub fn underline(text: &str) -> String {
    UNDERLINE_RE.replace_all(text, "_").into_owned()
}

/// The URL is copied verbatim, without unescaping or validation.
pub fn links(text: &str) -> String {
    LINK_RE.replace_all(text, "[${2}](${1})").into_owned()
}

pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Also strips the U+001C..U+001F separators, which `str::trim` keeps.
pub fn trim(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order() {
        let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "entities",
                "line_breaks",
                "paragraph_opens",
                "headings",
                "bold",
                "italics",
                "underline",
                "links",
                "strip_tags",
                "trim",
            ]
        );
    }

    // ============ Individual rules ============

    #[test]
    fn test_line_breaks() {
        assert_eq!(line_breaks("a<br>b<BR/>c<br  />d</P>"), "a\n\nb\n\nc\n\nd\n\n");
        assert_eq!(line_breaks("<brx>"), "<brx>");
    }

    #[test]
    fn test_paragraph_opens() {
        assert_eq!(paragraph_opens("<p>a<P>b"), "\n\na\n\nb");
        assert_eq!(paragraph_opens("<p class=\"x\">a"), "<p class=\"x\">a");
    }

    #[test]
    fn test_headings_shift_one_level() {
        assert_eq!(headings("<h1>One</h1>"), "## One");
        assert_eq!(headings("<H3>Three</h3>"), "#### Three");
        assert_eq!(headings("<h6>Six</h6>"), "####### Six");
    }

    #[test]
    fn test_headings_non_greedy() {
        assert_eq!(headings("<h2>a</h2> and <h2>b</h2>"), "### a and ### b");
    }

    #[test]
    fn test_headings_do_not_span_lines() {
        assert_eq!(headings("<h2>a\nb</h2>"), "<h2>a\nb</h2>");
    }

    #[test]
    fn test_headings_mismatched_levels_untouched() {
        assert_eq!(headings("<h1>x</h2>"), "<h1>x</h2>");
    }

    #[test]
    fn test_heading_text_with_dollar_is_literal() {
        assert_eq!(headings("<h1>$5 book</h1>"), "## $5 book");
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold("<b>a</b> <STRONG>b</strong>"), "**a** **b**");
        assert_eq!(bold("<br>"), "<br>");
    }

    #[test]
    fn test_italics() {
        assert_eq!(italics("<i>a</I> <em>b</em>"), "*a* *b*");
        assert_eq!(italics("<img>"), "<img>");
    }

    #[test]
    fn test_underline() {
        assert_eq!(underline("<u>a</U>"), "_a_");
        assert_eq!(underline("<ul>"), "<ul>");
    }

    #[test]
    fn test_links() {
        assert_eq!(
            links(r#"see <A HREF="https://e.com/?a=1&b=2">here</a>."#),
            "see [here](https://e.com/?a=1&b=2)."
        );
    }

    #[test]
    fn test_links_other_forms_not_recognised() {
        let single = "<a href='x'>t</a>";
        assert_eq!(links(single), single);
        let extra = r#"<a class="c" href="x">t</a>"#;
        assert_eq!(links(extra), extra);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<div class='x'>text</div><hr/>"), "text");
        assert_eq!(strip_tags("a < b"), "a < b");
        assert_eq!(strip_tags("<>"), "<>");
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim("\n\n a \n\n"), "a");
        assert_eq!(trim("\u{1c}x\u{1f}"), "x");
        assert_eq!(trim("\u{a0}x\u{3000}"), "x");
    }

    // ============ End to end ============

    #[test]
    fn empty_input() {
        assert_eq!(convert(""), "");
    }

    #[test]
    fn bold_tag() {
        assert_eq!(convert("<b>hi</b>"), "**hi**");
    }

    #[test]
    fn heading_levels() {
        assert_eq!(convert("<h1>Title</h1>"), "## Title");
        assert_eq!(convert("<h6>Deep</h6>"), "####### Deep");
    }

    #[test]
    fn link() {
        assert_eq!(
            convert(r#"<a href="http://x.com">link</a>"#),
            "[link](http://x.com)"
        );
    }

    #[test]
    fn line_break() {
        assert_eq!(convert("Line1<br>Line2"), "Line1\n\nLine2");
    }

    #[test]
    fn paragraph() {
        assert_eq!(convert("<p>Para</p>"), "Para");
    }

    #[test]
    fn unknown_tag_stripped() {
        assert_eq!(convert("<div class='x'>text</div>"), "text");
    }

    #[test]
    fn entities_decoded() {
        assert_eq!(convert("&amp;&lt;&gt;"), "&<>");
    }

    #[test]
    fn encoded_tags_are_processed_after_decoding() {
        assert_eq!(convert("&lt;b&gt;loud&lt;/b&gt;"), "**loud**");
    }

    #[test]
    fn legacy_entities_without_semicolon() {
        assert_eq!(convert("Fish &amp chips"), "Fish & chips");
        assert_eq!(convert("&copy 2020"), "\u{a9} 2020");
        assert_eq!(convert("&ampx;"), "&x;");
        assert_eq!(convert("&lt;b&gt"), "**");
    }

    #[test]
    fn paragraph_with_attributes_loses_break() {
        assert_eq!(convert("a<p class=\"x\">b"), "ab");
    }

    #[test]
    fn unbalanced_markers_kept() {
        assert_eq!(convert("<b>never closed"), "**never closed");
    }

    #[test]
    fn newlines_not_collapsed() {
        assert_eq!(convert("a<br><br>b"), "a\n\n\n\nb");
    }

    #[test]
    fn mixed_review() {
        let review = "<h2>Verdict</h2><p>A <b>great</b> read, <i>really</i>.</p>\
                      <p>See <a href=\"https://example.com\">the author&#39;s site</a>.</p>";
        assert_eq!(
            convert(review),
            "### Verdict\n\nA **great** read, *really*.\n\n\n\nSee [the author's site](https://example.com)."
        );
    }

    #[test]
    fn formatting_inside_link_text() {
        assert_eq!(
            convert(r#"<a href="u"><b>bold</b></a>"#),
            "[**bold**](u)"
        );
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        const FRAGMENTS: &[&str] = &[
            "<", ">", "/", "\"", " ", "\n", "text", "&", ";", "#", "x", "41",
            "<br>", "<br />", "<p>", "</p>", "<p class=\"c\">", "<h1>", "</h1>", "<h6>", "</h6>",
            "<b>", "</b>", "<strong>", "<i>", "</em>", "<u>", "</u>",
            "<a href=\"", "\">", "</a>", "<div>", "&amp;", "&amp", "&lt;", "&gt", "&#39;",
            "&#x3c;", "&#0;", "&nbsp", "&bogus;", "\u{1c}", "\u{a0}",
        ];

        fn html_like() -> impl Strategy<Value = String> {
            proptest::collection::vec(prop::sample::select(FRAGMENTS), 0..40)
                .prop_map(|parts| parts.concat())
        }

        fn check(output: &str) -> Result<(), TestCaseError> {
            let trimmed = trim(output);
            prop_assert_eq!(output, trimmed.as_str());
            prop_assert!(!TAG_RE.is_match(output), "tag left in {:?}", output);
            Ok(())
        }

        proptest! {
            /// Fuzz: convert is total and fully trimmed
            #[test]
            fn fuzz_convert_any_string(input in "\\PC{0,300}") {
                check(&convert(&input))?;
            }

            /// Fuzz: convert with tag and entity soup
            #[test]
            fn fuzz_convert_html_like(input in html_like()) {
                check(&convert(&input))?;
            }
        }
    }
}
