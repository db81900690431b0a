//! Inline rich-text parsing for result titles and descriptions.
//!
//! Titles and descriptions arrive as small HTML fragments (search engines
//! wrap matched terms in `<strong>`). Only the top-level children of the
//! fragment are interpreted, and only through a closed set of node kinds:
//!
//! - text nodes are kept verbatim (entities decoded)
//! - `<a>` becomes a link carrying its `href` and flattened text
//! - `<br>` becomes a line break
//! - `<strong>` / `<b>` become bold text
//! - every other element becomes a plain span of its flattened text
//!
//! Markup nested inside an element is never interpreted, only flattened to
//! its text. Comments, doctypes and processing instructions are dropped.

use scraper::{ElementRef, Html, Node};
use serde_json::Value;

use crate::model::display_text;

/// One unit of parsed rich text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    Text(String),
    Link { href: Option<String>, text: String },
    Break,
    Bold(String),
    Span(String),
}

impl InlineNode {
    /// Visible text of the node; a break is a newline.
    pub fn text(&self) -> &str {
        match self {
            InlineNode::Text(text) | InlineNode::Bold(text) | InlineNode::Span(text) => text,
            InlineNode::Link { text, .. } => text,
            InlineNode::Break => "\n",
        }
    }
}

/// Element tags the parser gives meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Anchor,
    LineBreak,
    Bold,
    Other,
}

impl Tag {
    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "a" => Tag::Anchor,
            "br" => Tag::LineBreak,
            "strong" | "b" => Tag::Bold,
            _ => Tag::Other,
        }
    }
}

/// Sequence of inline nodes produced by [`parse`].
///
/// Single pass: once consumed it cannot be restarted; parse again instead.
#[derive(Debug)]
pub struct InlineNodes {
    inner: std::vec::IntoIter<InlineNode>,
}

impl Iterator for InlineNodes {
    type Item = InlineNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for InlineNodes {}

impl From<Vec<InlineNode>> for InlineNodes {
    fn from(nodes: Vec<InlineNode>) -> Self {
        Self { inner: nodes.into_iter() }
    }
}

/// Parse an HTML fragment into inline nodes.
///
/// Never fails: malformed markup is repaired by the HTML5 tree builder and
/// whatever top-level nodes come out of it are converted.
pub fn parse(input: &str) -> InlineNodes {
    let fragment = Html::parse_fragment(input);

    let nodes = fragment
        .root_element()
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => {
                let text: &str = text;
                Some(InlineNode::Text(text.to_owned()))
            }
            Node::Element(element) => {
                let flattened = || ElementRef::wrap(child).map(|el| el.text().collect::<String>()).unwrap_or_default();
                Some(match Tag::from_name(element.name()) {
                    Tag::Anchor => InlineNode::Link { href: element.attr("href").map(str::to_owned), text: flattened() },
                    Tag::LineBreak => InlineNode::Break,
                    Tag::Bold => InlineNode::Bold(flattened()),
                    Tag::Other => InlineNode::Span(flattened()),
                })
            }
            _ => None,
        })
        .collect::<Vec<_>>();

    InlineNodes::from(nodes)
}

/// Parse a raw JSON field.
///
/// Strings go through [`parse`]; any other value yields a single text node
/// holding its string conversion.
pub fn parse_value(value: &Value) -> InlineNodes {
    match value {
        Value::String(s) => parse(s),
        other => InlineNodes::from(vec![InlineNode::Text(display_text(other))]),
    }
}

/// Concatenate the visible text of a node sequence.
pub fn plain_text<'a>(nodes: impl IntoIterator<Item = &'a InlineNode>) -> String {
    nodes.into_iter().map(InlineNode::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_vec(input: &str) -> Vec<InlineNode> {
        parse(input).collect()
    }

    #[test]
    fn test_plain_text_is_single_node() {
        let nodes = parse_vec("just some words");
        assert_eq!(nodes, vec![InlineNode::Text("just some words".into())]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_vec("").is_empty());
    }

    #[test]
    fn test_bold_in_description() {
        let nodes = parse_vec("Feline <strong>facts</strong>");
        assert_eq!(nodes, vec![InlineNode::Text("Feline ".into()), InlineNode::Bold("facts".into())]);
    }

    #[test]
    fn test_b_tag_is_bold() {
        assert_eq!(parse_vec("<b>x</b>"), vec![InlineNode::Bold("x".into())]);
    }

    #[test]
    fn test_single_anchor() {
        let nodes = parse_vec(r#"see <a href="https://example.com/a?b=c">the <em>docs</em></a> now"#);
        let links: Vec<_> = nodes.iter().filter(|n| matches!(n, InlineNode::Link { .. })).collect();

        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0],
            &InlineNode::Link { href: Some("https://example.com/a?b=c".into()), text: "the docs".into() }
        );
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_anchor_without_href() {
        assert_eq!(parse_vec("<a>bare</a>"), vec![InlineNode::Link { href: None, text: "bare".into() }]);
    }

    #[test]
    fn test_line_break() {
        let nodes = parse_vec("one<br>two<br/>three");
        assert_eq!(
            nodes,
            vec![
                InlineNode::Text("one".into()),
                InlineNode::Break,
                InlineNode::Text("two".into()),
                InlineNode::Break,
                InlineNode::Text("three".into()),
            ]
        );
    }

    #[test]
    fn test_unknown_element_becomes_span() {
        let nodes = parse_vec("<em>hi <strong>there</strong></em>");
        assert_eq!(nodes, vec![InlineNode::Span("hi there".into())]);
    }

    #[test]
    fn test_uppercase_tags() {
        assert_eq!(parse_vec("<STRONG>loud</STRONG>"), vec![InlineNode::Bold("loud".into())]);
    }

    #[test]
    fn test_script_is_flattened_not_executed() {
        let nodes = parse_vec("<script>alert(1)</script>ok");
        assert_eq!(nodes, vec![InlineNode::Span("alert(1)".into()), InlineNode::Text("ok".into())]);
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(parse_vec("a<!-- hidden -->b"), vec![InlineNode::Text("a".into()), InlineNode::Text("b".into())]);
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let nodes = parse_vec("<strong>unclosed <a href='x'>link");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0], InlineNode::Bold("unclosed link".into()));
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(parse_vec("Tom &amp; Jerry"), vec![InlineNode::Text("Tom & Jerry".into())]);
    }

    #[test]
    fn test_non_string_values() {
        for (value, expected) in [(json!(5), "5"), (json!(null), "null"), (json!(false), "false"), (json!({"a": 1}), r#"{"a":1}"#)] {
            let nodes: Vec<_> = parse_value(&value).collect();
            assert_eq!(nodes, vec![InlineNode::Text(expected.into())]);
        }
    }

    #[test]
    fn test_string_value_is_parsed() {
        let nodes: Vec<_> = parse_value(&json!("<b>x</b>")).collect();
        assert_eq!(nodes, vec![InlineNode::Bold("x".into())]);
    }

    #[test]
    fn test_sequence_is_single_pass() {
        let mut nodes = parse("a<br>b");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes.by_ref().count(), 3);
        assert_eq!(nodes.next(), None);
    }

    #[test]
    fn test_plain_text() {
        let nodes = parse_vec("a <b>b</b><br>c");
        assert_eq!(plain_text(&nodes), "a b\nc");
    }
}
