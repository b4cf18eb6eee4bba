//! Convert an inline Markdown string into a node tree.

use mdinline_core::{Node, Tag};

use crate::autolink::autolink;
use crate::options::InlineMarkdownOptions;
use crate::parser::parse;
use crate::preprocess::{collapse_line_breaks, normalize_line_breaks, split_paragraphs};
use crate::tokenizer::tokenize;

/// Convert inline Markdown into a root node.
///
/// Line breaks are normalized first. Without `paragraphs` the whole input is
/// parsed as one run of inline content; with it, each blank-line separated
/// chunk becomes a paragraph element. Conversion never fails: syntax that does
/// not parse is kept as literal text.
pub fn convert_inline_markdown(markdown: &str, options: &InlineMarkdownOptions) -> Node {
    let normalized = normalize_line_breaks(markdown);

    let children = if options.paragraphs {
        split_paragraphs(&normalized)
            .iter()
            .map(|chunk| Node::element_with_children(Tag::Paragraph, convert_chunk(chunk, options)))
            .collect()
    } else {
        convert_chunk(&collapse_line_breaks(&normalized), options)
    };

    Node::root(children)
}

/// Tokenize and parse one chunk of inline content
fn convert_chunk(chunk: &str, options: &InlineMarkdownOptions) -> Vec<Node> {
    let nodes = parse(&tokenize(chunk));
    if options.autolink {
        autolink(nodes, &options.autolink_trailing_punctuation)
    } else {
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn children(node: Node) -> Vec<Node> {
        match node {
            Node::Root(children) => children,
            other => panic!("expected root node, got {:?}", other),
        }
    }

    #[test]
    fn test_single_line() {
        let root = convert_inline_markdown("Hello *World*", &InlineMarkdownOptions::default());
        assert_eq!(
            children(root),
            vec![
                Node::text("Hello "),
                Node::element_with_children(Tag::Emphasis, vec![Node::text("World")]),
            ]
        );
    }

    #[test]
    fn test_line_breaks_collapse_to_spaces() {
        let root = convert_inline_markdown("a  \n  b\n\n c", &InlineMarkdownOptions::default());
        assert_eq!(children(root), vec![Node::text("a b c")]);
    }

    #[test]
    fn test_emphasis_spans_line_break() {
        let root = convert_inline_markdown("*a\nb*", &InlineMarkdownOptions::default());
        assert_eq!(
            children(root),
            vec![Node::element_with_children(Tag::Emphasis, vec![Node::text("a b")])]
        );
    }

    #[test]
    fn test_paragraphs_parse_independently() {
        let options = InlineMarkdownOptions::default().with_paragraphs(true);
        let root = convert_inline_markdown("*a\n\nb*", &options);
        assert_eq!(
            children(root),
            vec![
                Node::element_with_children(Tag::Paragraph, vec![Node::text("*a")]),
                Node::element_with_children(Tag::Paragraph, vec![Node::text("b*")]),
            ]
        );
    }

    #[test]
    fn test_autolink_disabled() {
        let options = InlineMarkdownOptions::default().with_autolink(false);
        let root = convert_inline_markdown("see https://x.io.", &options);
        assert_eq!(children(root), vec![Node::text("see https://x.io.")]);
    }

    #[test]
    fn test_empty_input() {
        let root = convert_inline_markdown("", &InlineMarkdownOptions::default());
        assert_eq!(root, Node::root(vec![]));

        let options = InlineMarkdownOptions::default().with_paragraphs(true);
        assert_eq!(convert_inline_markdown("\n\n", &options), Node::root(vec![]));
    }

    #[test]
    fn test_renders_as_html() {
        let root = convert_inline_markdown(
            "Use `cargo <cmd>` or read [the **docs**](https://x.io/?a=1&b=2).",
            &InlineMarkdownOptions::default(),
        );
        assert_eq!(
            root.outer_html(),
            "Use <code>cargo &lt;cmd&gt;</code> or read \
             <a href=\"https://x.io/?a=1&amp;b=2\">the <strong>docs</strong></a>."
        );
    }
}
