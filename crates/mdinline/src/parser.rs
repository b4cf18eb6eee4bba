//! Build a node tree from a token sequence.
//!
//! Parsing is a single left-to-right pass over the tokens with an explicit
//! stack of open spans. Emphasis closers match the innermost compatible opener;
//! there is no look-ahead or backtracking. Spans still open at the end of input
//! are flushed back as literal text so no input is dropped.

use mdinline_core::{Node, Tag};

use crate::token::{Token, Weight};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Emphasis { delimiter: char, weight: Weight },
    LinkText,
}

impl SpanKind {
    /// Source text of the opening delimiter
    fn marker(self) -> String {
        match self {
            SpanKind::Emphasis { delimiter, weight } => {
                delimiter.to_string().repeat(weight.width())
            }
            SpanKind::LinkText => "[".to_string(),
        }
    }
}

/// An open span waiting for its closing delimiter
#[derive(Debug)]
struct Frame {
    kind: SpanKind,
    opened_at: usize,
    children: Vec<Node>,
}

/// Parse tokens into an ordered list of nodes
pub fn parse(tokens: &[Token]) -> Vec<Node> {
    let mut parser = Parser::default();
    let mut iter = tokens.iter().enumerate();

    while let Some((index, token)) = iter.next() {
        match token {
            Token::Text(text) => parser.push_text(text),
            Token::EscapedChar(c) => parser.push_text(&c.to_string()),
            Token::CodeSpanMarker => parser.code_span(&mut iter),
            Token::EmphasisMarker {
                delimiter,
                weight,
                can_open,
                can_close,
            } => {
                let kind = SpanKind::Emphasis {
                    delimiter: *delimiter,
                    weight: *weight,
                };
                parser.emphasis(kind, *can_open, *can_close, index);
            }
            Token::LinkTextOpen => parser.open(SpanKind::LinkText, index),
            Token::LinkTextClose => parser.link(&mut iter),
            Token::LinkUrlOpen | Token::LinkUrlClose => parser.push_text(&token.literal()),
        }
    }

    parser.finish()
}

#[derive(Debug, Default)]
struct Parser {
    root: Vec<Node>,
    stack: Vec<Frame>,
}

impl Parser {
    /// Node list belonging to the innermost open span
    fn current(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    fn push_text(&mut self, text: &str) {
        append_text(self.current(), text);
    }

    fn push_node(&mut self, node: Node) {
        append_node(self.current(), node);
    }

    fn open(&mut self, kind: SpanKind, index: usize) {
        log::trace!("open {:?} at token {}", kind, index);
        self.stack.push(Frame {
            kind,
            opened_at: index,
            children: Vec::new(),
        });
    }

    fn emphasis(&mut self, kind: SpanKind, can_open: bool, can_close: bool, index: usize) {
        if can_close {
            if let Some(depth) = self.find_open(kind) {
                let children = self.close(depth);
                let tag = match kind {
                    SpanKind::Emphasis {
                        weight: Weight::Double,
                        ..
                    } => Tag::Strong,
                    _ => Tag::Emphasis,
                };
                log::trace!("close {:?} at token {}", kind, index);
                self.push_node(Node::element_with_children(tag, children));
                return;
            }
        }

        if can_open {
            self.open(kind, index);
        } else {
            self.push_text(&kind.marker());
        }
    }

    /// Find the innermost open frame of `kind`, without crossing link text
    fn find_open(&self, kind: SpanKind) -> Option<usize> {
        for (depth, frame) in self.stack.iter().enumerate().rev() {
            if frame.kind == kind {
                return Some(depth);
            }
            if frame.kind == SpanKind::LinkText {
                return None;
            }
        }
        None
    }

    /// Pop frames down to `depth`, flushing the ones above it as text, and
    /// return the children of the frame at `depth`
    fn close(&mut self, depth: usize) -> Vec<Node> {
        while self.stack.len() > depth + 1 {
            self.flush_top();
        }
        self.stack.pop().map(|frame| frame.children).unwrap_or_default()
    }

    /// Turn the innermost open frame back into literal text
    fn flush_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        log::debug!(
            "unmatched {:?} opened at token {} kept as text",
            frame.kind,
            frame.opened_at
        );
        self.push_text(&frame.kind.marker());
        for child in frame.children {
            self.push_node(child);
        }
    }

    fn code_span<'t>(&mut self, iter: &mut impl Iterator<Item = (usize, &'t Token)>) {
        let mut content = String::new();

        for (_, token) in iter.by_ref() {
            if *token == Token::CodeSpanMarker {
                let code = Node::element_with_children(Tag::Code, vec![Node::text(content)]);
                self.push_node(code);
                return;
            }
            content.push_str(&token.literal());
        }

        log::debug!("unterminated code span kept as text");
        self.push_text("`");
        self.push_text(&content);
    }

    fn link<'t>(&mut self, iter: &mut impl Iterator<Item = (usize, &'t Token)>) {
        let Some(depth) = self
            .stack
            .iter()
            .rposition(|frame| frame.kind == SpanKind::LinkText)
        else {
            self.push_text("]");
            return;
        };
        let children = self.close(depth);

        match iter.next() {
            Some((_, Token::LinkUrlOpen)) => {}
            Some((_, other)) => {
                self.push_literal_link(children, "]");
                self.push_text(&other.literal());
                return;
            }
            None => {
                self.push_literal_link(children, "]");
                return;
            }
        }

        let mut href = String::new();
        for (_, token) in iter.by_ref() {
            if *token == Token::LinkUrlClose {
                self.push_node(Node::link(&href, children));
                return;
            }
            href.push_str(&token.literal());
        }

        log::debug!("unterminated link destination kept as text");
        self.push_literal_link(children, "](");
        self.push_text(&href);
    }

    /// Emit link text that did not become a link as `[`, its content, `tail`
    fn push_literal_link(&mut self, children: Vec<Node>, tail: &str) {
        self.push_text("[");
        for child in children {
            self.push_node(child);
        }
        self.push_text(tail);
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.flush_top();
        }
        self.root
    }
}

/// Append text to a node list, extending a trailing text node
fn append_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    match nodes.last_mut() {
        Some(Node::Text(last)) => last.push_str(text),
        _ => nodes.push(Node::text(text)),
    }
}

/// Append a node to a node list, merging adjacent text nodes
fn append_node(nodes: &mut Vec<Node>, node: Node) {
    match node {
        Node::Text(text) => append_text(nodes, &text),
        other => nodes.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use pretty_assertions::assert_eq;

    fn parse_str(input: &str) -> Vec<Node> {
        parse(&tokenize(input))
    }

    fn el(tag: Tag, children: Vec<Node>) -> Node {
        Node::element_with_children(tag, children)
    }

    fn text(s: &str) -> Node {
        Node::text(s)
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_str("just text"), vec![text("just text")]);
    }

    #[test]
    fn test_escapes_merge_into_text() {
        assert_eq!(parse_str(r"\*a\* \[b\]"), vec![text("*a* [b]")]);
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(
            parse_str("a *b* __c__"),
            vec![
                text("a "),
                el(Tag::Emphasis, vec![text("b")]),
                text(" "),
                el(Tag::Strong, vec![text("c")]),
            ]
        );
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(
            parse_str("**a *b* c**"),
            vec![el(
                Tag::Strong,
                vec![
                    text("a "),
                    el(Tag::Emphasis, vec![text("b")]),
                    text(" c"),
                ]
            )]
        );
        assert_eq!(
            parse_str("***a***"),
            vec![el(Tag::Strong, vec![el(Tag::Emphasis, vec![text("a")])])]
        );
    }

    #[test]
    fn test_delimiters_do_not_cross_match() {
        assert_eq!(parse_str("*a_"), vec![text("*a_")]);
    }

    #[test]
    fn test_unmatched_markers_flush_as_text() {
        assert_eq!(parse_str("*a"), vec![text("*a")]);
        assert_eq!(parse_str("**a*"), vec![text("**a*")]);
        assert_eq!(
            parse_str("**a *b*"),
            vec![text("**a "), el(Tag::Emphasis, vec![text("b")])]
        );
    }

    #[test]
    fn test_closing_pops_unmatched_inner_frames() {
        assert_eq!(
            parse_str("*a **b*"),
            vec![el(Tag::Emphasis, vec![text("a **b")])]
        );
    }

    #[test]
    fn test_code_span() {
        assert_eq!(
            parse_str("`*a*`"),
            vec![el(Tag::Code, vec![text("*a*")])]
        );
        assert_eq!(
            parse_str(r"`a\b`"),
            vec![el(Tag::Code, vec![text(r"a\b")])]
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            parse_str("[t](u)"),
            vec![Node::link("u", vec![text("t")])]
        );
    }

    #[test]
    fn test_link_with_formatting() {
        assert_eq!(
            parse_str("see [**bold** `x`](https://x.io/a_b) now"),
            vec![
                text("see "),
                Node::link(
                    "https://x.io/a_b",
                    vec![
                        el(Tag::Strong, vec![text("bold")]),
                        text(" "),
                        el(Tag::Code, vec![text("x")]),
                    ]
                ),
                text(" now"),
            ]
        );
    }

    #[test]
    fn test_emphasis_does_not_close_across_link_text() {
        assert_eq!(
            parse_str("*a [b*](u)"),
            vec![text("*a "), Node::link("u", vec![text("b*")])]
        );
    }

    #[test]
    fn test_emphasis_around_link() {
        assert_eq!(
            parse_str("*[a](u)*"),
            vec![el(Tag::Emphasis, vec![Node::link("u", vec![text("a")])])]
        );
    }

    #[test]
    fn test_code_span_with_bracket_in_link_text() {
        assert_eq!(
            parse_str("[`]`](u)"),
            vec![Node::link("u", vec![el(Tag::Code, vec![text("]")])])]
        );
    }

    #[test]
    fn test_emphasis_around_bare_url() {
        assert_eq!(
            parse_str("*see https://x.io/a_b*"),
            vec![el(Tag::Emphasis, vec![text("see https://x.io/a_b")])]
        );
    }

    #[test]
    fn test_nested_link_is_literal() {
        assert_eq!(
            parse_str("[a [b](c)](d)"),
            vec![Node::link("d", vec![text("a [b](c)")])]
        );
    }

    #[test]
    fn test_unterminated_link_is_text() {
        assert_eq!(parse_str("[a](b"), vec![text("[a](b")]);
        assert_eq!(parse_str("[a] b"), vec![text("[a] b")]);
    }

    #[test]
    fn test_malformed_token_streams_degrade_to_text() {
        let tokens = vec![
            Token::LinkTextOpen,
            Token::Text("a".to_string()),
            Token::LinkTextClose,
            Token::LinkUrlOpen,
            Token::Text("u".to_string()),
        ];
        assert_eq!(parse(&tokens), vec![text("[a](u")]);

        let tokens = vec![Token::CodeSpanMarker, Token::Text("x".to_string())];
        assert_eq!(parse(&tokens), vec![text("`x")]);

        let tokens = vec![Token::LinkTextClose, Token::LinkUrlClose];
        assert_eq!(parse(&tokens), vec![text("])")]);
    }
}
