//! Wrap bare `http://` and `https://` URLs found in text nodes as links.

use mdinline_core::{Node, Tag};
use once_cell::sync::Lazy;
use regex::Regex;

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bhttps?://\S+").expect("valid bare URL regex"));

/// Replace bare URLs in text nodes with link elements.
///
/// Trailing characters from `trailing_punctuation` are left out of the URL. A
/// trailing closing bracket is kept when the URL contains an unmatched
/// opening one, so `https://x.io/a_(b)` stays intact. Text inside `code` and
/// `a` elements is never touched.
pub fn autolink(nodes: Vec<Node>, trailing_punctuation: &str) -> Vec<Node> {
    let mut result = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            Node::Text(text) => result.extend(split_text(&text, trailing_punctuation)),
            Node::Element(mut el) => {
                if !matches!(el.tag, Tag::Code | Tag::Link) {
                    el.children = autolink(std::mem::take(&mut el.children), trailing_punctuation);
                }
                result.push(Node::Element(el));
            }
            Node::Root(children) => {
                result.push(Node::Root(autolink(children, trailing_punctuation)));
            }
        }
    }

    result
}

/// Split one text run into text and link nodes
fn split_text(text: &str, trailing_punctuation: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut last = 0;

    for m in BARE_URL.find_iter(text) {
        let url = trim_url(m.as_str(), trailing_punctuation);
        let scheme_len = url.find("://").map_or(0, |i| i + 3);
        if url.len() <= scheme_len {
            continue;
        }

        log::trace!("autolink {:?}", url);
        if m.start() > last {
            nodes.push(Node::text(&text[last..m.start()]));
        }
        nodes.push(Node::link(url, vec![Node::text(url)]));
        last = m.start() + url.len();
    }

    if last < text.len() {
        nodes.push(Node::text(&text[last..]));
    }
    nodes
}

/// Strip trailing punctuation from a URL candidate
fn trim_url<'a>(url: &'a str, trailing_punctuation: &str) -> &'a str {
    let mut url = url;

    while let Some(c) = url.chars().last() {
        if !trailing_punctuation.contains(c) {
            break;
        }
        if let Some(open) = opening_bracket(c) {
            let opens = url.matches(open).count();
            let closes = url.matches(c).count();
            if opens >= closes {
                break;
            }
        }
        url = &url[..url.len() - c.len_utf8()];
    }

    url
}

fn opening_bracket(close: char) -> Option<char> {
    match close {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_TRAILING_PUNCTUATION;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> Vec<Node> {
        autolink(vec![Node::text(text)], DEFAULT_TRAILING_PUNCTUATION)
    }

    fn link(url: &str) -> Node {
        Node::link(url, vec![Node::text(url)])
    }

    #[test]
    fn test_trailing_period_excluded() {
        assert_eq!(
            run("see https://x.io."),
            vec![Node::text("see "), link("https://x.io"), Node::text(".")]
        );
    }

    #[test]
    fn test_multiple_urls() {
        assert_eq!(
            run("http://a.io, https://b.io/p?q=1!"),
            vec![
                link("http://a.io"),
                Node::text(", "),
                link("https://b.io/p?q=1"),
                Node::text("!"),
            ]
        );
    }

    #[test]
    fn test_balanced_parentheses_kept() {
        assert_eq!(
            run("(https://en.wikipedia.org/wiki/A_(b))"),
            vec![
                Node::text("("),
                link("https://en.wikipedia.org/wiki/A_(b)"),
                Node::text(")"),
            ]
        );
    }

    #[test]
    fn test_bare_scheme_is_not_linked() {
        assert_eq!(run("https://."), vec![Node::text("https://.")]);
        assert_eq!(run("xhttp://a.io"), vec![Node::text("xhttp://a.io")]);
    }

    #[test]
    fn test_custom_punctuation_policy() {
        let nodes = autolink(vec![Node::text("https://x.io.")], "");
        assert_eq!(nodes, vec![link("https://x.io.")]);
    }

    #[test]
    fn test_skips_code_and_links() {
        let code = Node::element_with_children(Tag::Code, vec![Node::text("https://x.io")]);
        let existing = Node::link("u", vec![Node::text("https://x.io")]);
        let nodes = vec![code.clone(), existing.clone()];
        assert_eq!(autolink(nodes, DEFAULT_TRAILING_PUNCTUATION), vec![code, existing]);
    }

    #[test]
    fn test_descends_into_emphasis() {
        let em = Node::element_with_children(Tag::Emphasis, vec![Node::text("at https://x.io")]);
        assert_eq!(
            autolink(vec![em], DEFAULT_TRAILING_PUNCTUATION),
            vec![Node::element_with_children(
                Tag::Emphasis,
                vec![Node::text("at "), link("https://x.io")]
            )]
        );
    }
}
