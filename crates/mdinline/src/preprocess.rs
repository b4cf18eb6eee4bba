//! Line-break normalization and paragraph splitting.

use once_cell::sync::Lazy;
use regex::Regex;

/// A line break with any horizontal whitespace around it
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*(?:\r\n|\r|\n)[ \t]*").expect("valid line break regex"));

/// Two or more consecutive line breaks
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("valid paragraph break regex"));

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("valid line breaks regex"));

/// Collapse each line break and its surrounding horizontal whitespace to `\n`
pub fn normalize_line_breaks(input: &str) -> String {
    LINE_BREAK.replace_all(input, "\n").into_owned()
}

/// Replace every run of line breaks with a single space
pub fn collapse_line_breaks(input: &str) -> String {
    LINE_BREAKS.replace_all(input, " ").into_owned()
}

/// Split normalized input on blank lines.
///
/// Line breaks inside each chunk are collapsed to spaces; empty chunks (from
/// leading or trailing blank lines) are dropped.
pub fn split_paragraphs(input: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(input)
        .filter(|chunk| !chunk.is_empty())
        .map(collapse_line_breaks)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_line_breaks() {
        assert_eq!(normalize_line_breaks("a  \n\t b"), "a\nb");
        assert_eq!(normalize_line_breaks("a\r\n\r\nb"), "a\n\nb");
        assert_eq!(normalize_line_breaks("a \n \n b"), "a\n\nb");
        assert_eq!(normalize_line_breaks("a  b"), "a  b");
    }

    #[test]
    fn test_collapse_line_breaks() {
        assert_eq!(collapse_line_breaks("a\nb\n\n\nc"), "a b c");
    }

    #[test]
    fn test_split_paragraphs() {
        assert_eq!(split_paragraphs("a\nb\n\nc"), vec!["a b", "c"]);
        assert_eq!(split_paragraphs("\n\na\n\n\n\nb\n\n"), vec!["a", "b"]);
        assert_eq!(split_paragraphs(""), Vec::<String>::new());
    }
}
