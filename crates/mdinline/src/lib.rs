//! # mdinline
//!
//! Convert a small subset of inline Markdown into a generic node tree.
//!
//! Plain strings such as annotations or captions can carry minimal rich
//! formatting without pulling in a full Markdown implementation. Supported
//! syntax: `*emphasis*`, `**strong**` (also with `_`), `` `code` ``,
//! `[links](url)`, backslash escapes and bare `http(s)://` autolinks.
//!
//! ## Design
//!
//! ```text
//! raw string ──▶ normalize line breaks ──▶ (split paragraphs) ──▶ tokenize
//!                                                                   │
//!            root node ◀── (wrap in <p>) ◀── autolink ◀── parse ◀───┘
//! ```
//!
//! Nothing in the pipeline fails: malformed syntax degrades to literal text.
//!
//! ## Example
//!
//! ```rust
//! use mdinline::{convert_inline_markdown, InlineMarkdownOptions, Node, Tag};
//!
//! let root = convert_inline_markdown("Hello **World**", &InlineMarkdownOptions::default());
//! assert_eq!(root.outer_html(), "Hello <strong>World</strong>");
//!
//! let options = InlineMarkdownOptions::default().with_paragraphs(true);
//! let root = convert_inline_markdown("a\n\nb", &options);
//! assert_eq!(root.element_children().count(), 2);
//! assert!(root.children().all(|p| p.tag() == Some(Tag::Paragraph)));
//! ```

mod autolink;
mod convert;
mod options;
mod parser;
mod preprocess;
mod token;
mod tokenizer;

pub use autolink::autolink;
pub use convert::convert_inline_markdown;
pub use options::{InlineMarkdownOptions, DEFAULT_TRAILING_PUNCTUATION};
pub use parser::parse;
pub use preprocess::{collapse_line_breaks, normalize_line_breaks, split_paragraphs};
pub use token::{Token, Weight};
pub use tokenizer::tokenize;

// Re-export the node tree and style codec from core
pub use mdinline_core::{
    escape_css_string, parse_style, serialize_style, try_parse_style, Element, Node, StyleError,
    StyleMap, StyleValueFormat, Tag, STYLE_ATTRIBUTE,
};
