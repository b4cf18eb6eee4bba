//! mdinline-core - node tree and inline style codec
//!
//! This crate provides the generic node tree produced by `mdinline` and the
//! codec used to read and modify the `style` attribute of element nodes.
//!
//! # Example
//!
//! ```rust
//! use mdinline_core::{parse_style, serialize_style, Node, StyleValueFormat, Tag};
//!
//! let mut span = Node::element_with_attrs(Tag::Span, vec![("style", "color:red;a:1;color:blue")]);
//! assert_eq!(span.style_property("color").as_deref(), Some("blue"));
//!
//! span.set_style_property("font-family", Some("Fira Code"), StyleValueFormat::EscapedString);
//! assert_eq!(span.attr("style"), Some(r#"color:blue;a:1;font-family:"Fira Code""#));
//!
//! let map = parse_style("a:1;b:2;a:3");
//! assert_eq!(serialize_style(&map), "a:3;b:2");
//! ```

mod node;
mod style;

pub use node::{Element, Node, Tag};
pub use style::{
    escape_css_string, parse_style, serialize_style, try_parse_style, StyleMap, StyleValueFormat,
    STYLE_ATTRIBUTE,
};

/// Error type for style declarations that cannot be read or written
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },

    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error("unclosed '{bracket}' at byte {offset}")]
    UnclosedBracket { bracket: char, offset: usize },

    #[error("unexpected '{bracket}' at byte {offset}")]
    UnexpectedClosingBracket { bracket: char, offset: usize },

    #[error("'{property}' is not a CSS property name")]
    InvalidProperty { property: String },

    #[error("invalid value {value:?}: {reason}")]
    InvalidValue { value: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StyleError>;
