//! Inline style codec.
//!
//! Parses the value of a `style` attribute into an ordered property → value
//! map and serializes such a map back into a declaration list. Parsing is
//! tolerant: a malformed declaration is skipped, and a declaration list that
//! cannot be split at all (unterminated string, comment or bracket) is treated
//! as an empty style.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::Node;
use crate::{Result, StyleError};

/// Name of the attribute holding the inline style string
pub const STYLE_ATTRIBUTE: &str = "style";

static PROPERTY_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:--[A-Za-z0-9_-]+|-?[A-Za-z_][A-Za-z0-9_-]*)$").expect("valid property regex")
});

/// How a value passed to [`Node::set_style_property`] is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleValueFormat {
    /// Write the value verbatim
    #[default]
    Raw,
    /// Write the value as a quoted CSS string literal
    EscapedString,
}

/// Ordered mapping from CSS property name to raw value.
///
/// Keys are unique. Assigning to an existing property replaces its value but
/// keeps its position, so iteration order is the order in which properties
/// were first seen.
#[derive(Debug, Clone, Default, Eq)]
pub struct StyleMap {
    entries: IndexMap<String, String>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a property
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries.get(property.trim()).map(String::as_str)
    }

    /// Set a property. An empty value removes the property instead.
    ///
    /// A declaration that would not survive serializing and parsing again
    /// (property name that is not a CSS identifier, value with an unmatched
    /// quote or bracket, a top-level `;` or a trailing backslash) leaves the
    /// map unchanged. Use [`StyleMap::try_set`] to find out why.
    pub fn set(&mut self, property: &str, value: &str) {
        if let Err(err) = self.try_set(property, value) {
            log::debug!("ignoring style declaration {:?}: {}", property, err);
        }
    }

    /// Set a property, rejecting declarations the parser would not read back
    pub fn try_set(&mut self, property: &str, value: &str) -> Result<()> {
        let property = property.trim();
        let value = value.trim();
        if value.is_empty() {
            self.remove(property);
            return Ok(());
        }
        validate_declaration(property, value)?;
        self.entries.insert(property.to_string(), value.to_string());
        Ok(())
    }

    /// Remove a property, returning its previous value
    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.entries.shift_remove(property.trim())
    }

    /// Check whether a property is set
    pub fn contains(&self, property: &str) -> bool {
        self.entries.contains_key(property.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(property, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over property names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

// Equality includes order, unlike IndexMap's own PartialEq.
impl PartialEq for StyleMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (k, v) in iter {
            map.set(k.as_ref(), v.as_ref());
        }
        map
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_style(self))
    }
}

/// Parse an inline style string, returning an empty map if it is malformed
pub fn parse_style(raw: &str) -> StyleMap {
    try_parse_style(raw).unwrap_or_else(|err| {
        log::debug!("discarding malformed style {:?}: {}", raw, err);
        StyleMap::new()
    })
}

/// Parse an inline style string, reporting why the list could not be split
pub fn try_parse_style(raw: &str) -> Result<StyleMap> {
    let mut map = StyleMap::new();

    for declaration in split_declarations(raw)? {
        match parse_declaration(&declaration) {
            Some((property, value)) => map.set(property, value),
            None if declaration.trim().is_empty() => {}
            None => log::debug!("skipping malformed declaration {:?}", declaration),
        }
    }

    Ok(map)
}

/// Serialize a style map as `property:value` pairs joined by `;`
pub fn serialize_style(styles: &StyleMap) -> String {
    styles
        .iter()
        .map(|(property, value)| format!("{}:{}", property, value))
        .collect::<Vec<_>>()
        .join(";")
}

/// Quote a value as a CSS string literal.
///
/// Quotes and backslashes are backslash-escaped, NUL becomes U+FFFD and
/// control characters are written as hex escapes.
pub fn escape_css_string(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 2);
    result.push('"');

    for c in value.chars() {
        match c {
            '\0' => result.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => {
                result.push_str(&format!("\\{:x} ", c as u32));
            }
            '"' | '\\' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result.push('"');
    result
}

/// Split a declaration list on top-level semicolons.
///
/// Semicolons inside quoted strings or brackets do not separate declarations,
/// and comments are dropped.
fn split_declarations(raw: &str) -> Result<Vec<String>> {
    let mut declarations = Vec::new();
    let mut current = String::new();
    let mut quote: Option<(char, usize)> = None;
    let mut brackets: Vec<(char, usize)> = Vec::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some((_, escaped)) = chars.next() {
                current.push(escaped);
            }
            continue;
        }

        if let Some((open, _)) = quote {
            current.push(c);
            if c == open {
                quote = None;
            }
            continue;
        }

        match c {
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev = '\0';
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        closed = true;
                        break;
                    }
                    prev = inner;
                }
                if !closed {
                    return Err(StyleError::UnterminatedComment { offset });
                }
            }
            '"' | '\'' => {
                quote = Some((c, offset));
                current.push(c);
            }
            '(' | '[' | '{' => {
                brackets.push((c, offset));
                current.push(c);
            }
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match brackets.pop() {
                    Some((open, _)) if open == expected => current.push(c),
                    _ => return Err(StyleError::UnexpectedClosingBracket { bracket: c, offset }),
                }
            }
            ';' if brackets.is_empty() => {
                declarations.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if let Some((_, offset)) = quote {
        return Err(StyleError::UnterminatedString { offset });
    }
    if let Some((bracket, offset)) = brackets.pop() {
        return Err(StyleError::UnclosedBracket { bracket, offset });
    }

    declarations.push(current);
    Ok(declarations)
}

/// Check that `property:value` parses back to the same pair
fn validate_declaration(property: &str, value: &str) -> Result<()> {
    if !PROPERTY_NAME.is_match(property) {
        return Err(StyleError::InvalidProperty {
            property: property.to_string(),
        });
    }

    // The trailing separator catches values ending in an escaping backslash
    let pieces = split_declarations(&format!("{};", value)).map_err(|source| {
        StyleError::InvalidValue {
            value: value.to_string(),
            reason: source.to_string(),
        }
    })?;
    match pieces.as_slice() {
        [piece, rest] if piece == value && rest.is_empty() => Ok(()),
        _ => Err(StyleError::InvalidValue {
            value: value.to_string(),
            reason: "value does not form a single declaration".to_string(),
        }),
    }
}

/// Split one declaration on its first colon into a trimmed property and value
fn parse_declaration(declaration: &str) -> Option<(&str, &str)> {
    let (property, value) = declaration.split_once(':')?;
    let property = property.trim();
    let value = value.trim();

    if !PROPERTY_NAME.is_match(property) || value.is_empty() {
        return None;
    }
    Some((property, value))
}

impl Node {
    /// Parse this node's `style` attribute
    pub fn style_map(&self) -> StyleMap {
        self.attr(STYLE_ATTRIBUTE).map(parse_style).unwrap_or_default()
    }

    /// Replace this node's `style` attribute. An empty map removes the attribute.
    pub fn set_style_map(&mut self, styles: &StyleMap) {
        if styles.is_empty() {
            self.remove_attr(STYLE_ATTRIBUTE);
        } else {
            self.set_attr(STYLE_ATTRIBUTE, &serialize_style(styles));
        }
    }

    /// Get a single property from this node's `style` attribute
    pub fn style_property(&self, property: &str) -> Option<String> {
        self.style_map().get(property).map(str::to_string)
    }

    /// Set or remove a single property in this node's `style` attribute.
    ///
    /// `None` or an empty value removes the property. A property name or raw
    /// value the parser would not read back leaves the attribute untouched.
    pub fn set_style_property(&mut self, property: &str, value: Option<&str>, format: StyleValueFormat) {
        let mut styles = self.style_map();
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                let value = match format {
                    StyleValueFormat::Raw => value.to_string(),
                    StyleValueFormat::EscapedString => escape_css_string(value),
                };
                if let Err(err) = styles.try_set(property, &value) {
                    log::debug!("keeping style unchanged, {:?}: {}", property, err);
                    return;
                }
            }
            None => {
                styles.remove(property);
            }
        }
        self.set_style_map(&styles);
    }

    /// Remove a single property from this node's `style` attribute
    pub fn remove_style_property(&mut self, property: &str) {
        self.set_style_property(property, None, StyleValueFormat::Raw);
    }
}
