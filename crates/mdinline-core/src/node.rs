//! Generic node tree produced by inline Markdown conversion.
//!
//! The tree has two kinds of leaves and branches: element nodes carrying a tag
//! from a small fixed vocabulary, attributes and children, and text nodes
//! holding literal strings. A `Root` node groups the top-level result of a
//! conversion, similar to a DOM document fragment.

use indexmap::IndexMap;

/// Tag names an element node can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Emphasis (`em`)
    Emphasis,
    /// Strong emphasis (`strong`)
    Strong,
    /// Inline code (`code`)
    Code,
    /// Link (`a`), carries an `href` attribute
    Link,
    /// Paragraph (`p`)
    Paragraph,
    /// Neutral grouping wrapper (`span`)
    Span,
}

impl Tag {
    /// Get the markup name of this tag
    pub fn name(self) -> &'static str {
        match self {
            Tag::Emphasis => "em",
            Tag::Strong => "strong",
            Tag::Code => "code",
            Tag::Link => "a",
            Tag::Paragraph => "p",
            Tag::Span => "span",
        }
    }

    /// Look up a tag by its markup name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "em" => Some(Tag::Emphasis),
            "strong" => Some(Tag::Strong),
            "code" => Some(Tag::Code),
            "a" => Some(Tag::Link),
            "p" => Some(Tag::Paragraph),
            "span" => Some(Tag::Span),
            _ => None,
        }
    }
}

/// An element node: tag, attributes in insertion order, and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

/// A node in the tree.
///
/// Each child is owned by exactly one parent list, so the structure is always a
/// tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with tag, attributes and children
    Element(Element),
    /// Literal text, never parsed further
    Text(String),
    /// Top-level container returned by conversion
    Root(Vec<Node>),
}

impl Node {
    /// Create a new element node without children
    pub fn element(tag: Tag) -> Self {
        Self::element_with_children(tag, Vec::new())
    }

    /// Create a new element node with the given children
    pub fn element_with_children(tag: Tag, children: Vec<Node>) -> Self {
        Node::Element(Element {
            tag,
            attributes: IndexMap::new(),
            children,
        })
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag: Tag, attrs: Vec<(&str, &str)>) -> Self {
        let attributes = attrs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Node::Element(Element {
            tag,
            attributes,
            children: Vec::new(),
        })
    }

    /// Create a link element pointing at `href`
    pub fn link(href: &str, children: Vec<Node>) -> Self {
        let mut node = Self::element_with_children(Tag::Link, children);
        node.set_attr("href", href);
        node
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    /// Create a root node holding the given children
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root(children)
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Check if this is a root node
    pub fn is_root(&self) -> bool {
        matches!(self, Node::Root(_))
    }

    /// Get the tag of an element node
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Node::Element(el) => Some(el.tag),
            _ => None,
        }
    }

    /// Get the tag name of an element node
    pub fn tag_name(&self) -> Option<&'static str> {
        self.tag().map(Tag::name)
    }

    /// Get the literal value of a text node
    pub fn text_value(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element(el) => el.attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute. Has no effect on text and root nodes.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Node::Element(el) = self {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        match self {
            Node::Element(el) => el.attributes.shift_remove(name),
            _ => None,
        }
    }

    fn child_slice(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            Node::Root(children) => children,
            Node::Text(_) => &[],
        }
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.child_slice().iter()
    }

    /// Get mutable access to the child list of an element or root node
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element(el) => Some(&mut el.children),
            Node::Root(children) => Some(children),
            Node::Text(_) => None,
        }
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Add a child node. Text nodes cannot hold children; the call is ignored.
    pub fn add_child(&mut self, child: Node) {
        if let Some(children) = self.children_mut() {
            children.push(child);
        }
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            _ => self.children().map(Node::text_content).collect(),
        }
    }

    /// Render this node as HTML markup
    pub fn outer_html(&self) -> String {
        match self {
            Node::Text(text) => escape_html_text(text),
            Node::Element(el) => {
                let tag = el.tag.name();
                let attrs = attributes_string(&el.attributes);
                let inner = self.inner_html();
                if attrs.is_empty() {
                    format!("<{}>{}</{}>", tag, inner, tag)
                } else {
                    format!("<{} {}>{}</{}>", tag, attrs, inner, tag)
                }
            }
            Node::Root(_) => self.inner_html(),
        }
    }

    /// Render the children of this node as HTML markup
    pub fn inner_html(&self) -> String {
        self.children().map(Node::outer_html).collect()
    }
}

/// Get attributes as a string for HTML output
fn attributes_string(attrs: &IndexMap<String, String>) -> String {
    attrs
        .iter()
        .map(|(name, value)| {
            if value.is_empty() {
                name.clone()
            } else {
                format!("{}=\"{}\"", name, escape_html_attr(value))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape HTML attribute value
fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape HTML text content
fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
