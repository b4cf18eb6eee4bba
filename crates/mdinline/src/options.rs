//! Configuration options for inline Markdown conversion

/// Characters left out of the end of an autolinked URL by default
pub const DEFAULT_TRAILING_PUNCTUATION: &str = ".,:;!?'\")]}";

/// Options for [`convert_inline_markdown`](crate::convert_inline_markdown)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMarkdownOptions {
    /// Wrap bare `http://` and `https://` URLs in link elements
    pub autolink: bool,

    /// Split input on blank lines and wrap each chunk in a paragraph element
    pub paragraphs: bool,

    /// Characters stripped from the end of an autolinked URL.
    /// Closing brackets are only stripped when unbalanced within the URL.
    pub autolink_trailing_punctuation: String,
}

impl Default for InlineMarkdownOptions {
    fn default() -> Self {
        Self {
            autolink: true,
            paragraphs: false,
            autolink_trailing_punctuation: DEFAULT_TRAILING_PUNCTUATION.to_string(),
        }
    }
}

impl InlineMarkdownOptions {
    /// Enable or disable wrapping of bare URLs in links
    pub fn with_autolink(mut self, autolink: bool) -> Self {
        self.autolink = autolink;
        self
    }

    /// Enable or disable splitting into paragraph elements
    pub fn with_paragraphs(mut self, paragraphs: bool) -> Self {
        self.paragraphs = paragraphs;
        self
    }

    /// Set the characters stripped from the end of autolinked URLs
    pub fn with_trailing_punctuation(mut self, punctuation: &str) -> Self {
        self.autolink_trailing_punctuation = punctuation.to_string();
        self
    }
}
