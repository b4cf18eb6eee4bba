//! Lexical tokens produced by the tokenizer.

/// Number of delimiter characters in an emphasis marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    /// `*` or `_`, emphasis
    Single,
    /// `**` or `__`, strong emphasis
    Double,
}

impl Weight {
    /// Number of delimiter characters this weight stands for
    pub fn width(self) -> usize {
        match self {
            Weight::Single => 1,
            Weight::Double => 2,
        }
    }
}

/// A token of inline Markdown, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Run of literal characters
    Text(String),

    /// Emphasis delimiter candidate. Whether it actually opens or closes a
    /// span is decided by the parser; the flags record which roles the
    /// surrounding characters allow.
    EmphasisMarker {
        delimiter: char,
        weight: Weight,
        can_open: bool,
        can_close: bool,
    },

    /// Backtick delimiting a code span
    CodeSpanMarker,

    /// `[` starting link text
    LinkTextOpen,

    /// `]` ending link text
    LinkTextClose,

    /// `(` starting a link destination
    LinkUrlOpen,

    /// `)` ending a link destination
    LinkUrlClose,

    /// Character that followed a backslash
    EscapedChar(char),
}

impl Token {
    /// The literal source text this token was scanned from, with escapes resolved
    pub fn literal(&self) -> String {
        match self {
            Token::Text(text) => text.clone(),
            Token::EmphasisMarker {
                delimiter, weight, ..
            } => delimiter.to_string().repeat(weight.width()),
            Token::CodeSpanMarker => "`".to_string(),
            Token::LinkTextOpen => "[".to_string(),
            Token::LinkTextClose => "]".to_string(),
            Token::LinkUrlOpen => "(".to_string(),
            Token::LinkUrlClose => ")".to_string(),
            Token::EscapedChar(c) => c.to_string(),
        }
    }
}
