//! Scan raw text into a flat sequence of tokens.
//!
//! The tokenizer never fails. Sequences that do not form valid syntax, such as
//! an unterminated backtick or brackets without a link destination, are kept
//! as literal text.

use crate::token::{Token, Weight};

/// Tokenize a single chunk of inline Markdown
pub fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    Tokenizer::new(&chars, true).run()
}

struct Tokenizer<'a> {
    chars: &'a [char],
    pos: usize,
    tokens: Vec<Token>,
    text: String,
    /// Link text is tokenized with links disabled, so links never nest
    links: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(chars: &'a [char], links: bool) -> Self {
        Self {
            chars,
            pos: 0,
            tokens: Vec::new(),
            text: String::new(),
            links,
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                '\\' => self.escape(),
                '`' => self.code_span(),
                '*' | '_' => self.emphasis_run(c),
                '[' if self.links => self.link(),
                'h' if self.at_url() => self.url(),
                _ => {
                    self.text.push(c);
                    self.pos += 1;
                }
            }
        }
        self.flush_text();
        self.tokens
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.tokens.push(Token::Text(text));
        }
    }

    fn push(&mut self, token: Token) {
        self.flush_text();
        log::trace!("token {:?} at {}", token, self.pos);
        self.tokens.push(token);
    }

    fn escape(&mut self) {
        match self.chars.get(self.pos + 1) {
            Some(&escaped) => {
                self.push(Token::EscapedChar(escaped));
                self.pos += 2;
            }
            None => {
                // A trailing backslash escapes nothing
                self.text.push('\\');
                self.pos += 1;
            }
        }
    }

    /// Check for `http://` or `https://` starting at a word boundary
    fn at_url(&self) -> bool {
        let after_boundary = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.chars.get(i))
            .map_or(true, |c| !c.is_alphanumeric() && *c != '_');
        let rest = &self.chars[self.pos..];
        after_boundary && (starts_with(rest, "http://") || starts_with(rest, "https://"))
    }

    /// Keep a bare URL as literal text so emphasis markers inside it stay
    /// part of the URL. Trailing `*` and `_` are left to close emphasis
    /// around the URL, and a backslash ends the run so escapes still apply.
    fn url(&mut self) {
        let start = self.pos;
        let mut end = start;
        while let Some(&c) = self.chars.get(end) {
            if c.is_whitespace() || c == '\\' {
                break;
            }
            end += 1;
        }
        while end > start && matches!(self.chars[end - 1], '*' | '_') {
            end -= 1;
        }

        self.text.extend(&self.chars[start..end]);
        self.pos = end;
    }

    fn code_span(&mut self) {
        let start = self.pos + 1;
        let close = self.chars[start..].iter().position(|&c| c == '`');

        match close {
            Some(len) if len > 0 => {
                let content: String = self.chars[start..start + len].iter().collect();
                self.push(Token::CodeSpanMarker);
                self.tokens.push(Token::Text(content));
                self.tokens.push(Token::CodeSpanMarker);
                self.pos = start + len + 1;
            }
            Some(_) => {
                self.text.push_str("``");
                self.pos += 2;
            }
            None => {
                log::debug!("unterminated code span at {}", self.pos);
                self.text.push('`');
                self.pos += 1;
            }
        }
    }

    fn emphasis_run(&mut self, delimiter: char) {
        let start = self.pos;
        let len = self.chars[start..]
            .iter()
            .take_while(|&&c| c == delimiter)
            .count();
        let end = start + len;

        let prev = start.checked_sub(1).and_then(|i| self.chars.get(i)).copied();
        let next = self.chars.get(end).copied();

        let can_open = next.is_some_and(|c| !c.is_whitespace());
        let can_close = prev.is_some_and(|c| !c.is_whitespace());
        let intraword = delimiter == '_'
            && prev.is_some_and(char::is_alphanumeric)
            && next.is_some_and(char::is_alphanumeric);

        self.pos = end;

        if intraword || !(can_open || can_close) {
            self.text.extend(std::iter::repeat(delimiter).take(len));
            return;
        }

        let doubles = len / 2;
        let single = len % 2 == 1;
        let marker = |weight| Token::EmphasisMarker {
            delimiter,
            weight,
            can_open,
            can_close,
        };

        // Closing runs give up their innermost (single) marker first
        if single && can_close {
            self.push(marker(Weight::Single));
        }
        for _ in 0..doubles {
            self.push(marker(Weight::Double));
        }
        if single && !can_close {
            self.push(marker(Weight::Single));
        }
    }

    fn link(&mut self) {
        let text_start = self.pos + 1;
        let Some(text_end) = find_closing(self.chars, text_start, '[', ']', true) else {
            log::debug!("unterminated link text at {}", self.pos);
            self.text.push('[');
            self.pos += 1;
            return;
        };

        let url_start = text_end + 2;
        let url_end = match self.chars.get(text_end + 1) {
            Some('(') => find_closing(self.chars, url_start, '(', ')', false),
            _ => None,
        };
        let Some(url_end) = url_end else {
            log::debug!("link text at {} has no destination", self.pos);
            self.text.push('[');
            self.pos += 1;
            return;
        };

        self.push(Token::LinkTextOpen);
        let inner = Tokenizer::new(&self.chars[text_start..text_end], false).run();
        self.tokens.extend(inner);
        self.tokens.push(Token::LinkTextClose);
        self.tokens.push(Token::LinkUrlOpen);

        let mut url = String::new();
        let mut i = url_start;
        while i < url_end {
            let c = self.chars[i];
            if c == '\\' && i + 1 < url_end {
                if !url.is_empty() {
                    self.tokens.push(Token::Text(std::mem::take(&mut url)));
                }
                self.tokens.push(Token::EscapedChar(self.chars[i + 1]));
                i += 2;
            } else {
                url.push(c);
                i += 1;
            }
        }
        if !url.is_empty() {
            self.tokens.push(Token::Text(url));
        }

        self.tokens.push(Token::LinkUrlClose);
        self.pos = url_end + 1;
    }
}

fn starts_with(chars: &[char], prefix: &str) -> bool {
    let mut chars = chars.iter();
    prefix.chars().all(|p| chars.next() == Some(&p))
}

/// Find the index of the bracket closing one opened just before `from`.
///
/// Nested pairs of the same bracket are balanced and backslash escapes are
/// skipped. With `skip_code`, brackets inside complete code spans are ignored.
fn find_closing(
    chars: &[char],
    from: usize,
    open: char,
    close: char,
    skip_code: bool,
) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = from;

    while let Some(&c) = chars.get(i) {
        if c == '\\' {
            i += 2;
            continue;
        }
        if c == '`' && skip_code {
            if let Some(len) = chars[i + 1..].iter().position(|&c| c == '`') {
                i += len + 2;
                continue;
            }
        }
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
        i += 1;
    }

    None
}
