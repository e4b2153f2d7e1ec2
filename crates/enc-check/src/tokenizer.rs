//! Tokenizer splitting JavaScript-style source text into tokens.
//!
//! String tokens keep their exact source slice, quote characters included, so
//! later passes can compare and replace the literal text without decoding
//! escape sequences.
use crate::diagnostic::{ByteIndex, SourceLocation};
use std::iter::Peekable;
use std::str::CharIndices;

/// Punctuation the parser distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,
    Dot,
    /// The `?.` optional chaining operator.
    OptionalChain,
    /// The `...` spread operator.
    Ellipsis,
    Equals,
    /// Any other character; the parser reports these as unexpected.
    Unknown,
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    /// A single- or double-quoted string literal. `terminated` is false when
    /// the closing quote is missing.
    Str { terminated: bool },
    /// A backtick template literal. Kept distinct from `Str` so lints never
    /// mistake one for a plain string.
    Template { terminated: bool },
    Punct(Punct),
}

/// A single token, with the exact source text it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Exact source slice, including quote characters for string tokens.
    pub raw: &'a str,
    pub location: SourceLocation,
}

impl Token<'_> {
    /// Get the position of the first character in this token.
    #[inline]
    pub const fn start(&self) -> ByteIndex {
        self.location.start()
    }
    /// Get the position just past this token.
    #[inline]
    pub const fn end(&self) -> ByteIndex {
        self.location.end()
    }
}

/// Iterator over the tokens in a source string. Whitespace and comments are
/// skipped; the tokenizer itself never fails.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    /// Create an iterator over the `source` string's tokens.
    pub fn new(source: &'a str) -> Self {
        Tokenizer {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        Token {
            kind,
            raw: &self.source[start..end],
            location: SourceLocation::new(start.into()..end.into()),
        }
    }

    /// Consume characters while `continues` holds, returning the end offset.
    fn read_while(&mut self, continues: impl Fn(char) -> bool) -> usize {
        while let Some(&(index, c)) = self.chars.peek() {
            if !continues(c) {
                return index;
            }
            self.chars.next();
        }
        self.source.len()
    }

    /// Read a quoted string. Backslash escapes are skipped over but not
    /// decoded. A newline or the end of input ends an unterminated string.
    fn read_string(&mut self, start: usize, quote: char) -> Token<'a> {
        let mut terminated = false;
        let mut end = self.source.len();
        while let Some((index, c)) = self.chars.next() {
            match c {
                '\\' => {
                    self.chars.next();
                }
                '\n' => {
                    end = index;
                    break;
                }
                c if c == quote => {
                    terminated = true;
                    end = index + c.len_utf8();
                    break;
                }
                _ => (),
            }
        }
        self.token(TokenKind::Str { terminated }, start, end)
    }

    /// Read a backtick template literal. Unlike plain strings these may span
    /// multiple lines.
    fn read_template(&mut self, start: usize) -> Token<'a> {
        let mut terminated = false;
        let mut end = self.source.len();
        while let Some((index, c)) = self.chars.next() {
            match c {
                '\\' => {
                    self.chars.next();
                }
                '`' => {
                    terminated = true;
                    end = index + 1;
                    break;
                }
                _ => (),
            }
        }
        self.token(TokenKind::Template { terminated }, start, end)
    }

    /// Skip the rest of a `//` or `/* */` comment. Returns whether a comment
    /// was actually skipped.
    fn skip_comment(&mut self) -> bool {
        match self.chars.peek() {
            Some(&(_, '/')) => {
                self.read_while(|c| c != '\n');
                true
            }
            Some(&(_, '*')) => {
                self.chars.next();
                let mut last_was_star = false;
                while let Some((_, c)) = self.chars.next() {
                    if last_was_star && c == '/' {
                        break;
                    }
                    last_was_star = c == '*';
                }
                true
            }
            _ => false,
        }
    }

    fn read_punct(&mut self, start: usize, c: char) -> Token<'a> {
        let (punct, len) = match c {
            '(' => (Punct::OpenParen, 1),
            ')' => (Punct::CloseParen, 1),
            '[' => (Punct::OpenBracket, 1),
            ']' => (Punct::CloseBracket, 1),
            '{' => (Punct::OpenBrace, 1),
            '}' => (Punct::CloseBrace, 1),
            ',' => (Punct::Comma, 1),
            ';' => (Punct::Semicolon, 1),
            '=' => (Punct::Equals, 1),
            '?' => match self.chars.peek() {
                Some(&(_, '.')) => {
                    self.chars.next();
                    (Punct::OptionalChain, 2)
                }
                _ => (Punct::Unknown, 1),
            },
            '.' => {
                if self.source[start..].starts_with("...") {
                    self.chars.next();
                    self.chars.next();
                    (Punct::Ellipsis, 3)
                } else {
                    (Punct::Dot, 1)
                }
            }
            other => (Punct::Unknown, other.len_utf8()),
        };
        self.token(TokenKind::Punct(punct), start, start + len)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, c) = self.chars.next()?;
            if c.is_whitespace() {
                continue;
            }
            if c == '/' && self.skip_comment() {
                continue;
            }
            return Some(match c {
                '"' | '\'' => self.read_string(index, c),
                '`' => self.read_template(index),
                c if c.is_ascii_digit() => {
                    let end = self.read_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
                    self.token(TokenKind::Number, index, end)
                }
                c if c.is_alphabetic() || c == '_' || c == '$' => {
                    let end = self.read_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                    self.token(TokenKind::Identifier, index, end)
                }
                c => self.read_punct(index, c),
            });
        }
    }
}
