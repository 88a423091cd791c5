//! JSON lexer and the JSON lexical diff tool.
//!
//! The lexer is total: whitespace is skipped and anything it does not
//! recognize becomes an `Unknown` token, so malformed JSON still diffs.
//!
//! # Examples
//!
//! ```
//! use hcsdiff::json::tokenize;
//! use hcsdiff::Document;
//!
//! let document = Document::new("string:test", "{\"a\": 1}");
//! let kinds: Vec<_> = tokenize(&document).into_iter().map(|t| t.kind).collect();
//! assert_eq!(kinds, ["LeftBrace", "String", "Colon", "Number", "RightBrace"]);
//! ```

use crate::diff::HcsDiffTool;
use crate::document::Document;
use crate::model::{Excerpt, Location, Position, Range, Weight};
use crate::token::{lexical_diff, Token, TokenValue};

pub const LEFT_BRACE: &str = "LeftBrace";
pub const RIGHT_BRACE: &str = "RightBrace";
pub const LEFT_BRACKET: &str = "LeftBracket";
pub const RIGHT_BRACKET: &str = "RightBracket";
pub const COLON: &str = "Colon";
pub const COMMA: &str = "Comma";
pub const STRING: &str = "String";
pub const NUMBER: &str = "Number";
pub const BOOLEAN: &str = "Boolean";
pub const NULL: &str = "Null";
pub const UNKNOWN: &str = "Unknown";

/// Tokenizes a JSON document.
pub fn tokenize(document: &Document) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (offset, line) in document.content().split('\n').enumerate() {
        let chars: Vec<char> = line.chars().collect();
        let mut lexer = LineLexer {
            uri: document.uri(),
            line: offset + 1,
            chars: &chars,
            index: 0,
        };
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }
    }

    tokens
}

/// JSON strings cannot contain raw line feeds, so every token lies on one line.
struct LineLexer<'a> {
    uri: &'a str,
    line: usize,
    chars: &'a [char],
    index: usize,
}

impl<'a> LineLexer<'a> {
    fn next_token(&mut self) -> Option<Token> {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.index += 1;
        }

        let start = self.index;
        let c = self.peek()?;
        let token = match c {
            '{' => self.punctuation(LEFT_BRACE),
            '}' => self.punctuation(RIGHT_BRACE),
            '[' => self.punctuation(LEFT_BRACKET),
            ']' => self.punctuation(RIGHT_BRACKET),
            ':' => self.punctuation(COLON),
            ',' => self.punctuation(COMMA),
            '"' => self.string(),
            '-' | '0'..='9' => self.number(),
            c if c.is_ascii_alphabetic() => self.literal(),
            _ => self.punctuation(UNKNOWN),
        };
        debug_assert!(self.index > start);

        Some(token)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn punctuation(&mut self, kind: &str) -> Token {
        let start = self.index;
        self.index += 1;
        Token::new(self.excerpt(start), kind)
    }

    fn string(&mut self) -> Token {
        let start = self.index;
        self.index += 1;

        let mut value = String::new();
        let mut valid = true;
        loop {
            match self.peek() {
                None => {
                    return Token::new(self.excerpt(start), UNKNOWN);
                }
                Some('"') => {
                    self.index += 1;
                    break;
                }
                Some('\\') => {
                    self.index += 1;
                    match self.escape() {
                        Some(c) => value.push(c),
                        None => valid = false,
                    }
                }
                Some(c) => {
                    self.index += 1;
                    value.push(c);
                }
            }
        }

        if valid {
            Token::valued(self.excerpt(start), STRING, TokenValue::String(value))
        } else {
            Token::new(self.excerpt(start), UNKNOWN)
        }
    }

    /// Decodes the escape after a backslash, consuming what it reads.
    fn escape(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        match c {
            '"' => Some('"'),
            '\\' => Some('\\'),
            '/' => Some('/'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'u' => {
                let digits: String = self.chars.iter().skip(self.index).take(4).collect();
                if digits.len() != 4 || !digits.chars().all(|d| d.is_ascii_hexdigit()) {
                    return None;
                }
                self.index += 4;
                u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
            }
            _ => None,
        }
    }

    fn number(&mut self) -> Token {
        let start = self.index;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.index += 1;
        }

        let raw: String = self.chars[start..self.index].iter().collect();
        match parse_number(&raw) {
            Some(number) => Token::valued(self.excerpt(start), NUMBER, TokenValue::Number(number)),
            None => Token::new(self.excerpt(start), UNKNOWN),
        }
    }

    fn literal(&mut self) -> Token {
        let start = self.index;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.index += 1;
        }

        let raw: String = self.chars[start..self.index].iter().collect();
        match raw.as_str() {
            "true" => Token::valued(self.excerpt(start), BOOLEAN, TokenValue::Bool(true)),
            "false" => Token::valued(self.excerpt(start), BOOLEAN, TokenValue::Bool(false)),
            "null" => Token::new(self.excerpt(start), NULL),
            _ => Token::new(self.excerpt(start), UNKNOWN),
        }
    }

    fn excerpt(&self, start: usize) -> Excerpt {
        let content: String = self.chars[start..self.index].iter().collect();
        let range = Range::new(
            Position::new(self.line, start + 1),
            Position::new(self.line, self.index + 1),
        );
        Excerpt::new(content, Location::new(self.uri, range))
    }
}

/// Parses a number in strict JSON grammar.
fn parse_number(raw: &str) -> Option<f64> {
    let bytes = raw.as_bytes();
    let mut i = 0;

    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        _ => return None,
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let digits = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == digits {
            return None;
        }
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let digits = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == digits {
            return None;
        }
    }

    if i != bytes.len() {
        return None;
    }
    raw.parse().ok()
}

/// Lexical diff over JSON tokens. Tokens pair by kind and literal value.
pub fn json_lexical_diff(similarity_threshold: Weight) -> HcsDiffTool<Token> {
    lexical_diff(tokenize, similarity_threshold)
}
