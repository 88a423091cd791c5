//! Lexical tokens as diffable excerpts.
//!
//! A token carries its source excerpt, a kind name and, for literal-bearing
//! tokens, a parsed value. Tokens are compared by kind and value rather than
//! by raw text, so `1.0` and `1` are the same number token.

use crate::diff::{DiffOptions, HcsDiffTool};
use crate::document::Document;
use crate::model::{DiffLevel, Excerpt, Excerpted, Weight};
use serde::{Deserialize, Serialize};

/// Parsed value of a literal token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl TokenValue {
    /// Value equality. Numbers compare numerically; values of different
    /// variants are never equal.
    pub fn value_equals(&self, other: &TokenValue) -> bool {
        match (self, other) {
            (TokenValue::String(a), TokenValue::String(b)) => a == b,
            (TokenValue::Number(a), TokenValue::Number(b)) => a == b,
            (TokenValue::Bool(a), TokenValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}

/// A token produced by a [`Tokenizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(flatten)]
    pub excerpt: Excerpt,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TokenValue>,
}

impl Token {
    pub fn new(excerpt: Excerpt, kind: impl Into<String>) -> Self {
        Self {
            excerpt,
            kind: kind.into(),
            value: None,
        }
    }

    pub fn valued(excerpt: Excerpt, kind: impl Into<String>, value: TokenValue) -> Self {
        Self {
            excerpt,
            kind: kind.into(),
            value: Some(value),
        }
    }

    /// Tokens are equal when their kinds match and their values are either
    /// both absent or equal by [`TokenValue::value_equals`].
    pub fn equals(&self, other: &Token) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match (&self.value, &other.value) {
            (None, None) => true,
            (Some(a), Some(b)) => a.value_equals(b),
            _ => false,
        }
    }
}

impl Excerpted for Token {
    fn excerpt(&self) -> &Excerpt {
        &self.excerpt
    }
}

/// Splits a document into an ordered, non-overlapping token sequence.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, document: &Document) -> Vec<Token>;
}

impl<F> Tokenizer for F
where
    F: Fn(&Document) -> Vec<Token> + Send + Sync,
{
    fn tokenize(&self, document: &Document) -> Vec<Token> {
        self(document)
    }
}

/// Lexical diff over the tokens `tokenizer` produces.
///
/// Tokens pair when [`Token::equals`] holds; whitespace the tokenizer skips
/// is never reported.
pub fn lexical_diff(
    tokenizer: impl Tokenizer + 'static,
    similarity_threshold: Weight,
) -> HcsDiffTool<Token> {
    HcsDiffTool::new(
        DiffOptions::new(
            DiffLevel::Lexical,
            move |document: &Document| tokenizer.tokenize(document),
            similarity_threshold,
        )
        .equals(|a: &Token, b: &Token| a.equals(b)),
    )
}
