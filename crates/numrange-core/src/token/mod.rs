//! Abstract token streams consumed by filter parsers.
//!
//! A token stream is the flattened shape of one JSON-like document: field
//! names, object and array delimiters, and scalar values in document order.
//! Parsers pull tokens through `TokenSource` and never see the input text.

pub mod json;

use std::{collections::VecDeque, fmt};
use thiserror::Error as ThisError;

pub use json::tokenize;

///
/// Scalar
///

#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    /// Numeric literal exactly as written in the source document.
    Number(String),
    Text(String),
}

impl Scalar {
    /// Textual form of the value, or `None` for null.
    #[must_use]
    pub fn text_or_null(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(v) => Some(v.to_string()),
            Self::Number(v) | Self::Text(v) => Some(v.clone()),
        }
    }

    /// Boolean reading of the value.
    ///
    /// Accepts JSON booleans and the literal strings `"true"` / `"false"`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Text(v) => match v.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text_or_null() {
            Some(text) => f.write_str(&text),
            None => f.write_str("null"),
        }
    }
}

///
/// Token
///

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    FieldName(String),
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Value(Scalar),
}

impl Token {
    /// Short human label used in structural error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::FieldName(_) => "field name",
            Self::StartObject => "start of object",
            Self::EndObject => "end of object",
            Self::StartArray => "start of array",
            Self::EndArray => "end of array",
            Self::Value(_) => "scalar value",
        }
    }

    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::FieldName(name.into())
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Value(Scalar::Text(value.into()))
    }

    #[must_use]
    pub fn number(literal: impl Into<String>) -> Self {
        Self::Value(Scalar::Number(literal.into()))
    }

    #[must_use]
    pub const fn bool(value: bool) -> Self {
        Self::Value(Scalar::Bool(value))
    }
}

///
/// TokenSource
///
/// Shared cursor over a token stream. Each call advances the cursor by one
/// token; `Ok(None)` marks the end of the stream.
///

pub trait TokenSource {
    fn next_token(&mut self) -> Result<Option<Token>, TokenError>;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Result<Option<Token>, TokenError> {
        (**self).next_token()
    }
}

///
/// TokenError
/// Failures raised by a token source while producing tokens.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TokenError {
    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("trailing input after document: {0}")]
    TrailingInput(String),
}

impl TokenError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }

    pub(crate) fn trailing(reason: impl Into<String>) -> Self {
        Self::TrailingInput(reason.into())
    }
}

///
/// TokenStream
/// In-memory token source; the remaining tokens stay available to the caller.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
}

impl TokenStream {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Result<Option<Token>, TokenError> {
        Ok(self.tokens.pop_front())
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

///
/// TESTS
///
