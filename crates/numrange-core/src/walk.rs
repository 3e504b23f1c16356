//! Structural walk over a range filter body.
//!
//! The walker pulls tokens from a shared cursor and turns the two-level
//! object shape into flat events. It consumes exactly the tokens of one
//! outer object and leaves everything after it unread.

use crate::{
    error::{RangeParseError, StructuralError},
    token::{Scalar, Token, TokenSource},
};

///
/// WalkEvent
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum WalkEvent {
    /// Outer key whose value opens the nested bound object.
    FieldStart(String),
    /// Scalar entry inside the nested bound object.
    Bound { key: String, value: Scalar },
    /// Scalar entry directly under the outer object.
    Outer { key: String, value: Scalar },
}

///
/// WalkState
///

#[derive(Clone, Debug, Eq, PartialEq)]
enum WalkState {
    Start,
    AwaitOuterKey,
    AwaitOuterValue { key: String },
    InsideBoundObject { field: String, key: Option<String> },
    Done,
}

///
/// TokenWalker
///

pub(crate) struct TokenWalker<'a, S: TokenSource + ?Sized> {
    source: &'a mut S,
    state: WalkState,
    field: Option<String>,
}

impl<'a, S: TokenSource + ?Sized> TokenWalker<'a, S> {
    pub(crate) const fn new(source: &'a mut S) -> Self {
        Self {
            source,
            state: WalkState::Start,
            field: None,
        }
    }

    /// Advance to the next event, or `None` once the outer object closed.
    pub(crate) fn next_event(&mut self) -> Result<Option<WalkEvent>, RangeParseError> {
        loop {
            if self.state == WalkState::Done {
                return Ok(None);
            }

            let token = self
                .source
                .next_token()?
                .ok_or(StructuralError::UnexpectedEnd)?;
            let state = std::mem::replace(&mut self.state, WalkState::Done);

            match (state, token) {
                (WalkState::Start, Token::StartObject) => {
                    self.state = WalkState::AwaitOuterKey;
                }
                (WalkState::Start, other) => {
                    return Err(StructuralError::ExpectedObject {
                        found: other.describe(),
                    }
                    .into());
                }

                (WalkState::AwaitOuterKey, Token::FieldName(key)) => {
                    self.state = WalkState::AwaitOuterValue { key };
                }
                (WalkState::AwaitOuterKey, Token::EndObject) => return Ok(None),
                (WalkState::AwaitOuterKey, other) => {
                    return Err(unexpected(&other, "field name or end of object"));
                }

                (WalkState::AwaitOuterValue { key }, Token::StartObject) => {
                    if let Some(first) = &self.field {
                        return Err(StructuralError::SecondField {
                            first: first.clone(),
                            second: key,
                        }
                        .into());
                    }
                    self.field = Some(key.clone());
                    self.state = WalkState::InsideBoundObject {
                        field: key.clone(),
                        key: None,
                    };

                    return Ok(Some(WalkEvent::FieldStart(key)));
                }
                (WalkState::AwaitOuterValue { key }, Token::Value(value)) => {
                    self.state = WalkState::AwaitOuterKey;

                    return Ok(Some(WalkEvent::Outer { key, value }));
                }
                (WalkState::AwaitOuterValue { key }, Token::StartArray) => {
                    return Err(StructuralError::ArrayValue { key }.into());
                }
                (WalkState::AwaitOuterValue { .. }, other) => {
                    return Err(unexpected(&other, "object or scalar value"));
                }

                (WalkState::InsideBoundObject { field, key: None }, Token::FieldName(key)) => {
                    self.state = WalkState::InsideBoundObject {
                        field,
                        key: Some(key),
                    };
                }
                (WalkState::InsideBoundObject { key: None, .. }, Token::EndObject) => {
                    self.state = WalkState::AwaitOuterKey;
                }
                (WalkState::InsideBoundObject { key: None, .. }, other) => {
                    return Err(unexpected(&other, "bound key or end of object"));
                }
                (
                    WalkState::InsideBoundObject {
                        field,
                        key: Some(key),
                    },
                    Token::Value(value),
                ) => {
                    self.state = WalkState::InsideBoundObject { field, key: None };

                    return Ok(Some(WalkEvent::Bound { key, value }));
                }
                (
                    WalkState::InsideBoundObject {
                        field,
                        key: Some(key),
                    },
                    Token::StartObject,
                ) => {
                    return Err(StructuralError::NestedObject { field, key }.into());
                }
                (
                    WalkState::InsideBoundObject { key: Some(key), .. },
                    Token::StartArray,
                ) => {
                    return Err(StructuralError::ArrayValue { key }.into());
                }
                (WalkState::InsideBoundObject { key: Some(_), .. }, other) => {
                    return Err(unexpected(&other, "scalar bound value"));
                }

                (WalkState::Done, _) => return Ok(None),
            }
        }
    }
}

fn unexpected(token: &Token, expected: &'static str) -> RangeParseError {
    StructuralError::UnexpectedToken {
        found: token.describe(),
        expected,
    }
    .into()
}

///
/// TESTS
///
