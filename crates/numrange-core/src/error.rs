use crate::{
    range::{BoundSide, NumericKind},
    token::TokenError,
};
use thiserror::Error as ThisError;

///
/// RangeParseError
///
/// Every way one numeric range parse can fail. All variants abort the parse;
/// no partial filter is ever returned alongside them.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RangeParseError {
    #[error("malformed range filter: {0}")]
    Structural(#[from] StructuralError),

    #[error("failed to read range filter tokens: {0}")]
    Token(#[from] TokenError),

    #[error("failed to find mapping for field '{field}'")]
    UnknownField { field: String },

    #[error("field '{field}' is not numeric")]
    NotNumeric { field: String },

    #[error("invalid {side} bound '{text}' for {kind} field '{field}': {reason}")]
    BoundParse {
        field: String,
        side: BoundSide,
        kind: NumericKind,
        text: String,
        reason: String,
    },

    #[error("no filter parser registered under '{name}'")]
    UnknownFilter { name: String },
}

impl RangeParseError {
    pub(crate) fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    pub(crate) fn not_numeric(field: impl Into<String>) -> Self {
        Self::NotNumeric {
            field: field.into(),
        }
    }

    pub(crate) fn bound_parse(
        field: &str,
        side: BoundSide,
        kind: NumericKind,
        text: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::BoundParse {
            field: field.to_string(),
            side,
            kind,
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable classification of this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Structural(_) | Self::Token(_) | Self::UnknownFilter { .. } => {
                ErrorClass::Structural
            }
            Self::UnknownField { .. } => ErrorClass::Mapping,
            Self::NotNumeric { .. } => ErrorClass::Type,
            Self::BoundParse { .. } => ErrorClass::BoundParse,
        }
    }

    /// Field the error is about, when one was known at the time of failure.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownField { field }
            | Self::NotNumeric { field }
            | Self::BoundParse { field, .. } => Some(field),
            Self::Structural(_) | Self::Token(_) | Self::UnknownFilter { .. } => None,
        }
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    /// Token stream does not have the two-level object shape.
    Structural,
    /// Field is absent from the catalogue.
    Mapping,
    /// Field exists but is not one of the numeric kinds.
    Type,
    /// A bound could not be parsed into the field's numeric kind.
    BoundParse,
}

///
/// StructuralError
/// Shape violations found while walking a range filter's tokens.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StructuralError {
    #[error("expected start of object, found {found}")]
    ExpectedObject { found: &'static str },

    #[error("unexpected {found} while expecting {expected}")]
    UnexpectedToken {
        found: &'static str,
        expected: &'static str,
    },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("nested object under '{key}' in range for field '{field}'")]
    NestedObject { field: String, key: String },

    #[error("array value under '{key}' is not supported")]
    ArrayValue { key: String },

    #[error("range already targets field '{first}', found second field '{second}'")]
    SecondField { first: String, second: String },

    #[error("no field specified for range filter")]
    MissingField,

    #[error("'{key}' expects a boolean, found {found}")]
    NotBoolean { key: String, found: &'static str },
}
