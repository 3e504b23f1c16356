use derive_more::Display;
use numrange_core::{
    config::ConfigError,
    error::{ErrorClass, RangeParseError},
    parser::RegistryError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<RangeParseError> for Error {
    fn from(err: RangeParseError) -> Self {
        let (kind, origin) = match &err {
            RangeParseError::UnknownFilter { .. } => {
                (QueryErrorKind::UnknownFilter, ErrorOrigin::Parse)
            }
            _ => match err.class() {
                ErrorClass::Structural => (QueryErrorKind::Malformed, ErrorOrigin::Parse),
                ErrorClass::Mapping => (QueryErrorKind::UnknownField, ErrorOrigin::Mapping),
                ErrorClass::Type => (QueryErrorKind::NotNumeric, ErrorOrigin::Mapping),
                ErrorClass::BoundParse => (QueryErrorKind::InvalidBound, ErrorOrigin::Build),
            },
        };

        Self::new(ErrorKind::Query(kind), origin, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Registry, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Query(QueryErrorKind),

    /// Configuration, catalogue, or parser registration is invalid.
    Config,
}

///
/// QueryErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// Filter body does not have the expected object shape.
    Malformed,

    /// No parser answers to the filter name.
    UnknownFilter,

    /// Field is not in the catalogue.
    UnknownField,

    /// Field exists but is not numeric.
    NotNumeric,

    /// A bound does not parse as the field's numeric kind.
    InvalidBound,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Build,
    Config,
    Mapping,
    Parse,
    Registry,
}

///
/// TESTS
///
