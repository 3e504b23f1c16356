use crate::{
    error::RangeParseError,
    range::{BoundSide, NumericKind},
};
use std::str::FromStr;

///
/// NativeNumber
///
/// Native representation of one numeric kind, parsed with that type's own
/// literal rules. Floats additionally reject results that are not finite,
/// which covers both overflow and explicit `inf`/`NaN` spellings.
///

pub(super) trait NativeNumber: FromStr + Copy {
    const KIND: NumericKind;

    /// Text handed to `FromStr`. Integral kinds take the literal as is.
    fn literal(text: &str) -> &str {
        text
    }

    fn is_representable(self) -> bool {
        true
    }
}

// Decimal literals tolerate surrounding whitespace and control characters.
fn trim_decimal(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}

impl NativeNumber for i32 {
    const KIND: NumericKind = NumericKind::Int32;
}

impl NativeNumber for i64 {
    const KIND: NumericKind = NumericKind::Int64;
}

impl NativeNumber for f32 {
    const KIND: NumericKind = NumericKind::Float32;

    fn literal(text: &str) -> &str {
        trim_decimal(text)
    }

    fn is_representable(self) -> bool {
        self.is_finite()
    }
}

impl NativeNumber for f64 {
    const KIND: NumericKind = NumericKind::Float64;

    fn literal(text: &str) -> &str {
        trim_decimal(text)
    }

    fn is_representable(self) -> bool {
        self.is_finite()
    }
}

/// Parse one optional bound into `T`.
pub(super) fn parse_bound<T>(
    field: &str,
    side: BoundSide,
    text: Option<&str>,
) -> Result<Option<T>, RangeParseError>
where
    T: NativeNumber,
    T::Err: std::fmt::Display,
{
    let Some(text) = text else {
        return Ok(None);
    };

    let value = T::literal(text).parse::<T>().map_err(|err| {
        RangeParseError::bound_parse(field, side, T::KIND, text, err.to_string())
    })?;
    if !value.is_representable() {
        return Err(RangeParseError::bound_parse(
            field,
            side,
            T::KIND,
            text,
            format!("value is out of range for {}", T::KIND),
        ));
    }

    Ok(Some(value))
}

///
/// TESTS
///
