use crate::{
    collect::RangeSpec,
    error::RangeParseError,
    mapping::FieldMapping,
    range::{
        BoundSide, Bounds, NumericKind, NumericRange, RangeFilter,
        native::{NativeNumber, parse_bound},
    },
};

/// Build the typed range filter for one resolved field.
///
/// `field` is the name as written in the query; the filter targets
/// `mapping.storage_name` and parses both bounds as `mapping.kind`.
pub fn build_range_filter(
    field: &str,
    mapping: &FieldMapping,
    spec: &RangeSpec,
) -> Result<RangeFilter, RangeParseError> {
    let lower = spec.lower.as_deref();
    let upper = spec.upper.as_deref();

    let range = match mapping.kind {
        NumericKind::Int32 => NumericRange::Int32(parse_bounds(field, lower, upper)?),
        NumericKind::Int64 => NumericRange::Int64(parse_bounds(field, lower, upper)?),
        NumericKind::Float32 => NumericRange::Float32(parse_bounds(field, lower, upper)?),
        NumericKind::Float64 => NumericRange::Float64(parse_bounds(field, lower, upper)?),
    };

    Ok(RangeFilter::new(
        field,
        mapping.storage_name.clone(),
        range,
        spec.include_lower,
        spec.include_upper,
    ))
}

fn parse_bounds<T>(
    field: &str,
    lower: Option<&str>,
    upper: Option<&str>,
) -> Result<Bounds<T>, RangeParseError>
where
    T: NativeNumber,
    T::Err: std::fmt::Display,
{
    Ok(Bounds {
        lower: parse_bound(field, BoundSide::Lower, lower)?,
        upper: parse_bound(field, BoundSide::Upper, upper)?,
    })
}
