//! Typed numeric ranges and the immutable range filter built from them.

mod build;
mod fingerprint;
mod native;


use derive_more::Display;
use serde::{Deserialize, Serialize};

pub use build::build_range_filter;
pub use fingerprint::FilterKey;

///
/// NumericKind
///
/// Closed set of native numeric representations a field can be declared as.
/// Always resolved from the field catalogue, never inferred from bound text.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    #[display("int32")]
    Int32,
    #[display("int64")]
    Int64,
    #[display("float32")]
    Float32,
    #[display("float64")]
    Float64,
}

impl NumericKind {
    pub const ALL: [Self; 4] = [Self::Int32, Self::Int64, Self::Float32, Self::Float64];

    /// Stable tag written into filter fingerprints.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Int32 => 0x01,
            Self::Int64 => 0x02,
            Self::Float32 => 0x03,
            Self::Float64 => 0x04,
        }
    }

    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }
}

///
/// BoundSide
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundSide {
    #[display("lower")]
    Lower,
    #[display("upper")]
    Upper,
}

///
/// Bounds
/// Optional lower/upper endpoints in one native representation.
///

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Bounds<T> {
    pub lower: Option<T>,
    pub upper: Option<T>,
}

impl<T> Bounds<T> {
    #[must_use]
    pub const fn new(lower: Option<T>, upper: Option<T>) -> Self {
        Self { lower, upper }
    }
}

impl<T: PartialOrd> Bounds<T> {
    /// True when both endpoints are present and the lower one sorts above
    /// the upper one.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some(lower), Some(upper)) => lower > upper,
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }
}

///
/// NumericRange
///
/// Bounds tagged with their numeric kind. Each variant carries the native
/// representation of that kind; values never cross between variants.
///

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumericRange {
    Int32(Bounds<i32>),
    Int64(Bounds<i64>),
    Float32(Bounds<f32>),
    Float64(Bounds<f64>),
}

impl NumericRange {
    #[must_use]
    pub const fn kind(&self) -> NumericKind {
        match self {
            Self::Int32(_) => NumericKind::Int32,
            Self::Int64(_) => NumericKind::Int64,
            Self::Float32(_) => NumericKind::Float32,
            Self::Float64(_) => NumericKind::Float64,
        }
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        match self {
            Self::Int32(bounds) => bounds.is_inverted(),
            Self::Int64(bounds) => bounds.is_inverted(),
            Self::Float32(bounds) => bounds.is_inverted(),
            Self::Float64(bounds) => bounds.is_inverted(),
        }
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        match self {
            Self::Int32(bounds) => bounds.is_unbounded(),
            Self::Int64(bounds) => bounds.is_unbounded(),
            Self::Float32(bounds) => bounds.is_unbounded(),
            Self::Float64(bounds) => bounds.is_unbounded(),
        }
    }
}

///
/// RangeFilter
///
/// Immutable range predicate over one field's stored values.
/// Built once by `build_range_filter`; ownership passes to the caller.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RangeFilter {
    field: String,
    storage_name: String,
    range: NumericRange,
    include_lower: bool,
    include_upper: bool,
}

impl RangeFilter {
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        storage_name: impl Into<String>,
        range: NumericRange,
        include_lower: bool,
        include_upper: bool,
    ) -> Self {
        Self {
            field: field.into(),
            storage_name: storage_name.into(),
            range,
            include_lower,
            include_upper,
        }
    }

    /// Field name as written in the query.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Physical storage/index name the predicate evaluates against.
    #[must_use]
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    #[must_use]
    pub const fn range(&self) -> &NumericRange {
        &self.range
    }

    #[must_use]
    pub const fn kind(&self) -> NumericKind {
        self.range.kind()
    }

    #[must_use]
    pub const fn include_lower(&self) -> bool {
        self.include_lower
    }

    #[must_use]
    pub const fn include_upper(&self) -> bool {
        self.include_upper
    }

    /// Structural identity of this filter, shared by every filter with the
    /// same storage name, kind, bounds, and inclusivity flags.
    #[must_use]
    pub fn fingerprint(&self) -> FilterKey {
        fingerprint::fingerprint_range(self)
    }
}
