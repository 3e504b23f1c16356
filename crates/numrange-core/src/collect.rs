//! Bound collection: folds walk events into one `RangeSpec`.
//!
//! Recognized keys are applied in stream order and later keys overwrite
//! earlier ones for the same target. Conflicting keys such as `gt` followed
//! by `from` are not reported; the last write wins, inclusivity included.

use crate::{
    CACHE_KEY, NAME_KEY,
    error::{RangeParseError, StructuralError},
    range::BoundSide,
    token::{Scalar, TokenSource},
    walk::{TokenWalker, WalkEvent},
};

///
/// BoundEffect
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundEffect {
    /// Set the side's bound text, and force its inclusivity when given.
    Bound {
        side: BoundSide,
        inclusive: Option<bool>,
    },
    /// Set the side's inclusivity from a boolean value.
    Inclusive { side: BoundSide },
}

const fn bound(side: BoundSide, inclusive: Option<bool>) -> BoundEffect {
    BoundEffect::Bound { side, inclusive }
}

const fn inclusive(side: BoundSide) -> BoundEffect {
    BoundEffect::Inclusive { side }
}

/// Every key accepted inside the nested bound object, by exact spelling.
pub const BOUND_KEYS: &[(&str, BoundEffect)] = &[
    ("from", bound(BoundSide::Lower, None)),
    ("to", bound(BoundSide::Upper, None)),
    ("include_lower", inclusive(BoundSide::Lower)),
    ("includeLower", inclusive(BoundSide::Lower)),
    ("include_upper", inclusive(BoundSide::Upper)),
    ("includeUpper", inclusive(BoundSide::Upper)),
    ("gt", bound(BoundSide::Lower, Some(false))),
    ("gte", bound(BoundSide::Lower, Some(true))),
    ("ge", bound(BoundSide::Lower, Some(true))),
    ("lt", bound(BoundSide::Upper, Some(false))),
    ("lte", bound(BoundSide::Upper, Some(true))),
    ("le", bound(BoundSide::Upper, Some(true))),
];

/// Look up the effect of one bound key; unknown keys have none.
#[must_use]
pub fn bound_effect(key: &str) -> Option<BoundEffect> {
    BOUND_KEYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, effect)| *effect)
}

///
/// RangeSpec
///
/// Transient, per-parse accumulation of everything the filter body said.
/// Bound values stay as raw text until the field's kind is known.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RangeSpec {
    pub field_name: Option<String>,
    pub lower: Option<String>,
    pub upper: Option<String>,
    pub include_lower: bool,
    pub include_upper: bool,
    pub filter_name: Option<String>,
    pub cache_requested: bool,
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self::new(false)
    }
}

impl RangeSpec {
    #[must_use]
    pub const fn new(cache_by_default: bool) -> Self {
        Self {
            field_name: None,
            lower: None,
            upper: None,
            include_lower: true,
            include_upper: true,
            filter_name: None,
            cache_requested: cache_by_default,
        }
    }

    /// Apply one entry of the nested bound object.
    pub fn apply_bound(&mut self, key: &str, value: &Scalar) -> Result<(), StructuralError> {
        let Some(effect) = bound_effect(key) else {
            return Ok(());
        };

        match effect {
            BoundEffect::Bound { side, inclusive } => {
                *self.bound_mut(side) = value.text_or_null();
                if let Some(inclusive) = inclusive {
                    *self.inclusive_mut(side) = inclusive;
                }
            }
            BoundEffect::Inclusive { side } => {
                *self.inclusive_mut(side) = flag(key, value)?;
            }
        }

        Ok(())
    }

    /// Apply one scalar entry of the outer object. Unknown keys are ignored.
    pub fn apply_outer(&mut self, key: &str, value: &Scalar) -> Result<(), StructuralError> {
        match key {
            NAME_KEY => self.filter_name = value.text_or_null(),
            CACHE_KEY => self.cache_requested = flag(key, value)?,
            _ => {}
        }

        Ok(())
    }

    const fn bound_mut(&mut self, side: BoundSide) -> &mut Option<String> {
        match side {
            BoundSide::Lower => &mut self.lower,
            BoundSide::Upper => &mut self.upper,
        }
    }

    const fn inclusive_mut(&mut self, side: BoundSide) -> &mut bool {
        match side {
            BoundSide::Lower => &mut self.include_lower,
            BoundSide::Upper => &mut self.include_upper,
        }
    }
}

fn flag(key: &str, value: &Scalar) -> Result<bool, StructuralError> {
    value.as_bool().ok_or_else(|| StructuralError::NotBoolean {
        key: key.to_string(),
        found: value.type_name(),
    })
}

/// Walk one filter body from `source` and fold it into `spec`.
///
/// Fails when the body names no field; the walker itself rejects a second
/// field object.
pub fn collect<S>(source: &mut S, mut spec: RangeSpec) -> Result<RangeSpec, RangeParseError>
where
    S: TokenSource + ?Sized,
{
    let mut walker = TokenWalker::new(source);

    while let Some(event) = walker.next_event()? {
        match event {
            WalkEvent::FieldStart(field) => spec.field_name = Some(field),
            WalkEvent::Bound { key, value } => spec.apply_bound(&key, &value)?,
            WalkEvent::Outer { key, value } => spec.apply_outer(&key, &value)?,
        }
    }

    if spec.field_name.is_none() {
        return Err(StructuralError::MissingField.into());
    }

    Ok(spec)
}

///
/// TESTS
///
