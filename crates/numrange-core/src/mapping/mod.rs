//! Field catalogue contracts.
//!
//! The catalogue itself lives outside this crate. Parsers see it only
//! through `FieldResolver` (name → numeric kind + storage name) and
//! `MappingWrapper` (post-build wrapping for the resolved mapping).

mod wrap;

use crate::range::NumericKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use wrap::{IdentityWrapper, MappingWrapper, SmartNameWrapper};

///
/// FieldKind
///
/// Declared kind of a catalogue field. Only the four numeric kinds can
/// back a range filter; the rest resolve as not numeric.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Int32,
    Int64,
    Float32,
    Float64,
    Text,
    Boolean,
    Date,
}

impl FieldKind {
    #[must_use]
    pub const fn numeric(self) -> Option<NumericKind> {
        match self {
            Self::Int32 => Some(NumericKind::Int32),
            Self::Int64 => Some(NumericKind::Int64),
            Self::Float32 => Some(NumericKind::Float32),
            Self::Float64 => Some(NumericKind::Float64),
            Self::Text | Self::Boolean | Self::Date => None,
        }
    }
}

impl From<NumericKind> for FieldKind {
    fn from(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Int32 => Self::Int32,
            NumericKind::Int64 => Self::Int64,
            NumericKind::Float32 => Self::Float32,
            NumericKind::Float64 => Self::Float64,
        }
    }
}

///
/// FieldMapping
/// Resolved numeric field: what the builder and wrapper need to know.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldMapping {
    /// Name as looked up.
    pub name: String,
    /// Physical storage/index name.
    pub storage_name: String,
    pub kind: NumericKind,
    /// Document type the lookup was scoped to, for `type.field` names.
    pub doc_type: Option<String>,
}

///
/// FieldResolution
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldResolution {
    Numeric(FieldMapping),
    NotNumeric,
    NotFound,
}

///
/// FieldResolver
///
/// Synchronous, side-effect-free catalogue lookup.
///

pub trait FieldResolver {
    fn resolve(&self, field: &str) -> FieldResolution;
}

///
/// CatalogueField
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CatalogueField {
    pub kind: FieldKind,
    pub storage_name: String,
    pub doc_type: Option<String>,
}

///
/// StaticFieldResolver
///
/// In-memory catalogue keyed by field name. A `type.field` lookup that
/// misses on the full name falls back to `field` when that entry belongs
/// to document type `type`, and the mapping records the type scope.
///

#[derive(Clone, Debug, Default)]
pub struct StaticFieldResolver {
    fields: BTreeMap<String, CatalogueField>,
}

impl StaticFieldResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field stored under its own name.
    #[must_use]
    pub fn with_field(mut self, name: &str, kind: FieldKind) -> Self {
        self.insert(
            name,
            CatalogueField {
                kind,
                storage_name: name.to_string(),
                doc_type: None,
            },
        );
        self
    }

    /// Insert a field, returning the entry it replaced.
    pub fn insert(&mut self, name: &str, field: CatalogueField) -> Option<CatalogueField> {
        self.fields.insert(name.to_string(), field)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogueField> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn lookup<'a>(
        &'a self,
        field: &'a str,
    ) -> Option<(&'a str, &'a CatalogueField, Option<&'a str>)> {
        if let Some(entry) = self.fields.get(field) {
            return Some((field, entry, None));
        }

        let (doc_type, name) = field.split_once('.')?;
        let entry = self.fields.get(name)?;
        (entry.doc_type.as_deref() == Some(doc_type)).then_some((name, entry, Some(doc_type)))
    }
}

impl FieldResolver for StaticFieldResolver {
    fn resolve(&self, field: &str) -> FieldResolution {
        let Some((name, entry, doc_type)) = self.lookup(field) else {
            return FieldResolution::NotFound;
        };
        let Some(kind) = entry.kind.numeric() else {
            return FieldResolution::NotNumeric;
        };

        FieldResolution::Numeric(FieldMapping {
            name: name.to_string(),
            storage_name: entry.storage_name.clone(),
            kind,
            doc_type: doc_type.map(str::to_string),
        })
    }
}

///
/// TESTS
///
