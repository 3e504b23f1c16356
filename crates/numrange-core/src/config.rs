//! TOML configuration for the parser and for a static field catalogue.
//!
//! ```toml
//! # parser.toml
//! log_level = "debug"
//! cache_by_default = false
//!
//! [aliases]
//! num_range = "numeric_range"
//!
//! # catalogue.toml
//! [[fields]]
//! name = "price"
//! kind = "float64"
//! storage = "price_dv"
//! doc_type = "product"
//! ```

use crate::mapping::{CatalogueField, FieldKind, StaticFieldResolver};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

const DEFAULT_LOG_LEVEL: &str = "warn";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("field '{name}' is declared more than once")]
    DuplicateField { name: String },
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

///
/// ParserConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Max tracing level for binaries embedding the parser.
    pub log_level: String,

    /// Whether range filters are cached when the query omits `_cache`.
    pub cache_by_default: bool,

    /// Extra parser names, alias → registered parser name.
    pub aliases: BTreeMap<String, String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            cache_by_default: false,
            aliases: BTreeMap::new(),
        }
    }
}

impl ParserConfig {
    /// Parse a configuration document. A repeated alias key is a TOML error.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read_file(path.as_ref())?)
    }
}

///
/// FieldConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
}

///
/// CatalogueConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogueConfig {
    pub fields: Vec<FieldConfig>,
}

impl CatalogueConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read_file(path.as_ref())?)
    }

    /// Build the in-memory catalogue. A field name may appear only once.
    pub fn into_resolver(self) -> Result<StaticFieldResolver, ConfigError> {
        let mut resolver = StaticFieldResolver::new();

        for field in self.fields {
            let entry = CatalogueField {
                kind: field.kind,
                storage_name: field.storage.unwrap_or_else(|| field.name.clone()),
                doc_type: field.doc_type,
            };
            if resolver.insert(&field.name, entry).is_some() {
                return Err(ConfigError::DuplicateField { name: field.name });
            }
        }

        Ok(resolver)
    }
}

///
/// TESTS
///
