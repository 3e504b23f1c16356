//! Filter parsers and name-based dispatch.

mod numeric_range;
mod post;

#[cfg(test)]
mod tests;

use crate::{
    config::ParserConfig,
    context::ParseContext,
    error::{RangeParseError, StructuralError},
    filter::Filter,
    token::{Token, TokenSource},
};
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error as ThisError;

pub use numeric_range::NumericRangeFilterParser;
pub use post::post_process;

///
/// FilterParser
///
/// One filter kind. `parse` receives the tokens of the filter body only,
/// starting at its opening object marker.
///

pub trait FilterParser {
    /// Every name this parser answers to.
    fn names(&self) -> &'static [&'static str];

    fn parse(
        &self,
        ctx: &ParseContext<'_>,
        tokens: &mut dyn TokenSource,
    ) -> Result<Filter, RangeParseError>;
}

///
/// RegistryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegistryError {
    #[error("filter parser name '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("alias '{alias}' targets unregistered parser '{target}'")]
    UnknownTarget { alias: String, target: String },
}

///
/// FilterParserRegistry
///
/// Maps parser names (and configured aliases) to parsers, and dispatches
/// `{ "<name>": { ... } }` documents to the matching one.
///

#[derive(Clone, Default)]
pub struct FilterParserRegistry {
    parsers: BTreeMap<String, Arc<dyn FilterParser + Send + Sync>>,
}

impl FilterParserRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in parser.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(Arc::new(NumericRangeFilterParser))?;

        Ok(registry)
    }

    /// Built-in parsers plus the aliases declared in `config`.
    pub fn from_config(config: &ParserConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::with_defaults()?;
        for (alias, target) in &config.aliases {
            registry.alias(alias, target)?;
        }

        Ok(registry)
    }

    /// Register `parser` under all of its names. Nothing is registered when
    /// any name is taken.
    pub fn register(
        &mut self,
        parser: Arc<dyn FilterParser + Send + Sync>,
    ) -> Result<(), RegistryError> {
        let names = parser.names();
        if let Some(taken) = names.iter().find(|name| self.parsers.contains_key(**name)) {
            return Err(RegistryError::DuplicateName {
                name: (*taken).to_string(),
            });
        }

        for name in names {
            self.parsers.insert((*name).to_string(), Arc::clone(&parser));
        }

        Ok(())
    }

    /// Make `alias` dispatch to the parser registered as `target`.
    pub fn alias(&mut self, alias: &str, target: &str) -> Result<(), RegistryError> {
        if self.parsers.contains_key(alias) {
            return Err(RegistryError::DuplicateName {
                name: alias.to_string(),
            });
        }
        let parser = self
            .parsers
            .get(target)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownTarget {
                alias: alias.to_string(),
                target: target.to_string(),
            })?;
        self.parsers.insert(alias.to_string(), parser);

        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&(dyn FilterParser + Send + Sync)> {
        self.parsers.get(name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.parsers.keys().map(String::as_str).collect()
    }

    /// Parse one `{ "<name>": <body> }` document from `tokens`.
    pub fn parse_filter(
        &self,
        ctx: &ParseContext<'_>,
        tokens: &mut dyn TokenSource,
    ) -> Result<Filter, RangeParseError> {
        match tokens.next_token()? {
            Some(Token::StartObject) => {}
            Some(other) => {
                return Err(StructuralError::ExpectedObject {
                    found: other.describe(),
                }
                .into());
            }
            None => return Err(StructuralError::UnexpectedEnd.into()),
        }

        let name = match tokens.next_token()? {
            Some(Token::FieldName(name)) => name,
            Some(other) => {
                return Err(StructuralError::UnexpectedToken {
                    found: other.describe(),
                    expected: "filter name",
                }
                .into());
            }
            None => return Err(StructuralError::UnexpectedEnd.into()),
        };

        let parser = self
            .get(&name)
            .ok_or(RangeParseError::UnknownFilter { name })?;
        let filter = parser.parse(ctx, tokens)?;

        match tokens.next_token()? {
            Some(Token::EndObject) => Ok(filter),
            Some(other) => Err(StructuralError::UnexpectedToken {
                found: other.describe(),
                expected: "end of filter document",
            }
            .into()),
            None => Err(StructuralError::UnexpectedEnd.into()),
        }
    }
}

impl std::fmt::Debug for FilterParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterParserRegistry")
            .field("names", &self.names())
            .finish()
    }
}
