//! Numeric range filter parsing.
//!
//! ## Crate layout
//! - `core`: token streams, the range parser, collaborator contracts,
//!   configuration, and observability.
//! - `error`: public error taxonomy returned by the entry points below.
//!
//! `parse_json` parses one range filter body; `parse_filter_json` parses a
//! `{ "<parser name>": { ... } }` document through a parser registry.

pub use numrange_core as core;

pub mod error;

pub use error::Error;

use numrange_core::{
    context::ParseContext,
    filter::Filter,
    parser::{FilterParser, FilterParserRegistry, NumericRangeFilterParser},
    token::tokenize,
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse one numeric range filter body from JSON text.
pub fn parse_json(ctx: &ParseContext<'_>, input: &str) -> Result<Filter, Error> {
    let mut tokens = tokenize(input).map_err(numrange_core::error::RangeParseError::from)?;

    Ok(NumericRangeFilterParser.parse(ctx, &mut tokens)?)
}

/// Parse a named filter document from JSON text, dispatching on its name.
pub fn parse_filter_json(
    registry: &FilterParserRegistry,
    ctx: &ParseContext<'_>,
    input: &str,
) -> Result<Filter, Error> {
    let mut tokens = tokenize(input).map_err(numrange_core::error::RangeParseError::from)?;

    Ok(registry.parse_filter(ctx, &mut tokens)?)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        core::{
            cache::InMemoryFilterCache,
            config::{CatalogueConfig, ParserConfig},
            mapping::StaticFieldResolver,
            parser::FilterParserRegistry,
            prelude::*,
            registry::NamedFilters,
        },
        parse_filter_json, parse_json,
    };
}
