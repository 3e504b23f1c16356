//! Core runtime for numrange: token streams, the numeric range filter
//! parser, its collaborator contracts, and observability.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod cache;
pub mod collect;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod mapping;
pub mod obs;
pub mod parser;
pub mod range;
pub mod registry;
pub mod token;

pub(crate) mod walk;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Outer-level key that registers the built filter under a label.
pub const NAME_KEY: &str = "_name";

/// Outer-level key that requests a cache-memoized filter.
pub const CACHE_KEY: &str = "_cache";

///
/// Prelude
///
/// Prelude contains only domain vocabulary and the collaborator traits.
/// No errors, sinks, or concrete stores are re-exported here.
///

pub mod prelude {
    pub use crate::{
        cache::FilterCache,
        context::ParseContext,
        filter::Filter,
        mapping::{FieldMapping, FieldResolution, FieldResolver, MappingWrapper},
        parser::{FilterParser, NumericRangeFilterParser},
        range::{BoundSide, NumericKind, NumericRange, RangeFilter},
        registry::NamedFilterRegistry,
        token::{Scalar, Token, TokenSource},
    };
}
