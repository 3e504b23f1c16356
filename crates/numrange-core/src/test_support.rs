//! Shared fixtures for unit tests.

use crate::{
    cache::InMemoryFilterCache,
    context::ParseContext,
    error::RangeParseError,
    filter::Filter,
    mapping::{CatalogueField, FieldKind, StaticFieldResolver},
    parser::{FilterParser, NumericRangeFilterParser},
    registry::NamedFilters,
    token::tokenize,
};

/// Catalogue covering every numeric kind plus non-numeric fields.
pub(crate) fn catalogue() -> StaticFieldResolver {
    let mut resolver = StaticFieldResolver::new()
        .with_field("age", FieldKind::Int32)
        .with_field("views", FieldKind::Int64)
        .with_field("score", FieldKind::Float32)
        .with_field("weight", FieldKind::Float64)
        .with_field("title", FieldKind::Text)
        .with_field("active", FieldKind::Boolean)
        .with_field("created", FieldKind::Date);
    resolver.insert(
        "price",
        CatalogueField {
            kind: FieldKind::Float64,
            storage_name: "price_dv".to_string(),
            doc_type: Some("product".to_string()),
        },
    );
    resolver.insert(
        "cost",
        CatalogueField {
            kind: FieldKind::Float64,
            storage_name: "price_dv".to_string(),
            doc_type: None,
        },
    );
    resolver
}

///
/// Harness
/// Owns every collaborator a parse borrows.
///

#[derive(Debug)]
pub(crate) struct Harness {
    pub(crate) resolver: StaticFieldResolver,
    pub(crate) cache: InMemoryFilterCache,
    pub(crate) named: NamedFilters,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            resolver: catalogue(),
            cache: InMemoryFilterCache::new(),
            named: NamedFilters::new(),
        }
    }

    pub(crate) fn ctx(&self) -> ParseContext<'_> {
        ParseContext::new(&self.resolver, &self.cache, &self.named)
    }

    /// Parse one range filter body with the default context.
    pub(crate) fn parse(&self, body: &str) -> Result<Filter, RangeParseError> {
        self.parse_with(&self.ctx(), body)
    }

    pub(crate) fn parse_with(
        &self,
        ctx: &ParseContext<'_>,
        body: &str,
    ) -> Result<Filter, RangeParseError> {
        let mut tokens = tokenize(body)?;
        NumericRangeFilterParser.parse(ctx, &mut tokens)
    }
}
