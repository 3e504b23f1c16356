use crate::{
    cache::FilterCache,
    config::ParserConfig,
    mapping::{FieldResolver, MappingWrapper, SmartNameWrapper},
    registry::NamedFilterRegistry,
};

///
/// ParseContext
///
/// Collaborators injected into one query's filter parses. The context owns
/// nothing; every parse borrows the same catalogue, cache, and registry.
///

#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    resolver: &'a dyn FieldResolver,
    cache: &'a dyn FilterCache,
    named_filters: &'a dyn NamedFilterRegistry,
    wrapper: &'a dyn MappingWrapper,
    cache_by_default: bool,
}

impl<'a> ParseContext<'a> {
    /// Build a context with the type-scoping wrapper and caching off by default.
    #[must_use]
    pub const fn new(
        resolver: &'a dyn FieldResolver,
        cache: &'a dyn FilterCache,
        named_filters: &'a dyn NamedFilterRegistry,
    ) -> Self {
        Self {
            resolver,
            cache,
            named_filters,
            wrapper: &SmartNameWrapper,
            cache_by_default: false,
        }
    }

    #[must_use]
    pub const fn with_wrapper(mut self, wrapper: &'a dyn MappingWrapper) -> Self {
        self.wrapper = wrapper;
        self
    }

    #[must_use]
    pub const fn with_config(mut self, config: &ParserConfig) -> Self {
        self.cache_by_default = config.cache_by_default;
        self
    }

    #[must_use]
    pub const fn with_cache_by_default(mut self, cache_by_default: bool) -> Self {
        self.cache_by_default = cache_by_default;
        self
    }

    pub(crate) const fn resolver(&self) -> &'a dyn FieldResolver {
        self.resolver
    }

    pub(crate) const fn cache(&self) -> &'a dyn FilterCache {
        self.cache
    }

    pub(crate) const fn named_filters(&self) -> &'a dyn NamedFilterRegistry {
        self.named_filters
    }

    pub(crate) const fn wrapper(&self) -> &'a dyn MappingWrapper {
        self.wrapper
    }

    #[must_use]
    pub const fn cache_by_default(&self) -> bool {
        self.cache_by_default
    }
}
