use crate::range::{FilterKey, RangeFilter};
use serde::Serialize;
use std::sync::Arc;

///
/// Filter
///
/// Output of a filter parse: the range filter itself or one of the
/// wrappers layered over it by post-processing.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    Range(RangeFilter),
    Cached(CachedFilter),
    TypeScoped { doc_type: String, inner: Box<Self> },
}

impl Filter {
    /// Innermost range filter, looking through every wrapper.
    #[must_use]
    pub fn range(&self) -> &RangeFilter {
        match self {
            Self::Range(range) => range,
            Self::Cached(cached) => cached.filter(),
            Self::TypeScoped { inner, .. } => inner.range(),
        }
    }

    /// Cache key when a cached layer is present.
    #[must_use]
    pub fn cache_key(&self) -> Option<FilterKey> {
        match self {
            Self::Range(_) => None,
            Self::Cached(cached) => Some(cached.key()),
            Self::TypeScoped { inner, .. } => inner.cache_key(),
        }
    }

    #[must_use]
    pub fn cached(&self) -> Option<&CachedFilter> {
        match self {
            Self::Range(_) => None,
            Self::Cached(cached) => Some(cached),
            Self::TypeScoped { inner, .. } => inner.cached(),
        }
    }
}

///
/// CachedFilter
///
/// Cache-memoized range filter. Every `CachedFilter` handed out for the
/// same key shares one `Arc<RangeFilter>`.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CachedFilter {
    key: FilterKey,
    filter: Arc<RangeFilter>,
}

impl CachedFilter {
    #[must_use]
    pub const fn new(key: FilterKey, filter: Arc<RangeFilter>) -> Self {
        Self { key, filter }
    }

    #[must_use]
    pub const fn key(&self) -> FilterKey {
        self.key
    }

    #[must_use]
    pub fn filter(&self) -> &RangeFilter {
        &self.filter
    }

    /// True when both handles point at the same cached entry.
    #[must_use]
    pub fn shares_entry_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.filter, &other.filter)
    }
}
