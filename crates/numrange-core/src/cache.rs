//! Predicate cache contract and the in-memory implementation.

use crate::{
    filter::CachedFilter,
    obs::sink::{MetricsEvent, record},
    range::{FilterKey, RangeFilter},
};
use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::{Arc, Mutex, PoisonError},
};

///
/// FilterCache
///
/// Memoizes range filters under their structural fingerprint. Memoizing two
/// structurally identical filters must yield handles to the same entry.
///

pub trait FilterCache {
    fn memoize(&self, filter: RangeFilter) -> CachedFilter;
}

///
/// InMemoryFilterCache
///

#[derive(Debug, Default)]
pub struct InMemoryFilterCache {
    entries: Mutex<BTreeMap<FilterKey, Arc<RangeFilter>>>,
}

impl InMemoryFilterCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &FilterKey) -> bool {
        self.entries().contains_key(key)
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<FilterKey, Arc<RangeFilter>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FilterCache for InMemoryFilterCache {
    fn memoize(&self, filter: RangeFilter) -> CachedFilter {
        let key = filter.fingerprint();
        let (shared, reused) = match self.entries().entry(key) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), true),
            Entry::Vacant(entry) => (Arc::clone(entry.insert(Arc::new(filter))), false),
        };

        record(MetricsEvent::CacheMemoized { reused });

        CachedFilter::new(key, shared)
    }
}

///
/// TESTS
///
