//! Named-filter registry contract and the in-memory implementation.

use crate::{
    filter::Filter,
    obs::sink::{MetricsEvent, record},
};
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

///
/// NamedFilterRegistry
///
/// Write-only sink for labelled filters. Registering an existing label
/// replaces the previous filter without error.
///

pub trait NamedFilterRegistry {
    fn register(&self, name: &str, filter: Filter);
}

///
/// NamedFilters
///

#[derive(Debug, Default)]
pub struct NamedFilters {
    filters: Mutex<BTreeMap<String, Filter>>,
}

impl NamedFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Filter> {
        self.filters().get(name).cloned()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.filters().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters().is_empty()
    }

    /// Take every registered filter, leaving the registry empty.
    #[must_use]
    pub fn drain(&self) -> BTreeMap<String, Filter> {
        std::mem::take(&mut *self.filters())
    }

    fn filters(&self) -> MutexGuard<'_, BTreeMap<String, Filter>> {
        self.filters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NamedFilterRegistry for NamedFilters {
    fn register(&self, name: &str, filter: Filter) {
        let replaced = self.filters().insert(name.to_string(), filter).is_some();

        record(MetricsEvent::NamedFilterRegistered { replaced });
    }
}
