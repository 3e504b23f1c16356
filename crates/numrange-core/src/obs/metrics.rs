use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory counters for filter parsing on this thread.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: ParseCounters,
    /// Per-field counters keyed by the field name as written in the query.
    pub fields: BTreeMap<String, FieldCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: ParseCounters::default(),
            fields: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// ParseCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ParseCounters {
    // Parser entrypoints
    pub parse_calls: u64,
    pub filters_built: u64,

    // Failures by class
    pub structural_errors: u64,
    pub mapping_errors: u64,
    pub type_errors: u64,
    pub bound_errors: u64,

    // Post-processing
    pub cache_memoized: u64,
    pub cache_reused: u64,
    pub named_registered: u64,
    pub named_replaced: u64,
}

///
/// FieldCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldCounters {
    pub filters_built: u64,
    pub failures: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub fn reset() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: Option<EventState>,
}

/// Snapshot the current state. With `window_start_ms`, counters are only
/// returned when the state window opened at or after that instant.
pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    with_state(|m| {
        let in_window = window_start_ms.is_none_or(|start| start <= m.since_ms);

        EventReport {
            counters: in_window.then(|| m.clone()),
        }
    })
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}
