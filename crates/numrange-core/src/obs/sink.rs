//! Metrics sink boundary.
//!
//! Parsing, caching, and registration code MUST NOT depend on obs::metrics
//! directly. All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{error::ErrorClass, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// ParseOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseOutcome {
    Built,
    Failed(ErrorClass),
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    ParseStart,
    ParseFinish {
        field: Option<&'a str>,
        outcome: ParseOutcome,
    },
    CacheMemoized {
        reused: bool,
    },
    NamedFilterRegistered {
        replaced: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::ParseStart => {
                metrics::with_state_mut(|m| {
                    m.ops.parse_calls = m.ops.parse_calls.saturating_add(1);
                });
            }

            MetricsEvent::ParseFinish { field, outcome } => {
                metrics::with_state_mut(|m| {
                    let ops = &mut m.ops;
                    match outcome {
                        ParseOutcome::Built => {
                            ops.filters_built = ops.filters_built.saturating_add(1);
                        }
                        ParseOutcome::Failed(ErrorClass::Structural) => {
                            ops.structural_errors = ops.structural_errors.saturating_add(1);
                        }
                        ParseOutcome::Failed(ErrorClass::Mapping) => {
                            ops.mapping_errors = ops.mapping_errors.saturating_add(1);
                        }
                        ParseOutcome::Failed(ErrorClass::Type) => {
                            ops.type_errors = ops.type_errors.saturating_add(1);
                        }
                        ParseOutcome::Failed(ErrorClass::BoundParse) => {
                            ops.bound_errors = ops.bound_errors.saturating_add(1);
                        }
                    }

                    if let Some(field) = field {
                        let entry = m.fields.entry(field.to_string()).or_default();
                        match outcome {
                            ParseOutcome::Built => {
                                entry.filters_built = entry.filters_built.saturating_add(1);
                            }
                            ParseOutcome::Failed(_) => {
                                entry.failures = entry.failures.saturating_add(1);
                            }
                        }
                    }
                });
            }

            MetricsEvent::CacheMemoized { reused } => {
                metrics::with_state_mut(|m| {
                    m.ops.cache_memoized = m.ops.cache_memoized.saturating_add(1);
                    if reused {
                        m.ops.cache_reused = m.ops.cache_reused.saturating_add(1);
                    }
                });
            }

            MetricsEvent::NamedFilterRegistered { replaced } => {
                metrics::with_state_mut(|m| {
                    m.ops.named_registered = m.ops.named_registered.saturating_add(1);
                    if replaced {
                        m.ops.named_replaced = m.ops.named_replaced.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // `ptr` was installed by `with_metrics_sink` from a live shared borrow,
        // and its guard restores the previous slot on every exit, unwinding
        // included. `record` dereferences it synchronously and never keeps it.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state.
///
/// `window_start_ms` filters by window start (`EventState::since_ms`),
/// not by per-event timestamps.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // Only the lifetime is erased; access stays shared. The pointer lives in
    // the slot for this dynamic scope alone because `Guard` restores the
    // previous value on all exits.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
