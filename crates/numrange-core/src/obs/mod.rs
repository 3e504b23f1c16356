//! Observability: parse telemetry (metrics) and sink abstractions.
//!
//! Parsing code records `MetricsEvent`s through `sink::record` only; it never
//! touches the counter state directly.

pub mod metrics;
pub mod sink;

// re-exports
pub use metrics::{EventReport, EventState, ParseCounters};
pub use sink::{
    MetricsEvent, MetricsSink, ParseOutcome, metrics_report, metrics_reset_all, with_metrics_sink,
};
