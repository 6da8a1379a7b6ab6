//! Observability: ephemeral, in-memory counters for compilation outcomes.
//!
//! Counters are thread-local; they never influence compilation output and
//! perform no I/O. Surfaces that want telemetry snapshot and reset them
//! between scrapes.

mod metrics;

pub use metrics::{MetricsReport, ModelCounters, metrics_report, metrics_reset};

pub(crate) use metrics::{record_compiled, record_rejected};
