use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// MetricsReport
///
/// Point-in-time snapshot of this thread's compilation counters.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct MetricsReport {
    pub requests_compiled: u64,
    pub requests_rejected: u64,
    pub models: BTreeMap<String, ModelCounters>,
}

///
/// ModelCounters
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct ModelCounters {
    pub compiled: u64,
    pub rejected: u64,
}

thread_local! {
    static STATE: RefCell<MetricsReport> = RefCell::new(MetricsReport::default());
}

fn with_state_mut<R>(f: impl FnOnce(&mut MetricsReport) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

pub(crate) fn record_compiled(model: &str) {
    with_state_mut(|state| {
        state.requests_compiled = state.requests_compiled.saturating_add(1);
        let entry = state.models.entry(model.to_string()).or_default();
        entry.compiled = entry.compiled.saturating_add(1);
    });
}

pub(crate) fn record_rejected(model: &str) {
    with_state_mut(|state| {
        state.requests_rejected = state.requests_rejected.saturating_add(1);
        let entry = state.models.entry(model.to_string()).or_default();
        entry.rejected = entry.rejected.saturating_add(1);
    });
}

/// Snapshot this thread's counters.
#[must_use]
pub fn metrics_report() -> MetricsReport {
    STATE.with(|state| state.borrow().clone())
}

/// Reset this thread's counters.
pub fn metrics_reset() {
    with_state_mut(|state| *state = MetricsReport::default());
}

///
/// TESTS
///
