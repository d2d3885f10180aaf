use constcat::concat;

use super::*;

const METRIC_PREFIX: &str = "flannel_fixer";

pub(crate) const EVENTS_TOTAL: &str = concat!(METRIC_PREFIX, "_events_total");
pub(crate) const SKIPPED_TOTAL: &str = concat!(METRIC_PREFIX, "_skipped_total");
pub(crate) const UNCHANGED_TOTAL: &str = concat!(METRIC_PREFIX, "_unchanged_total");
pub(crate) const UPDATED_TOTAL: &str = concat!(METRIC_PREFIX, "_updated_total");

/// Reconciliation counters, exposed on the diagnostics endpoint
#[derive(Debug, Default)]
pub struct Stats {
    events: AtomicU64,
    skipped: AtomicU64,
    unchanged: AtomicU64,
    updated: AtomicU64,
}

impl Stats {
    pub fn events(&self) -> u64 {
        self.events.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn unchanged(&self) -> u64 {
        self.unchanged.load(Ordering::Relaxed)
    }

    pub fn updated(&self) -> u64 {
        self.updated.load(Ordering::Relaxed)
    }

    /// Prometheus text exposition of all counters.
    pub fn render(&self) -> String {
        [
            (EVENTS_TOTAL, "Node events received", self.events()),
            (SKIPPED_TOTAL, "Nodes skipped without a public IP", self.skipped()),
            (UNCHANGED_TOTAL, "Nodes already carrying their public IP", self.unchanged()),
            (UPDATED_TOTAL, "Nodes whose flannel annotations were rewritten", self.updated()),
        ]
        .into_iter()
        .map(|(name, help, value)| {
            format!("# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n")
        })
        .collect()
    }

    pub(crate) fn record_event(&self) {
        self.events.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unchanged(&self) {
        self.unchanged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_updated(&self) {
        self.updated.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests;
