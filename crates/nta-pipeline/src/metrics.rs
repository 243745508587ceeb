//! Lock-free counters exposed as the "observability interface" the spec
//! defers to an out-of-scope metrics/HTTP surface (SPEC_FULL.md §7).

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct PipelineMetrics {
    records_ingested: AtomicU64,
    parse_failures: AtomicU64,
    records_ignored: AtomicU64,
    detections_emitted: AtomicU64,
    alerts_dispatched: AtomicU64,
    alerts_dropped: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_ingested(&self) {
        self.records_ingested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.records_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection(&self) {
        self.detections_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alert_dispatched(&self) {
        self.alerts_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alert_dropped(&self) {
        self.alerts_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn records_ingested(&self) -> u64 {
        self.records_ingested.load(Ordering::Relaxed)
    }

    pub fn parse_failures(&self) -> u64 {
        self.parse_failures.load(Ordering::Relaxed)
    }

    pub fn records_ignored(&self) -> u64 {
        self.records_ignored.load(Ordering::Relaxed)
    }

    pub fn detections_emitted(&self) -> u64 {
        self.detections_emitted.load(Ordering::Relaxed)
    }

    pub fn alerts_dispatched(&self) -> u64 {
        self.alerts_dispatched.load(Ordering::Relaxed)
    }

    pub fn alerts_dropped(&self) -> u64 {
        self.alerts_dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_increment() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.records_ingested(), 0);
        metrics.record_ingested();
        metrics.record_ingested();
        assert_eq!(metrics.records_ingested(), 2);
    }
}
