//! C5: baseline learner (SPEC_FULL.md §4.5).

pub mod host;
pub mod hourly;
pub mod metric;
pub mod welford;

pub use host::HostBaseline;
pub use hourly::HourlyBaseline;
pub use metric::{Metric, ALL_METRICS};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub mean: f64,
    pub std: f64,
    pub count: u64,
}

/// `host -> metric -> {mean, std, count}` (SPEC_FULL.md §6).
pub type BaselineSnapshot = HashMap<String, HashMap<String, MetricSnapshot>>;

#[derive(Debug, Clone, Default)]
pub struct BaselineLearner {
    hosts: HashMap<String, HostBaseline>,
    pub hourly: HourlyBaseline,
}

impl BaselineLearner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_host(&mut self, host: &str, metric: Metric, value: f64) {
        self.hosts.entry(host.to_owned()).or_default().update(metric, value);
    }

    /// Unknown hosts are never anomalous: cold-start is silent.
    pub fn is_host_anomalous(&self, host: &str, event: &[(Metric, f64)]) -> (bool, f64) {
        match self.hosts.get(host) {
            Some(baseline) => baseline.is_anomalous(event),
            None => (false, 0.0),
        }
    }

    pub fn update_hourly(&mut self, hour: u8, volume: f64) {
        self.hourly.update(hour, volume);
    }

    pub fn is_hourly_anomalous(&self, hour: u8, volume: f64) -> bool {
        self.hourly.is_anomalous(hour, volume)
    }

    /// Restore per-host metric statistics from a persisted snapshot.
    /// Unrecognized metric names are skipped rather than failing the
    /// whole restore (forward-compatible with a newer writer).
    pub fn import(&mut self, snapshot: &BaselineSnapshot) {
        for (host, metrics) in snapshot {
            let baseline = self.hosts.entry(host.clone()).or_default();
            for (name, stats) in metrics {
                if let Some(metric) = Metric::from_str(name) {
                    baseline.restore(metric, stats.mean, stats.std, stats.count);
                }
            }
        }
    }

    pub fn export(&self) -> BaselineSnapshot {
        self.hosts
            .iter()
            .map(|(host, baseline)| {
                let metrics = ALL_METRICS
                    .iter()
                    .map(|metric| {
                        let w = baseline.welford(*metric);
                        (
                            metric.as_str().to_owned(),
                            MetricSnapshot {
                                mean: w.mean(),
                                std: w.std(),
                                count: w.count(),
                            },
                        )
                    })
                    .collect();
                (host.clone(), metrics)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_host_is_never_anomalous() {
        let learner = BaselineLearner::new();
        let (anomalous, score) = learner.is_host_anomalous("10.0.0.9", &[(Metric::TargetCount, 9999.0)]);
        assert!(!anomalous);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn export_reflects_updates() {
        let mut learner = BaselineLearner::new();
        learner.update_host("10.0.0.5", Metric::TargetCount, 3.0);
        learner.update_host("10.0.0.5", Metric::TargetCount, 5.0);
        let snapshot = learner.export();
        let metric = &snapshot["10.0.0.5"]["target_count"];
        assert_eq!(metric.count, 2);
        assert!((metric.mean - 4.0).abs() < 1e-9);
    }
}
