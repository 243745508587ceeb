//! Per-host statistical baseline (SPEC_FULL.md §4.5).

use crate::metric::{Metric, METRIC_COUNT};
use crate::welford::Welford;

const Z_THRESHOLD: f64 = 3.0;
const ANOMALY_SCORE_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Default)]
pub struct HostBaseline {
    metrics: [Welford; METRIC_COUNT],
}

impl HostBaseline {
    pub fn update(&mut self, metric: Metric, value: f64) {
        self.metrics[metric.index()].update(value);
    }

    pub fn welford(&self, metric: Metric) -> &Welford {
        &self.metrics[metric.index()]
    }

    pub fn restore(&mut self, metric: Metric, mean: f64, std: f64, count: u64) {
        self.metrics[metric.index()] = Welford::from_stats(mean, std, count);
    }

    /// Accumulates `|z|` for every metric whose z-score exceeds the
    /// threshold; anomalous iff the accumulated score exceeds 10.
    pub fn anomaly_score(&self, event: &[(Metric, f64)]) -> f64 {
        event
            .iter()
            .filter_map(|(metric, value)| self.metrics[metric.index()].z_score(*value))
            .map(f64::abs)
            .filter(|z| *z > Z_THRESHOLD)
            .sum()
    }

    pub fn is_anomalous(&self, event: &[(Metric, f64)]) -> (bool, f64) {
        let score = self.anomaly_score(event);
        (score > ANOMALY_SCORE_THRESHOLD, score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_baseline_flags_nothing() {
        let baseline = HostBaseline::default();
        let (anomalous, score) = baseline.is_anomalous(&[(Metric::TargetCount, 500.0)]);
        assert!(!anomalous);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn large_deviation_across_metrics_is_anomalous() {
        let mut baseline = HostBaseline::default();
        for i in 0..50 {
            let jitter = if i % 2 == 0 { 1.0 } else { 2.0 };
            baseline.update(Metric::TargetCount, jitter);
            baseline.update(Metric::ConnectionRate, jitter);
            baseline.update(Metric::PortDiversity, jitter);
        }
        let event = [
            (Metric::TargetCount, 200.0),
            (Metric::ConnectionRate, 200.0),
            (Metric::PortDiversity, 200.0),
        ];
        let (anomalous, score) = baseline.is_anomalous(&event);
        assert!(anomalous);
        assert!(score > 10.0);
    }
}
