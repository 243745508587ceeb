//! Decision fusion: Bayesian posterior + weighted vote, context, action
//! ladder (SPEC_FULL.md §4.7).

use crate::bayes::calculate_posterior;
use crate::config::FusionConfig;
use crate::confidence::confidence_from_triggered_count;
use crate::history::AlertHistory;
use crate::vote::weighted_vote;
use chrono::{DateTime, Timelike, Utc};
use nta_common::{Action, DetectionMap, ScoreMap};
use tracing::instrument;

/// Final fused decision for one event.
#[derive(Debug, Clone)]
pub struct Decision {
    pub posterior: f64,
    pub vote: Option<f64>,
    pub score: f64,
    pub confidence: f64,
    pub action: Action,
    pub is_repeat_offender: bool,
    pub off_hours: bool,
    pub is_high_value_target: bool,
}

pub struct FusionEngine {
    config: FusionConfig,
    history: AlertHistory,
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        let history = AlertHistory::with_window_hours(config.history_window_hours);
        Self { config, history }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuse detections/scores for one event and record it in history.
    ///
    /// `source` is the event's source host (history key); `destination`
    /// is checked against the VIP/critical sets. `now` is the decision
    /// instant (injected so off-hours/history logic is reproducible in
    /// tests).
    #[instrument(skip(self, detections, scores), fields(source, destination))]
    pub fn decide(
        &mut self,
        source: &str,
        destination: &str,
        detections: &DetectionMap,
        scores: &ScoreMap,
        now: DateTime<Utc>,
    ) -> Decision {
        let posterior = calculate_posterior(detections, &self.config.accuracy_table);

        let vote = if scores.is_empty() {
            None
        } else {
            Some(weighted_vote(scores, &self.config.accuracy_table))
        };

        let mut score = match vote {
            Some(v) => 0.6 * posterior + 0.4 * v,
            None => posterior,
        };

        let confidence = confidence_from_triggered_count(detections.triggered_count());

        let is_high_value_target = self.config.is_high_value_target(destination);
        if is_high_value_target {
            score = (score * 1.3).min(1.0);
        }

        let is_repeat_offender = self.history.is_repeat_offender(source, now);
        if is_repeat_offender {
            score = (score * 1.2).min(1.0);
        }

        let hour = now.hour();
        let off_hours = !(9..=17).contains(&hour) && score > 0.80;
        if off_hours {
            score = (score * 1.15).min(1.0);
        }

        let action = Action::from_score(score);
        self.history.record(source, now, score, action);

        Decision {
            posterior,
            vote,
            score,
            confidence,
            action,
            is_repeat_offender,
            off_hours,
            is_high_value_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nta_common::DetectorId;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, hour, 0, 0).unwrap()
    }

    /// Scenario D: seven triggered detectors, expect near-1.0 posterior
    /// and confidence 0.95.
    #[test]
    fn scenario_d_full_fusion() {
        let mut engine = FusionEngine::new(FusionConfig::default());
        let mut detections = DetectionMap::new();
        detections.set(DetectorId::ZeekScan, true);
        detections.set(DetectorId::ZeekAuth, true);
        detections.set(DetectorId::ZeekExec, true);
        detections.set(DetectorId::ZeekDpi, false);
        detections.set(DetectorId::ZeekEncrypted, true);
        detections.set(DetectorId::ZeekZeroday, false);
        detections.set(DetectorId::MlAnomaly, true);
        detections.set(DetectorId::GraphAnalysis, true);
        detections.set(DetectorId::ThreatIntel, false);
        detections.set(DetectorId::BaselineDeviation, true);

        let mut scores = ScoreMap::new();
        scores.set(DetectorId::MlAnomaly, 0.9);
        scores.set(DetectorId::GraphAnalysis, 0.85);

        let decision = engine.decide("10.0.0.50", "10.0.0.60", &detections, &scores, at(12));

        assert!(decision.posterior > 0.95);
        assert_eq!(decision.confidence, 0.95);
        assert!(matches!(
            decision.action,
            Action::AlertSocUrgent | Action::BlockImmediately | Action::AlertSocHigh
        ));
    }

    /// Scenario E: off-hours VIP target, repeat offender, base score 0.82.
    #[test]
    fn scenario_e_off_hours_vip_repeat_offender() {
        let mut engine = FusionEngine::new(FusionConfig::default());
        let source = "10.0.0.77";
        // Seed two prior entries so the third decision call counts as
        // the offense that crosses the repeat-offender threshold.
        engine
            .history
            .record(source, at(1), 0.5, Action::MonitorClosely);
        engine
            .history
            .record(source, at(2), 0.5, Action::MonitorClosely);

        let mut detections = DetectionMap::new();
        detections.set(DetectorId::ThreatIntel, true);
        let mut scores = ScoreMap::new();
        scores.set(DetectorId::ThreatIntel, 0.82);

        let decision = engine.decide(source, "10.0.1.1", &detections, &scores, at(3));

        assert!(decision.is_high_value_target);
        assert!(decision.is_repeat_offender);
        assert!(decision.off_hours);
        assert!(decision.score > 0.99);
        assert_eq!(decision.action, Action::BlockImmediately);
    }

    /// Scenario F: ML disabled, posterior computed over remaining detectors.
    #[test]
    fn scenario_f_ml_disabled() {
        let mut engine = FusionEngine::new(FusionConfig::default());
        let mut detections = DetectionMap::new();
        detections.set(DetectorId::MlAnomaly, false);
        detections.set(DetectorId::ZeekScan, true);

        let mut scores = ScoreMap::new();
        scores.set(DetectorId::MlAnomaly, 0.0);

        let decision = engine.decide("10.0.0.5", "10.0.0.6", &detections, &scores, at(12));
        assert!(decision.posterior > 0.0);
    }

    #[test]
    fn score_is_monotonic_under_each_adjustment_in_isolation() {
        let base_score = 0.85_f64;

        let vip = (base_score * 1.3).min(1.0);
        assert!(vip >= base_score);

        let repeat = (base_score * 1.2).min(1.0);
        assert!(repeat >= base_score);

        let off_hours = (base_score * 1.15).min(1.0);
        assert!(off_hours >= base_score);
    }
}
