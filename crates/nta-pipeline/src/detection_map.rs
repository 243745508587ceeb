//! Builds the per-record `DetectionMap`/`ScoreMap` C7 consumes, from
//! C2's tracked state, C3's graph signal, C4's model, C5's baselines,
//! and C6's enrichment (SPEC_FULL.md §2 data flow, §4.7 inputs).
//!
//! `zeek_dpi`, `zeek_encrypted`, and `zeek_zeroday` are never set here:
//! they correspond to out-of-scope external DPI/zero-day feeds
//! (SPEC_FULL.md §1 Non-goals) that this pipeline has no internal
//! producer for. They remain exercisable only via direct `ScoreMap`
//! construction in fusion-engine unit tests.
//!
//! The rule-based slots (`zeek_scan`/`zeek_auth`/`zeek_exec`) reflect
//! *current sustained state* — e.g. "this host's distinct
//! admin-interesting target count is already at or above the scan
//! threshold" — rather than "a `Finding` fired on exactly this record".
//! This reconciles C2's one-shot alert-on-crossing invariant
//! (SPEC_FULL.md §4.2) with the fusion layer's expectation of a
//! per-record detection map for every event, not only threshold
//! crossings.

use nta_baseline::{BaselineLearner, Metric};
use nta_common::{DetectionMap, DetectorId, Record, ScoreMap};
use nta_detectors::{DetectionConfig, DetectorEngine};
use nta_ml::AnomalyResult;
use nta_threat_intel::lookup::EnrichmentInput;
use nta_threat_intel::ThreatIntelMatcher;
use chrono::{DateTime, Utc};

fn ratio(value: usize, threshold: usize) -> f64 {
    if threshold == 0 {
        0.0
    } else {
        (value as f64 / threshold as f64).min(1.0)
    }
}

pub struct ContinuousSignals {
    pub detections: DetectionMap,
    pub scores: ScoreMap,
}

/// `hourly_volume` is the in-progress count for the record's own hour
/// bucket, from [`crate::hourly_bucket::HourlyBucketTracker`].
#[allow(clippy::too_many_arguments)]
pub fn build(
    record: &Record,
    detectors: &DetectorEngine,
    cfg: &DetectionConfig,
    baselines: &BaselineLearner,
    host_metrics: &[(Metric, f64); 5],
    hourly_volume: u64,
    ml_prediction: Option<AnomalyResult>,
    threat_intel: &ThreatIntelMatcher,
    now: DateTime<Utc>,
    graph_signal: f64,
) -> ContinuousSignals {
    let mut detections = DetectionMap::new();
    let mut scores = ScoreMap::new();

    // zeek_scan: lateral-scan target count or RDP-hop target count.
    let scan_ratio = ratio(
        detectors.host_targets(&record.source).len(),
        cfg.scan_threshold,
    );
    let rdp_ratio = ratio(
        detectors.host_rdp_target_count(&record.source),
        cfg.rdp_hop_threshold,
    );
    let scan_score = scan_ratio.max(rdp_ratio);
    detections.set(DetectorId::ZeekScan, scan_score >= 1.0);
    scores.set(DetectorId::ZeekScan, scan_score);

    // zeek_auth: SMB bruteforce failures or NTLM hash reuse.
    let auth_ratio = ratio(
        detectors.pair_failed_auth_count(&record.source, &record.destination) as usize,
        cfg.auth_fail_threshold as usize,
    );
    let hash_ratio = record
        .ntlm_response
        .as_ref()
        .map(|hash| ratio(detectors.ntlm_hash_host_count(hash), cfg.pass_the_hash_threshold))
        .unwrap_or(0.0);
    let auth_score = auth_ratio.max(hash_ratio);
    detections.set(DetectorId::ZeekAuth, auth_score >= 1.0);
    scores.set(DetectorId::ZeekAuth, auth_score);

    // zeek_exec: admin-share (PSExec) or WMI-endpoint execution.
    let psexec_ratio = ratio(
        detectors.pair_admin_share_count(&record.source, &record.destination),
        cfg.psexec_threshold,
    );
    let wmi_ratio = ratio(
        detectors.pair_wmi_endpoint_count(&record.source, &record.destination),
        cfg.wmi_threshold,
    );
    let exec_score = psexec_ratio.max(wmi_ratio);
    detections.set(DetectorId::ZeekExec, exec_score >= 1.0);
    scores.set(DetectorId::ZeekExec, exec_score);

    // ml_anomaly.
    if let Some(result) = ml_prediction {
        detections.set(DetectorId::MlAnomaly, result.anomaly);
        let score = if result.anomaly { result.confidence.clamp(0.0, 1.0) } else { 0.0 };
        scores.set(DetectorId::MlAnomaly, score);
    }

    // graph_analysis: cached fan-out/pivot signal for the source host.
    detections.set(DetectorId::GraphAnalysis, graph_signal > 0.0);
    scores.set(DetectorId::GraphAnalysis, graph_signal);

    // threat_intel: source/destination IP and destination port.
    let enrichment = threat_intel.enrich_event(
        &EnrichmentInput {
            src_ip: Some(record.source.clone()),
            dst_ip: Some(record.destination.clone()),
            dst_port: Some(record.destination_port),
            ..Default::default()
        },
        now,
    );
    let ti_score = (enrichment.risk_score / 100.0).min(1.0);
    detections.set(DetectorId::ThreatIntel, enrichment.risk_score > 0.0);
    scores.set(DetectorId::ThreatIntel, ti_score);

    // baseline_deviation: per-host z-score accumulation plus the
    // in-progress hourly-volume check.
    let (host_anomalous, host_score) = baselines.is_host_anomalous(&record.source, host_metrics);
    let hour = record_hour(record.ts);
    let hourly_anomalous = baselines.is_hourly_anomalous(hour, hourly_volume as f64);
    let baseline_score = (host_score / 20.0).min(1.0).max(if hourly_anomalous { 0.6 } else { 0.0 });
    detections.set(DetectorId::BaselineDeviation, host_anomalous || hourly_anomalous);
    scores.set(DetectorId::BaselineDeviation, baseline_score);

    ContinuousSignals { detections, scores }
}

fn record_hour(ts: f64) -> u8 {
    use chrono::Timelike;
    DateTime::<Utc>::from_timestamp(ts as i64, 0)
        .map(|dt| dt.hour() as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn conn_record(source: &str, destination: &str, port: u16) -> Record {
        Record {
            log_kind: nta_common::LogKind::Conn,
            ts: now().timestamp() as f64,
            source: source.to_owned(),
            destination: destination.to_owned(),
            source_port: 51000,
            destination_port: port,
            service: None,
            ntlm_response: None,
            path: None,
            status: None,
            endpoint: None,
            cookie: None,
            action: None,
            orig_bytes: None,
            duration: None,
        }
    }

    #[test]
    fn below_scan_threshold_is_not_triggered() {
        let mut detectors = DetectorEngine::new();
        let cfg = DetectionConfig::default();
        let record = conn_record("10.0.0.1", "10.0.0.2", 445);
        detectors.handle(&record, &cfg);

        let baselines = BaselineLearner::new();
        let threat_intel = ThreatIntelMatcher::new().unwrap();
        let signals = build(
            &record,
            &detectors,
            &cfg,
            &baselines,
            &[
                (Metric::ConnectionRate, 0.0),
                (Metric::TargetCount, 1.0),
                (Metric::PortDiversity, 1.0),
                (Metric::AvgPacketSize, 0.0),
                (Metric::SessionDuration, 0.0),
            ],
            1,
            None,
            &threat_intel,
            now(),
            0.0,
        );

        assert_eq!(signals.detections.get(DetectorId::ZeekScan), Some(false));
    }

    #[test]
    fn scan_threshold_reached_triggers_detection() {
        let mut detectors = DetectorEngine::new();
        let cfg = DetectionConfig::default();
        let mut last = conn_record("10.0.0.1", "10.0.0.2", 445);
        for i in 0..cfg.scan_threshold {
            last = conn_record("10.0.0.1", &format!("10.0.0.{}", i + 2), 445);
            detectors.handle(&last, &cfg);
        }

        let baselines = BaselineLearner::new();
        let threat_intel = ThreatIntelMatcher::new().unwrap();
        let signals = build(
            &last,
            &detectors,
            &cfg,
            &baselines,
            &[
                (Metric::ConnectionRate, 0.0),
                (Metric::TargetCount, 20.0),
                (Metric::PortDiversity, 1.0),
                (Metric::AvgPacketSize, 0.0),
                (Metric::SessionDuration, 0.0),
            ],
            1,
            None,
            &threat_intel,
            now(),
            0.0,
        );

        assert_eq!(signals.detections.get(DetectorId::ZeekScan), Some(true));
        assert_eq!(signals.scores.get(DetectorId::ZeekScan), Some(1.0));
    }

    #[test]
    fn threat_intel_hit_sets_detection_and_normalized_score() {
        let detectors = DetectorEngine::new();
        let cfg = DetectionConfig::default();
        let record = conn_record("10.0.0.1", "10.0.0.2", 445);
        let baselines = BaselineLearner::new();
        let threat_intel = ThreatIntelMatcher::new().unwrap();
        threat_intel.add_ip("10.0.0.1");

        let signals = build(
            &record,
            &detectors,
            &cfg,
            &baselines,
            &[
                (Metric::ConnectionRate, 0.0),
                (Metric::TargetCount, 0.0),
                (Metric::PortDiversity, 0.0),
                (Metric::AvgPacketSize, 0.0),
                (Metric::SessionDuration, 0.0),
            ],
            1,
            None,
            &threat_intel,
            now(),
            0.0,
        );

        assert_eq!(signals.detections.get(DetectorId::ThreatIntel), Some(true));
        assert_eq!(signals.scores.get(DetectorId::ThreatIntel), Some(0.5));
    }
}
