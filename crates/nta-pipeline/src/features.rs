//! Derives the shared per-record feature values that feed both C4 (ML
//! anomaly scoring) and C5 (baseline z-scores), from C2's tracked state
//! and the record itself (SPEC_FULL.md §4.4, §4.5).
//!
//! `Record` carries no response-byte count, domain, file hash, JA3, or
//! user-agent, so `upload_download_ratio` stays at its neutral fallback
//! (1.0) and `inter_arrival_variance` stays at 0.0 — there is no
//! additional per-host timing history tracked to derive a variance
//! from a single observation. Both are documented open-question
//! resolutions (`DESIGN.md`), not placeholders left to revisit.

use nta_baseline::Metric;
use nta_detectors::DetectorEngine;
use nta_ml::ConnectionFeatures;
use nta_common::Record;

/// One record's derived values, shared verbatim between C4's feature
/// vector and C5's per-metric baseline updates.
#[derive(Debug, Clone, Copy)]
pub struct DerivedFeatures {
    pub connection_rate: f64,
    pub target_count: f64,
    pub port_diversity: f64,
    pub failed_auth_ratio: f64,
    pub avg_packet_size: f64,
    pub session_duration: f64,
}

/// `prev_last_seen` is the source host's last-seen timestamp *before*
/// this record was folded into `detectors`, used to derive an
/// instantaneous connection-rate proxy.
pub fn derive(
    detectors: &DetectorEngine,
    record: &Record,
    prev_last_seen: Option<f64>,
) -> DerivedFeatures {
    let connection_rate = match prev_last_seen {
        Some(prev) => {
            let delta = (record.ts - prev).abs();
            if delta > 0.0 {
                1.0 / delta
            } else {
                0.0
            }
        }
        None => 0.0,
    };

    let target_count = detectors.host_targets(&record.source).len() as f64;
    let port_diversity = detectors.host_port_count(&record.source) as f64;

    let failed_auths = detectors.pair_failed_auth_count(&record.source, &record.destination);
    let failed_auth_ratio = failed_auths as f64 / (failed_auths as f64 + 1.0);

    DerivedFeatures {
        connection_rate,
        target_count,
        port_diversity,
        failed_auth_ratio,
        avg_packet_size: record.orig_bytes.unwrap_or(0) as f64,
        session_duration: record.duration.unwrap_or(0.0),
    }
}

impl DerivedFeatures {
    pub fn to_connection_features(self) -> ConnectionFeatures {
        ConnectionFeatures {
            connection_rate: self.connection_rate,
            target_count: self.target_count,
            port_diversity: self.port_diversity,
            failed_auth_ratio: self.failed_auth_ratio,
            avg_packet_size: self.avg_packet_size,
            session_duration: self.session_duration,
            upload_download_ratio: 1.0,
            inter_arrival_variance: 0.0,
        }
    }

    /// `(metric, value)` pairs for C5's per-host baseline update/check.
    pub fn as_host_metrics(self) -> [(Metric, f64); 5] {
        [
            (Metric::ConnectionRate, self.connection_rate),
            (Metric::TargetCount, self.target_count),
            (Metric::PortDiversity, self.port_diversity),
            (Metric::AvgPacketSize, self.avg_packet_size),
            (Metric::SessionDuration, self.session_duration),
        ]
    }
}
