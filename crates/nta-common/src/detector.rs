//! Fixed detector identities and the small arrays indexed by them.
//!
//! The original system keyed detections by open string dictionaries
//! (`detections['zeek_scan'] = True`). This rewrite closes that universe
//! into an enum so detection/score maps are fixed-size arrays with O(1)
//! access and no string keys on the hot path (SPEC_FULL.md §9).

use serde::{Deserialize, Serialize};

/// One of the ten fixed detector identities the fusion engine knows
/// about. Order matches the table in SPEC_FULL.md §4.7 and is also the
/// fixed registration order the fusion engine iterates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectorId {
    ZeekScan,
    ZeekAuth,
    ZeekExec,
    ZeekDpi,
    ZeekEncrypted,
    ZeekZeroday,
    MlAnomaly,
    GraphAnalysis,
    ThreatIntel,
    BaselineDeviation,
}

pub const DETECTOR_COUNT: usize = 10;

pub const ALL_DETECTORS: [DetectorId; DETECTOR_COUNT] = [
    DetectorId::ZeekScan,
    DetectorId::ZeekAuth,
    DetectorId::ZeekExec,
    DetectorId::ZeekDpi,
    DetectorId::ZeekEncrypted,
    DetectorId::ZeekZeroday,
    DetectorId::MlAnomaly,
    DetectorId::GraphAnalysis,
    DetectorId::ThreatIntel,
    DetectorId::BaselineDeviation,
];

impl DetectorId {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DetectorId::ZeekScan => "zeek_scan",
            DetectorId::ZeekAuth => "zeek_auth",
            DetectorId::ZeekExec => "zeek_exec",
            DetectorId::ZeekDpi => "zeek_dpi",
            DetectorId::ZeekEncrypted => "zeek_encrypted",
            DetectorId::ZeekZeroday => "zeek_zeroday",
            DetectorId::MlAnomaly => "ml_anomaly",
            DetectorId::GraphAnalysis => "graph_analysis",
            DetectorId::ThreatIntel => "threat_intel",
            DetectorId::BaselineDeviation => "baseline_deviation",
        }
    }
}

/// `D: detector -> {true, false}` from SPEC_FULL.md §4.7, as a fixed
/// array. A `None` slot means the detector was not evaluated for this
/// event and is silently skipped by the fusion engine, matching the
/// original's "detector not in dict" behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionMap {
    slots: [Option<bool>; DETECTOR_COUNT],
}

impl DetectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: DetectorId, triggered: bool) {
        self.slots[id.index()] = Some(triggered);
    }

    pub fn get(&self, id: DetectorId) -> Option<bool> {
        self.slots[id.index()]
    }

    /// Iterate detectors in fixed registration order, skipping unset slots.
    pub fn iter(&self) -> impl Iterator<Item = (DetectorId, bool)> + '_ {
        ALL_DETECTORS
            .iter()
            .filter_map(move |&id| self.get(id).map(|v| (id, v)))
    }

    pub fn triggered_count(&self) -> usize {
        self.iter().filter(|(_, triggered)| *triggered).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// `S: detector -> [0,1]` from SPEC_FULL.md §4.7.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreMap {
    slots: [Option<f64>; DETECTOR_COUNT],
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: DetectorId, score: f64) {
        self.slots[id.index()] = Some(score.clamp(0.0, 1.0));
    }

    pub fn get(&self, id: DetectorId) -> Option<f64> {
        self.slots[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (DetectorId, f64)> + '_ {
        ALL_DETECTORS
            .iter()
            .filter_map(move |&id| self.get(id).map(|v| (id, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_map_round_trips() {
        let mut d = DetectionMap::new();
        d.set(DetectorId::ZeekScan, true);
        d.set(DetectorId::ThreatIntel, false);
        assert_eq!(d.get(DetectorId::ZeekScan), Some(true));
        assert_eq!(d.get(DetectorId::ThreatIntel), Some(false));
        assert_eq!(d.get(DetectorId::MlAnomaly), None);
        assert_eq!(d.triggered_count(), 1);
    }

    #[test]
    fn score_map_clamps() {
        let mut s = ScoreMap::new();
        s.set(DetectorId::MlAnomaly, 1.5);
        s.set(DetectorId::GraphAnalysis, -0.2);
        assert_eq!(s.get(DetectorId::MlAnomaly), Some(1.0));
        assert_eq!(s.get(DetectorId::GraphAnalysis), Some(0.0));
    }

    #[test]
    fn fixed_registration_order_is_preserved() {
        let mut d = DetectionMap::new();
        d.set(DetectorId::BaselineDeviation, true);
        d.set(DetectorId::ZeekScan, true);
        let order: Vec<_> = d.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![DetectorId::ZeekScan, DetectorId::BaselineDeviation]);
    }
}
