//! Bayesian posterior over binary detections (SPEC_FULL.md §4.7).

use crate::table::{lookup, DetectorAccuracy};
use nta_common::DetectionMap;

/// Fixed prior probability of attack absent any evidence.
pub const PRIOR: f64 = 1e-3;

/// `P(attack | D)` for the detections present in `detections`, using the
/// given accuracy table. Detectors absent from the table are skipped;
/// detectors absent from `detections` contribute nothing.
pub fn calculate_posterior(detections: &DetectionMap, table: &[DetectorAccuracy]) -> f64 {
    let mut likelihood = 1.0;
    let mut evidence = 1.0;

    for (id, triggered) in detections.iter() {
        let Some(entry) = lookup(table, id) else {
            continue;
        };
        if triggered {
            likelihood *= entry.tpr;
            evidence *= entry.tpr * PRIOR + entry.fpr * (1.0 - PRIOR);
        } else {
            likelihood *= 1.0 - entry.tpr;
            evidence *= (1.0 - entry.tpr) * PRIOR + (1.0 - entry.fpr) * (1.0 - PRIOR);
        }
    }

    if evidence == 0.0 {
        return 0.0;
    }
    (likelihood * PRIOR) / evidence
}
