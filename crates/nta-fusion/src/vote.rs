//! Weighted vote over continuous per-detector scores (SPEC_FULL.md §4.7).

use crate::table::{lookup, DetectorAccuracy};
use nta_common::ScoreMap;

/// `Σ(weight·score) / Σweight` over detectors present in both `scores`
/// and the accuracy table. Empty input yields 0.
pub fn weighted_vote(scores: &ScoreMap, table: &[DetectorAccuracy]) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for (id, score) in scores.iter() {
        let Some(entry) = lookup(table, id) else {
            continue;
        };
        weighted_sum += entry.weight * score;
        weight_total += entry.weight;
    }

    if weight_total == 0.0 {
        0.0
    } else {
        weighted_sum / weight_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DEFAULT_ACCURACY_TABLE;
    use nta_common::DetectorId;

    #[test]
    fn empty_scores_yield_zero() {
        let s = ScoreMap::new();
        assert_eq!(weighted_vote(&s, &DEFAULT_ACCURACY_TABLE), 0.0);
    }

    #[test]
    fn single_score_returns_itself() {
        let mut s = ScoreMap::new();
        s.set(DetectorId::ThreatIntel, 0.8);
        let vote = weighted_vote(&s, &DEFAULT_ACCURACY_TABLE);
        assert!((vote - 0.8).abs() < 1e-9);
    }

    #[test]
    fn higher_weight_detector_dominates() {
        let mut s = ScoreMap::new();
        s.set(DetectorId::ThreatIntel, 1.0); // weight 1.5
        s.set(DetectorId::ZeekZeroday, 0.0); // weight 0.7
        let vote = weighted_vote(&s, &DEFAULT_ACCURACY_TABLE);
        assert!(vote > 0.5);
    }
}
