//! Isolation-forest anomaly model (SPEC_FULL.md §4.4).

use crate::features::FeatureVector;
use crate::scaler::StandardScaler;
use crate::tree::{c_factor, IsolationTree};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MODEL_VERSION: u16 = 1;
const DEFAULT_N_ESTIMATORS: usize = 100;
const DEFAULT_SUBSAMPLE_SIZE: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForestModel {
    pub trees: Vec<IsolationTree>,
    pub scaler: StandardScaler,
    pub version: u16,
    /// Subsample size each tree was built from; required to compute the
    /// path-length normalization constant `c(n)` at scoring time.
    pub sample_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyResult {
    pub anomaly: bool,
    pub score: f64,
    pub confidence: f64,
}

impl AnomalyResult {
    pub fn disabled() -> Self {
        Self {
            anomaly: false,
            score: 0.0,
            confidence: 0.0,
        }
    }
}

impl IsolationForestModel {
    /// Trains a new model from historical feature vectors. This is the
    /// external batch collaborator's entry point (SPEC_FULL.md §4.4);
    /// the production detection path only ever loads and scores.
    pub fn train(historical: &[FeatureVector], rng: &mut impl Rng) -> Option<Self> {
        if historical.is_empty() {
            return None;
        }

        let scaler = StandardScaler::fit(historical);
        let scaled: Vec<FeatureVector> = historical.iter().map(|s| scaler.transform(s)).collect();

        let sample_size = scaled.len().min(DEFAULT_SUBSAMPLE_SIZE);
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;

        let mut indices: Vec<usize> = (0..scaled.len()).collect();
        let trees = (0..DEFAULT_N_ESTIMATORS)
            .map(|_| {
                indices.shuffle(rng);
                let subsample: Vec<FeatureVector> = indices
                    .iter()
                    .take(sample_size)
                    .map(|&i| scaled[i])
                    .collect();
                IsolationTree::build(&subsample, max_depth, rng)
            })
            .collect();

        Some(Self {
            trees,
            scaler,
            version: MODEL_VERSION,
            sample_size,
        })
    }

    pub fn predict(&self, raw_features: &FeatureVector) -> AnomalyResult {
        if self.trees.is_empty() {
            return AnomalyResult::disabled();
        }

        let scaled = self.scaler.transform(raw_features);
        let avg_path_length: f64 = self
            .trees
            .iter()
            .map(|tree| tree.path_length(&scaled))
            .sum::<f64>()
            / self.trees.len() as f64;

        let c = c_factor(self.sample_size);
        let raw_anomaly_score = if c > 0.0 {
            2f64.powf(-avg_path_length / c)
        } else {
            0.0
        };

        // sklearn's `decision_function` convention: positive is normal,
        // negative is anomalous, centered so 0.5 raw score maps to 0.
        let score = 0.5 - raw_anomaly_score;
        AnomalyResult {
            anomaly: score < 0.0,
            score,
            confidence: score.abs(),
        }
    }
}
