//! Per-feature standardization, matching `sklearn.preprocessing.StandardScaler`.

use crate::features::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub std: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn fit(samples: &[FeatureVector]) -> Self {
        let mut mean = [0.0; FEATURE_COUNT];
        let mut std = [0.0; FEATURE_COUNT];
        if samples.is_empty() {
            return Self { mean, std };
        }

        let n = samples.len() as f64;
        for feature in 0..FEATURE_COUNT {
            let sum: f64 = samples.iter().map(|s| s[feature]).sum();
            mean[feature] = sum / n;
        }
        for feature in 0..FEATURE_COUNT {
            let variance: f64 = samples
                .iter()
                .map(|s| (s[feature] - mean[feature]).powi(2))
                .sum::<f64>()
                / n;
            std[feature] = variance.sqrt();
        }

        Self { mean, std }
    }

    pub fn transform(&self, sample: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for feature in 0..FEATURE_COUNT {
            out[feature] = if self.std[feature] > 0.0 {
                (sample[feature] - self.mean[feature]) / self.std[feature]
            } else {
                0.0
            };
        }
        out
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self {
            mean: [0.0; FEATURE_COUNT],
            std: [1.0; FEATURE_COUNT],
        }
    }
}
