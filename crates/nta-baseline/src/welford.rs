//! Welford's online algorithm for numerically stable mean/variance
//! (SPEC_FULL.md §4.5, §9 REDESIGN — replaces the original's
//! `(old_mean * n + x) / (n + 1)` recurrence, which accumulates error
//! over long streams).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Welford {
    /// Reconstructs accumulator state from persisted `{mean, std, count}`
    /// (SPEC_FULL.md §3: baselines are "persisted to external store;
    /// loaded at startup").
    pub fn from_stats(mean: f64, std: f64, count: u64) -> Self {
        Self {
            count,
            mean,
            m2: std * std * count as f64,
        }
    }

    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation, `sqrt(M2 / count)`.
    pub fn std(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }

    /// `|x - mean| / std`, or `None` if there is no spread to compare
    /// against (zero samples or zero variance).
    pub fn z_score(&self, x: f64) -> Option<f64> {
        let std = self.std();
        if self.count == 0 || std == 0.0 {
            None
        } else {
            Some((x - self.mean) / std)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_naive_mean_on_small_samples() {
        let mut w = Welford::default();
        for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            w.update(x);
        }
        assert!((w.mean() - 5.0).abs() < 1e-9);
        assert!((w.std() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_samples_has_no_z_score() {
        let w = Welford::default();
        assert_eq!(w.z_score(1.0), None);
    }
}
