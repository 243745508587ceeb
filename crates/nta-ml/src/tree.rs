//! Isolation-tree structure and path-length scoring (SPEC_FULL.md §4.4).

use crate::features::FeatureVector;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IsolationNode {
    Leaf { size: usize },
    Split {
        feature: usize,
        split_value: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    root: IsolationNode,
}

impl IsolationTree {
    /// Recursively partitions `samples` on a random feature/split-value
    /// pair until `max_depth` is reached or a node holds one sample,
    /// mirroring `sklearn.ensemble.IsolationForest`'s base estimator.
    pub fn build(samples: &[FeatureVector], max_depth: usize, rng: &mut impl Rng) -> Self {
        Self {
            root: build_node(samples, 0, max_depth, rng),
        }
    }

    /// Path length for `x`, including the leaf-size path-length
    /// correction `c(size)` (SPEC_FULL.md §4.4).
    pub fn path_length(&self, x: &FeatureVector) -> f64 {
        walk(&self.root, x, 0)
    }
}

fn build_node(
    samples: &[FeatureVector],
    depth: usize,
    max_depth: usize,
    rng: &mut impl Rng,
) -> IsolationNode {
    if samples.len() <= 1 || depth >= max_depth {
        return IsolationNode::Leaf {
            size: samples.len().max(1),
        };
    }

    let feature = rng.gen_range(0..samples[0].len());
    let (min, max) = samples.iter().fold((f64::MAX, f64::MIN), |(lo, hi), s| {
        (lo.min(s[feature]), hi.max(s[feature]))
    });
    if (max - min).abs() < f64::EPSILON {
        return IsolationNode::Leaf {
            size: samples.len(),
        };
    }

    let split_value = rng.gen_range(min..max);
    let (left, right): (Vec<_>, Vec<_>) =
        samples.iter().partition(|s| s[feature] < split_value);

    if left.is_empty() || right.is_empty() {
        return IsolationNode::Leaf {
            size: samples.len(),
        };
    }

    IsolationNode::Split {
        feature,
        split_value,
        left: Box::new(build_node(&left, depth + 1, max_depth, rng)),
        right: Box::new(build_node(&right, depth + 1, max_depth, rng)),
    }
}

fn walk(node: &IsolationNode, x: &FeatureVector, depth: usize) -> f64 {
    match node {
        IsolationNode::Leaf { size } => depth as f64 + c_factor(*size),
        IsolationNode::Split {
            feature,
            split_value,
            left,
            right,
        } => {
            if x[*feature] < *split_value {
                walk(left, x, depth + 1)
            } else {
                walk(right, x, depth + 1)
            }
        }
    }
}

/// Average path length of an unsuccessful search in a binary search
/// tree of `n` nodes - the standard isolation-forest normalization
/// constant.
pub fn c_factor(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    2.0 * harmonic(n - 1.0) - (2.0 * (n - 1.0) / n)
}

fn harmonic(i: f64) -> f64 {
    const EULER_MASCHERONI: f64 = 0.5772156649015329;
    if i <= 0.0 {
        0.0
    } else {
        i.ln() + EULER_MASCHERONI
    }
}
