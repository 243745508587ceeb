//! C4: unsupervised ML anomaly detector (SPEC_FULL.md §4.4).

pub mod features;
pub mod model;
pub mod scaler;
pub mod tree;

pub use features::{ConnectionFeatures, FeatureVector, FEATURE_COUNT};
pub use model::{AnomalyResult, IsolationForestModel};
pub use scaler::StandardScaler;
pub use tree::{IsolationNode, IsolationTree};
