//! C7 error kinds (SPEC_FULL.md §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("weight for detector {0:?} must be non-negative, got {1}")]
    NegativeWeight(nta_common::DetectorId, f64),
    #[error("prior must lie in (0,1), got {0}")]
    InvalidPrior(f64),
}

#[derive(Debug, Error)]
pub enum FusionError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
