//! C7: Bayesian/voting decision fusion engine (SPEC_FULL.md §4.7).

pub mod bayes;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod table;
pub mod vote;

pub use bayes::{calculate_posterior, PRIOR};
pub use confidence::confidence_from_triggered_count;
pub use config::FusionConfig;
pub use engine::{Decision, FusionEngine};
pub use error::{ConfigError, FusionError};
pub use history::AlertHistory;
pub use table::{DetectorAccuracy, DEFAULT_ACCURACY_TABLE};
pub use vote::weighted_vote;
