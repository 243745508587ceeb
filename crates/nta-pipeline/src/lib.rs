//! C0: pipeline orchestration. Wires C1-C8 together, owns the worker
//! lanes, and drives the shutdown/drain sequence (SPEC_FULL.md §5).

pub mod alert_builder;
pub mod artifact_store;
pub mod classifier;
pub mod config;
pub mod detection_map;
pub mod engine;
pub mod error;
pub mod features;
pub mod graph_signals;
pub mod hourly_bucket;
pub mod lane;
pub mod lanes;
pub mod metrics;
pub mod shared;

pub use artifact_store::{ArtifactError, ArtifactStore, NullArtifactStore};
pub use config::PipelineConfig;
pub use engine::DetectionPipeline;
pub use error::PipelineError;
pub use lanes::lane_for_host;
pub use metrics::PipelineMetrics;
