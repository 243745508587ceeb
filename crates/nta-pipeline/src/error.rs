//! C0 error kinds (SPEC_FULL.md §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),
    #[error("ingest channel closed")]
    ChannelClosed,
}
