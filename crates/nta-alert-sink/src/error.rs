//! C8 error kinds (SPEC_FULL.md §7, §4.9).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("delivery to external collaborator failed: {0}")]
    DeliveryFailed(String),
    #[error("delivery exhausted {attempts} retries: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}
