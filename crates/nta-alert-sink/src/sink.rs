//! The `AlertSink` collaborator trait (SPEC_FULL.md §3, §4.8).
//!
//! The out-of-scope HTTP/WebSocket push and HTML rendering live behind
//! this trait, not in the core.

use crate::error::SinkError;
use async_trait::async_trait;
use nta_common::Alert;

#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, alert: &Alert) -> Result<(), SinkError>;
}

/// A sink that records every delivered alert in memory. Used by tests
/// and as a minimal standalone default.
#[derive(Debug, Default)]
pub struct InMemorySink {
    delivered: parking_lot::Mutex<Vec<Alert>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<Alert> {
        self.delivered.lock().clone()
    }
}

#[async_trait]
impl AlertSink for InMemorySink {
    async fn deliver(&self, alert: &Alert) -> Result<(), SinkError> {
        self.delivered.lock().push(alert.clone());
        Ok(())
    }
}
