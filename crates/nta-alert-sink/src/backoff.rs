//! Exponential backoff retry for external alert delivery (SPEC_FULL.md §4.9).

use crate::error::SinkError;
use crate::sink::AlertSink;
use nta_common::Alert;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct BackoffConfig {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
    /// Per-attempt timeout for the external call (SPEC_FULL.md §5:
    /// "every external call... carries a 10s timeout by default").
    pub call_timeout: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            max_attempts: 5,
            call_timeout: Duration::from_secs(10),
        }
    }
}

impl BackoffConfig {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let scaled = self.initial_delay.saturating_mul(1 << attempt.min(20));
        scaled.min(self.max_delay)
    }
}

/// Attempt delivery up to `config.max_attempts` times, sleeping an
/// exponentially growing delay between attempts.
pub async fn deliver_with_backoff(
    sink: &dyn AlertSink,
    alert: &Alert,
    config: BackoffConfig,
) -> Result<(), SinkError> {
    let mut last_error = String::new();
    for attempt in 0..config.max_attempts {
        let outcome = tokio::time::timeout(config.call_timeout, sink.deliver(alert)).await;
        match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => {
                warn!(attempt, alert_id = %alert.alert_id, error = %err, "alert delivery attempt failed");
                last_error = err.to_string();
            }
            Err(_) => {
                warn!(attempt, alert_id = %alert.alert_id, timeout = ?config.call_timeout, "alert delivery attempt timed out");
                last_error = format!("delivery timed out after {:?}", config.call_timeout);
            }
        }
        if attempt + 1 < config.max_attempts {
            tokio::time::sleep(config.delay_for_attempt(attempt)).await;
        }
    }
    Err(SinkError::RetriesExhausted {
        attempts: config.max_attempts,
        last_error,
    })
}
