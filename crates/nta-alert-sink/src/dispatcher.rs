//! C8: assembles, deduplicates, and forwards alerts (SPEC_FULL.md §4.8).

use crate::backoff::{deliver_with_backoff, BackoffConfig};
use crate::investigation::build_investigation;
use crate::queue::OverflowQueue;
use crate::sink::AlertSink;
use nta_common::{Action, Alert, Severity};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{info, instrument};

pub const DEFAULT_OVERFLOW_CAPACITY: usize = 1024;
pub const DEFAULT_DEDUP_CAPACITY: usize = 10_000;

/// Bounded FIFO set of recently seen dedup keys, used to make delivery
/// idempotent under duplicate submissions without growing unboundedly.
struct DedupWindow {
    capacity: usize,
    order: VecDeque<String>,
    seen: HashSet<String>,
}

impl DedupWindow {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Returns `true` if this is the first time `key` has been seen.
    fn insert(&mut self, key: String) -> bool {
        if self.seen.contains(&key) {
            return false;
        }
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.seen.insert(key);
        true
    }
}

pub struct AlertDispatcher {
    sink: Arc<dyn AlertSink>,
    backoff: BackoffConfig,
    dedup: DedupWindow,
    overflow: OverflowQueue,
}

impl AlertDispatcher {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self {
            sink,
            backoff: BackoffConfig::default(),
            dedup: DedupWindow::new(DEFAULT_DEDUP_CAPACITY),
            overflow: OverflowQueue::new(DEFAULT_OVERFLOW_CAPACITY),
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn dropped_count(&self) -> u64 {
        self.overflow.dropped_count()
    }

    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Attach investigation metadata for CRITICAL severity, unless the
    /// caller already supplied one.
    fn enrich(&self, mut alert: Alert, protocols: Vec<String>, files_transferred: Vec<String>) -> Alert {
        if alert.severity == Severity::Critical && alert.investigation.is_none() {
            alert.investigation = Some(build_investigation(
                &alert.event_summary.source,
                &alert.event_summary.destination,
                alert.timestamp,
                protocols,
                files_transferred,
                alert.recommended_action,
            ));
        }
        alert
    }

    /// Submit a decision's alert for delivery. Only actions on the
    /// actionable tier (`BLOCK_IMMEDIATELY`/`ALERT_SOC_*`) are forwarded;
    /// everything else is silently dropped here (it was already logged
    /// upstream). Duplicate (source, type, coarse-minute) submissions are
    /// idempotent no-ops.
    #[instrument(skip(self, alert, protocols, files_transferred), fields(alert_id = %alert.alert_id))]
    pub async fn submit(
        &mut self,
        alert: Alert,
        protocols: Vec<String>,
        files_transferred: Vec<String>,
    ) {
        if !alert.recommended_action.is_actionable() {
            return;
        }

        let dedup_key = alert.dedup_key();
        if !self.dedup.insert(dedup_key) {
            info!(alert_id = %alert.alert_id, "duplicate alert suppressed");
            return;
        }

        let alert = self.enrich(alert, protocols, files_transferred);

        match deliver_with_backoff(self.sink.as_ref(), &alert, self.backoff).await {
            Ok(()) => {}
            Err(err) => {
                tracing::error!(alert_id = %alert.alert_id, error = %err, "queuing alert after delivery failure");
                self.overflow.push(alert);
            }
        }
    }

    /// Retry every queued overflow alert once, re-queuing any that fail
    /// again. Intended for the pipeline's shutdown-drain sequence.
    pub async fn flush(&mut self) {
        for alert in self.overflow.drain() {
            if let Err(err) = deliver_with_backoff(self.sink.as_ref(), &alert, self.backoff).await {
                tracing::error!(alert_id = %alert.alert_id, error = %err, "flush retry failed, re-queuing");
                self.overflow.push(alert);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::InMemorySink;
    use chrono::{TimeZone, Utc};
    use nta_common::{Context, EventSummary};
    use std::collections::BTreeMap;

    fn alert(action: Action, severity: Severity, at: chrono::DateTime<Utc>) -> Alert {
        Alert {
            alert_id: format!("ALERT-{}", at.timestamp()),
            timestamp: at,
            severity,
            confidence: 0.9,
            score: 0.95,
            event_summary: EventSummary {
                source: "10.0.0.1".into(),
                destination: "10.0.0.2".into(),
                event_type: "LATERAL_SCAN".into(),
                description: "test".into(),
            },
            detections: BTreeMap::new(),
            context: Context::default(),
            recommended_action: action,
            investigation: None,
        }
    }

    #[tokio::test]
    async fn non_actionable_alert_is_dropped_silently() {
        let sink = Arc::new(InMemorySink::new());
        let mut dispatcher = AlertDispatcher::new(sink.clone());
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        dispatcher.submit(alert(Action::LogOnly, Severity::Info, at), vec![], vec![]).await;
        assert!(sink.delivered().is_empty());
    }

    #[tokio::test]
    async fn actionable_alert_is_delivered() {
        let sink = Arc::new(InMemorySink::new());
        let mut dispatcher = AlertDispatcher::new(sink.clone());
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        dispatcher
            .submit(alert(Action::AlertSocHigh, Severity::High, at), vec![], vec![])
            .await;
        assert_eq!(sink.delivered().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_submission_is_idempotent() {
        let sink = Arc::new(InMemorySink::new());
        let mut dispatcher = AlertDispatcher::new(sink.clone());
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let a = alert(Action::AlertSocHigh, Severity::High, at);
        dispatcher.submit(a.clone(), vec![], vec![]).await;
        dispatcher.submit(a, vec![], vec![]).await;
        assert_eq!(sink.delivered().len(), 1);
    }

    #[tokio::test]
    async fn critical_alert_gets_investigation_attached() {
        let sink = Arc::new(InMemorySink::new());
        let mut dispatcher = AlertDispatcher::new(sink.clone());
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        dispatcher
            .submit(
                alert(Action::BlockImmediately, Severity::Critical, at),
                vec!["SMB".into()],
                vec![],
            )
            .await;
        let delivered = sink.delivered();
        assert!(delivered[0].investigation.is_some());
    }
}
