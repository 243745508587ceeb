//! The output alert record (SPEC_FULL.md §6) and its nested shapes.

use crate::detector::DetectionMap;
use crate::severity::{Action, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub source: String,
    pub destination: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Context {
    pub previous_alerts: usize,
    pub is_repeat_offender: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub off_hours: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_criticality: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IocSnapshot {
    pub source: String,
    pub destination: String,
    pub timestamp: DateTime<Utc>,
    pub protocols: Vec<String>,
    pub files_transferred: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investigation {
    pub recommended_actions: Vec<String>,
    pub ioc_collection: IocSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub confidence: f64,
    pub score: f64,
    pub event_summary: EventSummary,
    pub detections: BTreeMap<String, bool>,
    pub context: Context,
    pub recommended_action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investigation: Option<Investigation>,
}

impl Alert {
    /// Stable key used by the alert sink for idempotent delivery:
    /// (source, event type, coarse-minute) per SPEC_FULL.md §4.8.
    pub fn dedup_key(&self) -> String {
        let coarse_minute = self.timestamp.format("%Y%m%d%H%M");
        format!(
            "{}|{}|{}",
            self.event_summary.source, self.event_summary.event_type, coarse_minute
        )
    }
}

/// Format an `ALERT-YYYYmmddHHMMSS` identifier from the given instant.
pub fn format_alert_id(at: DateTime<Utc>) -> String {
    format!("ALERT-{}", at.format("%Y%m%d%H%M%S"))
}

pub fn detections_to_map(detections: &DetectionMap) -> BTreeMap<String, bool> {
    detections
        .iter()
        .map(|(id, triggered)| (id.as_str().to_owned(), triggered))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn alert_id_format() {
        let at = Utc.with_ymd_and_hms(2026, 7, 30, 13, 5, 9).unwrap();
        assert_eq!(format_alert_id(at), "ALERT-20260730130509");
    }

    #[test]
    fn dedup_key_is_coarse_minute() {
        let at = Utc.with_ymd_and_hms(2026, 7, 30, 13, 5, 9).unwrap();
        let alert = Alert {
            alert_id: format_alert_id(at),
            timestamp: at,
            severity: Severity::High,
            confidence: 0.5,
            score: 0.9,
            event_summary: EventSummary {
                source: "10.0.0.1".into(),
                destination: "10.0.0.2".into(),
                event_type: "LATERAL_SCAN".into(),
                description: "test".into(),
            },
            detections: BTreeMap::new(),
            context: Context::default(),
            recommended_action: Action::MonitorClosely,
            investigation: None,
        };
        assert_eq!(alert.dedup_key(), "10.0.0.1|LATERAL_SCAN|202607301305");
    }
}
