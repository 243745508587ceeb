//! Assembles the `Alert` C8 receives from a fused `Decision` plus
//! whichever `Finding`s (if any) fired on this record (SPEC_FULL.md §6).

use chrono::{DateTime, Utc};
use nta_common::alert::{detections_to_map, format_alert_id};
use nta_common::{Alert, Context, DetectionMap, EventSummary, LogKind, Record};
use nta_detectors::Finding;
use nta_fusion::Decision;

/// Protocol label recorded on the communication graph and on an
/// alert's investigation metadata for this record's log kind.
pub fn protocol_label(record: &Record) -> String {
    match record.log_kind {
        LogKind::Conn => record.service.clone().unwrap_or_else(|| "TCP".to_owned()),
        LogKind::Ntlm => "NTLM".to_owned(),
        LogKind::SmbFiles | LogKind::SmbMapping => "SMB".to_owned(),
        LogKind::DceRpc => "DCE_RPC".to_owned(),
        LogKind::Rdp => "RDP".to_owned(),
        LogKind::Ssl => "SSL".to_owned(),
    }
}

fn describe(findings: &[Finding], detections: &DetectionMap, record: &Record) -> (String, String) {
    if let Some(finding) = findings.first() {
        let description = match finding {
            Finding::LateralScan { target_count, .. } => {
                format!("{} reached {} distinct admin-interesting targets", record.source, target_count)
            }
            Finding::PassTheHash { host_count, .. } => {
                format!("NTLM hash reused across {} hosts", host_count)
            }
            Finding::Psexec { destination, .. } => {
                format!("Admin-share execution pattern against {}", destination)
            }
            Finding::SmbBruteforce { fail_count, .. } => {
                format!("{} consecutive failed SMB authentications", fail_count)
            }
            Finding::WmiExecution { destination, .. } => {
                format!("WMI remote-execution pattern against {}", destination)
            }
            Finding::RdpHopping { target_count, .. } => {
                format!("{} distinct RDP hop targets from {}", target_count, record.source)
            }
        };
        return (finding.kind().to_owned(), description);
    }

    let triggered: Vec<&str> = detections
        .iter()
        .filter(|(_, triggered)| *triggered)
        .map(|(id, _)| id.as_str())
        .collect();
    (
        "ANOMALOUS_ACTIVITY".to_owned(),
        format!(
            "Fused anomaly signal ({}) without a discrete rule match ({} -> {})",
            triggered.join(","),
            record.source,
            record.destination
        ),
    )
}

/// Build the alert for an actionable decision. Returns `None` if the
/// decision's action is not on the actionable tier; the caller should
/// already have checked this, but the guard keeps this function total.
pub fn build(
    record: &Record,
    findings: &[Finding],
    detections: &DetectionMap,
    decision: &Decision,
    now: DateTime<Utc>,
) -> Option<Alert> {
    if !decision.action.is_actionable() {
        return None;
    }

    let (event_type, description) = describe(findings, detections, record);

    Some(Alert {
        alert_id: format_alert_id(now),
        timestamp: now,
        severity: decision.action.severity(),
        confidence: decision.confidence,
        score: decision.score,
        event_summary: EventSummary {
            source: record.source.clone(),
            destination: record.destination.clone(),
            event_type,
            description,
        },
        detections: detections_to_map(detections),
        context: Context {
            previous_alerts: 0,
            is_repeat_offender: decision.is_repeat_offender,
            off_hours: Some(decision.off_hours),
            target_criticality: if decision.is_high_value_target {
                Some("VIP_OR_CRITICAL".to_owned())
            } else {
                None
            },
        },
        recommended_action: decision.action,
        investigation: None,
    })
}

/// Files touched for the investigation IOC snapshot: only SMB
/// `FILE_OPEN` records carry a path.
pub fn files_transferred(record: &Record) -> Vec<String> {
    match record.log_kind {
        LogKind::SmbFiles if record.action.as_deref() == Some("SMB::FILE_OPEN") => {
            record.path.clone().into_iter().collect()
        }
        _ => Vec::new(),
    }
}
