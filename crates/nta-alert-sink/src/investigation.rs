//! CRITICAL-severity investigation/IOC enrichment (SPEC_FULL.md §4.8).

use chrono::{DateTime, Utc};
use nta_common::{Action, IocSnapshot, Investigation};

fn recommended_actions_for(action: Action) -> Vec<String> {
    let mut actions = vec![
        "Isolate the source host pending investigation.".to_owned(),
        "Preserve relevant packet captures and logs.".to_owned(),
    ];
    if matches!(action, Action::BlockImmediately) {
        actions.insert(0, "Block the source host at the network boundary.".to_owned());
    }
    actions.push("Escalate to the on-call security analyst.".to_owned());
    actions
}

/// Build investigation metadata for a CRITICAL-severity alert.
pub fn build_investigation(
    source: &str,
    destination: &str,
    at: DateTime<Utc>,
    protocols: Vec<String>,
    files_transferred: Vec<String>,
    action: Action,
) -> Investigation {
    Investigation {
        recommended_actions: recommended_actions_for(action),
        ioc_collection: IocSnapshot {
            source: source.to_owned(),
            destination: destination.to_owned(),
            timestamp: at,
            protocols,
            files_transferred,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_immediately_leads_with_blocking_action() {
        let investigation = build_investigation(
            "10.0.0.1",
            "10.0.0.2",
            Utc::now(),
            vec!["SMB".into()],
            vec![],
            Action::BlockImmediately,
        );
        assert_eq!(
            investigation.recommended_actions[0],
            "Block the source host at the network boundary."
        );
    }

    #[test]
    fn urgent_alert_skips_blocking_action() {
        let investigation = build_investigation(
            "10.0.0.1",
            "10.0.0.2",
            Utc::now(),
            vec![],
            vec![],
            Action::AlertSocUrgent,
        );
        assert!(!investigation.recommended_actions[0].contains("Block the source"));
    }
}
