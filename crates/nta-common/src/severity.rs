//! Severity and the fixed action ladder (SPEC_FULL.md §4.7, §6).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }
}

/// The recommended-action ladder, evaluated top-down against the final
/// fused score. Thresholds are fixed per SPEC_FULL.md §4.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    BlockImmediately,
    AlertSocUrgent,
    AlertSocHigh,
    AlertSocNormal,
    MonitorClosely,
    LogOnly,
}

impl Action {
    /// Map a fused score in `[0,1]` to an action per the fixed ladder.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9999 {
            Action::BlockImmediately
        } else if score >= 0.99 {
            Action::AlertSocUrgent
        } else if score >= 0.95 {
            Action::AlertSocHigh
        } else if score >= 0.90 {
            Action::AlertSocNormal
        } else if score >= 0.80 {
            Action::MonitorClosely
        } else {
            Action::LogOnly
        }
    }

    /// Fixed action-to-severity mapping (SPEC_FULL.md §6).
    pub fn severity(self) -> Severity {
        match self {
            Action::BlockImmediately | Action::AlertSocUrgent => Severity::Critical,
            Action::AlertSocHigh => Severity::High,
            Action::AlertSocNormal => Severity::Medium,
            Action::MonitorClosely => Severity::Low,
            Action::LogOnly => Severity::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::BlockImmediately => "BLOCK_IMMEDIATELY",
            Action::AlertSocUrgent => "ALERT_SOC_URGENT",
            Action::AlertSocHigh => "ALERT_SOC_HIGH",
            Action::AlertSocNormal => "ALERT_SOC_NORMAL",
            Action::MonitorClosely => "MONITOR_CLOSELY",
            Action::LogOnly => "LOG_ONLY",
        }
    }

    /// Whether an alert built from this action should be forwarded to
    /// the alert sink (SPEC_FULL.md §4.8).
    pub fn is_actionable(self) -> bool {
        matches!(
            self,
            Action::BlockImmediately | Action::AlertSocUrgent | Action::AlertSocHigh | Action::AlertSocNormal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_boundaries() {
        assert_eq!(Action::from_score(1.0), Action::BlockImmediately);
        assert_eq!(Action::from_score(0.9999), Action::BlockImmediately);
        assert_eq!(Action::from_score(0.9998), Action::AlertSocUrgent);
        assert_eq!(Action::from_score(0.99), Action::AlertSocUrgent);
        assert_eq!(Action::from_score(0.95), Action::AlertSocHigh);
        assert_eq!(Action::from_score(0.90), Action::AlertSocNormal);
        assert_eq!(Action::from_score(0.80), Action::MonitorClosely);
        assert_eq!(Action::from_score(0.1), Action::LogOnly);
    }

    #[test]
    fn severity_mapping_is_fixed() {
        assert_eq!(Action::BlockImmediately.severity(), Severity::Critical);
        assert_eq!(Action::AlertSocUrgent.severity(), Severity::Critical);
        assert_eq!(Action::AlertSocHigh.severity(), Severity::High);
        assert_eq!(Action::AlertSocNormal.severity(), Severity::Medium);
        assert_eq!(Action::MonitorClosely.severity(), Severity::Low);
        assert_eq!(Action::LogOnly.severity(), Severity::Info);
    }
}
