//! Fusion configuration: thresholds, accuracy table, VIP/critical sets
//! (SPEC_FULL.md §4.7, ambient config per §1).

use crate::table::{DetectorAccuracy, DEFAULT_ACCURACY_TABLE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    pub vip_hosts: HashSet<String>,
    pub critical_servers: HashSet<String>,
    #[serde(default = "default_accuracy_table")]
    pub accuracy_table: Vec<DetectorAccuracy>,
    #[serde(default = "default_history_window_hours")]
    pub history_window_hours: i64,
}

fn default_accuracy_table() -> Vec<DetectorAccuracy> {
    DEFAULT_ACCURACY_TABLE.to_vec()
}

fn default_history_window_hours() -> i64 {
    crate::history::DEFAULT_WINDOW_HOURS
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            vip_hosts: ["10.0.1.1", "10.0.2.1"].iter().map(|s| s.to_string()).collect(),
            critical_servers: ["10.0.3.1", "10.0.3.2"].iter().map(|s| s.to_string()).collect(),
            accuracy_table: default_accuracy_table(),
            history_window_hours: default_history_window_hours(),
        }
    }
}

impl FusionConfig {
    pub fn is_high_value_target(&self, destination: &str) -> bool {
        self.vip_hosts.contains(destination) || self.critical_servers.contains(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_sets() {
        let cfg = FusionConfig::default();
        assert!(cfg.is_high_value_target("10.0.1.1"));
        assert!(cfg.is_high_value_target("10.0.3.2"));
        assert!(!cfg.is_high_value_target("10.0.9.9"));
    }
}
