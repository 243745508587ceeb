//! Communication-graph edge data (SPEC_FULL.md §3, §4.3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub protocols: HashSet<String>,
    pub count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Edge {
    pub fn new(protocol: &str, at: DateTime<Utc>) -> Self {
        let mut protocols = HashSet::new();
        protocols.insert(protocol.to_owned());
        Self {
            protocols,
            count: 1,
            first_seen: at,
            last_seen: at,
        }
    }

    pub fn record(&mut self, protocol: &str, at: DateTime<Utc>) {
        self.count += 1;
        self.protocols.insert(protocol.to_owned());
        self.last_seen = at;
    }

    pub fn has_lateral_movement_protocol(&self) -> bool {
        self.protocols.iter().any(|p| p == "SMB" || p == "RDP")
    }
}
