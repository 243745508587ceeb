//! Lossless export/import of the communication graph (SPEC_FULL.md §6, §8).

use crate::edge::Edge;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub protocols: Vec<String>,
    pub count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeRecord>,
    pub timestamp: DateTime<Utc>,
}

impl EdgeRecord {
    pub fn from_edge(source: String, target: String, edge: &Edge) -> Self {
        let mut protocols: Vec<String> = edge.protocols.iter().cloned().collect();
        protocols.sort();
        Self {
            source,
            target,
            protocols,
            count: edge.count,
            first_seen: edge.first_seen,
            last_seen: edge.last_seen,
        }
    }
}
