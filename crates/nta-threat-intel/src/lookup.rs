//! Lookup result types returned by each IOC-kind check (SPEC_FULL.md §4.6).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpIntel {
    pub ip: String,
    pub is_malicious: bool,
    pub confidence: f64,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainIntel {
    pub domain: String,
    pub is_malicious: bool,
    pub confidence: f64,
    pub sources: Vec<String>,
    pub categories: Vec<String>,
    pub matched_pattern: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashIntel {
    pub hash: String,
    pub is_malicious: bool,
    pub confidence: f64,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ja3Intel {
    pub ja3: String,
    pub is_malicious: bool,
    pub confidence: f64,
    pub tool_name: Option<String>,
    pub tool_type: Option<String>,
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAgentIntel {
    pub user_agent: String,
    pub is_suspicious: bool,
    pub confidence: f64,
    pub category: Option<String>,
    pub matched_pattern: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortIntel {
    pub port: u16,
    pub is_suspicious: bool,
    pub confidence: f64,
    pub signature: Option<String>,
}

/// Input fields for [`crate::ThreatIntelMatcher::enrich_event`]; whichever
/// fields are present are checked, matching the original's duck-typed
/// `if 'src_ip' in event` dispatch.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentInput {
    pub src_ip: Option<String>,
    pub dst_ip: Option<String>,
    pub domain: Option<String>,
    pub file_hash: Option<String>,
    pub ja3: Option<String>,
    pub user_agent: Option<String>,
    pub dst_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventEnrichment {
    pub src_ip: Option<IpIntel>,
    pub dst_ip: Option<IpIntel>,
    pub domain: Option<DomainIntel>,
    pub file_hash: Option<HashIntel>,
    pub ja3: Option<Ja3Intel>,
    pub user_agent: Option<UserAgentIntel>,
    pub port: Option<PortIntel>,
    /// Unbounded (typically 0-200); the fusion layer normalizes by 100.
    pub risk_score: f64,
}
