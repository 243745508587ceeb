//! Per-host, per-pair, and per-hash tracking state for C2 (SPEC_FULL.md §3).
//!
//! These trackers are owned by a single worker lane (see SPEC_FULL.md §5):
//! all records for a given source host are routed to one lane, so the maps
//! here need no internal locking.

use std::collections::HashSet;

/// Keyed by source host. Cardinalities are monotonically non-decreasing
/// within a session; only an explicit reset clears them.
#[derive(Debug, Clone, Default)]
pub struct HostActivity {
    pub targets: HashSet<String>,
    pub ports: HashSet<u16>,
    pub rdp_targets: HashSet<String>,
    pub last_seen: f64,
}

/// Keyed by `source -> destination`.
#[derive(Debug, Clone, Default)]
pub struct PairActivity {
    pub admin_shares: HashSet<String>,
    pub wmi_endpoints: HashSet<String>,
    pub failed_auths: u32,
}

/// Keyed by NTLM response hash: the set of hosts observed presenting it.
#[derive(Debug, Clone, Default)]
pub struct NtlmHashEntry {
    pub hosts: HashSet<String>,
}

/// Key for [`PairActivity`] maps: `(source, destination)`.
pub type PairKey = (String, String);
