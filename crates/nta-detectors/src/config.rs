//! Configuration knobs for the C2 rule-based detectors (SPEC_FULL.md §4.2).

use serde::{Deserialize, Serialize};

/// Ports that make a connection "admin-interesting": SSH, RPC/SMB, RDP,
/// WinRM (SPEC_FULL.md §3, GLOSSARY).
pub const ADMIN_INTERESTING_PORTS: [u16; 7] = [22, 135, 139, 445, 3389, 5985, 5986];

pub const ADMIN_SHARE_MARKERS: [&str; 3] = ["ADMIN$", "C$", "IPC$"];

pub const WMI_ENDPOINT_MARKERS: [&str; 3] =
    ["IWbemServices", "ISystemActivator", "IWbemLevel1Login"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Distinct admin-interesting destinations from one source before
    /// `LATERAL_SCAN` fires.
    pub scan_threshold: usize,
    /// Failed SMB authentications on one pair before `SMB_BRUTEFORCE` fires.
    pub auth_fail_threshold: u32,
    /// Distinct hosts presenting the same NTLM hash before `PASS_THE_HASH` fires.
    pub pass_the_hash_threshold: usize,
    /// Distinct admin shares touched on one pair before `PSEXEC` fires.
    pub psexec_threshold: usize,
    /// Distinct WMI endpoints invoked on one pair before `WMI_EXECUTION` fires.
    pub wmi_threshold: usize,
    /// Distinct RDP targets from one source before `RDP_HOPPING` fires.
    pub rdp_hop_threshold: usize,
    /// Number of example targets included in scan/hop alerts.
    pub example_target_cap: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            scan_threshold: 20,
            auth_fail_threshold: 5,
            pass_the_hash_threshold: 3,
            psexec_threshold: 2,
            wmi_threshold: 2,
            rdp_hop_threshold: 5,
            example_target_cap: 10,
        }
    }
}
