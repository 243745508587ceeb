//! Primitive detections emitted by the C2 handlers (SPEC_FULL.md §4.2).

use nta_common::{DetectorId, Severity};

#[derive(Debug, Clone)]
pub enum Finding {
    LateralScan {
        source: String,
        target_count: usize,
        targets: Vec<String>,
        ports: Vec<u16>,
    },
    PassTheHash {
        hash_display: String,
        affected_hosts: Vec<String>,
        host_count: usize,
    },
    Psexec {
        source: String,
        destination: String,
        shares: Vec<String>,
    },
    SmbBruteforce {
        source: String,
        destination: String,
        fail_count: u32,
    },
    WmiExecution {
        source: String,
        destination: String,
        endpoints: Vec<String>,
    },
    RdpHopping {
        source: String,
        target_count: usize,
        targets: Vec<String>,
    },
}

impl Finding {
    pub fn kind(&self) -> &'static str {
        match self {
            Finding::LateralScan { .. } => "LATERAL_SCAN",
            Finding::PassTheHash { .. } => "PASS_THE_HASH",
            Finding::Psexec { .. } => "PSEXEC",
            Finding::SmbBruteforce { .. } => "SMB_BRUTEFORCE",
            Finding::WmiExecution { .. } => "WMI_EXECUTION",
            Finding::RdpHopping { .. } => "RDP_HOPPING",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Finding::LateralScan { .. } => Severity::High,
            Finding::PassTheHash { .. } => Severity::Critical,
            Finding::Psexec { .. } => Severity::Critical,
            Finding::SmbBruteforce { .. } => Severity::Critical,
            Finding::WmiExecution { .. } => Severity::Critical,
            Finding::RdpHopping { .. } => Severity::High,
        }
    }

    /// Which fusion-layer detector identity this finding feeds into.
    /// `PASS_THE_HASH`/`SMB_BRUTEFORCE` are authentication-abuse signals
    /// (`zeek_auth`); `PSEXEC`/`WMI_EXECUTION` are remote-execution
    /// signals (`zeek_exec`); `LATERAL_SCAN`/`RDP_HOPPING` are
    /// reconnaissance/hopping signals (`zeek_scan`). This grouping
    /// mirrors how `integrated_engine.py` buckets its per-log-kind
    /// statistics counters.
    pub fn detector_id(&self) -> DetectorId {
        match self {
            Finding::LateralScan { .. } => DetectorId::ZeekScan,
            Finding::RdpHopping { .. } => DetectorId::ZeekScan,
            Finding::PassTheHash { .. } => DetectorId::ZeekAuth,
            Finding::SmbBruteforce { .. } => DetectorId::ZeekAuth,
            Finding::Psexec { .. } => DetectorId::ZeekExec,
            Finding::WmiExecution { .. } => DetectorId::ZeekExec,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Finding::LateralScan { source, .. } => Some(source),
            Finding::Psexec { source, .. } => Some(source),
            Finding::SmbBruteforce { source, .. } => Some(source),
            Finding::WmiExecution { source, .. } => Some(source),
            Finding::RdpHopping { source, .. } => Some(source),
            Finding::PassTheHash { .. } => None,
        }
    }
}
