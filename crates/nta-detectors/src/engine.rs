//! The per-lane rule-based detector engine (C2, SPEC_FULL.md §4.2).
//!
//! One `DetectorEngine` is owned by a single worker lane; all records for
//! a given source host are routed to the same lane (SPEC_FULL.md §5), so
//! the maps below need no locking.

use crate::config::{
    DetectionConfig, ADMIN_SHARE_MARKERS, WMI_ENDPOINT_MARKERS,
};
use crate::finding::Finding;
use crate::state::{HostActivity, NtlmHashEntry, PairActivity, PairKey};
use nta_common::{is_rfc1918, LogKind, Record};
use std::collections::HashMap;
use tracing::instrument;

#[derive(Debug, Default)]
pub struct DetectorEngine {
    hosts: HashMap<String, HostActivity>,
    pairs: HashMap<PairKey, PairActivity>,
    ntlm_hashes: HashMap<String, NtlmHashEntry>,
}

impl DetectorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one record to the handler for its log kind, returning
    /// zero or more findings. At most one finding per rule per record
    /// (SPEC_FULL.md §4.2 ordering & tie-breaks).
    #[instrument(skip(self, record, cfg), fields(source = %record.source, destination = %record.destination))]
    pub fn handle(&mut self, record: &Record, cfg: &DetectionConfig) -> Vec<Finding> {
        match record.log_kind {
            LogKind::Conn => self.handle_conn(record, cfg).into_iter().collect(),
            LogKind::Ntlm => self.handle_ntlm(record, cfg).into_iter().collect(),
            LogKind::SmbFiles | LogKind::SmbMapping => self.handle_smb(record, cfg),
            LogKind::DceRpc => self.handle_dce_rpc(record, cfg).into_iter().collect(),
            LogKind::Rdp => self.handle_rdp(record, cfg).into_iter().collect(),
            LogKind::Ssl => Vec::new(),
        }
    }

    fn handle_conn(&mut self, record: &Record, cfg: &DetectionConfig) -> Option<Finding> {
        if !is_rfc1918(&record.source) || !is_rfc1918(&record.destination) {
            return None;
        }
        if !crate::config::ADMIN_INTERESTING_PORTS.contains(&record.destination_port) {
            return None;
        }

        let entry = self.hosts.entry(record.source.clone()).or_default();
        entry.targets.insert(record.destination.clone());
        entry.ports.insert(record.destination_port);
        entry.last_seen = record.ts;

        let target_count = entry.targets.len();
        if target_count == cfg.scan_threshold {
            let mut targets: Vec<String> = entry.targets.iter().cloned().collect();
            targets.truncate(cfg.example_target_cap);
            let ports: Vec<u16> = entry.ports.iter().copied().collect();
            return Some(Finding::LateralScan {
                source: record.source.clone(),
                target_count,
                targets,
                ports,
            });
        }
        None
    }

    fn handle_ntlm(&mut self, record: &Record, cfg: &DetectionConfig) -> Option<Finding> {
        let hash = record.ntlm_response.as_ref()?;
        let entry = self.ntlm_hashes.entry(hash.clone()).or_default();
        entry.hosts.insert(record.source.clone());

        if entry.hosts.len() == cfg.pass_the_hash_threshold {
            let affected_hosts: Vec<String> = entry.hosts.iter().cloned().collect();
            let hash_display = truncated_hash(hash);
            return Some(Finding::PassTheHash {
                hash_display,
                host_count: affected_hosts.len(),
                affected_hosts,
            });
        }
        None
    }

    fn handle_smb(&mut self, record: &Record, cfg: &DetectionConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        let key: PairKey = (record.source.clone(), record.destination.clone());

        if record.action.as_deref() == Some("SMB::FILE_OPEN") {
            if let Some(path) = &record.path {
                if ADMIN_SHARE_MARKERS.iter().any(|marker| path.contains(marker)) {
                    let entry = self.pairs.entry(key.clone()).or_default();
                    entry.admin_shares.insert(path.clone());
                    if entry.admin_shares.len() == cfg.psexec_threshold {
                        findings.push(Finding::Psexec {
                            source: record.source.clone(),
                            destination: record.destination.clone(),
                            shares: entry.admin_shares.iter().cloned().collect(),
                        });
                    }
                }
            }
        }

        if let Some(status) = &record.status {
            if status != "STATUS_SUCCESS" {
                let entry = self.pairs.entry(key).or_default();
                entry.failed_auths += 1;
                if entry.failed_auths == cfg.auth_fail_threshold {
                    findings.push(Finding::SmbBruteforce {
                        source: record.source.clone(),
                        destination: record.destination.clone(),
                        fail_count: entry.failed_auths,
                    });
                }
            }
        }

        findings
    }

    fn handle_dce_rpc(&mut self, record: &Record, cfg: &DetectionConfig) -> Option<Finding> {
        let endpoint = record.endpoint.as_ref()?;
        if !WMI_ENDPOINT_MARKERS.iter().any(|marker| endpoint.contains(marker)) {
            return None;
        }

        let key: PairKey = (record.source.clone(), record.destination.clone());
        let entry = self.pairs.entry(key).or_default();
        entry.wmi_endpoints.insert(endpoint.clone());

        if entry.wmi_endpoints.len() == cfg.wmi_threshold {
            return Some(Finding::WmiExecution {
                source: record.source.clone(),
                destination: record.destination.clone(),
                endpoints: entry.wmi_endpoints.iter().cloned().collect(),
            });
        }
        None
    }

    fn handle_rdp(&mut self, record: &Record, cfg: &DetectionConfig) -> Option<Finding> {
        record.cookie.as_ref()?;

        let entry = self.hosts.entry(record.source.clone()).or_default();
        entry.rdp_targets.insert(record.destination.clone());

        let target_count = entry.rdp_targets.len();
        if target_count == cfg.rdp_hop_threshold {
            let mut targets: Vec<String> = entry.rdp_targets.iter().cloned().collect();
            targets.truncate(cfg.example_target_cap);
            return Some(Finding::RdpHopping {
                source: record.source.clone(),
                target_count,
                targets,
            });
        }
        None
    }

    /// Distinct admin-interesting destinations recorded for `host`, used
    /// by the cross-component subset invariant (SPEC_FULL.md §8) that
    /// ties C2's view of a host to C3's graph successors.
    pub fn host_targets(&self, host: &str) -> Vec<String> {
        self.hosts
            .get(host)
            .map(|h| h.targets.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Distinct admin-interesting ports observed from `host` so far.
    pub fn host_port_count(&self, host: &str) -> usize {
        self.hosts.get(host).map_or(0, |h| h.ports.len())
    }

    /// Distinct RDP targets observed from `host` so far.
    pub fn host_rdp_target_count(&self, host: &str) -> usize {
        self.hosts.get(host).map_or(0, |h| h.rdp_targets.len())
    }

    /// Seconds since the epoch this host was last seen, or `None` if unseen.
    pub fn host_last_seen(&self, host: &str) -> Option<f64> {
        self.hosts.get(host).map(|h| h.last_seen)
    }

    /// Distinct admin shares touched on `(source, destination)` so far.
    pub fn pair_admin_share_count(&self, source: &str, destination: &str) -> usize {
        self.pairs
            .get(&(source.to_owned(), destination.to_owned()))
            .map_or(0, |p| p.admin_shares.len())
    }

    /// Distinct WMI endpoints invoked on `(source, destination)` so far.
    pub fn pair_wmi_endpoint_count(&self, source: &str, destination: &str) -> usize {
        self.pairs
            .get(&(source.to_owned(), destination.to_owned()))
            .map_or(0, |p| p.wmi_endpoints.len())
    }

    /// Failed-authentication count accumulated on `(source, destination)`.
    pub fn pair_failed_auth_count(&self, source: &str, destination: &str) -> u32 {
        self.pairs
            .get(&(source.to_owned(), destination.to_owned()))
            .map_or(0, |p| p.failed_auths)
    }

    /// Distinct hosts observed presenting `hash` so far.
    pub fn ntlm_hash_host_count(&self, hash: &str) -> usize {
        self.ntlm_hashes.get(hash).map_or(0, |h| h.hosts.len())
    }

    pub fn reset_host(&mut self, host: &str) {
        self.hosts.remove(host);
    }

    pub fn reset_pair(&mut self, source: &str, destination: &str) {
        self.pairs.remove(&(source.to_owned(), destination.to_owned()));
    }

    pub fn reset_hash(&mut self, hash: &str) {
        self.ntlm_hashes.remove(hash);
    }
}

fn truncated_hash(hash: &str) -> String {
    let prefix: String = hash.chars().take(16).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nta_common::parse_record;
    use nta_common::record::Classification;

    fn conn_line(src: &str, dst: &str, port: u16) -> String {
        format!(
            r#"{{"_path":"conn","ts":1.0,"id.orig_h":"{src}","id.resp_h":"{dst}","id.orig_p":5000,"id.resp_p":{port}}}"#
        )
    }

    fn parse(line: &str) -> Record {
        match parse_record(line).unwrap() {
            Classification::Recognized(r) => r,
            Classification::Ignored => panic!("line should classify"),
        }
    }

    #[test]
    fn scenario_a_lateral_scan_boundary() {
        let mut engine = DetectorEngine::new();
        let cfg = DetectionConfig::default();

        for i in 0..19 {
            let dst = format!("10.0.0.{}", i + 1);
            let record = parse(&conn_line("192.168.1.100", &dst, 445));
            let findings = engine.handle(&record, &cfg);
            assert!(findings.is_empty(), "no alert expected before threshold");
        }

        let record = parse(&conn_line("192.168.1.100", "10.0.0.20", 445));
        let findings = engine.handle(&record, &cfg);
        assert_eq!(findings.len(), 1);
        match &findings[0] {
            Finding::LateralScan { target_count, .. } => assert_eq!(*target_count, 20),
            _ => panic!("expected LateralScan"),
        }

        // crossing again with a new target must not re-emit.
        let record = parse(&conn_line("192.168.1.100", "10.0.0.21", 445));
        assert!(engine.handle(&record, &cfg).is_empty());
    }

    #[test]
    fn scenario_b_pass_the_hash() {
        let mut engine = DetectorEngine::new();
        let cfg = DetectionConfig::default();
        let hash = "abcdef0123456789deadbeefcafef00d";

        for (i, host) in ["10.0.0.10", "10.0.0.11", "10.0.0.12"].iter().enumerate() {
            let line = format!(
                r#"{{"_path":"ntlm","ts":1.0,"id.orig_h":"{host}","id.resp_h":"10.0.0.99","id.orig_p":1,"id.resp_p":445,"ntlm_response":"{hash}"}}"#
            );
            let record = parse(&line);
            let findings = engine.handle(&record, &cfg);
            if i < 2 {
                assert!(findings.is_empty());
            } else {
                assert_eq!(findings.len(), 1);
                match &findings[0] {
                    Finding::PassTheHash { host_count, .. } => assert_eq!(*host_count, 3),
                    _ => panic!("expected PassTheHash"),
                }
            }
        }
    }

    #[test]
    fn scenario_c_psexec() {
        let mut engine = DetectorEngine::new();
        let cfg = DetectionConfig::default();

        let line1 = r#"{"_path":"smb_files","ts":1.0,"id.orig_h":"10.0.0.5","id.resp_h":"10.0.0.20","id.orig_p":1,"id.resp_p":445,"action":"SMB::FILE_OPEN","path":"\\server\\ADMIN$\\svc.exe"}"#;
        let findings = engine.handle(&parse(line1), &cfg);
        assert!(findings.is_empty());

        let line2 = r#"{"_path":"smb_files","ts":2.0,"id.orig_h":"10.0.0.5","id.resp_h":"10.0.0.20","id.orig_p":1,"id.resp_p":445,"action":"SMB::FILE_OPEN","path":"\\server\\C$\\temp\\a.dll"}"#;
        let findings = engine.handle(&parse(line2), &cfg);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind(), "PSEXEC");
    }

    #[test]
    fn smb_bruteforce_fires_once_at_threshold() {
        let mut engine = DetectorEngine::new();
        let cfg = DetectionConfig::default();

        for i in 0..5 {
            let line = format!(
                r#"{{"_path":"smb_files","ts":1.0,"id.orig_h":"10.0.0.5","id.resp_h":"10.0.0.20","id.orig_p":1,"id.resp_p":445,"status":"STATUS_LOGON_FAILURE"}}"#
            );
            let findings = engine.handle(&parse(&line), &cfg);
            if i < 4 {
                assert!(findings.is_empty());
            } else {
                assert_eq!(findings.len(), 1);
                assert_eq!(findings[0].kind(), "SMB_BRUTEFORCE");
            }
        }
    }

    #[test]
    fn connection_ignores_external_endpoints() {
        let mut engine = DetectorEngine::new();
        let cfg = DetectionConfig::default();
        let record = parse(&conn_line("8.8.8.8", "10.0.0.1", 445));
        assert!(engine.handle(&record, &cfg).is_empty());
        assert!(engine.host_targets("8.8.8.8").is_empty());
    }

    #[test]
    fn rdp_hopping_fires_at_threshold() {
        let mut engine = DetectorEngine::new();
        let cfg = DetectionConfig::default();

        for i in 0..5 {
            let dst = format!("10.0.0.{}", i + 1);
            let line = format!(
                r#"{{"_path":"rdp","ts":1.0,"id.orig_h":"192.168.1.50","id.resp_h":"{dst}","id.orig_p":1,"id.resp_p":3389,"cookie":"abc"}}"#
            );
            let findings = engine.handle(&parse(&line), &cfg);
            if i < 4 {
                assert!(findings.is_empty());
            } else {
                assert_eq!(findings.len(), 1);
                assert_eq!(findings[0].kind(), "RDP_HOPPING");
            }
        }
    }
}
