//! C6: threat-intelligence matcher (SPEC_FULL.md §4.6).

pub mod cache;
pub mod lookup;
pub mod tables;

use cache::CacheEntry;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use lookup::{
    DomainIntel, EnrichmentInput, EventEnrichment, HashIntel, IpIntel, Ja3Intel, PortIntel,
    UserAgentIntel,
};
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum ThreatIntelError {
    #[error("invalid regex in suspicious-domain table: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// The three blacklist sets, exactly as persisted/restored by the
/// out-of-scope artifact store (SPEC_FULL.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatIntelSnapshot {
    pub malicious_ips: Vec<String>,
    pub malicious_domains: Vec<String>,
    pub malicious_hashes: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct ThreatIntelMatcher {
    malicious_ips: RwLock<HashSet<String>>,
    malicious_domains: RwLock<HashSet<String>>,
    malicious_hashes: RwLock<HashSet<String>>,
    domain_patterns: Vec<Regex>,

    ip_cache: DashMap<String, CacheEntry<IpIntel>>,
    domain_cache: DashMap<String, CacheEntry<DomainIntel>>,
    hash_cache: DashMap<String, CacheEntry<HashIntel>>,
}

impl ThreatIntelMatcher {
    pub fn new() -> Result<Self, ThreatIntelError> {
        let domain_patterns = tables::SUSPICIOUS_DOMAIN_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            malicious_ips: RwLock::new(HashSet::new()),
            malicious_domains: RwLock::new(HashSet::new()),
            malicious_hashes: RwLock::new(HashSet::new()),
            domain_patterns,
            ip_cache: DashMap::new(),
            domain_cache: DashMap::new(),
            hash_cache: DashMap::new(),
        })
    }

    pub fn add_ip(&self, ip: impl Into<String>) {
        self.malicious_ips.write().insert(ip.into());
    }

    pub fn add_domain(&self, domain: impl Into<String>) {
        self.malicious_domains.write().insert(domain.into());
    }

    pub fn add_hash(&self, hash: impl Into<String>) {
        self.malicious_hashes.write().insert(hash.into());
    }

    pub fn export(&self, now: DateTime<Utc>) -> ThreatIntelSnapshot {
        ThreatIntelSnapshot {
            malicious_ips: self.malicious_ips.read().iter().cloned().collect(),
            malicious_domains: self.malicious_domains.read().iter().cloned().collect(),
            malicious_hashes: self.malicious_hashes.read().iter().cloned().collect(),
            timestamp: now,
        }
    }

    pub fn import(&self, snapshot: &ThreatIntelSnapshot) {
        *self.malicious_ips.write() = snapshot.malicious_ips.iter().cloned().collect();
        *self.malicious_domains.write() = snapshot.malicious_domains.iter().cloned().collect();
        *self.malicious_hashes.write() = snapshot.malicious_hashes.iter().cloned().collect();
    }

    #[instrument(skip(self))]
    pub fn check_ip(&self, ip: &str, now: DateTime<Utc>) -> IpIntel {
        if let Some(entry) = self.ip_cache.get(ip) {
            if entry.is_fresh(now) {
                return entry.value.clone();
            }
        }

        let mut result = IpIntel {
            ip: ip.to_owned(),
            is_malicious: false,
            confidence: 0.0,
            sources: Vec::new(),
        };
        if self.malicious_ips.read().contains(ip) {
            result.is_malicious = true;
            result.confidence = 0.95;
            result.sources.push("Local_Blacklist".to_owned());
        }

        self.ip_cache
            .insert(ip.to_owned(), CacheEntry::new(result.clone(), now));
        result
    }

    #[instrument(skip(self))]
    pub fn check_domain(&self, domain: &str, now: DateTime<Utc>) -> DomainIntel {
        if let Some(entry) = self.domain_cache.get(domain) {
            if entry.is_fresh(now) {
                return entry.value.clone();
            }
        }

        let mut result = DomainIntel {
            domain: domain.to_owned(),
            is_malicious: false,
            confidence: 0.0,
            sources: Vec::new(),
            categories: Vec::new(),
            matched_pattern: None,
        };

        if self.malicious_domains.read().contains(domain) {
            result.is_malicious = true;
            result.confidence = 0.95;
            result.sources.push("Local_Blacklist".to_owned());
            result.categories.push("Known_Malicious".to_owned());
        }

        for (pattern, regex) in tables::SUSPICIOUS_DOMAIN_PATTERNS
            .iter()
            .zip(self.domain_patterns.iter())
        {
            if regex.is_match(domain) {
                result.is_malicious = true;
                result.confidence = result.confidence.max(0.7);
                result.sources.push("Pattern_Match".to_owned());
                result.categories.push("Suspicious_Pattern".to_owned());
                result.matched_pattern = Some((*pattern).to_owned());
                break;
            }
        }

        self.domain_cache
            .insert(domain.to_owned(), CacheEntry::new(result.clone(), now));
        result
    }

    #[instrument(skip(self))]
    pub fn check_file_hash(&self, hash: &str, now: DateTime<Utc>) -> HashIntel {
        if let Some(entry) = self.hash_cache.get(hash) {
            if entry.is_fresh(now) {
                return entry.value.clone();
            }
        }

        let mut result = HashIntel {
            hash: hash.to_owned(),
            is_malicious: false,
            confidence: 0.0,
            sources: Vec::new(),
        };
        if self.malicious_hashes.read().contains(hash) {
            result.is_malicious = true;
            result.confidence = 0.99;
            result.sources.push("Local_Blacklist".to_owned());
        }

        self.hash_cache
            .insert(hash.to_owned(), CacheEntry::new(result.clone(), now));
        result
    }

    /// Not cached: the built-in table is static and the check is O(1).
    pub fn check_ja3_fingerprint(&self, ja3: &str) -> Ja3Intel {
        if let Some((_, descriptor)) = tables::MALICIOUS_JA3.iter().find(|(hash, _)| *hash == ja3)
        {
            return Ja3Intel {
                ja3: ja3.to_owned(),
                is_malicious: true,
                confidence: 0.95,
                tool_name: Some(descriptor.name.to_owned()),
                tool_type: Some(descriptor.tool_type.to_owned()),
                severity: Some(descriptor.severity.to_owned()),
            };
        }
        Ja3Intel {
            ja3: ja3.to_owned(),
            is_malicious: false,
            confidence: 0.0,
            tool_name: None,
            tool_type: None,
            severity: None,
        }
    }

    pub fn check_user_agent(&self, user_agent: &str) -> UserAgentIntel {
        let lowered = user_agent.to_lowercase();
        for (pattern, category) in tables::MALICIOUS_USER_AGENTS {
            if lowered.contains(&pattern.to_lowercase()) {
                return UserAgentIntel {
                    user_agent: user_agent.to_owned(),
                    is_suspicious: true,
                    confidence: 0.8,
                    category: Some((*category).to_owned()),
                    matched_pattern: Some((*pattern).to_owned()),
                };
            }
        }
        UserAgentIntel {
            user_agent: user_agent.to_owned(),
            is_suspicious: false,
            confidence: 0.0,
            category: None,
            matched_pattern: None,
        }
    }

    pub fn check_port(&self, port: u16) -> PortIntel {
        if let Some((_, signature)) = tables::C2_PORT_SIGNATURES.iter().find(|(p, _)| *p == port) {
            return PortIntel {
                port,
                is_suspicious: true,
                confidence: 0.7,
                signature: Some((*signature).to_owned()),
            };
        }
        PortIntel {
            port,
            is_suspicious: false,
            confidence: 0.0,
            signature: None,
        }
    }

    /// Sums per-kind risk contributions for whichever fields are present
    /// (SPEC_FULL.md §4.6).
    pub fn enrich_event(&self, input: &EnrichmentInput, now: DateTime<Utc>) -> EventEnrichment {
        let mut enrichment = EventEnrichment::default();

        if let Some(src_ip) = &input.src_ip {
            let intel = self.check_ip(src_ip, now);
            if intel.is_malicious {
                enrichment.risk_score += 50.0;
                enrichment.src_ip = Some(intel);
            }
        }
        if let Some(dst_ip) = &input.dst_ip {
            let intel = self.check_ip(dst_ip, now);
            if intel.is_malicious {
                enrichment.risk_score += 30.0;
                enrichment.dst_ip = Some(intel);
            }
        }
        if let Some(domain) = &input.domain {
            let intel = self.check_domain(domain, now);
            if intel.is_malicious {
                enrichment.risk_score += 40.0;
                enrichment.domain = Some(intel);
            }
        }
        if let Some(hash) = &input.file_hash {
            let intel = self.check_file_hash(hash, now);
            if intel.is_malicious {
                enrichment.risk_score += 60.0;
                enrichment.file_hash = Some(intel);
            }
        }
        if let Some(ja3) = &input.ja3 {
            let intel = self.check_ja3_fingerprint(ja3);
            if intel.is_malicious {
                enrichment.risk_score += 45.0;
                enrichment.ja3 = Some(intel);
            }
        }
        if let Some(ua) = &input.user_agent {
            let intel = self.check_user_agent(ua);
            if intel.is_suspicious {
                enrichment.risk_score += 20.0;
                enrichment.user_agent = Some(intel);
            }
        }
        if let Some(port) = input.dst_port {
            let intel = self.check_port(port);
            if intel.is_suspicious {
                enrichment.risk_score += 15.0;
                enrichment.port = Some(intel);
            }
        }

        enrichment
    }
}

impl Default for ThreatIntelMatcher {
    fn default() -> Self {
        Self::new().expect("built-in domain patterns are valid regexes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn blacklisted_ip_is_malicious() {
        let matcher = ThreatIntelMatcher::new().unwrap();
        matcher.add_ip("1.2.3.4");
        let result = matcher.check_ip("1.2.3.4", now());
        assert!(result.is_malicious);
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn suspicious_domain_pattern_matches() {
        let matcher = ThreatIntelMatcher::new().unwrap();
        let result = matcher.check_domain("aaaaaaaaaaaaaaaaaaaaaaaa.ru", now());
        assert!(result.is_malicious);
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn known_ja3_fingerprint_identifies_tool() {
        let matcher = ThreatIntelMatcher::new().unwrap();
        let result = matcher.check_ja3_fingerprint("a0e9f5d64349fb13191bc781f81f42e1");
        assert!(result.is_malicious);
        assert_eq!(result.tool_name.as_deref(), Some("Metasploit"));
    }

    #[test]
    fn enrich_event_sums_contributions() {
        let matcher = ThreatIntelMatcher::new().unwrap();
        matcher.add_ip("10.0.0.5");
        matcher.add_hash("deadbeef");
        let input = EnrichmentInput {
            src_ip: Some("10.0.0.5".to_owned()),
            file_hash: Some("deadbeef".to_owned()),
            dst_port: Some(4444),
            ..Default::default()
        };
        let enrichment = matcher.enrich_event(&input, now());
        assert_eq!(enrichment.risk_score, 50.0 + 60.0 + 15.0);
    }

    #[test]
    fn snapshot_round_trips() {
        let matcher = ThreatIntelMatcher::new().unwrap();
        matcher.add_ip("1.1.1.1");
        matcher.add_domain("evil.example.com");
        matcher.add_hash("cafebabe");
        let snapshot = matcher.export(now());

        let restored = ThreatIntelMatcher::new().unwrap();
        restored.import(&snapshot);
        assert!(restored.check_ip("1.1.1.1", now()).is_malicious);
        assert!(restored.check_file_hash("cafebabe", now()).is_malicious);
    }
}
