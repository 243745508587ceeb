//! Built-in threat-intelligence tables (SPEC_FULL.md §4.6).
//!
//! Seeded verbatim from the original system's `malicious_ja3`,
//! `malicious_user_agents`, `suspicious_domain_patterns`, and
//! `c2_port_signatures` tables. These are part of the detection
//! contract, not placeholders.

pub struct Ja3Descriptor {
    pub name: &'static str,
    pub tool_type: &'static str,
    pub severity: &'static str,
}

pub const MALICIOUS_JA3: &[(&str, Ja3Descriptor)] = &[
    (
        "a0e9f5d64349fb13191bc781f81f42e1",
        Ja3Descriptor {
            name: "Metasploit",
            tool_type: "C2_Framework",
            severity: "CRITICAL",
        },
    ),
    (
        "6734f37431670b3ab4292b8f60f29984",
        Ja3Descriptor {
            name: "Trickbot",
            tool_type: "Banking_Trojan",
            severity: "CRITICAL",
        },
    ),
    (
        "72a589da586844d7f0818ce684948eea",
        Ja3Descriptor {
            name: "Dridex",
            tool_type: "Banking_Trojan",
            severity: "CRITICAL",
        },
    ),
    (
        "51c64c77e60f3980eea90869b68c58a8",
        Ja3Descriptor {
            name: "Cobalt Strike",
            tool_type: "C2_Framework",
            severity: "CRITICAL",
        },
    ),
];

/// Substring (case-insensitive) -> tool category.
pub const MALICIOUS_USER_AGENTS: &[(&str, &str)] = &[
    ("python-requests", "Automated_Script"),
    ("curl", "Command_Line_Tool"),
    ("Metasploit", "Exploitation_Framework"),
    ("Nmap", "Network_Scanner"),
    ("sqlmap", "SQL_Injection_Tool"),
    ("masscan", "Port_Scanner"),
];

/// Raw regex sources; compiled once into [`crate::matcher::CompiledPatterns`].
pub const SUSPICIOUS_DOMAIN_PATTERNS: &[&str] = &[
    r"[a-z0-9]{20,}\.com$",
    r"[a-z0-9]{15,}\.(ru|cn|tk)$",
    r".*-[0-9]{8,}\..*",
    r".*\.(bit|onion)$",
];

pub const C2_PORT_SIGNATURES: &[(u16, &str)] = &[
    (4444, "Metasploit_Default"),
    (5555, "Common_Backdoor"),
    (6666, "Common_Backdoor"),
    (7777, "Common_Backdoor"),
    (8888, "Common_Proxy"),
    (9999, "Common_Backdoor"),
    (1337, "Leet_Port"),
    (31337, "Back_Orifice"),
];
