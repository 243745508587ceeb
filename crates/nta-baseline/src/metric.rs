//! Fixed per-host metric identities (SPEC_FULL.md §3, §9 REDESIGN — a
//! closed enum in place of the original's open per-metric dict keys).

pub const METRIC_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    ConnectionRate,
    TargetCount,
    PortDiversity,
    AvgPacketSize,
    SessionDuration,
}

pub const ALL_METRICS: [Metric; METRIC_COUNT] = [
    Metric::ConnectionRate,
    Metric::TargetCount,
    Metric::PortDiversity,
    Metric::AvgPacketSize,
    Metric::SessionDuration,
];

impl Metric {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::ConnectionRate => "connection_rate",
            Metric::TargetCount => "target_count",
            Metric::PortDiversity => "port_diversity",
            Metric::AvgPacketSize => "avg_packet_size",
            Metric::SessionDuration => "session_duration",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        ALL_METRICS.iter().copied().find(|m| m.as_str() == s)
    }
}
