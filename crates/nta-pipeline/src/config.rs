//! Pipeline-wide configuration (SPEC_FULL.md §5).

use nta_detectors::DetectionConfig;
use nta_fusion::FusionConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub lane_count: usize,
    pub channel_capacity: usize,
    pub detection: DetectionConfig,
    pub fusion: FusionConfig,
    /// Deadline for draining the alert queue on shutdown (default 30s).
    pub shutdown_deadline: Duration,
    /// Timeout applied to every external call (threat-intel feed fetch,
    /// alert push) by default.
    pub external_call_timeout: Duration,
    /// How often the shared communication graph is re-swept for
    /// fan-out/pivot signals (SPEC_FULL.md §9: betweenness is O(V*E),
    /// run on demand rather than per record).
    pub graph_signal_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lane_count: 8,
            channel_capacity: 1024,
            detection: DetectionConfig::default(),
            fusion: FusionConfig::default(),
            shutdown_deadline: Duration::from_secs(30),
            external_call_timeout: Duration::from_secs(10),
            graph_signal_interval: Duration::from_secs(30),
        }
    }
}
