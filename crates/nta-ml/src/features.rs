//! Feature extraction for C4 (SPEC_FULL.md §4.4).

pub const FEATURE_COUNT: usize = 8;

/// One event's feature vector, in fixed order: connection rate, target
/// count, port diversity, failed-auth ratio, average packet size,
/// session duration, upload/download ratio, inter-arrival variance.
pub type FeatureVector = [f64; FEATURE_COUNT];

#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionFeatures {
    pub connection_rate: f64,
    pub target_count: f64,
    pub port_diversity: f64,
    pub failed_auth_ratio: f64,
    pub avg_packet_size: f64,
    pub session_duration: f64,
    pub upload_download_ratio: f64,
    pub inter_arrival_variance: f64,
}

impl ConnectionFeatures {
    pub fn to_vector(self) -> FeatureVector {
        [
            self.connection_rate,
            self.target_count,
            self.port_diversity,
            self.failed_auth_ratio,
            self.avg_packet_size,
            self.session_duration,
            self.upload_download_ratio,
            self.inter_arrival_variance,
        ]
    }
}
