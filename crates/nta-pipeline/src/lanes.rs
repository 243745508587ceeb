//! Worker-lane selection (SPEC_FULL.md §5): all state mutations for a
//! given source host happen on one lane, via a stable hash of the host
//! string modulo lane count.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn lane_for_host(source_host: &str, lane_count: usize) -> usize {
    debug_assert!(lane_count > 0);
    let mut hasher = DefaultHasher::new();
    source_host.hash(&mut hasher);
    (hasher.finish() % lane_count as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_host_always_maps_to_same_lane() {
        let a = lane_for_host("10.0.0.5", 8);
        let b = lane_for_host("10.0.0.5", 8);
        assert_eq!(a, b);
    }

    #[test]
    fn lane_index_is_in_range() {
        for host in ["10.0.0.1", "10.0.0.2", "192.168.1.1", "172.16.0.9"] {
            assert!(lane_for_host(host, 4) < 4);
        }
    }
}
