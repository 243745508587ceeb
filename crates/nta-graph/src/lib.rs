//! C3: communication-graph analyzer (SPEC_FULL.md §4.3).

pub mod analysis;
pub mod centrality;
pub mod cycles;
pub mod edge;
pub mod graph;
pub mod snapshot;

pub use analysis::{
    detect_anomalous_fanout, detect_circular_paths, detect_pivot_points,
    detect_rare_communications, find_multi_hop_chains, get_attack_path_summary,
    AttackPathSummary, Chain, CircularPath, CircularPathResult, FanoutAnomaly, PivotPoint,
    RareCommunication,
};
pub use edge::Edge;
pub use graph::{CommsGraph, GraphView};
pub use snapshot::{EdgeRecord, GraphSnapshot};
