//! The five read-only graph analyses plus attack-path summary
//! (SPEC_FULL.md §4.3). Each takes a [`GraphView`] snapshot so it
//! tolerates concurrent graph mutation.

use crate::centrality::betweenness_centrality;
use crate::cycles::{find_simple_cycles, DEFAULT_MAX_CYCLE_LENGTH, DEFAULT_MAX_RESULTS};
use crate::graph::GraphView;
use nta_common::{is_rfc1918, Severity};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_FANOUT_THRESHOLD: usize = 20;
pub const DEFAULT_MIN_HOPS: usize = 3;
pub const DEFAULT_MAX_HOPS: usize = 6;
pub const DEFAULT_RARITY_THRESHOLD: f64 = 0.95;
pub const DEFAULT_BETWEENNESS_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct FanoutAnomaly {
    pub node: String,
    pub target_count: usize,
    pub targets: Vec<String>,
    pub score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone)]
pub struct Chain {
    pub path: Vec<String>,
    pub length: usize,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct RareCommunication {
    pub source: String,
    pub destination: String,
    pub protocols: Vec<String>,
    pub count: u64,
    pub rarity: f64,
}

#[derive(Debug, Clone)]
pub struct PivotPoint {
    pub node: String,
    pub in_degree: usize,
    pub out_degree: usize,
    pub betweenness: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone)]
pub struct CircularPath {
    pub cycle: Vec<String>,
    pub length: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CircularPathResult {
    pub cycles: Vec<CircularPath>,
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct AttackPathSummary {
    pub attacker: String,
    pub direct_targets: Vec<String>,
    pub total_targets: usize,
    pub max_hop_depth: usize,
    pub protocols_used: Vec<String>,
}

/// Maps node names to dense indices so the graph algorithms can run on
/// `Vec`-backed adjacency lists.
struct IndexedView {
    nodes: Vec<String>,
    adjacency: Vec<Vec<usize>>,
}

impl IndexedView {
    fn new(view: &GraphView) -> Self {
        let nodes = view.nodes();
        let index_of: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();
        let adjacency = nodes
            .iter()
            .map(|node| {
                let mut succ: Vec<usize> = view
                    .successors(node)
                    .into_iter()
                    .map(|s| index_of[s.as_str()])
                    .collect();
                succ.sort_unstable();
                succ
            })
            .collect();
        Self { nodes, adjacency }
    }

    fn name(&self, index: usize) -> &str {
        &self.nodes[index]
    }
}

pub fn detect_anomalous_fanout(view: &GraphView, threshold: usize) -> Vec<FanoutAnomaly> {
    let mut anomalies = Vec::new();
    for node in view.nodes() {
        let out_degree = view.out_degree(&node);
        if out_degree > threshold {
            let mut targets = view.successors(&node);
            targets.truncate(10);
            let severity = if out_degree > threshold * 2 {
                Severity::High
            } else {
                Severity::Medium
            };
            anomalies.push(FanoutAnomaly {
                node,
                target_count: out_degree,
                targets,
                score: (out_degree as f64 / threshold as f64).min(1.0),
                severity,
            });
        }
    }
    anomalies
}

fn is_internal(node: &str) -> bool {
    is_rfc1918(node)
}

fn chain_score(view: &GraphView, path: &[String]) -> f64 {
    let mut score = (path.len() * 10) as f64;
    for window in path.windows(2) {
        if let Some(edge) = view.edge(&window[0], &window[1]) {
            if edge.count == 1 {
                score += 5.0;
            }
            if edge.has_lateral_movement_protocol() {
                score += 10.0;
            }
        }
    }
    score
}

fn is_abnormal_chain(path: &[String]) -> bool {
    if path.len() < 3 {
        return false;
    }
    path[1..path.len() - 1]
        .iter()
        .filter(|n| is_internal(n))
        .count()
        >= 2
}

pub fn find_multi_hop_chains(
    view: &GraphView,
    min_hops: usize,
    max_hops: usize,
) -> Vec<Chain> {
    let mut chains = Vec::new();
    for source in view.nodes() {
        for target in view.nodes() {
            if source == target {
                continue;
            }
            if let Some(path) = shortest_path(view, &source, &target, max_hops) {
                if path.len() >= min_hops && is_abnormal_chain(&path) {
                    chains.push(Chain {
                        score: chain_score(view, &path),
                        length: path.len(),
                        path,
                    });
                }
            }
        }
    }
    chains
}

fn shortest_path(view: &GraphView, from: &str, to: &str, cutoff: usize) -> Option<Vec<String>> {
    use std::collections::VecDeque;
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(from.to_owned());
    let mut queue: VecDeque<Vec<String>> = VecDeque::new();
    queue.push_back(vec![from.to_owned()]);
    while let Some(path) = queue.pop_front() {
        if path.len() - 1 >= cutoff {
            continue;
        }
        let last = path.last().unwrap().clone();
        for succ in view.successors(&last) {
            if succ == to {
                let mut full = path.clone();
                full.push(succ);
                return Some(full);
            }
            if visited.insert(succ.clone()) {
                let mut extended = path.clone();
                extended.push(succ);
                queue.push_back(extended);
            }
        }
    }
    None
}

pub fn detect_rare_communications(
    view: &GraphView,
    normal_paths: &HashSet<(String, String)>,
    rarity_threshold: f64,
) -> Vec<RareCommunication> {
    let total_edges = view.edge_count().max(1) as f64;
    let mut anomalies = Vec::new();
    for source in view.nodes() {
        for destination in view.successors(&source) {
            if normal_paths.contains(&(source.clone(), destination.clone())) {
                continue;
            }
            let edge = view.edge(&source, &destination).unwrap();
            let rarity = 1.0 - (edge.count as f64 / total_edges);
            if rarity > rarity_threshold {
                let mut protocols: Vec<String> = edge.protocols.iter().cloned().collect();
                protocols.sort();
                anomalies.push(RareCommunication {
                    source: source.clone(),
                    destination,
                    protocols,
                    count: edge.count,
                    rarity,
                });
            }
        }
    }
    anomalies
}

pub fn detect_pivot_points(view: &GraphView) -> Vec<PivotPoint> {
    let indexed = IndexedView::new(view);
    let centrality = betweenness_centrality(&indexed.adjacency);

    let mut pivots = Vec::new();
    for (i, node) in indexed.nodes.iter().enumerate() {
        let in_degree = view.in_degree(node);
        let out_degree = view.out_degree(node);
        if in_degree >= 1 && out_degree >= 3 && centrality[i] > DEFAULT_BETWEENNESS_THRESHOLD {
            let severity = if out_degree > 5 {
                Severity::Critical
            } else {
                Severity::High
            };
            pivots.push(PivotPoint {
                node: node.clone(),
                in_degree,
                out_degree,
                betweenness: centrality[i],
                severity,
            });
        }
    }
    pivots
}

pub fn detect_circular_paths(view: &GraphView) -> CircularPathResult {
    detect_circular_paths_capped(view, DEFAULT_MAX_CYCLE_LENGTH, DEFAULT_MAX_RESULTS)
}

pub fn detect_circular_paths_capped(
    view: &GraphView,
    max_length: usize,
    max_results: usize,
) -> CircularPathResult {
    let indexed = IndexedView::new(view);
    let result = find_simple_cycles(&indexed.adjacency, max_length, max_results);
    let cycles = result
        .cycles
        .into_iter()
        .map(|cycle| {
            let names: Vec<String> = cycle.iter().map(|&i| indexed.name(i).to_owned()).collect();
            CircularPath {
                length: names.len(),
                score: (names.len() * 5) as f64,
                cycle: names,
            }
        })
        .collect();
    CircularPathResult {
        cycles,
        truncated: result.truncated,
    }
}

pub fn get_attack_path_summary(view: &GraphView, attacker: &str) -> Option<AttackPathSummary> {
    if !view.adjacency.contains_key(attacker) {
        return None;
    }

    let direct_targets = view.successors(attacker);
    let descendants = view.descendants(attacker);
    // `shortest_path_len` returns an edge count; `max_hop_depth` reports
    // path length in nodes (attacker -> A -> B is depth 3, not 2).
    let max_hop_depth = descendants
        .iter()
        .filter_map(|target| view.shortest_path_len(attacker, target))
        .map(|edges| edges + 1)
        .max()
        .unwrap_or(0);

    let mut protocols_used: HashSet<String> = HashSet::new();
    for node in view.nodes() {
        if node == attacker {
            if let Some(dsts) = view.adjacency.get(&node) {
                for edge in dsts.values() {
                    protocols_used.extend(edge.protocols.iter().cloned());
                }
            }
        } else if let Some(edge) = view.edge(&node, attacker) {
            protocols_used.extend(edge.protocols.iter().cloned());
        }
    }
    let mut protocols_used: Vec<String> = protocols_used.into_iter().collect();
    protocols_used.sort();

    Some(AttackPathSummary {
        attacker: attacker.to_owned(),
        direct_targets,
        total_targets: descendants.len(),
        max_hop_depth,
        protocols_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CommsGraph;
    use chrono::{TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn fanout_above_threshold_is_flagged() {
        let graph = CommsGraph::new();
        for i in 0..25 {
            graph.add_connection("10.0.0.1", &format!("10.0.0.{}", i + 2), "SMB", now());
        }
        let view = graph.snapshot();
        let anomalies = detect_anomalous_fanout(&view, DEFAULT_FANOUT_THRESHOLD);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].target_count, 25);
        assert_eq!(anomalies[0].severity, Severity::Medium);
    }

    #[test]
    fn fanout_over_double_threshold_is_high_severity() {
        let graph = CommsGraph::new();
        for i in 0..45 {
            graph.add_connection("10.0.0.1", &format!("10.0.0.{}", i + 2), "SMB", now());
        }
        let view = graph.snapshot();
        let anomalies = detect_anomalous_fanout(&view, DEFAULT_FANOUT_THRESHOLD);
        assert_eq!(anomalies[0].severity, Severity::High);
    }

    #[test]
    fn three_node_cycle_is_reported() {
        let graph = CommsGraph::new();
        graph.add_connection("a", "b", "SMB", now());
        graph.add_connection("b", "c", "SMB", now());
        graph.add_connection("c", "a", "SMB", now());
        let view = graph.snapshot();
        let result = detect_circular_paths(&view);
        assert_eq!(result.cycles.len(), 1);
        assert_eq!(result.cycles[0].length, 3);
    }

    #[test]
    fn attack_path_summary_counts_descendants() {
        let graph = CommsGraph::new();
        graph.add_connection("10.0.0.1", "10.0.0.2", "SMB", now());
        graph.add_connection("10.0.0.2", "10.0.0.3", "RDP", now());
        let view = graph.snapshot();
        let summary = get_attack_path_summary(&view, "10.0.0.1").unwrap();
        assert_eq!(summary.total_targets, 2);
        assert_eq!(summary.max_hop_depth, 3);
        assert_eq!(summary.direct_targets, vec!["10.0.0.2".to_owned()]);
    }

    #[test]
    fn unknown_attacker_returns_none() {
        let graph = CommsGraph::new();
        let view = graph.snapshot();
        assert!(get_attack_path_summary(&view, "10.0.0.99").is_none());
    }
}
