//! The directed communication multigraph itself (SPEC_FULL.md §4.3, §9).
//!
//! Writes serialize through a single `parking_lot::Mutex`; analyses take
//! a consistent clone of the adjacency map at the start of the call
//! (copy-on-read) instead of holding the lock across an O(V*E)
//! computation (SPEC_FULL.md §9 design note).

use crate::edge::Edge;
use crate::snapshot::{EdgeRecord, GraphSnapshot};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Adjacency {
    /// source -> destination -> edge. Destinations with no outgoing
    /// edges of their own still get an empty inner map so they appear
    /// in the node set.
    edges: HashMap<String, HashMap<String, Edge>>,
}

#[derive(Debug, Default)]
pub struct CommsGraph {
    inner: Mutex<Adjacency>,
}

/// A point-in-time, lock-free copy of the graph for read-heavy analyses.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    pub adjacency: HashMap<String, HashMap<String, Edge>>,
}

impl CommsGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_connection(&self, src: &str, dst: &str, protocol: &str, at: DateTime<Utc>) {
        let mut guard = self.inner.lock();
        guard.edges.entry(dst.to_owned()).or_default();
        let sources = guard.edges.entry(src.to_owned()).or_default();
        match sources.get_mut(dst) {
            Some(edge) => edge.record(protocol, at),
            None => {
                sources.insert(dst.to_owned(), Edge::new(protocol, at));
            }
        }
    }

    pub fn snapshot(&self) -> GraphView {
        GraphView {
            adjacency: self.inner.lock().edges.clone(),
        }
    }

    pub fn export(&self, now: DateTime<Utc>) -> GraphSnapshot {
        let view = self.snapshot();
        view.to_snapshot(now)
    }

    pub fn import(&self, snapshot: &GraphSnapshot) {
        let mut adjacency: HashMap<String, HashMap<String, Edge>> = HashMap::new();
        for node in &snapshot.nodes {
            adjacency.entry(node.clone()).or_default();
        }
        for record in &snapshot.edges {
            let mut protocols = std::collections::HashSet::new();
            protocols.extend(record.protocols.iter().cloned());
            adjacency
                .entry(record.source.clone())
                .or_default()
                .insert(
                    record.target.clone(),
                    Edge {
                        protocols,
                        count: record.count,
                        first_seen: record.first_seen,
                        last_seen: record.last_seen,
                    },
                );
            adjacency.entry(record.target.clone()).or_default();
        }
        *self.inner.lock() = Adjacency { edges: adjacency };
    }
}

impl GraphView {
    pub fn nodes(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self.adjacency.keys().cloned().collect();
        nodes.sort();
        nodes
    }

    pub fn out_degree(&self, node: &str) -> usize {
        self.adjacency.get(node).map(HashMap::len).unwrap_or(0)
    }

    pub fn in_degree(&self, node: &str) -> usize {
        self.adjacency
            .values()
            .filter(|dsts| dsts.contains_key(node))
            .count()
    }

    pub fn successors(&self, node: &str) -> Vec<String> {
        let mut targets: Vec<String> = self
            .adjacency
            .get(node)
            .map(|dsts| dsts.keys().cloned().collect())
            .unwrap_or_default();
        targets.sort();
        targets
    }

    pub fn edge(&self, src: &str, dst: &str) -> Option<&Edge> {
        self.adjacency.get(src).and_then(|dsts| dsts.get(dst))
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(HashMap::len).sum()
    }

    pub fn to_snapshot(&self, now: DateTime<Utc>) -> GraphSnapshot {
        let nodes = self.nodes();
        let mut edges = Vec::new();
        for source in &nodes {
            if let Some(dsts) = self.adjacency.get(source) {
                for (target, edge) in dsts {
                    edges.push(EdgeRecord::from_edge(source.clone(), target.clone(), edge));
                }
            }
        }
        edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
        GraphSnapshot {
            nodes,
            edges,
            timestamp: now,
        }
    }

    /// Breadth-first transitive descendants of `node` (excluding itself).
    pub fn descendants(&self, node: &str) -> std::collections::HashSet<String> {
        let mut seen = std::collections::HashSet::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(node.to_owned());
        while let Some(current) = queue.pop_front() {
            for succ in self.successors(&current) {
                if seen.insert(succ.clone()) {
                    queue.push_back(succ);
                }
            }
        }
        seen
    }

    /// Shortest-path hop count from `from` to `to`, BFS over outgoing edges.
    pub fn shortest_path_len(&self, from: &str, to: &str) -> Option<usize> {
        if from == to {
            return Some(0);
        }
        let mut visited = std::collections::HashSet::new();
        visited.insert(from.to_owned());
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((from.to_owned(), 0usize));
        while let Some((node, dist)) = queue.pop_front() {
            for succ in self.successors(&node) {
                if succ == to {
                    return Some(dist + 1);
                }
                if visited.insert(succ.clone()) {
                    queue.push_back((succ, dist + 1));
                }
            }
        }
        None
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
    fn add_connection_merges_repeated_edges() {
        let graph = CommsGraph::new();
        graph.add_connection("a", "b", "SMB", now());
        graph.add_connection("a", "b", "RDP", now());
        let view = graph.snapshot();
        let edge = view.edge("a", "b").unwrap();
        assert_eq!(edge.count, 2);
        assert_eq!(edge.protocols.len(), 2);
    }

    #[test]
    fn export_import_round_trips() {
        let graph = CommsGraph::new();
        graph.add_connection("a", "b", "SMB", now());
        graph.add_connection("b", "c", "RDP", now());
        let snapshot = graph.export(now());

        let restored = CommsGraph::new();
        restored.import(&snapshot);
        let restored_snapshot = restored.export(now());

        assert_eq!(snapshot.nodes, restored_snapshot.nodes);
        assert_eq!(snapshot.edges.len(), restored_snapshot.edges.len());
    }

    #[test]
    fn descendants_are_transitive() {
        let graph = CommsGraph::new();
        graph.add_connection("a", "b", "SMB", now());
        graph.add_connection("b", "c", "SMB", now());
        let view = graph.snapshot();
        let descendants = view.descendants("a");
        assert!(descendants.contains("b"));
        assert!(descendants.contains("c"));
    }
}
