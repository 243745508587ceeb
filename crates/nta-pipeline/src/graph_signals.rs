//! Periodic fan-out/pivot sweep of the shared communication graph.
//!
//! Betweenness centrality is O(V*E); re-running it on every record would
//! violate the non-blocking steady-state-path requirement (SPEC_FULL.md
//! §5, §9). Instead a background task periodically snapshots the graph
//! and caches a per-node `[0,1]` signal that the per-record path reads
//! without recomputing anything.

use dashmap::DashMap;
use nta_graph::analysis::DEFAULT_FANOUT_THRESHOLD;
use nta_graph::{detect_anomalous_fanout, detect_pivot_points, CommsGraph};
use nta_common::Severity;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// `node -> signal in [0,1]`, the strongest of its fan-out and pivot
/// scores as of the last sweep.
pub type GraphSignals = DashMap<String, f64>;

fn pivot_score(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 1.0,
        Severity::High => 0.8,
        _ => 0.5,
    }
}

/// Recompute the shared signal map from a fresh graph snapshot.
pub fn sweep(graph: &CommsGraph, signals: &GraphSignals) {
    let view = graph.snapshot();

    let fanout = detect_anomalous_fanout(&view, DEFAULT_FANOUT_THRESHOLD);
    let pivots = detect_pivot_points(&view);

    signals.clear();
    for anomaly in fanout {
        signals.insert(anomaly.node, anomaly.score.clamp(0.0, 1.0));
    }
    for pivot in pivots {
        let score = pivot_score(pivot.severity);
        signals
            .entry(pivot.node)
            .and_modify(|existing| *existing = existing.max(score))
            .or_insert(score);
    }
    debug!(signals = signals.len(), "graph signal sweep complete");
}

/// Spawn the background sweep loop. Returns a handle the caller aborts
/// on shutdown; the sweep is read-only and has no drain obligation.
pub fn spawn_sweeper(
    graph: Arc<CommsGraph>,
    signals: Arc<GraphSignals>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            sweep(&graph, &signals);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn sweep_flags_fanout_node() {
        let graph = CommsGraph::new();
        for i in 0..25 {
            graph.add_connection("10.0.0.1", &format!("10.0.0.{}", i + 2), "SMB", now());
        }
        let signals: GraphSignals = DashMap::new();
        sweep(&graph, &signals);
        assert!(signals.get("10.0.0.1").is_some());
    }

    #[test]
    fn sweep_clears_stale_entries() {
        let graph = CommsGraph::new();
        graph.add_connection("a", "b", "SMB", now());
        let signals: GraphSignals = DashMap::new();
        signals.insert("stale".to_owned(), 0.9);
        sweep(&graph, &signals);
        assert!(signals.get("stale").is_none());
    }
}
