//! Cross-lane shared collaborators (SPEC_FULL.md §5): the communication
//! graph, threat-intel matcher, ML model pointer, graph-signal cache,
//! alert dispatcher, and metrics are the only state worker lanes don't
//! own exclusively.

use crate::graph_signals::GraphSignals;
use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use nta_alert_sink::AlertDispatcher;
use nta_common::Clock;
use nta_graph::CommsGraph;
use nta_ml::IsolationForestModel;
use nta_threat_intel::ThreatIntelMatcher;
use std::sync::Arc;

use crate::metrics::PipelineMetrics;

pub struct SharedState {
    pub graph: Arc<CommsGraph>,
    pub threat_intel: Arc<ThreatIntelMatcher>,
    pub ml_model: ArcSwapOption<IsolationForestModel>,
    pub graph_signals: Arc<GraphSignals>,
    pub dispatcher: tokio::sync::Mutex<AlertDispatcher>,
    pub metrics: Arc<PipelineMetrics>,
    pub clock: Arc<dyn Clock>,
}

impl SharedState {
    pub fn new(
        threat_intel: ThreatIntelMatcher,
        ml_model: Option<IsolationForestModel>,
        dispatcher: AlertDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            graph: Arc::new(CommsGraph::new()),
            threat_intel: Arc::new(threat_intel),
            ml_model: ArcSwapOption::new(ml_model.map(Arc::new)),
            graph_signals: Arc::new(DashMap::new()),
            dispatcher: tokio::sync::Mutex::new(dispatcher),
            metrics: Arc::new(PipelineMetrics::new()),
            clock,
        }
    }

    /// The cached fan-out/pivot signal for `node`, `0.0` if none was
    /// flagged by the last sweep.
    pub fn graph_signal(&self, node: &str) -> f64 {
        self.graph_signals.get(node).map_or(0.0, |v| *v)
    }

    /// Atomically swap in a freshly (re)trained model. Readers in
    /// flight keep scoring against the old model until their next load
    /// (SPEC_FULL.md §5: "immutable after load; reloads swap the
    /// pointer atomically").
    pub fn reload_ml_model(&self, model: IsolationForestModel) {
        self.ml_model.store(Some(Arc::new(model)));
    }
}
