//! C0: pipeline orchestration. Wires C1-C8 together, owns the worker
//! lanes, and drives the shutdown/drain sequence (SPEC_FULL.md §5).

use crate::artifact_store::ArtifactStore;
use crate::classifier;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::graph_signals::{self, GraphSignals};
use crate::lane::LaneState;
use crate::metrics::PipelineMetrics;
use crate::shared::SharedState;
use nta_alert_sink::{AlertDispatcher, AlertSink, BackoffConfig};
use nta_common::Clock;
use nta_threat_intel::ThreatIntelMatcher;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Handle to one running lane: the channel feeding it and the task
/// driving it.
struct Lane {
    sender: mpsc::Sender<nta_common::Record>,
    task: JoinHandle<nta_baseline::BaselineSnapshot>,
}

/// The running detection pipeline. Construct with [`DetectionPipeline::start`],
/// feed records with [`DetectionPipeline::ingest`], and drain with
/// [`DetectionPipeline::shutdown`].
pub struct DetectionPipeline {
    config: PipelineConfig,
    shared: Arc<SharedState>,
    lanes: Vec<Lane>,
    graph_sweeper: JoinHandle<()>,
    artifact_store: Arc<dyn ArtifactStore>,
}

impl DetectionPipeline {
    /// Load persisted artifacts (a missing artifact degrades that
    /// component to no-signal, never fails startup — SPEC_FULL.md
    /// §4.9) and spawn the worker lanes and background graph sweep.
    pub async fn start(
        config: PipelineConfig,
        artifact_store: Arc<dyn ArtifactStore>,
        alert_sink: Arc<dyn AlertSink>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PipelineError> {
        if config.lane_count == 0 {
            return Err(PipelineError::ConfigurationInvalid(
                "lane_count must be at least 1".to_owned(),
            ));
        }

        let mut threat_intel = ThreatIntelMatcher::new()
            .map_err(|err| PipelineError::ConfigurationInvalid(err.to_string()))?;
        match artifact_store.load_threat_intel_cache().await {
            Ok(Some(snapshot)) => threat_intel.import(&snapshot),
            Ok(None) => {}
            Err(err) => error!(%err, "threat-intel cache unavailable, starting empty"),
        }

        let ml_model = match artifact_store.load_ml_model().await {
            Ok(model) => model,
            Err(err) => {
                error!(%err, "ML model unavailable, ml_anomaly detector disabled");
                None
            }
        };

        let dispatcher = AlertDispatcher::new(alert_sink).with_backoff(BackoffConfig {
            call_timeout: config.external_call_timeout,
            ..BackoffConfig::default()
        });
        let shared = Arc::new(SharedState::new(threat_intel, ml_model, dispatcher, clock));

        if let Ok(Some(snapshot)) = artifact_store.load_graph().await {
            shared.graph.import(&snapshot);
        }

        let graph_sweeper = graph_signals::spawn_sweeper(
            shared.graph.clone(),
            shared.graph_signals.clone(),
            config.graph_signal_interval,
        );

        let baseline_snapshot = match artifact_store.load_baselines().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(%err, "baseline store unavailable, starting cold");
                None
            }
        };

        let lanes = (0..config.lane_count)
            .map(|lane_index| spawn_lane(&config, &shared, lane_index, baseline_snapshot.as_ref()))
            .collect();

        Ok(Self {
            config,
            shared,
            lanes,
            graph_sweeper,
            artifact_store,
        })
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.shared.metrics
    }

    pub fn graph_signals(&self) -> &Arc<GraphSignals> {
        &self.shared.graph_signals
    }

    /// Classify and route one input line to its lane. Sends block under
    /// backpressure (SPEC_FULL.md §5: the one permitted blocking point
    /// between ingest and workers).
    #[instrument(skip(self, line))]
    pub async fn ingest(&self, line: &str) -> Result<(), PipelineError> {
        let Some(record) = classifier::classify(line, &self.shared.metrics) else {
            return Ok(());
        };

        let lane_index = crate::lanes::lane_for_host(&record.source, self.lanes.len());
        self.lanes[lane_index]
            .sender
            .send(record)
            .await
            .map_err(|_| PipelineError::ChannelClosed)
    }

    /// Stop accepting new records, drain every lane, persist artifacts,
    /// and flush the alert queue — all within `shutdown_deadline`
    /// (SPEC_FULL.md §5).
    pub async fn shutdown(self) {
        self.graph_sweeper.abort();

        let baselines = drop_senders_and_join(self.lanes, self.config.shutdown_deadline).await;

        let now = self.shared.clock.now();
        if let Err(err) = self.artifact_store.save_graph(&self.shared.graph.export(now)).await {
            error!(%err, "failed to persist communication graph");
        }
        if let Err(err) = self
            .artifact_store
            .save_threat_intel_cache(&self.shared.threat_intel.export(now))
            .await
        {
            error!(%err, "failed to persist threat-intel cache");
        }
        if let Err(err) = self.artifact_store.save_baselines(&baselines).await {
            error!(%err, "failed to persist host baselines");
        }

        let deadline = self.config.shutdown_deadline;
        let mut dispatcher = self.shared.dispatcher.lock().await;
        if tokio::time::timeout(deadline, dispatcher.flush()).await.is_err() {
            error!("alert queue flush did not complete within the shutdown deadline");
        }

        info!("pipeline shutdown complete");
    }
}

fn spawn_lane(
    config: &PipelineConfig,
    shared: &Arc<SharedState>,
    lane_index: usize,
    baseline_snapshot: Option<&nta_baseline::BaselineSnapshot>,
) -> Lane {
    let (sender, mut receiver) = mpsc::channel(config.channel_capacity);
    let mut state = LaneState::new(config.detection.clone(), config.fusion.clone());

    if let Some(snapshot) = baseline_snapshot {
        let lane_count = config.lane_count;
        let owned: nta_baseline::BaselineSnapshot = snapshot
            .iter()
            .filter(|(host, _)| crate::lanes::lane_for_host(host, lane_count) == lane_index)
            .map(|(host, metrics)| (host.clone(), metrics.clone()))
            .collect();
        state.restore_baselines(&owned);
    }

    let shared = shared.clone();

    let task = tokio::spawn(async move {
        while let Some(record) = receiver.recv().await {
            state.process(&shared, record).await;
        }
        state.export_baselines()
    });

    Lane { sender, task }
}

/// Close every lane's input, wait for its queued records to drain, and
/// merge each lane's final baseline state into one snapshot.
async fn drop_senders_and_join(
    lanes: Vec<Lane>,
    deadline: std::time::Duration,
) -> nta_baseline::BaselineSnapshot {
    let mut tasks = Vec::with_capacity(lanes.len());
    for lane in lanes {
        drop(lane.sender);
        tasks.push(lane.task);
    }
    match tokio::time::timeout(deadline, futures_join_all(tasks)).await {
        Ok(snapshots) => snapshots.into_iter().flatten().collect(),
        Err(_) => {
            error!("worker lanes did not drain within the shutdown deadline");
            Default::default()
        }
    }
}

async fn futures_join_all(
    tasks: Vec<JoinHandle<nta_baseline::BaselineSnapshot>>,
) -> Vec<nta_baseline::BaselineSnapshot> {
    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(snapshot) => results.push(snapshot),
            Err(err) => error!(%err, "worker lane task panicked"),
        }
    }
    results
}
