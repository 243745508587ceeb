//! One worker lane: owns every per-host/per-pair/per-source state the
//! shared-resource policy assigns to a single lane (SPEC_FULL.md §5) —
//! C2's rule trackers, C5's baselines, and C7's fusion engine/alert
//! history — and processes records for its slice of source hosts in
//! arrival order.

use crate::alert_builder;
use crate::detection_map;
use crate::features;
use crate::hourly_bucket::HourlyBucketTracker;
use crate::shared::SharedState;
use nta_baseline::BaselineLearner;
use nta_common::Record;
use nta_detectors::{DetectionConfig, DetectorEngine};
use nta_fusion::{Decision, FusionConfig, FusionEngine};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct LaneState {
    detectors: DetectorEngine,
    baselines: BaselineLearner,
    fusion: FusionEngine,
    hourly: HourlyBucketTracker,
    detection_config: DetectionConfig,
}

impl LaneState {
    pub fn new(detection_config: DetectionConfig, fusion_config: FusionConfig) -> Self {
        Self {
            detectors: DetectorEngine::new(),
            baselines: BaselineLearner::new(),
            fusion: FusionEngine::new(fusion_config),
            hourly: HourlyBucketTracker::new(),
            detection_config,
        }
    }

    /// Restore this lane's slice of a persisted baseline snapshot
    /// (SPEC_FULL.md §5: baselines are partitioned by lane like every
    /// other per-host state).
    pub fn restore_baselines(&mut self, snapshot: &nta_baseline::BaselineSnapshot) {
        self.baselines.import(snapshot);
    }

    /// Process one record end to end: update C2/C3/C4/C5/C6 signals,
    /// fuse them (C7), and submit an alert through the shared
    /// dispatcher (C8) if the fused action is actionable.
    #[instrument(skip(self, shared, record), fields(source = %record.source, destination = %record.destination))]
    pub async fn process(&mut self, shared: &Arc<SharedState>, record: Record) {
        let now = shared.clock.now();

        let protocol = alert_builder::protocol_label(&record);
        shared.graph.add_connection(&record.source, &record.destination, &protocol, now);

        let prev_last_seen = self.detectors.host_last_seen(&record.source);
        let findings = self.detectors.handle(&record, &self.detection_config);
        shared.metrics.record_detection();

        let derived = features::derive(&self.detectors, &record, prev_last_seen);
        let host_metrics = derived.as_host_metrics();

        let ml_prediction = shared
            .ml_model
            .load()
            .as_ref()
            .map(|model| model.predict(&derived.to_connection_features().to_vector()));

        let hourly_volume = self.hourly.observe(now, &mut self.baselines);

        let graph_signal = shared.graph_signal(&record.source);

        let signals = detection_map::build(
            &record,
            &self.detectors,
            &self.detection_config,
            &self.baselines,
            &host_metrics,
            hourly_volume,
            ml_prediction,
            &shared.threat_intel,
            now,
            graph_signal,
        );

        // Fold this record's values into the per-host baseline only
        // after the check above, so the check reflects history strictly
        // prior to this observation.
        for (metric, value) in host_metrics {
            self.baselines.update_host(&record.source, metric, value);
        }

        let decision: Decision = self.fusion.decide(
            &record.source,
            &record.destination,
            &signals.detections,
            &signals.scores,
            now,
        );

        if let Some(alert) = alert_builder::build(&record, &findings, &signals.detections, &decision, now) {
            shared.metrics.record_alert_dispatched();
            let protocols = vec![protocol];
            let files = alert_builder::files_transferred(&record);
            shared.dispatcher.lock().await.submit(alert, protocols, files).await;
        }

        if !findings.is_empty() {
            info!(count = findings.len(), "rule-based findings emitted");
        }
    }

    /// Snapshot this lane's slice of the baseline store, for merging
    /// into the persisted snapshot at shutdown.
    pub fn export_baselines(&self) -> nta_baseline::BaselineSnapshot {
        self.baselines.export()
    }
}
