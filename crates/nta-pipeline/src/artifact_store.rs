//! Persistence collaborator seam (SPEC_FULL.md §3). All methods are
//! async, fallible, and optional at the call site: `Ok(None)`/an `Err`
//! that is logged and swallowed both mean "disabled", never "crash".

use async_trait::async_trait;
use nta_baseline::BaselineSnapshot;
use nta_graph::GraphSnapshot;
use nta_ml::IsolationForestModel;
use nta_threat_intel::ThreatIntelSnapshot;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn load_graph(&self) -> Result<Option<GraphSnapshot>, ArtifactError>;
    async fn save_graph(&self, snapshot: &GraphSnapshot) -> Result<(), ArtifactError>;

    async fn load_baselines(&self) -> Result<Option<BaselineSnapshot>, ArtifactError>;
    async fn save_baselines(&self, snapshot: &BaselineSnapshot) -> Result<(), ArtifactError>;

    async fn load_threat_intel_cache(&self) -> Result<Option<ThreatIntelSnapshot>, ArtifactError>;
    async fn save_threat_intel_cache(
        &self,
        snapshot: &ThreatIntelSnapshot,
    ) -> Result<(), ArtifactError>;

    async fn load_ml_model(&self) -> Result<Option<IsolationForestModel>, ArtifactError>;
}

/// An `ArtifactStore` with nothing behind it: every load returns `None`
/// (component degrades to no-signal) and every save is a no-op. Useful
/// as a default when no persistence collaborator is wired in.
#[derive(Debug, Default)]
pub struct NullArtifactStore;

#[async_trait]
impl ArtifactStore for NullArtifactStore {
    async fn load_graph(&self) -> Result<Option<GraphSnapshot>, ArtifactError> {
        Ok(None)
    }

    async fn save_graph(&self, _snapshot: &GraphSnapshot) -> Result<(), ArtifactError> {
        Ok(())
    }

    async fn load_baselines(&self) -> Result<Option<BaselineSnapshot>, ArtifactError> {
        Ok(None)
    }

    async fn save_baselines(&self, _snapshot: &BaselineSnapshot) -> Result<(), ArtifactError> {
        Ok(())
    }

    async fn load_threat_intel_cache(&self) -> Result<Option<ThreatIntelSnapshot>, ArtifactError> {
        Ok(None)
    }

    async fn save_threat_intel_cache(
        &self,
        _snapshot: &ThreatIntelSnapshot,
    ) -> Result<(), ArtifactError> {
        Ok(())
    }

    async fn load_ml_model(&self) -> Result<Option<IsolationForestModel>, ArtifactError> {
        Ok(None)
    }
}
