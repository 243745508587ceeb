//! Per-detector accuracy/weight constants (SPEC_FULL.md §4.7).
//!
//! The implementer must ship these exact default values; downstream
//! calibration may override them via [`crate::config::FusionConfig`].

use nta_common::DetectorId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectorAccuracy {
    pub id: DetectorId,
    pub tpr: f64,
    pub fpr: f64,
    pub weight: f64,
}

pub const DEFAULT_ACCURACY_TABLE: [DetectorAccuracy; 10] = [
    DetectorAccuracy {
        id: DetectorId::ZeekScan,
        tpr: 0.90,
        fpr: 0.10,
        weight: 1.0,
    },
    DetectorAccuracy {
        id: DetectorId::ZeekAuth,
        tpr: 0.90,
        fpr: 0.08,
        weight: 1.2,
    },
    DetectorAccuracy {
        id: DetectorId::ZeekExec,
        tpr: 0.85,
        fpr: 0.12,
        weight: 1.3,
    },
    DetectorAccuracy {
        id: DetectorId::ZeekDpi,
        tpr: 0.80,
        fpr: 0.15,
        weight: 0.9,
    },
    DetectorAccuracy {
        id: DetectorId::ZeekEncrypted,
        tpr: 0.75,
        fpr: 0.20,
        weight: 0.8,
    },
    DetectorAccuracy {
        id: DetectorId::ZeekZeroday,
        tpr: 0.70,
        fpr: 0.25,
        weight: 0.7,
    },
    DetectorAccuracy {
        id: DetectorId::MlAnomaly,
        tpr: 0.85,
        fpr: 0.10,
        weight: 1.1,
    },
    DetectorAccuracy {
        id: DetectorId::GraphAnalysis,
        tpr: 0.80,
        fpr: 0.12,
        weight: 1.0,
    },
    DetectorAccuracy {
        id: DetectorId::ThreatIntel,
        tpr: 0.95,
        fpr: 0.02,
        weight: 1.5,
    },
    DetectorAccuracy {
        id: DetectorId::BaselineDeviation,
        tpr: 0.75,
        fpr: 0.18,
        weight: 0.9,
    },
];

pub fn lookup(table: &[DetectorAccuracy], id: DetectorId) -> Option<&DetectorAccuracy> {
    table.iter().find(|entry| entry.id == id)
}
