use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::features::LayoutInfo;
use crate::logic::model::InferenceStats;
use crate::logic::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub app_version: String,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,

    pub dataset: DatasetStatus,
    pub model: ModelStatus,
    pub inference: InferenceStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStatus {
    pub loaded: bool,
    pub source: Option<String>,
    pub total_records: usize,
    pub positives: usize,
    pub negatives: usize,
    pub fingerprint: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub trained: bool,
    pub training_in_progress: bool,
    pub run_id: Option<Uuid>,
    pub logistic_accuracy: Option<f32>,
    pub neural_net_accuracy: Option<f32>,
    pub trained_on_records: Option<usize>,
    pub trained_at: Option<DateTime<Utc>>,
    /// False when the models were fitted under a different feature layout
    pub layout_matches: bool,
}

/// Snapshot of the engine for status panels
pub fn collect(state: &AppState) -> EngineStatus {
    let layout = LayoutInfo::current();

    let dataset = match state.dataset() {
        Some(d) => DatasetStatus {
            loaded: true,
            source: Some(d.source.clone()),
            total_records: d.class_stats.total,
            positives: d.class_stats.positives,
            negatives: d.class_stats.negatives,
            fingerprint: Some(d.fingerprint.clone()).filter(|f| !f.is_empty()),
            loaded_at: Some(d.loaded_at),
        },
        None => DatasetStatus {
            loaded: false,
            source: None,
            total_records: 0,
            positives: 0,
            negatives: 0,
            fingerprint: None,
            loaded_at: None,
        },
    };

    let models = state.models();
    let model = ModelStatus {
        trained: models.is_some(),
        training_in_progress: state.is_training(),
        run_id: models.as_ref().map(|m| m.neural_net.run_id),
        logistic_accuracy: models.as_ref().map(|m| m.logistic.evaluation.accuracy),
        neural_net_accuracy: models.as_ref().map(|m| m.neural_net.evaluation.accuracy),
        trained_on_records: models.as_ref().map(|m| m.split.train_size),
        trained_at: models.as_ref().map(|m| m.neural_net.trained_at),
        layout_matches: models
            .as_ref()
            .map(|m| m.neural_net.layout_hash == layout.hash)
            .unwrap_or(true),
    };

    EngineStatus {
        app_version: crate::constants::APP_VERSION.to_string(),
        feature_version: layout.version,
        layout_hash: layout.hash,
        feature_count: layout.feature_count,
        dataset,
        model,
        inference: state.inference_stats(),
    }
}
