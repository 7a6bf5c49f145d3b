//! Application State - dataset, trained models and the training gate
//!
//! Transitions:
//! - `load_dataset`: replaces dataset + stats wholesale, only on success
//! - `train`: replaces both models wholesale, only on success
//! - `predict`: read-only against the current model pair
//!
//! Readers clone the current `Arc` under a short read lock, so a prediction
//! running during a model swap sees either the old pair or the new one.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{RiskError, RiskResult};
use crate::logic::dataset::{Dataset, DatasetSource, Record};
use crate::logic::explain::{explain, what_if, Explanation, WhatIfScenario};
use crate::logic::model::{
    InferenceStats, RiskInferenceEngine, TrainedModels, TrainingOrchestrator, TrainingPhase,
};

/// Everything the dashboard shows for one prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionReport {
    pub probability: f32,
    pub badge: String,
    pub badge_class: String,
    pub explanation: Explanation,
    pub what_if: Vec<WhatIfScenario>,
    pub model_run_id: Uuid,
    pub inference_time_us: u64,
}

pub struct AppState {
    config: Config,
    dataset: RwLock<Option<Arc<Dataset>>>,
    models: RwLock<Option<Arc<TrainedModels>>>,
    training_gate: Mutex<()>,
    inference: RiskInferenceEngine,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dataset: RwLock::new(None),
            models: RwLock::new(None),
            training_gate: Mutex::new(()),
            inference: RiskInferenceEngine::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ========================================================================
    // DATASET
    // ========================================================================

    /// Load from a path or URL. On failure the previous dataset stays.
    pub fn load_dataset(&self, source: &str) -> RiskResult<Arc<Dataset>> {
        let source = DatasetSource::parse(source);
        let timeout = Duration::from_secs(self.config.http_timeout_secs);

        match Dataset::load(&source, timeout) {
            Ok(dataset) => Ok(self.set_dataset(dataset)),
            Err(e) => {
                log::warn!("Dataset load from {} failed: {}", source.name(), e);
                Err(e)
            }
        }
    }

    /// Load from the configured source
    pub fn load_configured_dataset(&self) -> RiskResult<Arc<Dataset>> {
        let source = self.config.dataset_source.clone();
        self.load_dataset(&source)
    }

    pub fn set_dataset(&self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        *self.dataset.write() = Some(Arc::clone(&dataset));
        dataset
    }

    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset.read().clone()
    }

    // ========================================================================
    // TRAINING
    // ========================================================================

    pub fn is_training(&self) -> bool {
        self.training_gate.is_locked()
    }

    /// Train both models on the current dataset and swap them in.
    ///
    /// Fails with `TrainingInProgress` if another run holds the gate.
    pub fn train<F>(&self, progress: F) -> RiskResult<Arc<TrainedModels>>
    where
        F: FnMut(TrainingPhase),
    {
        let _gate = self.training_gate.try_lock().ok_or(RiskError::TrainingInProgress)?;

        let dataset = self.dataset().ok_or(RiskError::EmptyDataset)?;
        let orchestrator = TrainingOrchestrator::new(self.config.training.clone());

        let trained = match orchestrator.train_with_progress(&dataset.records, progress) {
            Ok(trained) => Arc::new(trained),
            Err(e) => {
                log::error!("Training failed, keeping previous models: {}", e);
                return Err(e);
            }
        };

        let previous = self.models.write().replace(Arc::clone(&trained));
        if let Some(previous) = previous {
            log::info!("Replaced models from run {}", previous.neural_net.run_id);
        }
        log::info!("Models ready (run {})", trained.neural_net.run_id);

        Ok(trained)
    }

    pub fn models(&self) -> Option<Arc<TrainedModels>> {
        self.models.read().clone()
    }

    // ========================================================================
    // PREDICTION
    // ========================================================================

    pub fn predict(&self, record: &Record) -> RiskResult<PredictionReport> {
        let models = self.models();
        let neural_net = models.as_ref().map(|m| &m.neural_net);

        let prediction = self.inference.predict(neural_net, record)?;
        let model = neural_net.ok_or(RiskError::ModelNotTrained)?;

        let explanation = explain(prediction.probability, &prediction.features);
        let scenarios = what_if(model, prediction.probability, &prediction.features)?;

        log::info!(
            "Prediction: {:.2}% ({}), {} risk factors",
            prediction.probability * 100.0,
            explanation.risk_level,
            explanation.risk_factors.iter().filter(|f| f.is_risk()).count()
        );
        for scenario in &scenarios {
            log::debug!("{}: {}", scenario.title, scenario.summary());
        }

        Ok(PredictionReport {
            probability: prediction.probability,
            badge: explanation.risk_level.badge(),
            badge_class: explanation.risk_level.badge_class().to_string(),
            explanation,
            what_if: scenarios,
            model_run_id: model.run_id,
            inference_time_us: prediction.inference_time_us,
        })
    }

    pub fn inference_stats(&self) -> InferenceStats {
        self.inference.stats()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
