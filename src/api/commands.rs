//! Commands - API for the dashboard frontend
//!
//! Every command takes the shared `AppState`, returns a serializable payload
//! and maps failures into `CommandError`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::engine_status::{self, EngineStatus};
use crate::error::{CommandError, RiskError};
use crate::logic::dataset::{Dataset, Record};
use crate::logic::explain::{feature_weights, FeatureWeight};
use crate::logic::features;
use crate::logic::model::{Evaluation, TrainedModels, TrainingPhase};
use crate::logic::stats::{ClassStats, EdaStats};
use crate::logic::{AppState, PredictionReport};

type CommandResult<T> = Result<T, CommandError>;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Dataset panel: class balance + EDA charts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub source: String,
    pub total_records: usize,
    pub class_stats: ClassStats,
    /// "x% negative and y% positive"
    pub distribution: String,
    pub eda: EdaStats,
    pub fingerprint: String,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            source: dataset.source.clone(),
            total_records: dataset.len(),
            class_stats: dataset.class_stats,
            distribution: dataset.class_stats.distribution_line(),
            eda: dataset.eda_stats.clone(),
            fingerprint: dataset.fingerprint.clone(),
        }
    }
}

/// Held-out metrics for one model, raw and formatted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f32,
    pub loss: f32,
    /// e.g. "87.50%"
    pub accuracy_display: String,
    /// e.g. "0.3125"
    pub loss_display: String,
}

impl From<Evaluation> for ModelMetrics {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            accuracy: evaluation.accuracy,
            loss: evaluation.loss,
            accuracy_display: format!("{:.2}%", evaluation.accuracy * 100.0),
            loss_display: format!("{:.4}", evaluation.loss),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub run_id: Uuid,
    pub dataset_size: usize,
    pub sample_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub logistic: ModelMetrics,
    pub neural_net: ModelMetrics,
    pub feature_weights: Vec<FeatureWeight>,
}

impl From<&TrainedModels> for TrainingReport {
    fn from(models: &TrainedModels) -> Self {
        Self {
            run_id: models.neural_net.run_id,
            dataset_size: models.split.dataset_size,
            sample_size: models.split.sample_size,
            train_size: models.split.train_size,
            test_size: models.split.test_size,
            logistic: models.logistic.evaluation.into(),
            neural_net: models.neural_net.evaluation.into(),
            feature_weights: feature_weights(&models.logistic_weights),
        }
    }
}

// ============================================================================
// DATASET COMMANDS
// ============================================================================

/// Load a dataset from a path or URL (configured source when `None`)
pub fn load_dataset(state: &AppState, source: Option<&str>) -> CommandResult<DatasetSummary> {
    let dataset = match source {
        Some(source) => state.load_dataset(source)?,
        None => state.load_configured_dataset()?,
    };
    Ok(DatasetSummary::from(dataset.as_ref()))
}

/// Load a dataset from CSV text already in memory (file upload)
pub fn load_dataset_from_text(state: &AppState, text: &str, name: &str) -> CommandResult<DatasetSummary> {
    let dataset = state.set_dataset(Dataset::from_csv(text, name)?);
    log::info!("Dataset uploaded as {}: {} rows", name, dataset.len());
    Ok(DatasetSummary::from(dataset.as_ref()))
}

pub fn get_dataset_summary(state: &AppState) -> CommandResult<DatasetSummary> {
    let dataset = state.dataset().ok_or(RiskError::EmptyDataset)?;
    Ok(DatasetSummary::from(dataset.as_ref()))
}

// ============================================================================
// TRAINING COMMANDS
// ============================================================================

pub fn train_models(state: &AppState) -> CommandResult<TrainingReport> {
    train_models_with_progress(state, |_| {})
}

pub fn train_models_with_progress<F>(state: &AppState, progress: F) -> CommandResult<TrainingReport>
where
    F: FnMut(TrainingPhase),
{
    let models = state.train(progress)?;
    Ok(TrainingReport::from(models.as_ref()))
}

/// Logistic coefficients for the feature chart
pub fn get_feature_weights(state: &AppState) -> CommandResult<Vec<FeatureWeight>> {
    let models = state.models().ok_or(RiskError::ModelNotTrained)?;
    Ok(feature_weights(&models.logistic_weights))
}

// ============================================================================
// PREDICTION COMMANDS
// ============================================================================

pub fn predict_risk(state: &AppState, record: &Record) -> CommandResult<PredictionReport> {
    Ok(state.predict(record)?)
}

/// BMI from weight (kg) and height (m or cm)
pub fn calculate_bmi(weight_kg: f64, height: f64) -> CommandResult<f64> {
    Ok(features::calculate_bmi(weight_kg, height)?)
}

// ============================================================================
// STATUS COMMANDS
// ============================================================================

pub fn get_engine_status(state: &AppState) -> CommandResult<EngineStatus> {
    Ok(engine_status::collect(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_before_load() {
        let state = AppState::default();

        let err = get_dataset_summary(&state).unwrap_err();
        assert_eq!(err.kind, "empty_dataset");

        let err = train_models(&state).unwrap_err();
        assert_eq!(err.kind, "empty_dataset");

        let err = get_feature_weights(&state).unwrap_err();
        assert_eq!(err.kind, "model_not_trained");

        let record = Record::builder().age(50).blood_glucose_level(120).smoking_history("Never").build();
        let err = predict_risk(&state, &record).unwrap_err();
        assert_eq!(err.kind, "model_not_trained");
    }

    #[test]
    fn test_upload_summary() {
        let state = AppState::default();
        let csv = "gender,age,hypertension,heart_disease,smoking_history,bmi,HbA1c_level,blood_glucose_level,diabetes\n\
                   Female,25,0,0,never,22.1,5.0,90,0\n\
                   Male,61,1,0,former,31.4,7.1,200,1\n";

        let summary = load_dataset_from_text(&state, csv, "upload.csv").unwrap();

        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.class_stats.positives, 1);
        assert_eq!(summary.distribution, "50.0% negative and 50.0% positive");
        assert_eq!(summary.eda.age.bins[0].count, 1);
        assert_eq!(summary.fingerprint.len(), 64);
    }

    #[test]
    fn test_calculate_bmi_command() {
        assert_eq!(calculate_bmi(80.0, 180.0).unwrap(), 24.69);
        assert_eq!(calculate_bmi(-1.0, 180.0).unwrap_err().kind, "invalid_input");
    }

    #[test]
    fn test_metrics_formatting() {
        let metrics = ModelMetrics::from(Evaluation { loss: 0.31254, accuracy: 0.875 });
        assert_eq!(metrics.accuracy_display, "87.50%");
        assert_eq!(metrics.loss_display, "0.3125");
    }

    #[test]
    fn test_engine_status_empty() {
        let status = get_engine_status(&AppState::default()).unwrap();

        assert_eq!(status.feature_count, 8);
        assert!(!status.dataset.loaded);
        assert!(!status.model.trained);
        assert!(status.model.layout_matches);
        assert_eq!(status.inference.inference_count, 0);
    }
}
