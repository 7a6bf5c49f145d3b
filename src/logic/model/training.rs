//! Training Orchestrator - sample, split, fit, evaluate
//!
//! Both classifiers see the identical split:
//! - sample = first `min(sample_limit, N)` records, dataset order
//! - train  = first `floor(train_fraction · sample)` rows, test = the rest
//!
//! No shuffling happens before the split, so the split is order-dependent.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::network::{
    Activation, AdamConfig, Classifier, CompileOptions, Evaluation, FitOptions, LayerSpec, Loss,
    Sequential,
};
use crate::config::TrainingConfig;
use crate::error::{MlError, RiskError, RiskResult};
use crate::logic::dataset::Record;
use crate::logic::features::{encode_strict, layout_hash, FeatureVector, FEATURE_COUNT};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Logistic,
    NeuralNet,
}

impl ModelKind {
    pub fn label(self) -> &'static str {
        match self {
            ModelKind::Logistic => "Logistic Regression",
            ModelKind::NeuralNet => "Neural Network",
        }
    }
}

/// Progress notifications emitted during `train`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TrainingPhase {
    Sampling(SplitSummary),
    Fitting { model: ModelKind },
    EpochCompleted { model: ModelKind, epoch: usize, loss: f32 },
    Evaluating,
}

/// How the dataset was cut for a training run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub dataset_size: usize,
    pub sample_size: usize,
    pub train_size: usize,
    pub test_size: usize,
}

impl SplitSummary {
    pub fn compute(dataset_size: usize, config: &TrainingConfig) -> Self {
        let sample_size = dataset_size.min(config.sample_limit);
        let train_size = (sample_size as f64 * config.train_fraction).floor() as usize;

        Self {
            dataset_size,
            sample_size,
            train_size,
            test_size: sample_size - train_size,
        }
    }
}

/// A fitted classifier and its held-out scores
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub kind: ModelKind,
    pub evaluation: Evaluation,
    pub run_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub split: SplitSummary,
    pub layout_hash: u32,
    network: Sequential,
}

impl TrainedModel {
    pub fn network(&self) -> &Sequential {
        &self.network
    }
}

impl Classifier for TrainedModel {
    fn predict(&self, x: &Array2<f32>) -> Result<Array2<f32>, MlError> {
        self.network.predict(x)
    }

    fn input_dim(&self) -> usize {
        self.network.input_dim()
    }

    fn layout_hash(&self) -> u32 {
        self.layout_hash
    }
}

/// Result of one training run. Replaces any previous pair wholesale.
#[derive(Debug, Clone)]
pub struct TrainedModels {
    pub logistic: TrainedModel,
    pub neural_net: TrainedModel,
    /// Linear coefficients in feature layout order
    pub logistic_weights: Vec<f32>,
    pub split: SplitSummary,
}

// ============================================================================
// TRAINING BUFFERS
// ============================================================================

/// Train/test matrices for one run, released when the run ends
struct TrainingTensors {
    x_train: Array2<f32>,
    y_train: Array2<f32>,
    x_test: Array2<f32>,
    y_test: Array2<f32>,
}

impl TrainingTensors {
    fn build(features: &[FeatureVector], labels: &[f32], train_size: usize) -> Self {
        let (train_x, test_x) = features.split_at(train_size);
        let (train_y, test_y) = labels.split_at(train_size);

        Self {
            x_train: feature_matrix(train_x),
            y_train: label_matrix(train_y),
            x_test: feature_matrix(test_x),
            y_test: label_matrix(test_y),
        }
    }
}

impl Drop for TrainingTensors {
    fn drop(&mut self) {
        log::debug!(
            "Released training tensors ({} train rows, {} test rows)",
            self.x_train.nrows(),
            self.x_test.nrows()
        );
    }
}

fn feature_matrix(vectors: &[FeatureVector]) -> Array2<f32> {
    Array2::from_shape_fn((vectors.len(), FEATURE_COUNT), |(i, j)| vectors[i].values[j])
}

fn label_matrix(labels: &[f32]) -> Array2<f32> {
    Array2::from_shape_fn((labels.len(), 1), |(i, _)| labels[i])
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

pub fn logistic_layers() -> Vec<LayerSpec> {
    vec![LayerSpec::input_dense(FEATURE_COUNT, 1, Activation::Sigmoid)]
}

pub fn neural_net_layers(dropout_rate: f32) -> Vec<LayerSpec> {
    vec![
        LayerSpec::input_dense(FEATURE_COUNT, 16, Activation::Relu),
        LayerSpec::dropout(dropout_rate),
        LayerSpec::dense(8, Activation::Relu),
        LayerSpec::dropout(dropout_rate),
        LayerSpec::dense(1, Activation::Sigmoid),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct TrainingOrchestrator {
    config: TrainingConfig,
}

impl TrainingOrchestrator {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn train(&self, records: &[Record]) -> RiskResult<TrainedModels> {
        self.train_with_progress(records, |_| {})
    }

    pub fn train_with_progress<F>(&self, records: &[Record], mut progress: F) -> RiskResult<TrainedModels>
    where
        F: FnMut(TrainingPhase),
    {
        if records.is_empty() {
            return Err(RiskError::EmptyDataset);
        }

        let split = SplitSummary::compute(records.len(), &self.config);
        if split.train_size == 0 {
            return Err(RiskError::Training(format!(
                "training split is empty ({} sampled rows)",
                split.sample_size
            )));
        }

        let sample = &records[..split.sample_size];
        let features = sample
            .iter()
            .map(encode_strict)
            .collect::<Result<Vec<_>, _>>()?;
        let labels: Vec<f32> = sample
            .iter()
            .map(|r| if r.is_positive() { 1.0 } else { 0.0 })
            .collect();

        log::info!(
            "Training on {} of {} records ({} train / {} test)",
            split.sample_size,
            split.dataset_size,
            split.train_size,
            split.test_size
        );
        progress(TrainingPhase::Sampling(split));

        let tensors = TrainingTensors::build(&features, &labels, split.train_size);

        let fit_options = FitOptions {
            epochs: self.config.epochs,
            batch_size: self.config.batch_size,
            shuffle: true,
        };
        let compile_options = CompileOptions {
            optimizer: AdamConfig::with_learning_rate(self.config.learning_rate),
            loss: Loss::BinaryCrossEntropy,
        };

        let mut fitted = Vec::with_capacity(2);
        for (kind, specs, seed) in [
            (ModelKind::Logistic, logistic_layers(), self.config.seed),
            (
                ModelKind::NeuralNet,
                neural_net_layers(self.config.dropout_rate),
                self.config.seed.wrapping_add(1),
            ),
        ] {
            log::info!("Training {}...", kind.label());
            progress(TrainingPhase::Fitting { model: kind });

            let mut network = Sequential::build(&specs, seed)?.compile(compile_options);
            let history = network.fit(&tensors.x_train, &tensors.y_train, &fit_options, |epoch, loss| {
                log::debug!("{} epoch {}: loss {:.4}", kind.label(), epoch, loss);
                progress(TrainingPhase::EpochCompleted { model: kind, epoch, loss });
            })?;
            if let Some(loss) = history.epoch_losses.last() {
                log::info!("{} fitted, final training loss {:.4}", kind.label(), loss);
            }
            fitted.push((kind, network));
        }

        log::info!("Evaluating models...");
        progress(TrainingPhase::Evaluating);

        let run_id = Uuid::new_v4();
        let trained_at = Utc::now();
        let mut models = Vec::with_capacity(2);
        for (kind, network) in fitted {
            let evaluation = network.evaluate(&tensors.x_test, &tensors.y_test)?;
            log::info!(
                "{}: accuracy {:.2}%, loss {:.4}",
                kind.label(),
                evaluation.accuracy * 100.0,
                evaluation.loss
            );
            models.push(TrainedModel {
                kind,
                evaluation,
                run_id,
                trained_at,
                split,
                layout_hash: layout_hash(),
                network,
            });
        }
        drop(tensors);

        let neural_net = models.pop().ok_or_else(|| missing_model(ModelKind::NeuralNet))?;
        let logistic = models.pop().ok_or_else(|| missing_model(ModelKind::Logistic))?;
        let logistic_weights = extract_linear_weights(logistic.network())?;

        Ok(TrainedModels {
            logistic,
            neural_net,
            logistic_weights,
            split,
        })
    }
}

fn missing_model(kind: ModelKind) -> RiskError {
    RiskError::Training(format!("{} was not produced", kind.label()))
}

/// The 8 kernel coefficients of the single-unit linear layer
fn extract_linear_weights(network: &Sequential) -> RiskResult<Vec<f32>> {
    let weights = network.weights()?;
    let kernel = weights
        .first()
        .ok_or_else(|| RiskError::Training("linear model has no weights".to_string()))?;

    let coefficients: Vec<f32> = kernel.iter().copied().collect();
    if coefficients.len() != FEATURE_COUNT {
        return Err(RiskError::Training(format!(
            "expected {} linear coefficients, got {}",
            FEATURE_COUNT,
            coefficients.len()
        )));
    }
    Ok(coefficients)
}
