//! Error handling
//!
//! Every error is terminal for the operation that raised it. Nothing in the
//! core retries, and no error path mutates the dataset, models or stats that
//! were valid before the call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type RiskResult<T> = Result<T, RiskError>;

#[derive(Debug, Error)]
pub enum RiskError {
    /// Fetch or parse failure for a dataset source
    #[error("Failed to load dataset from {source_name}: {reason}")]
    DatasetLoad { source_name: String, reason: String },

    /// Zero usable rows
    #[error("Dataset is empty")]
    EmptyDataset,

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("Models have not been trained yet")]
    ModelNotTrained,

    #[error("Training failed: {0}")]
    Training(String),

    #[error("A training run is already in progress")]
    TrainingInProgress,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RiskError {
    /// Stable machine-readable kind for the presentation layer
    pub fn kind(&self) -> &'static str {
        match self {
            RiskError::DatasetLoad { .. } => "dataset_load",
            RiskError::EmptyDataset => "empty_dataset",
            RiskError::Encoding(_) => "encoding",
            RiskError::ModelNotTrained => "model_not_trained",
            RiskError::Training(_) => "training",
            RiskError::TrainingInProgress => "training_in_progress",
            RiskError::InvalidInput(_) => "invalid_input",
        }
    }
}

impl From<MlError> for RiskError {
    fn from(err: MlError) -> Self {
        RiskError::Training(err.to_string())
    }
}

/// Raised by the feature encoder
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("Unrecognized value {value:?} for categorical field '{field}'")]
    UnknownCategory { field: &'static str, value: String },

    #[error("Required field '{field}' is missing or not numeric")]
    MissingField { field: &'static str },
}

/// Raised by the sequential network adapter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MlError {
    #[error("Shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Inputs and labels disagree on row count ({inputs} vs {labels})")]
    RowMismatch { inputs: usize, labels: usize },

    #[error("Input contains a non-finite value at row {row}, column {column}")]
    NonFiniteInput { row: usize, column: usize },

    #[error("Loss became non-finite during epoch {epoch}")]
    NonFiniteLoss { epoch: usize },

    #[error("Cannot fit or evaluate on an empty batch")]
    EmptyBatch,

    #[error("Model must be compiled before fitting")]
    NotCompiled,

    #[error("Invalid layer configuration: {0}")]
    InvalidLayer(String),

    #[error("Tensor backend error: {0}")]
    Backend(String),
}

/// Serializable error payload returned by the command API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandError {
    pub kind: String,
    pub message: String,
}

impl From<RiskError> for CommandError {
    fn from(err: RiskError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
