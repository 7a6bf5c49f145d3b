//! Model Module - training and inference
//!
//! `network` adapts burn to the `Sequential` contract; `training` runs the
//! two-model protocol on top of it and `inference` serves single-record
//! predictions from the result.

pub mod inference;
pub mod network;
pub mod training;

// Re-export common types
pub use inference::{predict_features, InferenceStats, Prediction, RiskInferenceEngine};
pub use network::{Classifier, Evaluation, Sequential};
pub use training::{
    ModelKind, SplitSummary, TrainedModel, TrainedModels, TrainingOrchestrator, TrainingPhase,
};
