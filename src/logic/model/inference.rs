//! Risk Inference Engine - single-record probability from the neural net
//!
//! Display-mode encoding, missing optionals substituted with 0, one forward
//! pass in inference mode. Output is clamped to [0, 1]. Vectors built under a
//! different feature layout than the model's are refused.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::network::Classifier;
use super::training::TrainedModel;
use crate::error::{RiskError, RiskResult};
use crate::logic::dataset::Record;
use crate::logic::features::{encode_display, PatientFeatures, FEATURE_COUNT};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub probability: f32,
    pub features: PatientFeatures,
    pub inference_time_us: u64,
}

/// Latency counters for status reporting
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct InferenceStats {
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug, Default)]
pub struct RiskInferenceEngine {
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl RiskInferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `record` and run it through the trained neural network
    pub fn predict(&self, neural_net: Option<&TrainedModel>, record: &Record) -> RiskResult<Prediction> {
        let model = neural_net.ok_or(RiskError::ModelNotTrained)?;
        let start_time = Instant::now();

        let features = encode_display(record)?;
        let probability = predict_features(model, &features)?;

        let inference_time_us = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(inference_time_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(Prediction {
            probability,
            features,
            inference_time_us,
        })
    }

    pub fn stats(&self) -> InferenceStats {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        InferenceStats {
            inference_count: count,
            avg_latency_ms: avg,
        }
    }
}

/// Probability for already-encoded features
pub fn predict_features<M: Classifier + ?Sized>(model: &M, features: &PatientFeatures) -> RiskResult<f32> {
    let vector = features.to_feature_vector();
    if vector.layout_hash != model.layout_hash() {
        return Err(RiskError::InvalidInput(format!(
            "feature layout {:08x} does not match model layout {:08x}",
            vector.layout_hash,
            model.layout_hash()
        )));
    }

    let input = Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| vector.values[j]);

    let output = model
        .predict(&input)
        .map_err(|e| RiskError::InvalidInput(e.to_string()))?;
    let probability = output
        .iter()
        .next()
        .copied()
        .ok_or_else(|| RiskError::InvalidInput("model returned no output".to_string()))?;

    if !probability.is_finite() {
        return Err(RiskError::InvalidInput(format!(
            "model produced a non-finite probability for {}",
            vector.to_log_entry()
        )));
    }

    Ok(probability.clamp(0.0, 1.0))
}
