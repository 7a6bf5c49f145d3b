use super::types::{FeatureWeight, WeightDirection};
use crate::logic::features::feature_name;

/// Pair logistic coefficients with feature names, layout order
pub fn feature_weights(coefficients: &[f32]) -> Vec<FeatureWeight> {
    coefficients
        .iter()
        .enumerate()
        .map(|(i, &weight)| FeatureWeight {
            name: feature_name(i).unwrap_or("unknown").to_string(),
            weight,
            direction: WeightDirection::from_weight(weight),
        })
        .collect()
}
