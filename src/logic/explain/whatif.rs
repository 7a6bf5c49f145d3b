//! What-if scenarios
//!
//! Each scenario changes one field of the original input and re-runs the
//! model; scenarios never compound.

use super::types::WhatIfScenario;
use crate::error::RiskResult;
use crate::logic::features::PatientFeatures;
use crate::logic::model::{predict_features, Classifier};

pub const TARGET_BMI: f64 = 25.0;
pub const TARGET_HBA1C: f64 = 6.0;

/// The two fixed counterfactuals: BMI at 25.0, HbA1c at 6.0
pub fn what_if<M: Classifier + ?Sized>(
    model: &M,
    base_probability: f32,
    features: &PatientFeatures,
) -> RiskResult<Vec<WhatIfScenario>> {
    let candidates = [
        (format!("If your BMI were {:.1}", TARGET_BMI), features.with_bmi(TARGET_BMI)),
        (format!("If your HbA1c were {:.1}", TARGET_HBA1C), features.with_hba1c_level(TARGET_HBA1C)),
    ];

    candidates
        .into_iter()
        .map(|(title, scenario)| {
            let predicted_probability = predict_features(model, &scenario)?;
            Ok(WhatIfScenario {
                title,
                predicted_probability,
                delta_percentage_points: (base_probability - predicted_probability) * 100.0,
            })
        })
        .collect()
}
