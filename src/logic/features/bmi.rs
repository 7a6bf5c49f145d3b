//! BMI helper for the prediction form

use crate::error::{RiskError, RiskResult};

/// Heights above this are read as centimetres
const CENTIMETRE_CUTOFF: f64 = 10.0;

/// BMI from weight (kg) and height (m or cm), rounded to 2 decimals
pub fn calculate_bmi(weight_kg: f64, height: f64) -> RiskResult<f64> {
    if !weight_kg.is_finite() || !height.is_finite() || weight_kg <= 0.0 || height <= 0.0 {
        return Err(RiskError::InvalidInput(
            "Please enter valid weight and height".to_string(),
        ));
    }

    let height_m = if height > CENTIMETRE_CUTOFF { height / 100.0 } else { height };
    let bmi = weight_kg / (height_m * height_m);

    Ok((bmi * 100.0).round() / 100.0)
}
