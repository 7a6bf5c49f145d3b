//! Feature Vector - Core data structure for model input
//!
//! Two encodings of the same record:
//! - `FeatureVector`: 8 finite-or-infinite floats, missing values already
//!   substituted. This is what the network consumes.
//! - `PatientFeatures`: the display-mode encoding, where the optional
//!   clinical fields (BMI, HbA1c) keep their missing-ness for the
//!   explanation engine.

use serde::{Deserialize, Serialize};

use super::layout::{self, layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned feature vector in `FEATURE_LAYOUT` order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    pub version: u8,
    pub layout_hash: u32,
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Named values for structured log lines
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "features": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// DISPLAY-MODE ENCODING
// ============================================================================

/// Display-mode encoding of a patient record. Clinical measurements keep
/// full precision so explanation thresholds see the entered value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PatientFeatures {
    pub gender: f32,
    pub age: f64,
    pub hypertension: f32,
    pub heart_disease: f32,
    pub smoking_history: f32,
    pub bmi: Option<f64>,
    pub hba1c_level: Option<f64>,
    pub blood_glucose_level: f64,
}

impl PatientFeatures {
    pub fn has_hypertension(&self) -> bool {
        self.hypertension == 1.0
    }

    pub fn has_heart_disease(&self) -> bool {
        self.heart_disease == 1.0
    }

    /// Model input: missing optional fields become 0, measurements narrow
    /// to f32 here and nowhere else
    pub fn to_feature_vector(&self) -> FeatureVector {
        let mut values = [0.0f32; FEATURE_COUNT];
        values[layout::GENDER] = self.gender;
        values[layout::AGE] = self.age as f32;
        values[layout::HYPERTENSION] = self.hypertension;
        values[layout::HEART_DISEASE] = self.heart_disease;
        values[layout::SMOKING_HISTORY] = self.smoking_history;
        values[layout::BMI] = present_or_zero(self.bmi);
        values[layout::HBA1C_LEVEL] = present_or_zero(self.hba1c_level);
        values[layout::BLOOD_GLUCOSE_LEVEL] = self.blood_glucose_level as f32;
        FeatureVector::from_values(values)
    }

    pub fn with_bmi(mut self, bmi: f64) -> Self {
        self.bmi = Some(bmi);
        self
    }

    pub fn with_hba1c_level(mut self, hba1c: f64) -> Self {
        self.hba1c_level = Some(hba1c);
        self
    }
}

fn present_or_zero(value: Option<f64>) -> f32 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientFeatures {
        PatientFeatures {
            gender: 0.0,
            age: 50.0,
            hypertension: 1.0,
            heart_disease: 0.0,
            smoking_history: 3.0,
            bmi: None,
            hba1c_level: Some(6.1),
            blood_glucose_level: 140.0,
        }
    }

    #[test]
    fn test_missing_optional_fields_become_zero() {
        let vector = patient().to_feature_vector();
        assert_eq!(vector.values[layout::BMI], 0.0);
        assert_eq!(vector.values[layout::HBA1C_LEVEL], 6.1);
        assert_eq!(vector.values, [0.0, 50.0, 1.0, 0.0, 3.0, 0.0, 6.1, 140.0]);
    }

    #[test]
    fn test_overrides_do_not_touch_original() {
        let base = patient();
        let scenario = base.with_bmi(25.0);
        assert_eq!(base.bmi, None);
        assert_eq!(scenario.bmi, Some(25.0));
        assert_eq!(scenario.hba1c_level, base.hba1c_level);
    }

    #[test]
    fn test_vector_carries_current_layout() {
        let vector = FeatureVector::from_values([1.0; FEATURE_COUNT]);
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash());
    }

    #[test]
    fn test_measurements_narrow_only_in_vector() {
        let features = PatientFeatures {
            age: 44.99999999,
            hba1c_level: Some(6.50000001),
            blood_glucose_level: 125.000001,
            ..patient()
        };
        assert!(features.age < 45.0);
        assert!(features.hba1c_level.unwrap() > 6.5);

        let vector = features.to_feature_vector();
        assert_eq!(vector.values[layout::AGE], 45.0);
        assert_eq!(vector.values[layout::HBA1C_LEVEL], 6.5);
    }

    #[test]
    fn test_to_log_entry() {
        let log = patient().to_feature_vector().to_log_entry();
        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert_eq!(log["features"]["age"], 50.0);
    }
}
