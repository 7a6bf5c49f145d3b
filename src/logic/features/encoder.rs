//! Feature Encoder - Record → feature vector
//!
//! Categorical mapping is fixed:
//! - gender: exactly "Female" (after trimming) → 0, anything else → 1
//! - hypertension / heart_disease: "Yes" (or integer 1) → 1, else 0
//! - smoking_history: lookup in `SMOKING_CODES`, unknown values rejected
//!
//! Numeric fields in strict mode fall back to 0; in display mode BMI and
//! HbA1c keep missing-ness, age and glucose are required.

use crate::error::EncodingError;
use crate::logic::dataset::parse::parse_int_prefix;
use crate::logic::dataset::{Field, Record};

use super::layout::FEATURE_COUNT;
use super::vector::{FeatureVector, PatientFeatures};

/// smoking_history category codes
pub const SMOKING_CODES: [(&str, f32); 6] = [
    ("Never", 0.0),
    ("No Info", 1.0),
    ("Current", 2.0),
    ("Former", 3.0),
    ("Ever", 4.0),
    ("Not Current", 5.0),
];

/// Encode for training: every numeric gap becomes 0, never NaN.
pub fn encode_strict(record: &Record) -> Result<FeatureVector, EncodingError> {
    let values: [f32; FEATURE_COUNT] = [
        encode_gender(record),
        numeric_or_zero(record, Field::Age),
        encode_flag(record, Field::Hypertension),
        encode_flag(record, Field::HeartDisease),
        encode_smoking(record)?,
        numeric_or_zero(record, Field::Bmi),
        numeric_or_zero(record, Field::HbA1cLevel),
        numeric_or_zero(record, Field::BloodGlucoseLevel),
    ];

    Ok(FeatureVector::from_values(values))
}

/// Encode for prediction: BMI and HbA1c may be missing, age and glucose
/// may not. Clinical values stay f64 until they enter the model.
pub fn encode_display(record: &Record) -> Result<PatientFeatures, EncodingError> {
    Ok(PatientFeatures {
        gender: encode_gender(record),
        age: required(record, Field::Age)?,
        hypertension: encode_flag(record, Field::Hypertension),
        heart_disease: encode_flag(record, Field::HeartDisease),
        smoking_history: encode_smoking(record)?,
        bmi: record.numeric(Field::Bmi),
        hba1c_level: record.numeric(Field::HbA1cLevel),
        blood_glucose_level: required(record, Field::BloodGlucoseLevel)?,
    })
}

/// Look up a smoking_history label (case-insensitive)
pub fn smoking_code(label: &str) -> Option<f32> {
    let label = label.trim();
    SMOKING_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|(_, code)| *code)
}

fn encode_gender(record: &Record) -> f32 {
    match record.get(Field::Gender) {
        Some("Female") => 0.0,
        _ => 1.0,
    }
}

fn encode_flag(record: &Record, field: Field) -> f32 {
    match record.get(field) {
        Some(value) if value.eq_ignore_ascii_case("yes") => 1.0,
        Some(value) if parse_int_prefix(value) == Some(1) => 1.0,
        _ => 0.0,
    }
}

fn encode_smoking(record: &Record) -> Result<f32, EncodingError> {
    let raw = record.get(Field::SmokingHistory).unwrap_or_default();
    smoking_code(raw).ok_or_else(|| EncodingError::UnknownCategory {
        field: Field::SmokingHistory.column(),
        value: raw.to_string(),
    })
}

fn numeric_or_zero(record: &Record, field: Field) -> f32 {
    record.numeric(field).unwrap_or(0.0) as f32
}

fn required(record: &Record, field: Field) -> Result<f64, EncodingError> {
    record.numeric(field).ok_or(EncodingError::MissingField { field: field.column() })
}
