//! Model input layout: which clinical field sits in which column.
//!
//! Any reorder, insertion or removal bumps `FEATURE_VERSION`. Trained models
//! keep the layout hash they were fitted under and refuse vectors carrying a
//! different one.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

pub const FEATURE_VERSION: u8 = 1;

/// Column names, model input order. Spelled as in the CSV header.
pub const FEATURE_LAYOUT: &[&str] = &[
    "gender",              // Female = 0, other = 1
    "age",                 // years
    "hypertension",        // 0 / 1
    "heart_disease",       // 0 / 1
    "smoking_history",     // category code 0-5
    "bmi",                 // kg/m², optional at prediction time
    "HbA1c_level",         // %, optional at prediction time
    "blood_glucose_level", // mg/dL
];

pub const FEATURE_COUNT: usize = 8;

// Column indices
pub const GENDER: usize = 0;
pub const AGE: usize = 1;
pub const HYPERTENSION: usize = 2;
pub const HEART_DISEASE: usize = 3;
pub const SMOKING_HISTORY: usize = 4;
pub const BMI: usize = 5;
pub const HBA1C_LEVEL: usize = 6;
pub const BLOOD_GLUCOSE_LEVEL: usize = 7;

/// CRC32 of the version byte followed by each column name, NUL-separated
pub fn layout_hash() -> u32 {
    let mut crc = Hasher::new();
    crc.update(&[FEATURE_VERSION]);
    FEATURE_LAYOUT.iter().for_each(|column| {
        crc.update(column.as_bytes());
        crc.update(&[0]);
    });
    crc.finalize()
}

/// Layout description reported by the engine status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        LayoutInfo {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_LAYOUT.len(),
            feature_names: FEATURE_LAYOUT.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}
