//! Features Module - Feature Encoding Engine
//!
//! Turns typed dataset records into the fixed 8-value layout the models
//! consume.

pub mod bmi;
pub mod encoder;
pub mod layout;
pub mod vector;

#[cfg(test)]
mod tests;

pub use bmi::calculate_bmi;
pub use encoder::{encode_display, encode_strict};
pub use layout::{feature_name, layout_hash, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use vector::{FeatureVector, PatientFeatures};
