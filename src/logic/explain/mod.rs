//! Explain Module - post-hoc explanation of a single prediction
//!
//! Deterministic rules over the display-mode input, plus counterfactual
//! re-inference. Nothing here touches training state.

pub mod engine;
pub mod types;
pub mod weights;
pub mod whatif;


pub use engine::explain;
pub use types::{
    Explanation, FactorKind, FactorValue, FeatureWeight, RiskFactor, RiskLevel, WeightDirection,
    WhatIfScenario,
};
pub use weights::feature_weights;
pub use whatif::what_if;
