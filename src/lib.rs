//! Diabetes Risk Core
//!
//! Dataset exploration, two-model training and explained single-record risk
//! prediction for the diabetes risk dashboard.

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use error::{RiskError, RiskResult};
