//! Logic Module - Business Logic & Engines
//!
//! - `dataset/` - CSV records and dataset loading
//! - `stats/` - class balance and EDA histograms
//! - `features/` - feature layout and encoding
//! - `model/` - training substrate, training protocol, inference
//! - `explain/` - risk factors, what-if scenarios, weight chart
//! - `state` - application state and its transitions

pub mod dataset;
pub mod explain;
pub mod features;
pub mod model;
pub mod state;
pub mod stats;

pub use state::{AppState, PredictionReport};
