//! Stats Module - Dataset summaries for the dashboard
//!
//! Class balance and binned age/BMI distributions. Both are recomputed from
//! scratch on every dataset load.

pub mod class;
pub mod eda;

pub use class::{summarize_classes, ClassStats};
pub use eda::{summarize_eda, EdaStats, Histogram, HistogramBin};
