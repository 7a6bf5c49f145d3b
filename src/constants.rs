//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment overrides are applied in `config.rs`.

/// Default dataset location (relative path or http(s) URL)
pub const DEFAULT_DATASET_SOURCE: &str = "diabetes_raw_cleaned_25k.csv";

/// Maximum number of leading records used for training
pub const DEFAULT_SAMPLE_LIMIT: usize = 5000;

/// Fraction of the sample used as training split (floor)
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Training epochs for both classifiers
pub const DEFAULT_EPOCHS: usize = 20;

/// Mini-batch size for both classifiers
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Adam learning rate
pub const DEFAULT_LEARNING_RATE: f32 = 0.001;

/// Dropout rate between the hidden layers of the network
pub const DEFAULT_DROPOUT_RATE: f32 = 0.2;

/// Seed for weight init, shuffling and dropout masks
pub const DEFAULT_SEED: u64 = 42;

/// Timeout for remote dataset fetches (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Diabetes Risk Dashboard";
