//! Configuration module

use std::env;

use crate::constants::*;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Dataset path or http(s) URL
    pub dataset_source: String,

    /// HTTP timeout for remote datasets (seconds)
    pub http_timeout_secs: u64,

    pub training: TrainingConfig,
}

/// Hyperparameters shared by both classifiers
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub sample_limit: usize,
    pub train_fraction: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
    pub dropout_rate: f32,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            train_fraction: DEFAULT_TRAIN_FRACTION,
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
            dropout_rate: DEFAULT_DROPOUT_RATE,
            seed: DEFAULT_SEED,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_source: DEFAULT_DATASET_SOURCE.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            training: TrainingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = TrainingConfig::default();

        Self {
            dataset_source: env::var("RISK_DATASET_SOURCE")
                .unwrap_or_else(|_| DEFAULT_DATASET_SOURCE.to_string()),

            http_timeout_secs: env_parse("RISK_HTTP_TIMEOUT_SECS")
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),

            training: TrainingConfig {
                sample_limit: env_parse("RISK_SAMPLE_LIMIT").unwrap_or(defaults.sample_limit),
                epochs: env_parse("RISK_EPOCHS").unwrap_or(defaults.epochs),
                batch_size: env_parse("RISK_BATCH_SIZE")
                    .filter(|b: &usize| *b > 0)
                    .unwrap_or(defaults.batch_size),
                learning_rate: env_parse("RISK_LEARNING_RATE").unwrap_or(defaults.learning_rate),
                seed: env_parse("RISK_SEED").unwrap_or(defaults.seed),
                ..defaults
            },
        }
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
