//! Dataset Module - Typed records and dataset loading
//!
//! A `Dataset` is immutable once built and is replaced wholesale on every
//! load, together with its class and EDA stats.

pub mod loader;
pub mod parse;
pub mod record;


use std::time::Duration;

use chrono::{DateTime, Utc};

pub use loader::DatasetSource;
pub use record::{Field, Record, RecordBuilder};

use crate::error::{RiskError, RiskResult};
use crate::logic::stats::{summarize_classes, summarize_eda, ClassStats, EdaStats};

/// A loaded dataset and the summaries derived from it
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub class_stats: ClassStats,
    pub eda_stats: EdaStats,
    pub source: String,
    /// SHA-256 of the raw CSV text (empty for in-memory datasets)
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Build from already-parsed records. Zero records is an error.
    pub fn from_records(records: Vec<Record>, source: impl Into<String>) -> RiskResult<Self> {
        if records.is_empty() {
            return Err(RiskError::EmptyDataset);
        }

        let class_stats = summarize_classes(&records);
        let eda_stats = summarize_eda(&records);

        Ok(Self {
            records,
            class_stats,
            eda_stats,
            source: source.into(),
            fingerprint: String::new(),
            loaded_at: Utc::now(),
        })
    }

    /// Parse CSV text into a dataset
    pub fn from_csv(text: &str, source: &str) -> RiskResult<Self> {
        let records = loader::parse_csv(text, source)?;
        let mut dataset = Self::from_records(records, source)?;
        dataset.fingerprint = loader::fingerprint(text);
        Ok(dataset)
    }

    /// Read and parse a file path or http(s) URL
    pub fn load(source: &DatasetSource, http_timeout: Duration) -> RiskResult<Self> {
        let text = loader::read_source(source, http_timeout)?;
        let dataset = Self::from_csv(&text, source.name())?;

        log::info!(
            "Dataset loaded from {}: {} rows, {} positive ({}); {} binned by age, {} by BMI",
            dataset.source,
            dataset.class_stats.total,
            dataset.class_stats.positives,
            dataset.class_stats.distribution_line(),
            dataset.eda_stats.age.total(),
            dataset.eda_stats.bmi.total()
        );

        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
