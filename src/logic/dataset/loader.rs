//! Dataset ingestion - CSV text from a local file or a remote URL.

use std::path::Path;
use std::time::Duration;

use sha2::{Digest, Sha256};

use super::record::Record;
use crate::config::is_remote;
use crate::error::{RiskError, RiskResult};

/// Where a dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(String),
    Url(String),
}

impl DatasetSource {
    /// `http://` and `https://` sources are fetched, anything else is a path
    pub fn parse(source: &str) -> Self {
        if is_remote(source) {
            DatasetSource::Url(source.to_string())
        } else {
            DatasetSource::File(source.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DatasetSource::File(path) => path,
            DatasetSource::Url(url) => url,
        }
    }
}

/// Read the raw CSV text behind a source
pub fn read_source(source: &DatasetSource, http_timeout: Duration) -> RiskResult<String> {
    match source {
        DatasetSource::File(path) => read_file(Path::new(path)),
        DatasetSource::Url(url) => fetch_url(url, http_timeout),
    }
}

fn read_file(path: &Path) -> RiskResult<String> {
    log::info!("Reading dataset from file: {}", path.display());

    std::fs::read_to_string(path).map_err(|e| RiskError::DatasetLoad {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn fetch_url(url: &str, timeout: Duration) -> RiskResult<String> {
    log::info!("Fetching dataset from: {}", url);

    let agent = ureq::AgentBuilder::new().timeout(timeout).build();

    let response = agent.get(url).call().map_err(|e| RiskError::DatasetLoad {
        source_name: url.to_string(),
        reason: format!("Dataset not found at {}: {}", url, e),
    })?;

    response.into_string().map_err(|e| RiskError::DatasetLoad {
        source_name: url.to_string(),
        reason: e.to_string(),
    })
}

/// Parse CSV text (header row + rows) into records.
///
/// Blank rows are dropped. Columns outside the schema are ignored.
pub fn parse_csv(text: &str, source_name: &str) -> RiskResult<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let row_error = |index: usize, e: csv::Error| RiskError::DatasetLoad {
        source_name: source_name.to_string(),
        reason: format!("row {}: {}", index + 1, e),
    };

    let headers = reader
        .headers()
        .map_err(|e| RiskError::DatasetLoad {
            source_name: source_name.to_string(),
            reason: format!("header: {}", e),
        })?
        .clone();

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| row_error(index, e))?;

        // Blank means every cell, unknown columns included
        if row.iter().all(str::is_empty) {
            skipped += 1;
            continue;
        }

        let record: Record = row.deserialize(Some(&headers)).map_err(|e| row_error(index, e))?;
        records.push(record);
    }

    if skipped > 0 {
        log::debug!("Dropped {} blank rows from {}", skipped, source_name);
    }

    Ok(records)
}

/// SHA-256 of the raw dataset text (hex)
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
