//! Run statistics
//!
//! Collected by the merge and printed in verbose mode, or written as JSON
//! with `--stats`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MergeError, Result};
use crate::merge::Source;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStats {
    pub name: String,
    /// Width pinned from the first record
    pub columns: usize,
    pub records: u64,
    pub out_of_order: u64,
    pub read_error: Option<String>,
}

impl SourceStats {
    pub fn from_source<R>(source: &Source<R>) -> Self {
        SourceStats {
            name: source.name().to_string(),
            columns: source.expected_columns(),
            records: source.records_read(),
            out_of_order: source.out_of_order(),
            read_error: source.read_error().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeStats {
    pub rows: u64,
    pub bytes: u64,
    /// Columns per merged row, key excluded
    pub row_width: usize,
    pub elapsed_secs: f64,
    pub sources: Vec<SourceStats>,
}

impl MergeStats {
    pub fn records_read(&self) -> u64 {
        self.sources.iter().map(|s| s.records).sum()
    }

    /// Whether any source was unsorted or ended on a read error
    pub fn has_anomalies(&self) -> bool {
        self.sources
            .iter()
            .any(|s| s.out_of_order > 0 || s.read_error.is_some())
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| MergeError::Stats {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        std::fs::write(path, json).map_err(|e| MergeError::Stats {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
