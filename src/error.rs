//! Error taxonomy for a merge run
//!
//! Read-time anomalies (missing delimiter, ragged widths, unreadable lines)
//! are deliberately absent: the merge absorbs them instead of failing.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    /// No inputs, no output destination, or an unusable flag value
    #[error("configuration error: {0}")]
    Config(String),

    /// An input path could not be opened for reading
    #[error("couldn't open file {} for input: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output destination could not be created
    #[error("couldn't open file {} for output: {source}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A write to the sink failed mid-merge; partial output is left in place
    #[error("write to output failed: {0}")]
    Write(#[source] io::Error),

    /// The merge succeeded but the statistics file could not be written
    #[error("couldn't write stats to {}: {source}", path.display())]
    Stats {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MergeError {
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MergeError::Open {
            path: path.into(),
            source,
        }
    }

    pub fn sink(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MergeError::Sink {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure happened before any merge work began
    pub fn is_config(&self) -> bool {
        matches!(self, MergeError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, MergeError>;
