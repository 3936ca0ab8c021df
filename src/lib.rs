//! keymerge - key-ordered column merge of pre-sorted text files
//!
//! Combines N delimiter-separated files, each sorted by its first column,
//! into one file with one row per distinct key. A row's columns are every
//! input's columns for that key, in input order, with empty fields where an
//! input lacks the key.

pub mod config;
pub mod error;
/// Merge engine, source cursors and row emitter
pub mod merge;
pub mod run;
pub mod stats;
/// File streams with (de)compression by extension
pub mod stream;

pub use config::{Cli, Destination, MergeConfig};
pub use error::{MergeError, Result};
pub use merge::{merge, Delimiter};
pub use run::{run, run_with};
pub use stats::{MergeStats, SourceStats};
