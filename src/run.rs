//! Run driver: opens inputs and the output, merges, writes stats
//!
//! Progress goes to stderr (stdout may be the merge output) and only in
//! verbose mode.

use crate::config::MergeConfig;
use crate::error::{MergeError, Result};
use crate::merge::merge;
use crate::stats::MergeStats;
use crate::stream::{open_sources, FileOpener, OutputStream, StreamOpener};

macro_rules! note {
    ($verbose:expr, $($arg:tt)*) => {
        if $verbose {
            eprintln!($($arg)*);
        }
    };
}

/// Merge the configured files into the configured destination
pub fn run(config: &MergeConfig) -> Result<MergeStats> {
    run_with(&FileOpener, config)
}

/// Same as [`run`], with inputs opened through `opener`
///
/// Inputs are opened before the destination is created, so a missing input
/// never truncates an existing output file.
pub fn run_with<O: StreamOpener>(opener: &O, config: &MergeConfig) -> Result<MergeStats> {
    let verbose = config.verbose;

    note!(verbose, "\n{}", "═".repeat(60));
    note!(verbose, "KEYMERGE: {} input(s)", config.inputs.len());
    note!(verbose, "{}", "═".repeat(60));
    for path in &config.inputs {
        note!(verbose, "  Input: {}", path.display());
    }
    note!(verbose, "  Output: {}", config.destination);
    note!(verbose, "  Delimiter: {}", config.delimiter);

    let sources = open_sources(opener, &config.inputs, config.delimiter)?;
    for source in &sources {
        if source.is_exhausted() {
            note!(verbose, "  ⚠️  {} is empty", source.name());
        } else {
            note!(verbose, "  📂 {}: {} column(s)", source.name(), source.expected_columns());
        }
    }

    let mut sink = OutputStream::open(&config.destination)?;
    let stats = merge(sources, &mut sink, config.delimiter)?;
    sink.finish().map_err(MergeError::Write)?;

    if let Some(path) = &config.stats_path {
        stats.write_json(path)?;
        note!(verbose, "  Stats: {}", path.display());
    }

    note!(verbose, "{}", "─".repeat(60));
    note!(verbose, "  ✅ Merge complete!");
    note!(verbose, "  Rows: {} ({} columns + key)", stats.rows, stats.row_width);
    note!(verbose, "  Records read: {}", stats.records_read());
    note!(verbose, "  Output: {:.2} MB", stats.bytes as f64 / 1_048_576.0);
    note!(verbose, "  Time: {:.2}s", stats.elapsed_secs);
    for source in &stats.sources {
        if source.out_of_order > 0 {
            note!(
                verbose,
                "  ⚠️  {}: {} record(s) out of key order",
                source.name,
                source.out_of_order
            );
        }
        if let Some(err) = &source.read_error {
            note!(verbose, "  ⚠️  {}: stopped early on read error: {}", source.name, err);
        }
    }

    Ok(stats)
}
