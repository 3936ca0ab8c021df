//! Key-Ordered Column Merge
//!
//! Merges N delimiter-separated text streams, each pre-sorted by its first
//! column, into one stream keyed the same way. All operations are
//! streaming: one record per source is held in memory at a time.
//!
//! ## Strategy
//!
//! 1. **Prime**: every source loads its first record, which pins that
//!    source's column width for the rest of the run
//! 2. **Select**: the smallest current key across all live sources
//! 3. **Assemble**: matching sources contribute their columns (truncated or
//!    padded to their width), the rest contribute empty fields
//! 4. **Advance**: only the sources that matched move forward
//! 5. **Emit**: key + columns, delimiter-joined, one line per key
//!
//! ## Input order
//!
//! Sources are assumed sorted ascending by byte order of the key (for unix
//! sort, set `LC_ALL=C`). Unsorted input is not detected as an error; it
//! just interleaves oddly. Each source counts its own order violations.

pub mod emit;
pub mod engine;
pub mod record;
pub mod source;

pub use emit::RowEmitter;
pub use engine::{merge, min_key, EngineState, MergeEngine, MergedRow};
pub use record::{Delimiter, Record};
pub use source::{Cursor, Source};
