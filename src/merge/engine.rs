//! Merge engine: walks N sorted sources in lockstep by key
//!
//! Each step picks the smallest current key across all live sources,
//! collects every source's contribution for that key (real columns or
//! padding) and advances only the sources that matched.

use std::io::{BufRead, Write};
use std::time::Instant;

use super::emit::RowEmitter;
use super::record::Delimiter;
use super::source::Source;
use crate::error::Result;
use crate::stats::{MergeStats, SourceStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Done,
}

/// One output line: key plus every source's contribution, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub key: Vec<u8>,
    pub columns: Vec<Vec<u8>>,
}

/// Smallest key among the sources that still hold a record
///
/// Byte-wise comparison; exhausted sources (`None`) never win.
pub fn min_key<'a, I>(keys: I) -> Option<&'a [u8]>
where
    I: IntoIterator<Item = Option<&'a [u8]>>,
{
    keys.into_iter().flatten().min()
}

pub struct MergeEngine<R> {
    sources: Vec<Source<R>>,
    state: EngineState,
    row_width: usize,
}

impl<R: BufRead> MergeEngine<R> {
    /// Build an engine over sources that have already loaded their first record
    pub fn new(sources: Vec<Source<R>>) -> Self {
        let state = if sources.iter().all(Source::is_exhausted) {
            EngineState::Done
        } else {
            EngineState::Running
        };
        let row_width = sources.iter().map(Source::expected_columns).sum();
        MergeEngine {
            sources,
            state,
            row_width,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Total columns per merged row (excluding the key)
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    pub fn sources(&self) -> &[Source<R>] {
        &self.sources
    }

    pub fn into_sources(self) -> Vec<Source<R>> {
        self.sources
    }

    /// Assemble the next merged row, advancing every source that matched
    pub fn next_row(&mut self) -> Option<MergedRow> {
        if self.state == EngineState::Done {
            return None;
        }

        let target = match min_key(self.sources.iter().map(Source::key)) {
            Some(key) => key.to_vec(),
            None => {
                self.state = EngineState::Done;
                return None;
            }
        };

        let mut columns = Vec::with_capacity(self.row_width);
        for source in &mut self.sources {
            let width = source.expected_columns();
            let matched = source.key() == Some(target.as_slice());
            match matched.then(|| source.advance()).flatten() {
                Some(record) => columns.extend(record.conform(width)),
                None => columns.extend(std::iter::repeat_with(Vec::new).take(width)),
            }
        }

        if self.sources.iter().all(Source::is_exhausted) {
            self.state = EngineState::Done;
        }

        Some(MergedRow {
            key: target,
            columns,
        })
    }
}

/// Merge opened, primed sources into `sink`
///
/// Sources are consumed and dropped (closing their streams) on every exit
/// path. A write failure aborts the merge with whatever was already written
/// left in the sink.
pub fn merge<R, W>(sources: Vec<Source<R>>, sink: &mut W, delimiter: Delimiter) -> Result<MergeStats>
where
    R: BufRead,
    W: Write + ?Sized,
{
    let start_time = Instant::now();
    let mut engine = MergeEngine::new(sources);
    let mut emitter = RowEmitter::new(&mut *sink, delimiter);

    while let Some(row) = engine.next_row() {
        emitter.emit(&row.key, &row.columns)?;
    }

    let rows = emitter.rows_written();
    let bytes = emitter.bytes_written();
    emitter.finish()?;

    let row_width = engine.row_width();
    let sources = engine
        .into_sources()
        .iter()
        .map(SourceStats::from_source)
        .collect();

    Ok(MergeStats {
        rows,
        bytes,
        row_width,
        elapsed_secs: start_time.elapsed().as_secs_f64(),
        sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn src(name: &str, data: &str) -> Source<Cursor<Vec<u8>>> {
        Source::new(name, Cursor::new(data.as_bytes().to_vec()), Delimiter::TAB)
    }

    fn run(inputs: &[&str]) -> String {
        let sources = inputs
            .iter()
            .enumerate()
            .map(|(i, data)| src(&format!("in{}", i), data))
            .collect();
        let mut out = Vec::new();
        merge(sources, &mut out, Delimiter::TAB).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_min_key_skips_exhausted() {
        let keys = vec![None, Some(&b"foo"[..]), Some(&b"bar"[..]), None];
        assert_eq!(min_key(keys), Some(&b"bar"[..]));
        assert_eq!(min_key(vec![None::<&[u8]>, None]), None);
        assert_eq!(min_key(Vec::<Option<&[u8]>>::new()), None);
    }

    #[test]
    fn test_min_key_is_bytewise() {
        // Uppercase sorts before lowercase, "B" < "a"
        let keys = vec![Some(&b"a"[..]), Some(&b"B"[..]), Some(&b"ab"[..])];
        assert_eq!(min_key(keys), Some(&b"B"[..]));
    }

    #[test]
    fn test_two_file_scenario() {
        let a = "bar\t11\t22\t33\ncat\t01\t02\t03\nfoo\t1\t2\t3\n";
        let b = "bar\t44\t55\t66\ncar\t7\t8\t9\nfoo\t4\t5\t6\n";
        assert_eq!(
            run(&[a, b]),
            "bar\t11\t22\t33\t44\t55\t66\n\
             car\t\t\t\t7\t8\t9\n\
             cat\t01\t02\t03\t\t\t\n\
             foo\t1\t2\t3\t4\t5\t6\n"
        );
    }

    #[test]
    fn test_ragged_width_truncated_and_padded() {
        let a = "a\t1\t2\nb\t1\t2\t3\t4\nc\t9\n";
        let b = "b\tx\n";
        assert_eq!(run(&[a, b]), "a\t1\t2\t\nb\t1\t2\tx\nc\t9\t\t\n");
    }

    #[test]
    fn test_empty_source_contributes_nothing() {
        let a = "k1\t1\nk2\t2\n";
        assert_eq!(run(&["", a, ""]), "k1\t1\nk2\t2\n");
    }

    #[test]
    fn test_all_empty_sources_emit_nothing() {
        let engine = MergeEngine::new(vec![src("a", ""), src("b", "")]);
        assert_eq!(engine.state(), EngineState::Done);
        assert_eq!(run(&["", ""]), "");
    }

    #[test]
    fn test_single_source_pass_through() {
        let a = "a\t1\t2\nb\t3\t4\nc\t5\t6\n";
        assert_eq!(run(&[a]), a);
    }

    #[test]
    fn test_empty_key_sorts_first() {
        let a = "\tempty\nx\t1\n";
        let b = "y\t2\n";
        assert_eq!(run(&[a, b]), "\tempty\t\nx\t1\t\ny\t\t2\n");
    }

    #[test]
    fn test_leading_blank_line_pins_zero_width() {
        // The blank first line is an empty-key record with no columns, so
        // source a contributes nothing to any row.
        let a = "\nk\t1\t2\n";
        let b = "k\tx\n";
        assert_eq!(run(&[a, b]), "\t\nk\tx\n");
    }

    #[test]
    fn test_blank_line_mid_stream_is_emitted() {
        assert_eq!(run(&["a\t1\n\t\nb\t2\n"]), "a\t1\n\t\nb\t2\n");
    }

    #[test]
    fn test_engine_state_transitions() {
        let mut engine = MergeEngine::new(vec![src("a", "k\t1\n"), src("b", "k\t2\n")]);
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.row_width(), 2);

        let row = engine.next_row().unwrap();
        assert_eq!(row.key, b"k");
        assert_eq!(row.columns, vec![b"1".to_vec(), b"2".to_vec()]);
        assert_eq!(engine.state(), EngineState::Done);
        assert!(engine.next_row().is_none());
    }

    #[test]
    fn test_only_matching_sources_advance() {
        let mut engine = MergeEngine::new(vec![src("a", "a\t1\nc\t3\n"), src("b", "b\t2\n")]);
        engine.next_row();
        let sources = engine.sources();
        assert_eq!(sources[0].key(), Some(&b"c"[..]));
        assert_eq!(sources[1].key(), Some(&b"b"[..]));
    }

    #[test]
    fn test_duplicate_key_within_source_emits_separate_rows() {
        let a = "k\t1\nk\t2\n";
        let b = "k\tx\n";
        assert_eq!(run(&[a, b]), "k\t1\tx\nk\t2\t\n");
    }

    #[test]
    fn test_merge_stats() {
        let sources = vec![src("a", "a\t1\nb\t2\n"), src("b", "b\t3\t4\n")];
        let mut out = Vec::new();
        let stats = merge(sources, &mut out, Delimiter::TAB).unwrap();
        assert_eq!(stats.rows, 2);
        assert_eq!(stats.bytes, out.len() as u64);
        assert_eq!(stats.row_width, 3);
        assert_eq!(stats.sources.len(), 2);
        assert_eq!(stats.sources[0].name, "a");
        assert_eq!(stats.sources[0].records, 2);
        assert_eq!(stats.sources[1].columns, 2);
    }
}
