//! Row emitter: serializes merged rows to the output sink

use std::io::{BufWriter, Write};

use super::record::Delimiter;
use crate::error::{MergeError, Result};

/// Buffered line writer for merged rows
pub struct RowEmitter<W: Write> {
    writer: BufWriter<W>,
    delimiter: Delimiter,
    rows_written: u64,
    bytes_written: u64,
}

impl<W: Write> RowEmitter<W> {
    pub fn new(sink: W, delimiter: Delimiter) -> Self {
        Self::with_capacity(64 * 1024, sink, delimiter)
    }

    pub fn with_capacity(capacity: usize, sink: W, delimiter: Delimiter) -> Self {
        RowEmitter {
            writer: BufWriter::with_capacity(capacity, sink),
            delimiter,
            rows_written: 0,
            bytes_written: 0,
        }
    }

    /// Write `key`, then each column, delimiter-joined and newline-terminated
    pub fn emit(&mut self, key: &[u8], columns: &[Vec<u8>]) -> Result<()> {
        let delim = [self.delimiter.byte()];
        self.writer.write_all(key).map_err(MergeError::Write)?;
        for column in columns {
            self.writer.write_all(&delim).map_err(MergeError::Write)?;
            self.writer.write_all(column).map_err(MergeError::Write)?;
        }
        self.writer.write_all(b"\n").map_err(MergeError::Write)?;

        self.rows_written += 1;
        self.bytes_written +=
            (key.len() + columns.iter().map(|c| c.len() + 1).sum::<usize>() + 1) as u64;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush buffered rows into the sink
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().map_err(MergeError::Write)
    }
}
