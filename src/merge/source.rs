//! Source cursor: one sorted input stream, read one record at a time

use std::io::{self, BufRead};

use super::record::{Delimiter, Record};

/// The unconsumed head of a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    Record(Record),
    /// End of stream (or a read error, which is treated the same way)
    Exhausted,
}

impl Cursor {
    pub fn key(&self) -> Option<&[u8]> {
        match self {
            Cursor::Record(record) => Some(&record.key),
            Cursor::Exhausted => None,
        }
    }
}

/// One input stream being merged, with its pinned column width
pub struct Source<R> {
    name: String,
    reader: R,
    delimiter: Delimiter,
    line: Vec<u8>,
    current: Cursor,
    expected_columns: usize,
    finished: bool,
    records_read: u64,
    out_of_order: u64,
    read_error: Option<String>,
}

impl<R: BufRead> Source<R> {
    /// Wrap an opened stream and load its first record
    ///
    /// The first record fixes the width every later record is conformed to
    /// (0 for a stream that is empty from the start).
    pub fn new(name: impl Into<String>, reader: R, delimiter: Delimiter) -> Self {
        let mut source = Source {
            name: name.into(),
            reader,
            delimiter,
            line: Vec::with_capacity(256),
            current: Cursor::Exhausted,
            expected_columns: 0,
            finished: false,
            records_read: 0,
            out_of_order: 0,
            read_error: None,
        };
        source.advance();
        if let Cursor::Record(record) = &source.current {
            source.expected_columns = record.columns.len();
        }
        source
    }

    /// Load the next record and hand back the one it replaces
    pub fn advance(&mut self) -> Option<Record> {
        let next = self.read_record();

        if let (Cursor::Record(current), Some(next)) = (&self.current, &next) {
            if next.key < current.key {
                self.out_of_order += 1;
            }
        }

        let next = match next {
            Some(record) => Cursor::Record(record),
            None => Cursor::Exhausted,
        };
        match std::mem::replace(&mut self.current, next) {
            Cursor::Record(record) => Some(record),
            Cursor::Exhausted => None,
        }
    }

    fn read_record(&mut self) -> Option<Record> {
        while !self.finished {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    self.records_read += 1;
                    return Some(Record::parse(&self.line, self.delimiter));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.read_error = Some(e.to_string());
                    self.finished = true;
                }
            }
        }
        None
    }
}

impl<R> Source<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> Option<&[u8]> {
        self.current.key()
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.current, Cursor::Exhausted)
    }

    pub fn expected_columns(&self) -> usize {
        self.expected_columns
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Records whose key sorted below the key before them
    pub fn out_of_order(&self) -> u64 {
        self.out_of_order
    }

    /// The read error that ended this stream early, if any
    pub fn read_error(&self) -> Option<&str> {
        self.read_error.as_deref()
    }
}
