//! Line parsing: one input line becomes one keyed record
//!
//! Keys and columns are raw bytes so the merge stays total over arbitrary
//! content and key order is plain byte order.

use std::fmt;
use std::str::FromStr;

/// Single-byte field delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(u8);

impl Delimiter {
    pub const TAB: Delimiter = Delimiter(b'\t');

    /// Build a delimiter from a character; only ASCII fits in one byte
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii() && c != '\n' {
            Some(Delimiter(c as u8))
        } else {
            None
        }
    }

    pub fn byte(self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::TAB
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            b'\t' => write!(f, "\\t"),
            b' ' => write!(f, "space"),
            b => write!(f, "{}", b as char),
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "\\t" | "tab" => return Ok(Delimiter::TAB),
            "comma" => return Ok(Delimiter(b',')),
            "space" => return Ok(Delimiter(b' ')),
            _ => {}
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Delimiter::from_char(c)
                .ok_or_else(|| format!("delimiter must be a single ASCII character, got {:?}", s)),
            _ => Err(format!(
                "delimiter must be a single character (or \\t, tab, comma, space), got {:?}",
                s
            )),
        }
    }
}

/// One parsed input line: the key field plus the remaining value columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Vec<u8>,
    pub columns: Vec<Vec<u8>>,
}

impl Record {
    /// Parse one raw line (newline included or not)
    ///
    /// A line without any delimiter is a key with zero columns. A line that
    /// is blank once trailing whitespace is stripped is an empty key with
    /// zero columns.
    pub fn parse(line: &[u8], delimiter: Delimiter) -> Self {
        let line = trim_trailing_whitespace(line);

        let mut fields = Vec::new();
        let mut start = 0;
        for pos in memchr::memchr_iter(delimiter.byte(), line) {
            fields.push(line[start..pos].to_vec());
            start = pos + 1;
        }
        fields.push(line[start..].to_vec());

        let mut fields = fields.into_iter();
        let key = fields.next().unwrap_or_default();
        Record {
            key,
            columns: fields.collect(),
        }
    }

    /// Truncate or pad with empty fields so exactly `width` columns remain
    pub fn conform(mut self, width: usize) -> Vec<Vec<u8>> {
        self.columns.resize_with(width, Vec::new);
        self.columns
    }
}

fn trim_trailing_whitespace(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace() && *b != 0x0b)
        .map_or(0, |i| i + 1);
    &line[..end]
}
