// Change-list text format.
//
// One record per line, whitespace-separated decimal fields:
//
//   <offset> c <old_byte> <new_byte>   substitute <new_byte> at <offset>
//   <offset> d                         drop the original byte at <offset>
//   <offset> i <byte>                  append <byte> past the original prefix
//
// Offsets count positions in the original file and are non-decreasing in
// any well-formed list. A list is produced once per diff run and consumed
// once per restore run; there is no in-place editing.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Record type
// ---------------------------------------------------------------------------

/// One entry in a change list, in original-file offset coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeRecord {
    /// Replace the original byte at `offset` with `new_byte`.
    Change {
        offset: u64,
        old_byte: u8,
        new_byte: u8,
    },
    /// Drop the original byte at `offset`.
    Delete { offset: u64 },
    /// Emit `byte` at `offset`, immediately past the original prefix.
    Insert { offset: u64, byte: u8 },
}

impl ChangeRecord {
    /// Position of this record in the original file's coordinate space.
    pub fn offset(&self) -> u64 {
        match *self {
            Self::Change { offset, .. } | Self::Delete { offset } | Self::Insert { offset, .. } => {
                offset
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure while reading a change list.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Record-kind tag other than `c`, `d` or `i`.
    #[error("line {line}: unknown record type '{tag}'")]
    UnknownTag { line: u64, tag: String },
    /// Missing, extra or unparseable fields.
    #[error("line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Appends records to a change-list stream, one text line each.
pub struct RecordWriter<W: Write> {
    inner: W,
    records: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, records: 0 }
    }

    pub fn write_record(&mut self, record: &ChangeRecord) -> io::Result<()> {
        match *record {
            ChangeRecord::Change {
                offset,
                old_byte,
                new_byte,
            } => writeln!(self.inner, "{offset} c {old_byte} {new_byte}")?,
            ChangeRecord::Delete { offset } => writeln!(self.inner, "{offset} d")?,
            ChangeRecord::Insert { offset, byte } => writeln!(self.inner, "{offset} i {byte}")?,
        }
        self.records += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn records_written(&self) -> u64 {
        self.records
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Flush and hand back the wrapped writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Reads records back from a change-list stream.
///
/// Line-oriented: blank lines are skipped and fields split on any
/// whitespace. Anything else — unknown tags, missing or trailing fields,
/// values that do not fit the field type — is a format error naming the
/// 1-based line.
pub struct RecordReader<R: BufRead> {
    inner: R,
    line: String,
    line_no: u64,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
            line_no: 0,
        }
    }

    /// Next record, or `None` at end of stream.
    pub fn next_record(&mut self) -> Result<Option<ChangeRecord>, RecordError> {
        loop {
            self.line.clear();
            if self.inner.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if self.line.trim().is_empty() {
                continue;
            }
            return parse_line(&self.line, self.line_no).map(Some);
        }
    }
}

fn parse_line(line: &str, line_no: u64) -> Result<ChangeRecord, RecordError> {
    let mut fields = line.split_whitespace();
    let offset: u64 = parse_field(&mut fields, line_no, "offset")?;
    let tag = fields.next().ok_or_else(|| RecordError::Malformed {
        line: line_no,
        reason: "missing record type".into(),
    })?;
    let record = match tag {
        "c" => ChangeRecord::Change {
            offset,
            old_byte: parse_field(&mut fields, line_no, "old byte")?,
            new_byte: parse_field(&mut fields, line_no, "new byte")?,
        },
        "d" => ChangeRecord::Delete { offset },
        "i" => ChangeRecord::Insert {
            offset,
            byte: parse_field(&mut fields, line_no, "inserted byte")?,
        },
        other => {
            return Err(RecordError::UnknownTag {
                line: line_no,
                tag: other.to_string(),
            });
        }
    };
    if let Some(extra) = fields.next() {
        return Err(RecordError::Malformed {
            line: line_no,
            reason: format!("trailing field '{extra}'"),
        });
    }
    Ok(record)
}

fn parse_field<'a, T, I>(fields: &mut I, line: u64, what: &str) -> Result<T, RecordError>
where
    T: FromStr,
    T::Err: fmt::Display,
    I: Iterator<Item = &'a str>,
{
    let raw = fields.next().ok_or_else(|| RecordError::Malformed {
        line,
        reason: format!("missing {what}"),
    })?;
    raw.parse().map_err(|e| RecordError::Malformed {
        line,
        reason: format!("bad {what} '{raw}': {e}"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
