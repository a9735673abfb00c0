// Patch-application walk.
//
// Replays a change list against the original stream to rebuild the
// modified file. A single forward pass: bytes below the next record's
// offset are copied verbatim, the record is applied, and whatever is left
// of the original after the last record is the unmodified tail.

use std::io::{self, BufRead, Read, Write};

use thiserror::Error;

use crate::changelist::{ChangeRecord, RecordError, RecordReader};
use crate::stream::{ByteSink, ByteSource};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure while applying a change list.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The change list itself is malformed.
    #[error("change list: {0}")]
    Format(RecordError),
}

impl From<RecordError> for RestoreError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::Io(e) => Self::Io(e),
            other => Self::Format(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Counters reported by a restore run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Bytes consumed from the old stream.
    pub old_size: u64,
    /// Records applied.
    pub records: u64,
    /// Bytes written to the output.
    pub output_size: u64,
}

// ---------------------------------------------------------------------------
// Restore walk
// ---------------------------------------------------------------------------

/// Rebuild the modified stream from `old` plus its change list.
///
/// Records must arrive in non-decreasing offset order, the order the diff
/// walk emits them in. The walk is forward-only: its only state is the
/// count of old bytes consumed, and every record moves that count
/// monotonically forward or leaves it unchanged (insertions).
pub fn restore<O, R, W>(
    old: &mut ByteSource<O>,
    records: &mut RecordReader<R>,
    out: &mut ByteSink<W>,
) -> Result<RestoreSummary, RestoreError>
where
    O: Read,
    R: BufRead,
    W: Write,
{
    let mut old_offset = 0u64;
    let mut applied = 0u64;

    while let Some(record) = records.next_record()? {
        // Verbatim prefix up to this record's position.
        while old_offset < record.offset() && old.has_more()? {
            out.write_byte(old.next_byte()?)?;
            old_offset += 1;
        }
        match record {
            ChangeRecord::Change { new_byte, .. } => {
                // The strict copy-forward bound left the substituted byte
                // unconsumed; discard it and emit the replacement.
                if old.has_more()? {
                    old.next_byte()?;
                    old_offset += 1;
                }
                out.write_byte(new_byte)?;
            }
            ChangeRecord::Delete { .. } => {
                if old.has_more()? {
                    old.next_byte()?;
                    old_offset += 1;
                }
            }
            ChangeRecord::Insert { byte, .. } => out.write_byte(byte)?,
        }
        applied += 1;
    }

    // Unmodified tail.
    while old.has_more()? {
        out.write_byte(old.next_byte()?)?;
        old_offset += 1;
    }
    out.flush()?;

    Ok(RestoreSummary {
        old_size: old_offset,
        records: applied,
        output_size: out.bytes_written(),
    })
}

// ---------------------------------------------------------------------------
// Convenience function
// ---------------------------------------------------------------------------

/// Apply an in-memory change list to an in-memory original.
pub fn restore_all(old: &[u8], changes: &[u8]) -> Result<Vec<u8>, RestoreError> {
    let mut old_src = ByteSource::new(old);
    let mut reader = RecordReader::new(changes);
    let mut output = Vec::new();
    let mut sink = ByteSink::new(&mut output);
    restore(&mut old_src, &mut reader, &mut sink)?;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_change_list_copies_old_verbatim() {
        let rebuilt = restore_all(b"untouched", b"").unwrap();
        assert_eq!(rebuilt, b"untouched");
    }

    #[test]
    fn change_substitutes_single_byte() {
        let rebuilt = restore_all(&[0xAA, 0xBB], b"1 c 187 204\n").unwrap();
        assert_eq!(rebuilt, vec![0xAA, 0xCC]);
    }

    #[test]
    fn delete_drops_trailing_bytes() {
        let rebuilt = restore_all(&[0x01, 0x02, 0x03, 0x04], b"1 c 2 153\n3 d\n").unwrap();
        assert_eq!(rebuilt, vec![0x01, 0x99, 0x03]);
    }

    #[test]
    fn consecutive_deletes_drop_each_byte_once() {
        let rebuilt = restore_all(&[1, 2, 3, 4, 5], b"2 d\n3 d\n4 d\n").unwrap();
        assert_eq!(rebuilt, vec![1, 2]);
    }

    #[test]
    fn insert_appends_without_consuming_old() {
        let rebuilt = restore_all(&[0x01], b"1 i 2\n").unwrap();
        assert_eq!(rebuilt, vec![0x01, 0x02]);
    }

    #[test]
    fn insert_only_list_builds_from_empty_old() {
        let rebuilt = restore_all(&[], b"0 i 5\n1 i 6\n").unwrap();
        assert_eq!(rebuilt, vec![5, 6]);
    }

    #[test]
    fn unmodified_tail_survives() {
        let rebuilt = restore_all(&[9, 9, 9, 9], b"0 c 9 1\n").unwrap();
        assert_eq!(rebuilt, vec![1, 9, 9, 9]);
    }

    #[test]
    fn summary_reflects_the_walk() {
        let old = [0x01, 0x02, 0x03, 0x04];
        let mut old_src = ByteSource::new(&old[..]);
        let mut reader = RecordReader::new(&b"1 c 2 153\n3 d\n"[..]);
        let mut output = Vec::new();
        let mut sink = ByteSink::new(&mut output);
        let summary = restore(&mut old_src, &mut reader, &mut sink).unwrap();
        assert_eq!(summary.old_size, 4);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.output_size, 3);
    }

    #[test]
    fn unknown_tag_is_a_format_error() {
        let err = restore_all(&[1, 2, 3], b"0 x\n").unwrap_err();
        assert!(matches!(err, RestoreError::Format(_)), "got {err:?}");
    }

    #[test]
    fn malformed_field_is_a_format_error() {
        let err = restore_all(&[1, 2, 3], b"0 c one 2\n").unwrap_err();
        assert!(matches!(err, RestoreError::Format(_)), "got {err:?}");
    }

    #[test]
    fn format_error_reports_offending_line() {
        let err = restore_all(&[1, 2, 3], b"0 c 1 2\n\n2 q\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "message: {err}");
    }
}
