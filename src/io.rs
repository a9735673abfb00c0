// File-level I/O helpers for diff and restore.
//
// Provides `diff_file()` and `restore_file()` convenience functions that
// wrap the streaming walks with proper buffered I/O. Optionally computes
// streaming SHA-256 checksums (feature-gated behind `file-io`).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

#[cfg(feature = "file-io")]
use sha2::Digest;

#[cfg(feature = "file-io")]
use std::io::Read;

use crate::changelist::{RecordReader, RecordWriter};
use crate::diff;
use crate::restore::{self, RestoreError};
use crate::stream::{ByteSink, ByteSource};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `diff_file()`.
#[derive(Debug, Clone)]
pub struct DiffStats {
    /// Old file size in bytes.
    pub old_size: u64,
    /// New file size in bytes.
    pub new_size: u64,
    /// Change-list output size in bytes.
    pub delta_size: u64,
    /// Substitution records written.
    pub changes: u64,
    /// Deletion records written.
    pub deletes: u64,
    /// Insertion records written.
    pub inserts: u64,
    /// SHA-256 of the old file (if the `file-io` feature is enabled).
    pub old_sha256: Option<[u8; 32]>,
    /// SHA-256 of the new file (if the `file-io` feature is enabled).
    pub new_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `restore_file()`.
#[derive(Debug, Clone)]
pub struct RestoreStats {
    /// Old file size in bytes.
    pub old_size: u64,
    /// Change-list file size in bytes.
    pub delta_size: u64,
    /// Reconstructed output size in bytes.
    pub output_size: u64,
    /// Records applied.
    pub records: u64,
    /// SHA-256 of the reconstructed output (if the `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file-level operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Restore error (including change-list format errors).
    #[error("restore error: {0}")]
    Restore(#[from] RestoreError),
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// diff_file
// ---------------------------------------------------------------------------

/// Diff `old_path` against `new_path`, writing the change list to `delta_path`.
///
/// Both inputs are streamed through `BufReader`s; the change list goes out
/// through a `BufWriter`. When the `file-io` feature is enabled, SHA-256
/// checksums of both inputs are computed incrementally as the walk reads
/// them.
pub fn diff_file(old_path: &Path, new_path: &Path, delta_path: &Path) -> Result<DiffStats, IoError> {
    let old_file = File::open(old_path)?;
    let new_file = File::open(new_path)?;
    let delta_file = File::create(delta_path)?;
    let mut writer = RecordWriter::new(BufWriter::with_capacity(BUF_SIZE, delta_file));

    #[cfg(feature = "file-io")]
    let mut old_hasher = sha2::Sha256::new();
    #[cfg(feature = "file-io")]
    let mut new_hasher = sha2::Sha256::new();

    #[cfg(feature = "file-io")]
    let summary = {
        let mut old_src = ByteSource::new(HashingReader {
            inner: BufReader::with_capacity(BUF_SIZE, old_file),
            hasher: &mut old_hasher,
        });
        let mut new_src = ByteSource::new(HashingReader {
            inner: BufReader::with_capacity(BUF_SIZE, new_file),
            hasher: &mut new_hasher,
        });
        diff::diff(&mut old_src, &mut new_src, &mut writer)?
    };

    #[cfg(not(feature = "file-io"))]
    let summary = {
        let mut old_src = ByteSource::new(BufReader::with_capacity(BUF_SIZE, old_file));
        let mut new_src = ByteSource::new(BufReader::with_capacity(BUF_SIZE, new_file));
        diff::diff(&mut old_src, &mut new_src, &mut writer)?
    };

    let delta_size = writer
        .into_inner()?
        .into_inner()
        .map_err(|e| e.into_error())?
        .metadata()?
        .len();

    #[cfg(feature = "file-io")]
    let (old_sha256, new_sha256) = (
        Some(old_hasher.finalize().into()),
        Some(new_hasher.finalize().into()),
    );
    #[cfg(not(feature = "file-io"))]
    let (old_sha256, new_sha256): (Option<[u8; 32]>, Option<[u8; 32]>) = (None, None);

    debug!(
        "diff: old {} bytes, new {} bytes, {} records",
        summary.old_size,
        summary.new_size,
        summary.records()
    );

    Ok(DiffStats {
        old_size: summary.old_size,
        new_size: summary.new_size,
        delta_size,
        changes: summary.changes,
        deletes: summary.deletes,
        inserts: summary.inserts,
        old_sha256,
        new_sha256,
    })
}

// ---------------------------------------------------------------------------
// restore_file
// ---------------------------------------------------------------------------

/// Rebuild a file from `old_path` and the change list at `delta_path`,
/// writing the result to `output_path`.
///
/// All three streams are buffered. When the `file-io` feature is enabled,
/// a SHA-256 checksum of the output is computed incrementally.
pub fn restore_file(
    old_path: &Path,
    delta_path: &Path,
    output_path: &Path,
) -> Result<RestoreStats, IoError> {
    let old_file = File::open(old_path)?;
    let delta_file = File::open(delta_path)?;
    let delta_size = delta_file.metadata()?.len();
    let output_file = File::create(output_path)?;

    let mut old_src = ByteSource::new(BufReader::with_capacity(BUF_SIZE, old_file));
    let mut reader = RecordReader::new(BufReader::with_capacity(BUF_SIZE, delta_file));
    let mut output_writer = BufWriter::with_capacity(BUF_SIZE, output_file);

    #[cfg(feature = "file-io")]
    let mut output_hasher = sha2::Sha256::new();

    #[cfg(feature = "file-io")]
    let summary = {
        let mut hashing_writer = HashingWriter {
            inner: &mut output_writer,
            hasher: &mut output_hasher,
        };
        let mut sink = ByteSink::new(&mut hashing_writer);
        restore::restore(&mut old_src, &mut reader, &mut sink)?
    };

    #[cfg(not(feature = "file-io"))]
    let summary = {
        let mut sink = ByteSink::new(&mut output_writer);
        restore::restore(&mut old_src, &mut reader, &mut sink)?
    };

    output_writer.flush()?;

    #[cfg(feature = "file-io")]
    let output_sha256 = Some(output_hasher.finalize().into());
    #[cfg(not(feature = "file-io"))]
    let output_sha256: Option<[u8; 32]> = None;

    debug!(
        "restore: {} records applied, {} bytes out",
        summary.records, summary.output_size
    );

    Ok(RestoreStats {
        old_size: summary.old_size,
        delta_size,
        output_size: summary.output_size,
        records: summary.records,
        output_sha256,
    })
}

// ---------------------------------------------------------------------------
// Hashing adapters (used with file-io feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
struct HashingReader<'a, R: Read> {
    inner: R,
    hasher: &'a mut sha2::Sha256,
}

#[cfg(feature = "file-io")]
impl<R: Read> Read for HashingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

#[cfg(feature = "file-io")]
struct HashingWriter<'a, W: Write> {
    inner: &'a mut W,
    hasher: &'a mut sha2::Sha256,
}

#[cfg(feature = "file-io")]
impl<W: Write> Write for HashingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
