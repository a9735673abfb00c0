// Buffered byte-stream wrappers.
//
// ByteSource and ByteSink present the forward-only, one-byte-at-a-time
// interface the diff and restore walks consume. Both are generic over the
// std::io traits; callers hand them a BufReader/BufWriter so the per-byte
// calls stay cheap.

use std::io::{self, ErrorKind, Read, Write};

// ---------------------------------------------------------------------------
// ByteSource
// ---------------------------------------------------------------------------

/// Forward-only sequential byte reader with end-of-data detection.
///
/// A single byte of lookahead backs `has_more()`; `next_byte()` hands the
/// lookahead out before touching the underlying reader again.
pub struct ByteSource<R: Read> {
    inner: R,
    peeked: Option<u8>,
    exhausted: bool,
}

impl<R: Read> ByteSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            peeked: None,
            exhausted: false,
        }
    }

    /// Whether at least one more byte can be read.
    pub fn has_more(&mut self) -> io::Result<bool> {
        self.fill()?;
        Ok(self.peeked.is_some())
    }

    /// Read the next byte.
    ///
    /// Fails with `UnexpectedEof` once the stream is exhausted.
    pub fn next_byte(&mut self) -> io::Result<u8> {
        self.fill()?;
        self.peeked
            .take()
            .ok_or_else(|| io::Error::new(ErrorKind::UnexpectedEof, "byte source exhausted"))
    }

    fn fill(&mut self) -> io::Result<()> {
        if self.peeked.is_some() || self.exhausted {
            return Ok(());
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(());
                }
                Ok(_) => {
                    self.peeked = Some(buf[0]);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ByteSink
// ---------------------------------------------------------------------------

/// Forward-only sequential byte writer.
///
/// Callers flush before releasing the sink; a `BufWriter` inner still
/// flushes on drop as a backstop.
pub struct ByteSink<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> ByteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Append one byte.
    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.inner.write_all(&[byte])?;
        self.written += 1;
        Ok(())
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
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
// Tests
// ---------------------------------------------------------------------------
