//! Growable byte buffer used by the stream readers and the buffer writers.
//!
//! [`ByteBuffer`] keeps a zero-filled backing array and a separate fill
//! length, so a stream can be read straight into the spare region. Capacity
//! grows to `(capacity + 1) * 2` or to the requested minimum, whichever is
//! larger. Growth and [`consume`](ByteBuffer::consume) move the live bytes, so
//! offsets into the buffer must be re-derived after either call.
//!
//! ## Examples
//!
//! ```rust
//! use streamtok::ByteBuffer;
//!
//! let mut buf = ByteBuffer::with_capacity(4);
//! let mut input = &b"abcdef"[..];
//! while buf.read_from(&mut input).unwrap().is_some() {}
//! assert_eq!(buf.as_bytes(), b"abcdef");
//!
//! let mut out = Vec::new();
//! buf.write_to_and_reset(&mut out).unwrap();
//! assert_eq!(out, b"abcdef");
//! assert!(buf.is_empty());
//! ```

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read, Write};

/// A resizable byte array with block-sized refill from a reader.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Vec<u8>,
    len: usize,
    block_size: usize,
}

impl ByteBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(crate::options::DEFAULT_BUFFER_SIZE)
    }

    /// Creates an empty buffer. The capacity doubles as the refill block size.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ByteBuffer {
            data: vec![0; capacity],
            len: 0,
            block_size: capacity.max(1),
        }
    }

    /// Creates a buffer holding a copy of `bytes`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = Self::with_capacity(bytes.len());
        buf.append(bytes);
        buf
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes a [`read_from`](Self::read_from) will request when the buffer is full.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn set_block_size(&mut self, block_size: usize) {
        self.block_size = block_size.max(1);
    }

    /// Unused capacity after the filled region.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.len
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// The filled region as text, replacing invalid UTF-8.
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Grows the backing array so it holds at least `min_capacity` bytes.
    ///
    /// Existing content keeps its position.
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        let capacity = self.data.len();
        if min_capacity <= capacity {
            return;
        }
        let grown = capacity.saturating_add(1).saturating_mul(2).max(min_capacity);
        tracing::trace!(from = capacity, to = grown, "growing byte buffer");
        self.data.resize(grown, 0);
    }

    /// Appends bytes, growing as needed.
    pub fn append(&mut self, bytes: &[u8]) {
        let end = self.len + bytes.len();
        self.ensure_capacity(end);
        self.data[self.len..end].copy_from_slice(bytes);
        self.len = end;
    }

    pub fn push(&mut self, byte: u8) {
        self.append(&[byte]);
    }

    /// Reads once from `reader` into the spare capacity.
    ///
    /// A full buffer first grows by one block. Returns `Ok(None)` at end of
    /// stream, otherwise the number of bytes appended.
    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<Option<usize>> {
        if self.remaining() == 0 {
            self.ensure_capacity(self.len + self.block_size);
        }
        loop {
            match reader.read(&mut self.data[self.len..]) {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    self.len += n;
                    return Ok(Some(n));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Reads without growing until `min_len` bytes are held, the buffer is
    /// full, or the stream ends. Returns false once end of stream was seen.
    pub(crate) fn fill_to<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        min_len: usize,
    ) -> io::Result<bool> {
        while self.len < min_len && self.remaining() > 0 {
            if self.read_from(reader)?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Writes the filled region to `writer`.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.as_bytes())
    }

    /// Writes the filled region to `writer` and empties the buffer.
    pub fn write_to_and_reset<W: Write + ?Sized>(&mut self, writer: &mut W) -> io::Result<()> {
        self.write_to(writer)?;
        self.clear();
        Ok(())
    }

    /// Drops the first `n` bytes, shifting the rest to the front.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.len);
        if n == 0 {
            return;
        }
        self.data.copy_within(n..self.len, 0);
        self.len -= n;
    }

    /// Empties the buffer, keeping its capacity.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Copies a whole stream into `writer`, one block at a time.
    pub fn copy<R, W>(&mut self, reader: &mut R, writer: &mut W) -> io::Result<u64>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let mut total = 0u64;
        self.clear();
        while let Some(n) = self.read_from(reader)? {
            total += n as u64;
            self.write_to_and_reset(writer)?;
        }
        Ok(total)
    }
}

impl Write for ByteBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.append(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("content", &self.to_string_lossy())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl fmt::Display for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
