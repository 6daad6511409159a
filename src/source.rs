//! Forward-only byte cursors shared by the JSON and XML scanners.
//!
//! Both grammars only branch on ASCII bytes, so the scanners walk UTF-8 input
//! byte by byte and decode collected runs once they are complete. A
//! [`StrSource`] sees the whole text; a [`StreamSource`] sees a window of at
//! most `window` unread bytes and refills it from the reader on demand.

use std::io::Read;

use crate::buffer::ByteBuffer;
use crate::error::{Error, Result};

pub(crate) trait Source {
    /// Byte `offset` positions past the cursor, `None` once input ends there.
    fn peek_at(&mut self, offset: usize) -> Result<Option<u8>>;

    /// Advances the cursor by `n` bytes that were already peeked.
    fn bump(&mut self, n: usize);

    /// The byte most recently stepped over.
    fn last(&self) -> Option<u8>;

    /// Absolute offset of the cursor, `None` once the input is known to be
    /// consumed.
    fn index(&self) -> Option<usize>;

    fn peek(&mut self) -> Result<Option<u8>> {
        self.peek_at(0)
    }

    fn is_exhausted(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_none())
    }

    /// True when the bytes at `offset` spell `pattern`.
    fn matches_at(&mut self, offset: usize, pattern: &[u8]) -> Result<bool> {
        for (i, &b) in pattern.iter().enumerate() {
            if self.peek_at(offset + i)? != Some(b) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(b) = self.peek()? {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.bump(1);
        }
        Ok(())
    }

    /// Moves past the next occurrence of `terminator`, or to the end.
    fn skip_past(&mut self, terminator: &[u8]) -> Result<()> {
        loop {
            if self.matches_at(0, terminator)? {
                self.bump(terminator.len());
                return Ok(());
            }
            if self.peek()?.is_none() {
                return Ok(());
            }
            self.bump(1);
        }
    }

    /// Like [`skip_past`](Self::skip_past) but keeps the skipped bytes.
    fn copy_until(&mut self, terminator: &[u8], out: &mut Vec<u8>) -> Result<()> {
        loop {
            if self.matches_at(0, terminator)? {
                self.bump(terminator.len());
                return Ok(());
            }
            match self.peek()? {
                Some(b) => {
                    out.push(b);
                    self.bump(1);
                }
                None => return Ok(()),
            }
        }
    }
}

/// Cursor over fully resident text.
#[derive(Debug, Clone)]
pub(crate) struct StrSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> StrSource<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        StrSource {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.pos = 0;
    }
}

impl Source for StrSource<'_> {
    fn peek_at(&mut self, offset: usize) -> Result<Option<u8>> {
        Ok(self.bytes.get(self.pos + offset).copied())
    }

    fn bump(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    fn last(&self) -> Option<u8> {
        self.pos.checked_sub(1).map(|i| self.bytes[i])
    }

    fn index(&self) -> Option<usize> {
        (self.pos < self.bytes.len()).then_some(self.pos)
    }
}

/// Cursor over a reader, holding a bounded lookahead window.
pub(crate) struct StreamSource<R> {
    reader: R,
    buf: ByteBuffer,
    window: usize,
    pos: usize,
    consumed: usize,
    last: Option<u8>,
    eof: bool,
}

impl<R: Read> StreamSource<R> {
    pub(crate) fn new(reader: R, window: usize) -> Self {
        StreamSource {
            reader,
            // one byte past the window tells a full window from the end of input
            buf: ByteBuffer::with_capacity(window + 1),
            window,
            pos: 0,
            consumed: 0,
            last: None,
            eof: false,
        }
    }

    pub(crate) fn into_inner(self) -> R {
        self.reader
    }

    /// Shifts the consumed prefix out and reads until `offset` is buffered.
    fn refill(&mut self, offset: usize) -> Result<()> {
        if self.pos > 0 {
            self.buf.consume(self.pos);
            self.consumed += self.pos;
            self.pos = 0;
        }
        let before = self.buf.len();
        if !self.buf.fill_to(&mut self.reader, offset + 1)? {
            self.eof = true;
        }
        tracing::trace!(
            offset = self.consumed,
            read = self.buf.len() - before,
            eof = self.eof,
            "refilled stream window"
        );
        Ok(())
    }
}

impl<R: Read> Source for StreamSource<R> {
    fn peek_at(&mut self, offset: usize) -> Result<Option<u8>> {
        if offset < self.window {
            let at = self.pos + offset;
            if at < self.buf.len() {
                return Ok(self.buf.get(at));
            }
            if self.eof {
                return Ok(None);
            }
            self.refill(offset)?;
            return Ok(self.buf.get(offset));
        }
        if !self.eof {
            self.refill(self.window)?;
        }
        if self.eof && self.pos + offset >= self.buf.len() {
            return Ok(None);
        }
        Err(Error::capacity_exceeded(offset + 1, self.window))
    }

    fn bump(&mut self, n: usize) {
        let end = (self.pos + n).min(self.buf.len());
        if end > self.pos {
            self.last = self.buf.get(end - 1);
        }
        self.pos = end;
    }

    fn last(&self) -> Option<u8> {
        self.last
    }

    fn index(&self) -> Option<usize> {
        (!self.eof || self.pos < self.buf.len()).then_some(self.consumed + self.pos)
    }
}
