//! Seekable in-memory byte stream.
//!
//! A [`Stream`] holds one server response (or the fragments of it read so
//! far) together with a read cursor. Reads never copy: every slice handed
//! out is a [`Bytes`] view into the same buffer.

use bytes::{Bytes, BytesMut};

/// A byte buffer with a read cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stream {
    data: Bytes,
    pos: usize,
}

impl Stream {
    /// Creates a stream positioned at the start of `data`.
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    /// Total number of bytes in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the stream holds no bytes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the current cursor offset.
    #[must_use]
    pub const fn tell(&self) -> usize {
        self.pos
    }

    /// Returns true if the cursor is at the end of the data.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Returns the bytes after the cursor.
    #[must_use]
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// Returns the whole underlying buffer.
    #[must_use]
    pub const fn as_bytes(&self) -> &Bytes {
        &self.data
    }

    /// Reads one byte and advances past it.
    pub fn getc(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Returns the byte under the cursor without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Moves the cursor to an absolute offset, clamped to the end.
    pub fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.data.len());
    }

    /// Moves the cursor by `delta` bytes, clamped to the buffer bounds.
    pub fn seek_relative(&mut self, delta: isize) {
        let target = self.pos.saturating_add_signed(delta);
        self.seek(target);
    }

    /// Reads up to `n` bytes.
    ///
    /// Fewer than `n` bytes are returned only when the end of the buffer is
    /// reached first.
    pub fn read_exact(&mut self, n: usize) -> Bytes {
        let end = self.pos.saturating_add(n).min(self.data.len());
        let out = self.data.slice(self.pos..end);
        self.pos = end;
        out
    }

    /// Reads up to the next `delim`, consuming the delimiter.
    ///
    /// Returns the bytes before the delimiter. If the delimiter never occurs
    /// the cursor is moved to the end and `None` is returned.
    pub fn get_to_char(&mut self, delim: u8) -> Option<Bytes> {
        match self.search(delim) {
            Some(found) => {
                let out = self.data.slice(self.pos..found);
                self.pos = found + 1;
                Some(out)
            }
            None => {
                self.pos = self.data.len();
                None
            }
        }
    }

    /// Finds the absolute offset of the next `byte` at or after the cursor.
    #[must_use]
    pub fn search(&self, byte: u8) -> Option<usize> {
        self.remaining()
            .iter()
            .position(|&b| b == byte)
            .map(|i| self.pos + i)
    }

    /// Copies out an absolute range without moving the cursor.
    ///
    /// The range is clamped to the buffer.
    #[must_use]
    pub fn substring(&self, start: usize, len: usize) -> Bytes {
        let start = start.min(self.data.len());
        let end = start.saturating_add(len).min(self.data.len());
        self.data.slice(start..end)
    }

    /// Appends a fragment to the end of the stream. The cursor is unchanged.
    pub fn append(&mut self, more: &[u8]) {
        if more.is_empty() {
            return;
        }
        let mut buf = BytesMut::with_capacity(self.data.len() + more.len());
        buf.extend_from_slice(&self.data);
        buf.extend_from_slice(more);
        self.data = buf.freeze();
    }
}

impl From<Bytes> for Stream {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<BytesMut> for Stream {
    fn from(data: BytesMut) -> Self {
        Self::new(data.freeze())
    }
}

impl From<Vec<u8>> for Stream {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for Stream {
    fn from(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }
}

impl From<&str> for Stream {
    fn from(data: &str) -> Self {
        Self::from(data.as_bytes())
    }
}
