//! # Record Cursor
//!
//! A record is a fixed-length byte buffer in which fields occupy contiguous,
//! non-overlapping ranges determined by schema order. `RecordCursor` hands
//! out those ranges in order: every `take` advances the cursor by exactly
//! the requested amount and never past the end of the buffer, so a decoded
//! field can never read into its neighbor.

use eyre::{ensure, Result};

/// Monotonic read cursor over one record buffer.
#[derive(Debug)]
pub struct RecordCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RecordCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Consumes the next `len` bytes and advances the cursor by exactly
    /// that amount.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        ensure!(
            self.pos + len <= self.data.len(),
            "record cursor overrun: {} bytes requested at offset {} of a {}-byte record",
            len,
            self.pos,
            self.data.len()
        );
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Current byte offset within the record.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to consume.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }
}
