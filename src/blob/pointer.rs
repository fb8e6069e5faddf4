//! # LOB Pointer Parsing
//!
//! A LOB field slot ends in a fixed 10-byte descriptor; everything before it
//! is the inline leader. `LobPointer` borrows both parts from the record
//! buffer, so parsing a pointer allocates nothing and inline values decode
//! zero-copy.

use eyre::{ensure, Result};

use crate::config::LOB_POINTER_SIZE;

/// Borrowed view of one LOB field slot: inline leader plus the trailing
/// external descriptor.
#[derive(Debug, Clone, Copy)]
pub struct LobPointer<'a> {
    leader: &'a [u8],
    offset: u32,
    length: i32,
    modifier: u16,
}

impl<'a> LobPointer<'a> {
    /// Parses a field slot of at least [`LOB_POINTER_SIZE`] bytes.
    pub fn parse(slot: &'a [u8]) -> Result<Self> {
        ensure!(
            slot.len() >= LOB_POINTER_SIZE,
            "LOB field slot too small: {} bytes, need at least {}",
            slot.len(),
            LOB_POINTER_SIZE
        );

        let (leader, tail) = slot.split_at(slot.len() - LOB_POINTER_SIZE);
        let offset = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
        let length = i32::from_le_bytes([tail[4], tail[5], tail[6], tail[7]]);
        let modifier = u16::from_le_bytes([tail[8], tail[9]]);

        Ok(Self {
            leader,
            offset,
            length,
            modifier,
        })
    }

    /// Inline leader bytes copied verbatim from the record.
    pub fn leader(&self) -> &'a [u8] {
        self.leader
    }

    /// External offset into the companion blob file.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Declared value length; `None` when the value is null.
    pub fn declared_len(&self) -> Option<u32> {
        if self.length <= 0 {
            None
        } else {
            Some(self.length as u32)
        }
    }

    /// Opaque modifier trailing the descriptor; consumed by metadata loading
    /// outside this crate.
    pub fn modifier(&self) -> u16 {
        self.modifier
    }

    /// Returns true if the value is null.
    pub fn is_null(&self) -> bool {
        self.length <= 0
    }

    /// Returns true if the whole value fits in the inline leader and the
    /// external descriptor is ignored.
    pub fn is_inline(&self) -> bool {
        match self.declared_len() {
            None => true,
            Some(len) => len as usize <= self.leader.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(leader: &[u8], offset: u32, length: i32, modifier: u16) -> Vec<u8> {
        let mut buf = leader.to_vec();
        buf.extend_from_slice(&offset.to_le_bytes());
        buf.extend_from_slice(&length.to_le_bytes());
        buf.extend_from_slice(&modifier.to_le_bytes());
        buf
    }

    #[test]
    fn parse_splits_leader_and_descriptor() {
        let buf = slot(b"hello worl", 0x1FF, 5, 7);
        let pointer = LobPointer::parse(&buf).unwrap();

        assert_eq!(pointer.leader(), b"hello worl");
        assert_eq!(pointer.offset(), 0x1FF);
        assert_eq!(pointer.declared_len(), Some(5));
        assert_eq!(pointer.modifier(), 7);
    }

    #[test]
    fn parse_rejects_undersized_slot() {
        let result = LobPointer::parse(&[0u8; 9]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too small"));
    }

    #[test]
    fn zero_length_is_null() {
        let buf = slot(b"ignored!!!", 0x100, 0, 0);
        let pointer = LobPointer::parse(&buf).unwrap();
        assert!(pointer.is_null());
        assert_eq!(pointer.declared_len(), None);
    }

    #[test]
    fn negative_length_is_null() {
        let buf = slot(b"ignored!!!", 0x100, -3, 0);
        let pointer = LobPointer::parse(&buf).unwrap();
        assert!(pointer.is_null());
    }

    #[test]
    fn short_value_is_inline() {
        let buf = slot(b"hello worl", 0xDEAD_BEEF, 10, 0);
        let pointer = LobPointer::parse(&buf).unwrap();
        assert!(pointer.is_inline());

        let buf = slot(b"hello worl", 0x100, 11, 0);
        let pointer = LobPointer::parse(&buf).unwrap();
        assert!(!pointer.is_inline());
    }

    #[test]
    fn empty_leader_slot_parses() {
        let buf = slot(b"", 0x200, 64, 0);
        let pointer = LobPointer::parse(&buf).unwrap();
        assert!(pointer.leader().is_empty());
        assert!(!pointer.is_inline());
    }
}
