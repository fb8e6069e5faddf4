//! # LOB Storage (Companion .mb File)
//!
//! This module resolves large-object values (blob, memo, OLE, graphic) that
//! do not fit inside their fixed record slot. A LOB field slot holds an
//! inline *leader* (a verbatim prefix of the value, or a cache of it) plus a
//! 10-byte pointer into the table's companion `.mb` file.
//!
//! ## In-Record Layout
//!
//! ```text
//! +---------------------+-----------+-----------+-----------+
//! | leader              | offset    | length    | modifier  |
//! | fieldSize-10 bytes  | u32 LE    | u32 LE    | u16 LE    |
//! +---------------------+-----------+-----------+-----------+
//! ```
//!
//! | Condition | Meaning |
//! |-----------|---------|
//! | `length <= 0` | value is null |
//! | `length <= leader capacity` | value is the first `length` leader bytes |
//! | otherwise | value lives in the companion file at `offset` |
//!
//! ## Companion File Layout
//!
//! The file is a sequence of 256-byte aligned blocks. The low byte of an
//! external offset is a slot index within the block; the rest addresses the
//! block itself. Every block starts with a 3-byte header:
//!
//! ```text
//! +-----------+--------------+
//! | type (u8) | reserved u16 |
//! +-----------+--------------+
//! ```
//!
//! Two storage strategies exist, dispatched on the type tag:
//!
//! - **Single block** (`0x02`): the block holds exactly one value. The
//!   header continues for another 6 bytes (14 for graphics), ending in a
//!   little-endian u32 stored length that must match the record's declared
//!   length; the payload follows the header.
//! - **Sub-block** (`0x03`): the block is shared by small values, each
//!   located through a 5-byte descriptor at `blockStart + 0x0C + index*5`.
//!
//! Head blocks, free blocks, and unknown tags are format errors when a live
//! value points at them.
//!
//! ## Resource Discipline
//!
//! The companion file handle is opened per resolution and dropped on every
//! exit path. Inline and null values never open the file at all.
//!
//! ## Encryption
//!
//! Encrypted tables encrypt the companion file blockwise. All reads go
//! through [`reader::read_block`], which decrypts whole aligned blocks
//! before slicing out the requested range, so callers never observe
//! ciphertext or partially decrypted data.

mod pointer;
mod reader;
mod resolver;

pub use pointer::LobPointer;
pub use reader::read_block;
pub use resolver::{resolve, BlockHeader, LobKind, SubBlockDescriptor};

use thiserror::Error;

use crate::config::{GRAPHIC_HEADER_SIZE, MEMO_HEADER_SIZE};

/// Failure kinds of LOB resolution. All are fatal to the current value and
/// non-retryable; the row-decoding caller aborts the row rather than
/// defaulting the value.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("no companion blob file found for table '{0}'")]
    MissingCompanion(String),

    #[error("multiple companion blob files found for table '{0}'")]
    AmbiguousCompanion(String),

    #[error("blob pointer references a head or free block at {offset:#x}")]
    HeadOrFreeBlock { offset: u64 },

    #[error("invalid blob block header at {offset:#x}: block is on the free list")]
    FreeBlockHeader { offset: u64 },

    #[error("unrecognized blob block type {block_type:#04x} at {offset:#x}")]
    UnknownBlockType { block_type: u8, offset: u64 },

    #[error("single-block blob expects sub-index 0xff, got {index:#04x}")]
    InvalidSingleBlockIndex { index: u8 },

    #[error("declared blob length {declared} does not match stored length {stored}")]
    DeclaredSizeMismatch { declared: u32, stored: i64 },

    #[error("blob file read failed: {0}")]
    Io(#[from] std::io::Error),
}

const _: () = assert!(MEMO_HEADER_SIZE >= 7 && GRAPHIC_HEADER_SIZE >= 7,
    "single-block headers must have room for the trailing stored length");
