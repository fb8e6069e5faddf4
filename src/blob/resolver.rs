//! # Block Chain Resolution
//!
//! Turns a parsed [`LobPointer`] into the actual value bytes. Resolution is
//! kind-agnostic: [`LobKind`] only selects the single-block header size and
//! tells the record decoder whether the final bytes are charset text or raw
//! binary. The dispatch itself follows the block type tag found at the
//! 256-byte aligned start of the referenced block.
//!
//! ## Resolution States
//!
//! ```text
//! declared <= 0 ──────────────> NULL      (terminal, no file access)
//! declared <= leader capacity ─> INLINE   (terminal, no file access)
//! otherwise ──────────────────> EXTERNAL  (open file, dispatch on block type)
//! ```
//!
//! External resolution holds the companion file handle for exactly one
//! call and releases it on every exit path, success or error.

use std::borrow::Cow;
use std::fs::File;

use eyre::Result;
use log::debug;
use zerocopy::little_endian::U16;
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use super::{read_block, BlobError, LobPointer};
use crate::config::{
    BLOCK_HEADER_SIZE, BLOCK_MASK, FREE_BLOCK, GRAPHIC_HEADER_SIZE, HEAD_BLOCK, MEMO_HEADER_SIZE,
    SINGLE_BLOCK, SINGLE_BLOCK_INDEX, SUB_BLOCK, SUB_BLOCK_DESCRIPTOR_SIZE,
    SUB_BLOCK_TABLE_OFFSET, SUB_BLOCK_UNIT,
};
use crate::schema::TableDescriptor;
use crate::types::FieldType;

/// Storage family of a LOB field. Resolution is identical across kinds; the
/// kind picks the single-block header size and the final byte conversion
/// (raw bytes vs. charset-decoded text) applied by the record decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobKind {
    Blob,
    Memo,
    Graphic,
}

impl LobKind {
    /// Maps a LOB field type to its storage family.
    pub fn from_field_type(field_type: FieldType) -> Option<Self> {
        match field_type {
            FieldType::Blob | FieldType::Ole => Some(LobKind::Blob),
            FieldType::Memo | FieldType::FmtMemo => Some(LobKind::Memo),
            FieldType::Graphic => Some(LobKind::Graphic),
            _ => None,
        }
    }

    /// Total single-block header size for this family.
    pub fn header_size(&self) -> usize {
        match self {
            LobKind::Blob | LobKind::Memo => MEMO_HEADER_SIZE,
            LobKind::Graphic => GRAPHIC_HEADER_SIZE,
        }
    }
}

/// Common 3-byte header at the start of every companion-file block.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct BlockHeader {
    block_type: u8,
    reserved: U16,
}

const _: () = assert!(std::mem::size_of::<BlockHeader>() == BLOCK_HEADER_SIZE);

impl BlockHeader {
    pub fn parse(bytes: &[u8]) -> Result<&Self> {
        eyre::ensure!(
            bytes.len() >= BLOCK_HEADER_SIZE,
            "buffer too small for block header: {} < {}",
            bytes.len(),
            BLOCK_HEADER_SIZE
        );
        Self::ref_from_bytes(&bytes[..BLOCK_HEADER_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse block header: {:?}", e))
    }

    pub fn block_type(&self) -> u8 {
        self.block_type
    }

    zerocopy_getters! {
        reserved: u16,
    }
}

/// Descriptor locating one value inside a suballocated block, found at
/// `blockStart + 0x0C + index * 5`.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct SubBlockDescriptor {
    block_offset_units: u8,
    data_length_units: u8,
    reserved: U16,
    modulo_units: u8,
}

const _: () = assert!(std::mem::size_of::<SubBlockDescriptor>() == SUB_BLOCK_DESCRIPTOR_SIZE as usize);

impl SubBlockDescriptor {
    pub fn parse(bytes: &[u8]) -> Result<&Self> {
        eyre::ensure!(
            bytes.len() >= SUB_BLOCK_DESCRIPTOR_SIZE as usize,
            "buffer too small for sub-block descriptor: {} < {}",
            bytes.len(),
            SUB_BLOCK_DESCRIPTOR_SIZE
        );
        Self::ref_from_bytes(&bytes[..SUB_BLOCK_DESCRIPTOR_SIZE as usize])
            .map_err(|e| eyre::eyre!("failed to parse sub-block descriptor: {:?}", e))
    }

    pub fn block_offset_units(&self) -> u8 {
        self.block_offset_units
    }

    pub fn data_length_units(&self) -> u8 {
        self.data_length_units
    }

    pub fn modulo_units(&self) -> u8 {
        self.modulo_units
    }

    zerocopy_getters! {
        reserved: u16,
    }

    /// Value length implied by this descriptor.
    pub fn stored_len(&self) -> i64 {
        (self.data_length_units as i64 - 1) * SUB_BLOCK_UNIT as i64 + self.modulo_units as i64
    }

    /// Byte offset of the value payload from the block start.
    pub fn payload_offset(&self) -> u64 {
        self.block_offset_units as u64 * SUB_BLOCK_UNIT as u64
    }
}

/// Resolves a LOB pointer to the value bytes, or `None` when the value is
/// null.
///
/// Null and inline values return without touching the companion file; the
/// inline case borrows straight from the record buffer. External values
/// open the companion file for the duration of this call only.
pub fn resolve<'a>(
    pointer: &LobPointer<'a>,
    kind: LobKind,
    table: &TableDescriptor,
) -> Result<Option<Cow<'a, [u8]>>> {
    let declared = match pointer.declared_len() {
        None => return Ok(None),
        Some(len) => len,
    };

    if declared as usize <= pointer.leader().len() {
        return Ok(Some(Cow::Borrowed(&pointer.leader()[..declared as usize])));
    }

    let mut file = table.open_blob_file()?;
    let block_start = u64::from(pointer.offset()) & BLOCK_MASK;
    let index = (pointer.offset() & 0xFF) as u8;

    let header_bytes = read_block(&mut file, block_start, BLOCK_HEADER_SIZE, table)?;
    let header = BlockHeader::parse(&header_bytes)?;
    debug!(
        "resolving {:?} blob: block {:#x} type {:#04x} index {:#04x} declared {}",
        kind,
        block_start,
        header.block_type(),
        index,
        declared
    );

    let payload = match header.block_type() {
        0x00 | HEAD_BLOCK => {
            return Err(BlobError::HeadOrFreeBlock {
                offset: block_start,
            }
            .into())
        }
        FREE_BLOCK => {
            return Err(BlobError::FreeBlockHeader {
                offset: block_start,
            }
            .into())
        }
        SINGLE_BLOCK => read_single_block(&mut file, block_start, index, declared, kind, table)?,
        SUB_BLOCK => read_sub_block(&mut file, block_start, index, declared, table)?,
        other => {
            return Err(BlobError::UnknownBlockType {
                block_type: other,
                offset: block_start,
            }
            .into())
        }
    };

    Ok(Some(Cow::Owned(payload)))
}

/// Reads a value that owns its whole block. The sub-index must be the
/// reserved whole-block marker, and the stored length at the end of the
/// extended header must match the record's declared length.
fn read_single_block(
    file: &mut File,
    block_start: u64,
    index: u8,
    declared: u32,
    kind: LobKind,
    table: &TableDescriptor,
) -> Result<Vec<u8>> {
    if index != SINGLE_BLOCK_INDEX {
        return Err(BlobError::InvalidSingleBlockIndex { index }.into());
    }

    let header_size = kind.header_size();
    let continuation = read_block(
        file,
        block_start + BLOCK_HEADER_SIZE as u64,
        header_size - BLOCK_HEADER_SIZE,
        table,
    )?;
    let tail = &continuation[continuation.len() - 4..];
    let stored = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
    if stored != declared {
        return Err(BlobError::DeclaredSizeMismatch {
            declared,
            stored: i64::from(stored),
        }
        .into());
    }

    read_block(file, block_start + header_size as u64, declared as usize, table)
}

/// Reads a value from a suballocated block through its descriptor-table
/// entry. The length implied by the descriptor must match the record's
/// declared length.
fn read_sub_block(
    file: &mut File,
    block_start: u64,
    index: u8,
    declared: u32,
    table: &TableDescriptor,
) -> Result<Vec<u8>> {
    let descriptor_pos =
        block_start + SUB_BLOCK_TABLE_OFFSET + u64::from(index) * SUB_BLOCK_DESCRIPTOR_SIZE;
    let descriptor_bytes = read_block(
        file,
        descriptor_pos,
        SUB_BLOCK_DESCRIPTOR_SIZE as usize,
        table,
    )?;
    let descriptor = SubBlockDescriptor::parse(&descriptor_bytes)?;

    let stored = descriptor.stored_len();
    if stored != i64::from(declared) {
        return Err(BlobError::DeclaredSizeMismatch { declared, stored }.into());
    }

    read_block(
        file,
        block_start + descriptor.payload_offset(),
        declared as usize,
        table,
    )
}
