//! # On-Disk Format Constants
//!
//! This module centralizes the constants of the Paradox table format,
//! grouping interdependent values together. Constants that depend on each
//! other are co-located to prevent mismatch bugs.
//!
//! ## Dependency Graph
//!
//! ```text
//! BLOCK_ALIGN (256 bytes)
//!       │
//!       ├─> BLOCK_MASK (derived: !(BLOCK_ALIGN - 1))
//!       │     Rounds a blob-file offset down to the containing block.
//!       │
//!       └─> SINGLE_BLOCK_INDEX (0xFF)
//!             The low byte of an external offset addresses a slot within
//!             the block; 0xFF is reserved to mean "the whole block".
//!
//! LOB_POINTER_SIZE (10 bytes)
//!       │
//!       └─> A LOB field of declared size S stores S - 10 inline leader
//!           bytes followed by the 10-byte external pointer.
//!
//! MEMO_HEADER_SIZE (9) / GRAPHIC_HEADER_SIZE (17)
//!       │
//!       └─> Both end in a little-endian u32 stored length; the payload of
//!           a single block starts immediately after the header.
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `BLOCK_ALIGN` is a power of two (`BLOCK_MASK` derivation relies on it)
//! 2. `BLOCK_HEADER_SIZE < MEMO_HEADER_SIZE < GRAPHIC_HEADER_SIZE`
//! 3. `SUB_BLOCK_TABLE_OFFSET + 256 * SUB_BLOCK_DESCRIPTOR_SIZE` fits well
//!    inside the 4KB a suballocated block typically spans

// ============================================================================
// BLOB FILE BLOCK LAYOUT
// Every block in the companion .mb file starts on a 256-byte boundary
// ============================================================================

/// Allocation and alignment unit of the companion blob file.
pub const BLOCK_ALIGN: usize = 256;

/// Mask that rounds a blob-file offset down to its containing block start.
pub const BLOCK_MASK: u64 = !(BLOCK_ALIGN as u64 - 1);

/// Size of the common block header: type tag (u8) + reserved (u16 LE).
pub const BLOCK_HEADER_SIZE: usize = 3;

/// Total single-block header size for memo/blob/OLE values.
pub const MEMO_HEADER_SIZE: usize = 9;

/// Total single-block header size for graphic values.
pub const GRAPHIC_HEADER_SIZE: usize = 17;

/// Low-byte offset value reserved to mean "the whole block".
pub const SINGLE_BLOCK_INDEX: u8 = 0xFF;

/// Byte offset of the sub-block descriptor table within a suballocated block.
pub const SUB_BLOCK_TABLE_OFFSET: u64 = 0x0C;

/// Size of one sub-block descriptor entry.
pub const SUB_BLOCK_DESCRIPTOR_SIZE: u64 = 5;

/// Granularity of sub-block offsets and lengths.
pub const SUB_BLOCK_UNIT: usize = 16;

const _: () = assert!(
    BLOCK_ALIGN.is_power_of_two(),
    "BLOCK_MASK derivation requires a power-of-two BLOCK_ALIGN"
);

const _: () = assert!(
    BLOCK_HEADER_SIZE < MEMO_HEADER_SIZE && MEMO_HEADER_SIZE < GRAPHIC_HEADER_SIZE,
    "single-block headers must extend the common block header"
);

// ============================================================================
// BLOCK TYPE TAGS
// First byte of every block in the companion file
// ============================================================================

/// Head block of the blob file; never a valid first read for a live value.
pub const HEAD_BLOCK: u8 = 0x01;

/// Block holding exactly one value.
pub const SINGLE_BLOCK: u8 = 0x02;

/// Block shared by several small values, located via a descriptor table.
pub const SUB_BLOCK: u8 = 0x03;

/// Recycled block awaiting reuse; reading one as a value is a format error.
pub const FREE_BLOCK: u8 = 0x04;

// ============================================================================
// LOB POINTER LAYOUT
// Trailing descriptor of every blob/memo field slot in a record
// ============================================================================

/// Size of the external pointer at the end of a LOB field slot:
/// offset (u32 LE) + declared length (u32 LE) + modifier (u16 LE).
pub const LOB_POINTER_SIZE: usize = 10;

// ============================================================================
// SCALAR ENCODING CONSTANTS
// Scalar fields are big-endian with sign tricks chosen so that raw bytes
// sort in numeric order
// ============================================================================

/// Auto-increment values use only the low 28 bits.
pub const AUTO_INCREMENT_MASK: u32 = 0x0FFF_FFFF;

/// Date fields store their day count in the low 28 bits.
pub const DAY_COUNT_MASK: u32 = 0x0FFF_FFFF;

/// The top bit of a Long is a reserved flag, not a sign bit.
pub const LONG_MASK: u32 = 0x7FFF_FFFF;

/// Shorts store two's complement with the high bit inverted.
pub const SHORT_SIGN_FLIP: u16 = 0x8000;

/// Stored size of a packed-decimal (BCD) field.
pub const BCD_SIZE: usize = 17;

/// Maximum number of decimal digits a BCD field can carry.
pub const BCD_MAX_PRECISION: u8 = 32;

const _: () = assert!(
    (BCD_SIZE - 1) * 2 == BCD_MAX_PRECISION as usize,
    "BCD digit capacity derivation mismatch"
);

// ============================================================================
// CALENDAR CONSTANTS
// ============================================================================

/// Added to a stored day count to obtain a serial day number.
pub const SDN_OFFSET: i64 = 1_721_425;

/// Serial day number of 1970-01-01, the epoch used by [`crate::types::Value`].
pub const UNIX_EPOCH_SDN: i64 = 2_440_588;

/// Milliseconds between year 1 and the 1970 epoch; timestamps are stored as
/// milliseconds since year 1.
pub const TIMESTAMP_EPOCH_SHIFT_MS: f64 = 62_135_683_200_000.0;

// ============================================================================
// COMPANION FILE
// ============================================================================

/// Extension of the companion blob file, matched case-insensitively.
pub const BLOB_FILE_EXTENSION: &str = "mb";
