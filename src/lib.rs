//! # pxread - Paradox Table Decoder
//!
//! pxread reads the on-disk table format of the Paradox desktop database:
//! fixed-width record buffers holding scalar fields, plus blob/memo values
//! stored out-of-line in a companion `.mb` file as 256-byte aligned,
//! optionally encrypted blocks. The crate is strictly read-only.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pxread::{decode_record, FieldDescriptor, FieldType, TableDescriptor};
//!
//! let fields = vec![
//!     FieldDescriptor::new("id", FieldType::AutoIncrement, 4),
//!     FieldDescriptor::new("name", FieldType::Alpha, 20),
//!     FieldDescriptor::new("notes", FieldType::Memo, 30),
//! ];
//! let table = TableDescriptor::new("orders.db", fields);
//!
//! let values = decode_record(&record_bytes, &table)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Record Decoding (decode_field)    │
//! ├──────────────────┬──────────────────┤
//! │   Scalar Codecs  │  LOB Resolution  │
//! ├──────────────────┼──────────────────┤
//! │   Record Cursor  │   Block Reader   │
//! ├──────────────────┴──────────────────┤
//! │  Table Schema / Companion .mb File  │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every field in a record occupies a contiguous byte range determined by
//! schema order. Scalar fields decode in place; blob/memo fields carry an
//! inline leader plus a 10-byte pointer into the companion file, resolved
//! on demand through [`blob`].
//!
//! ## File Layout
//!
//! Each table is a pair of files sharing a base name:
//!
//! ```text
//! data_dir/
//! ├── orders.db   # Table file: header + fixed-width records
//! └── orders.mb   # Companion blob file: 256-byte aligned blocks
//! ```
//!
//! The companion file is opened per LOB resolution and closed when the
//! resolution returns, on every exit path.
//!
//! ## Module Overview
//!
//! - [`records`]: record cursor, scalar codecs, per-field dispatch
//! - [`blob`]: LOB pointer parsing, aligned block reads, chain resolution
//! - [`schema`]: field/table descriptors, companion-file discovery
//! - [`types`]: `FieldType` tags and the runtime `Value` representation
//! - [`config`]: on-disk format constants

#[macro_use]
mod macros;

pub mod blob;
pub mod config;
pub mod records;
pub mod schema;
pub mod types;

pub use blob::{BlobError, LobKind, LobPointer};
pub use records::{decode_field, decode_record, RecordCursor};
pub use schema::{codepage_encoding, BlockDecryptor, FieldDescriptor, TableDescriptor};
pub use types::{FieldType, Value};
