//! # Table Schema
//!
//! This module provides the minimal per-table metadata that drives decoding:
//! field type/size/precision, the table charset, the encryption hook, and
//! access to the companion blob file.
//!
//! Full header loading (field counts, block counts, index metadata) lives
//! outside this crate; whatever loads a table header builds a
//! [`TableDescriptor`] from it and hands it to the decoding entry points.
//!
//! ## Module Structure
//!
//! - `descriptor`: `FieldDescriptor`, `TableDescriptor`, `BlockDecryptor`,
//!   companion-file discovery
//! - `codepage`: DOS/Windows code page to charset mapping

mod codepage;
mod descriptor;

pub use codepage::codepage_encoding;
pub use descriptor::{find_companion_blob, BlockDecryptor, FieldDescriptor, TableDescriptor};
