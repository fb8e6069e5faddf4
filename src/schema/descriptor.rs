//! # Field and Table Descriptors
//!
//! `FieldDescriptor` and `TableDescriptor` carry the slice of table-header
//! metadata the decoding engine needs: field type/size/precision, the table
//! charset, the encryption hook, and the location of the companion blob
//! file. Both are immutable after construction; concurrent row decodes share
//! them freely.
//!
//! ## Companion File Discovery
//!
//! A table `orders.db` stores its large values in `orders.mb` next to it.
//! The extension and stem are matched case-insensitively because the files
//! may have traveled through DOS-era filesystems. Exactly one candidate must
//! exist; zero or multiple is an error.
//!
//! ## Encryption
//!
//! Encrypted tables encrypt every block of the companion file. Decryption is
//! the job of an external collaborator holding the table's key material; it
//! plugs in through the [`BlockDecryptor`] trait and is invoked by the block
//! reader on whole, 256-byte-aligned buffers only.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::{Encoding, WINDOWS_1252};
use eyre::{ensure, Result, WrapErr};
use log::debug;

use crate::blob::BlobError;
use crate::config::{BLOB_FILE_EXTENSION, LOB_POINTER_SIZE};
use crate::types::FieldType;

/// Decrypts raw blocks of the companion blob file in place.
///
/// Implementations hold the table's key material. The buffer is always a
/// whole number of 256-byte blocks starting at `file_offset`, which is
/// always 256-byte aligned; decryption is never applied to a partial block.
pub trait BlockDecryptor: Send + Sync {
    fn decrypt(&self, buf: &mut [u8], file_offset: u64) -> Result<()>;
}

/// Immutable description of one field slot in a record.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    size: usize,
    precision: u8,
    scale: u8,
    fixed_precision: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType, size: usize) -> Self {
        Self {
            name: name.into(),
            field_type,
            size,
            precision: 0,
            scale: 0,
            fixed_precision: true,
        }
    }

    /// Sets the logical precision (for BCD: digits after the decimal point).
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the logical scale.
    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = scale;
        self
    }

    /// Marks the precision as variable rather than fixed.
    pub fn with_variable_precision(mut self) -> Self {
        self.fixed_precision = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Physical size of the field slot in the record, in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn fixed_precision(&self) -> bool {
        self.fixed_precision
    }

    /// Inline leader capacity for LOB fields.
    pub fn leader_capacity(&self) -> usize {
        self.size.saturating_sub(LOB_POINTER_SIZE)
    }
}

/// Immutable per-table metadata shared by all row decodes.
pub struct TableDescriptor {
    name: String,
    path: PathBuf,
    fields: Vec<FieldDescriptor>,
    charset: &'static Encoding,
    decryptor: Option<Arc<dyn BlockDecryptor>>,
    bcd_rounding: bool,
}

impl TableDescriptor {
    pub fn new(path: impl Into<PathBuf>, fields: Vec<FieldDescriptor>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path,
            fields,
            charset: WINDOWS_1252,
            decryptor: None,
            bcd_rounding: false,
        }
    }

    /// Sets the table charset used to decode Alpha fields and textual LOBs.
    pub fn with_charset(mut self, charset: &'static Encoding) -> Self {
        self.charset = charset;
        self
    }

    /// Attaches the decryptor for an encrypted table. Presence means every
    /// block read from the companion file is decrypted before use.
    pub fn with_decryptor(mut self, decryptor: Arc<dyn BlockDecryptor>) -> Self {
        self.decryptor = Some(decryptor);
        self
    }

    /// Requests that BCD fields decode to binary floating values instead of
    /// exact decimals.
    pub fn with_bcd_rounding(mut self, rounding: bool) -> Self {
        self.bcd_rounding = rounding;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn charset(&self) -> &'static Encoding {
        self.charset
    }

    pub fn is_encrypted(&self) -> bool {
        self.decryptor.is_some()
    }

    pub fn decryptor(&self) -> Option<&dyn BlockDecryptor> {
        self.decryptor.as_deref()
    }

    pub fn bcd_rounding(&self) -> bool {
        self.bcd_rounding
    }

    /// Opens the companion blob file for one LOB resolution.
    ///
    /// The handle is scoped to the resolution; callers drop it on every exit
    /// path. Each call re-discovers the file so a descriptor never pins an
    /// open descriptor between rows.
    pub fn open_blob_file(&self) -> Result<File> {
        let path = find_companion_blob(&self.path)?;
        File::open(&path)
            .map_err(BlobError::Io)
            .wrap_err_with(|| format!("failed to open blob file '{}'", path.display()))
    }
}

impl std::fmt::Debug for TableDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableDescriptor")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("fields", &self.fields.len())
            .field("charset", &self.charset.name())
            .field("encrypted", &self.is_encrypted())
            .field("bcd_rounding", &self.bcd_rounding)
            .finish()
    }
}

/// Locates the companion blob file for a table file.
///
/// The stem and the `mb` extension are matched case-insensitively. Exactly
/// one candidate must exist.
pub fn find_companion_blob(table_path: &Path) -> Result<PathBuf> {
    let stem = table_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned());
    let stem = match stem {
        Some(s) if !s.is_empty() => s,
        _ => eyre::bail!("table path '{}' has no file stem", table_path.display()),
    };

    let dir = match table_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut candidates = Vec::new();
    let entries = fs::read_dir(dir)
        .wrap_err_with(|| format!("failed to scan '{}' for blob files", dir.display()))?;
    for entry in entries {
        let path = entry
            .wrap_err_with(|| format!("failed to scan '{}' for blob files", dir.display()))?
            .path();
        let ext_matches = path
            .extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case(BLOB_FILE_EXTENSION))
            .unwrap_or(false);
        let stem_matches = path
            .file_stem()
            .map(|s| s.to_string_lossy().eq_ignore_ascii_case(&stem))
            .unwrap_or(false);
        if ext_matches && stem_matches {
            candidates.push(path);
        }
    }

    ensure!(
        candidates.len() <= 1,
        BlobError::AmbiguousCompanion(stem.clone())
    );
    match candidates.pop() {
        Some(path) => {
            debug!("table '{}' resolved blob file '{}'", stem, path.display());
            Ok(path)
        }
        None => Err(BlobError::MissingCompanion(stem).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn leader_capacity_subtracts_pointer_size() {
        let field = FieldDescriptor::new("notes", FieldType::Memo, 30);
        assert_eq!(field.leader_capacity(), 20);

        let tiny = FieldDescriptor::new("notes", FieldType::Memo, 10);
        assert_eq!(tiny.leader_capacity(), 0);
    }

    #[test]
    fn companion_discovery_matches_case_insensitively() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("Orders.db");
        fs::write(dir.path().join("ORDERS.MB"), b"x").unwrap();

        let found = find_companion_blob(&table).unwrap();
        assert_eq!(found.file_name().unwrap(), "ORDERS.MB");
    }

    #[test]
    fn companion_discovery_rejects_missing_file() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("orders.db");

        let err = find_companion_blob(&table).unwrap_err();
        assert!(err.downcast_ref::<BlobError>().is_some());
        assert!(err.to_string().contains("no companion blob file"));
    }

    #[test]
    fn companion_discovery_rejects_multiple_candidates() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("orders.db");
        fs::write(dir.path().join("orders.mb"), b"x").unwrap();
        fs::write(dir.path().join("ORDERS.MB"), b"x").unwrap();

        let err = find_companion_blob(&table).unwrap_err();
        assert!(err.to_string().contains("multiple companion blob files"));
    }

    #[test]
    fn field_descriptor_carries_precision_metadata() {
        let field = FieldDescriptor::new("price", FieldType::Bcd, 17)
            .with_precision(2)
            .with_scale(6)
            .with_variable_precision();
        assert_eq!(field.precision(), 2);
        assert_eq!(field.scale(), 6);
        assert!(!field.fixed_precision());
        assert_eq!(field.field_type(), FieldType::Bcd);
        assert_eq!(field.name(), "price");
    }

    #[test]
    fn descriptor_defaults_to_windows_1252() {
        let table = TableDescriptor::new("orders.db", Vec::new());
        assert_eq!(table.charset().name(), "windows-1252");
        assert!(!table.is_encrypted());
        assert!(!table.bcd_rounding());
    }
}
