//! # Aligned Block Reads
//!
//! All companion-file I/O funnels through [`read_block`], which widens every
//! read to whole 256-byte blocks. Centralizing the widening keeps two
//! guarantees in one place:
//!
//! 1. **Decryption granularity**: encrypted tables encrypt whole blocks, so
//!    the decryptor always sees complete, aligned blocks even when the
//!    caller wants a 3-byte header or a 5-byte descriptor.
//! 2. **Observational transparency**: callers receive exactly the bytes at
//!    `[pos, pos + len)` of the (decrypted) file, as if the read had not
//!    been widened at all.
//!
//! ## Read Widening
//!
//! ```text
//! aligned          pos                pos+len
//! |----------------|==================|--------|
//! ^ 256-byte       ^ requested range  ^ padding to the
//!   boundary                            next 256 multiple
//! ```
//!
//! A read that fails mid-way surfaces as an I/O error; the buffer is never
//! partially decrypted.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use eyre::{Result, WrapErr};
use log::trace;

use super::BlobError;
use crate::config::{BLOCK_ALIGN, BLOCK_MASK};
use crate::schema::TableDescriptor;

/// Reads `len` bytes at byte offset `pos` of the companion blob file,
/// widening the physical read to whole 256-byte blocks and decrypting them
/// when the table is encrypted.
pub fn read_block(file: &mut File, pos: u64, len: usize, table: &TableDescriptor) -> Result<Vec<u8>> {
    let aligned = pos & BLOCK_MASK;
    let lead = (pos - aligned) as usize;

    let mut raw_size = len + lead;
    if raw_size % BLOCK_ALIGN != 0 {
        raw_size = (raw_size / BLOCK_ALIGN + 1) * BLOCK_ALIGN;
    }

    let mut buf = vec![0u8; raw_size];
    file.seek(SeekFrom::Start(aligned)).map_err(BlobError::Io)?;
    file.read_exact(&mut buf)
        .map_err(BlobError::Io)
        .wrap_err_with(|| {
            format!(
                "failed to read {} block bytes at {:#x} of blob file",
                raw_size, aligned
            )
        })?;

    if let Some(decryptor) = table.decryptor() {
        decryptor
            .decrypt(&mut buf, aligned)
            .wrap_err("block decryption failed")?;
    }

    trace!(
        "blob read: {} bytes at {:#x} (widened to {} at {:#x})",
        len,
        pos,
        raw_size,
        aligned
    );

    Ok(buf[lead..lead + len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BlockDecryptor, TableDescriptor};
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn reference_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 13) as u8).collect()
    }

    fn table() -> TableDescriptor {
        TableDescriptor::new("t.db", Vec::new())
    }

    #[test]
    fn aligned_read_matches_reference_slice() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.mb");
        let data = reference_bytes(4096);
        std::fs::write(&path, &data).unwrap();

        let mut file = File::open(&path).unwrap();
        let out = read_block(&mut file, 512, 256, &table()).unwrap();
        assert_eq!(out, &data[512..768]);
    }

    #[test]
    fn widening_is_observationally_transparent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.mb");
        let data = reference_bytes(4096);
        std::fs::write(&path, &data).unwrap();

        let mut file = File::open(&path).unwrap();
        let table = table();
        for &(pos, len) in &[
            (0u64, 1usize),
            (0, 256),
            (3, 3),
            (255, 2),
            (256, 5),
            (300, 700),
            (511, 1),
            (1000, 3000),
        ] {
            let out = read_block(&mut file, pos, len, &table).unwrap();
            assert_eq!(
                out,
                &data[pos as usize..pos as usize + len],
                "mismatch for pos={} len={}",
                pos,
                len
            );
        }
    }

    #[test]
    fn short_file_surfaces_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.mb");
        std::fs::write(&path, reference_bytes(100)).unwrap();

        let mut file = File::open(&path).unwrap();
        let err = read_block(&mut file, 0, 50, &table()).unwrap_err();
        assert!(err.downcast_ref::<BlobError>().is_some());
    }

    struct XorDecryptor(u8);

    impl BlockDecryptor for XorDecryptor {
        fn decrypt(&self, buf: &mut [u8], _file_offset: u64) -> Result<()> {
            for b in buf.iter_mut() {
                *b ^= self.0;
            }
            Ok(())
        }
    }

    #[test]
    fn encrypted_read_decrypts_whole_blocks_before_slicing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.mb");
        let plain = reference_bytes(1024);
        let cipher: Vec<u8> = plain.iter().map(|b| b ^ 0x5A).collect();
        let mut f = File::create(&path).unwrap();
        f.write_all(&cipher).unwrap();
        drop(f);

        let table = TableDescriptor::new("t.db", Vec::new())
            .with_decryptor(Arc::new(XorDecryptor(0x5A)));

        let mut file = File::open(&path).unwrap();
        let out = read_block(&mut file, 300, 100, &table).unwrap();
        assert_eq!(out, &plain[300..400]);
    }
}
