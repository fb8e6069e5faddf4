//! # Code Page Mapping
//!
//! Table headers store the text charset as a DOS/Windows code page number.
//! This module maps the code pages that have an exact charset equivalent to
//! an [`encoding_rs::Encoding`] handle.
//!
//! OEM code pages without a charset equivalent in the encoding set shipped
//! with `encoding_rs` (437, 850, 852, and friends) return `None`; callers
//! fall back to the default table charset, windows-1252, which matches how
//! later tools on Windows read these tables.

use encoding_rs::Encoding;

/// Maps a stored code page number to a charset handle.
///
/// Returns `None` for code pages with no exact equivalent; the caller
/// decides the fallback.
pub fn codepage_encoding(codepage: u16) -> Option<&'static Encoding> {
    let label: &[u8] = match codepage {
        866 => b"ibm866",
        874 => b"windows-874",
        932 => b"shift_jis",
        936 => b"gbk",
        949 => b"euc-kr",
        950 => b"big5",
        1250 => b"windows-1250",
        1251 => b"windows-1251",
        1252 => b"windows-1252",
        1253 => b"windows-1253",
        1254 => b"windows-1254",
        1255 => b"windows-1255",
        1256 => b"windows-1256",
        1257 => b"windows-1257",
        1258 => b"windows-1258",
        _ => return None,
    };
    Encoding::for_label(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_codepages_resolve() {
        assert_eq!(codepage_encoding(1252), Some(encoding_rs::WINDOWS_1252));
        assert_eq!(codepage_encoding(1251), Some(encoding_rs::WINDOWS_1251));
        assert_eq!(codepage_encoding(866), Some(encoding_rs::IBM866));
    }

    #[test]
    fn oem_codepages_without_equivalent_return_none() {
        assert_eq!(codepage_encoding(437), None);
        assert_eq!(codepage_encoding(850), None);
        assert_eq!(codepage_encoding(852), None);
    }
}
