//! # Scalar Field Codecs
//!
//! Stateless decoders for the fixed-size field encodings. All scalar fields
//! are stored big-endian with bit-level tricks chosen so that the raw bytes
//! sort in numeric order; an index can therefore compare records with
//! `memcmp`. The tricks must be reproduced exactly: a wrong mask or flip
//! produces a wrong value, not a crash.
//!
//! ## Encodings
//!
//! | Type | Size | Rule | Null |
//! |------|------|------|------|
//! | Short | 2 | BE u16 XOR 0x8000 as two's complement | −32768 |
//! | Long | 4 | BE u32 masked with 0x7FFFFFFF (top bit is a flag) | none |
//! | AutoIncrement | 4 | BE u32 masked to the low 28 bits | none |
//! | Number | 8 | sign-magnitude: top bit set ⇒ clear it; else complement all bits; reinterpret as f64 | none |
//! | Logical | 1 | −127 ⇒ true, −128 ⇒ false | other |
//! | Date | 4 | BE day count (28 bits) + 1,721,425 ⇒ serial day number | none |
//! | Time | 4 | BE ms since midnight | 0 |
//! | Timestamp | 8 | Number unpack ⇒ ms since year 1 − shift ⇒ 1970 epoch | none |
//! | Bcd | 17 | packed decimal, ones'-complemented tail when negative | byte0 == 0 |
//! | Bytes | n | raw copy | all zero |
//! | Alpha | n | trim trailing NULs, charset-decode | empty |

use std::borrow::Cow;

use encoding_rs::Encoding;
use eyre::{Result, WrapErr};
use smallvec::SmallVec;

use super::calendar::civil_from_days;
use crate::config::{
    AUTO_INCREMENT_MASK, BCD_MAX_PRECISION, BCD_SIZE, DAY_COUNT_MASK, LONG_MASK, SDN_OFFSET,
    SHORT_SIGN_FLIP, TIMESTAMP_EPOCH_SHIFT_MS, UNIX_EPOCH_SDN,
};
use crate::types::Value;

/// Decodes a Short: high-bit-inverted two's complement, so raw unsigned
/// bytes sort in numeric order. The minimum value is the null sentinel.
pub fn decode_short(raw: [u8; 2]) -> Option<i16> {
    let value = (u16::from_be_bytes(raw) ^ SHORT_SIGN_FLIP) as i16;
    if value == i16::MIN {
        None
    } else {
        Some(value)
    }
}

/// Decodes a Long. The top bit is a reserved flag, not a sign bit.
pub fn decode_long(raw: [u8; 4]) -> i64 {
    i64::from(u32::from_be_bytes(raw) & LONG_MASK)
}

/// Decodes an auto-increment counter from its low 28 bits.
pub fn decode_auto_increment(raw: [u8; 4]) -> i64 {
    i64::from(u32::from_be_bytes(raw) & AUTO_INCREMENT_MASK)
}

/// Decodes a Number: ones'-complement sign-magnitude over the IEEE-754 bit
/// pattern. A set top bit marks a non-negative value whose magnitude is the
/// remaining 63 bits; a clear top bit means all 64 bits are complemented.
pub fn decode_number(raw: [u8; 8]) -> f64 {
    let bits = u64::from_be_bytes(raw);
    let bits = if bits & 0x8000_0000_0000_0000 != 0 {
        bits & 0x7FFF_FFFF_FFFF_FFFF
    } else {
        !bits
    };
    f64::from_bits(bits)
}

/// Decodes a Logical byte.
pub fn decode_logical(raw: u8) -> Option<bool> {
    match raw as i8 {
        -127 => Some(true),
        -128 => Some(false),
        _ => None,
    }
}

/// Decodes a Date into a proleptic Gregorian (year, month, day).
pub fn decode_date(raw: [u8; 4]) -> (i32, u8, u8) {
    let days = i64::from(u32::from_be_bytes(raw) & DAY_COUNT_MASK);
    let sdn = days + SDN_OFFSET;
    civil_from_days(sdn - UNIX_EPOCH_SDN)
}

/// Decodes a Time as milliseconds since local midnight; zero is null.
pub fn decode_time(raw: [u8; 4]) -> Option<u32> {
    let ms = u32::from_be_bytes(raw);
    if ms == 0 {
        None
    } else {
        Some(ms)
    }
}

/// Decodes a Timestamp to milliseconds since the 1970 epoch. The stored
/// value uses the Number bit-unpacking and counts milliseconds since year 1.
pub fn decode_timestamp(raw: [u8; 8]) -> i64 {
    let ms = decode_number(raw);
    (ms - TIMESTAMP_EPOCH_SHIFT_MS) as i64
}

/// Decodes a packed-decimal (BCD) field to its decimal text form, or `None`
/// when the leading byte marks the value null.
///
/// The sign lives in the high bit of byte 0: clear means negative, in which
/// case the 16 digit bytes are ones'-complemented. Each digit byte packs two
/// base-10 digits, high nibble first. `precision` is the number of digits
/// after the decimal point.
pub fn decode_bcd_text(raw: &[u8], precision: u8) -> Option<String> {
    debug_assert_eq!(raw.len(), BCD_SIZE);
    if raw[0] == 0 {
        return None;
    }
    let negative = raw[0] & 0x80 == 0;

    let mut digits: SmallVec<[u8; BCD_MAX_PRECISION as usize]> = SmallVec::new();
    for &byte in &raw[1..BCD_SIZE] {
        let byte = if negative { byte ^ 0xFF } else { byte };
        digits.push(b'0' + (byte >> 4));
        digits.push(b'0' + (byte & 0x0F));
    }

    let mut text: String = digits.iter().map(|&d| d as char).collect();
    if precision >= BCD_MAX_PRECISION {
        text.insert_str(0, "0.");
    } else {
        text.insert(text.len() - precision as usize, '.');
        if precision == 0 {
            text.push('0');
        }
    }

    // Strip leading zero digits but keep one before a decimal point.
    let bytes = text.as_bytes();
    let mut start = 0;
    while start + 1 < bytes.len() && bytes[start] == b'0' && bytes[start + 1] != b'.' {
        start += 1;
    }
    let mut text = text.split_off(start);
    if negative {
        text.insert(0, '-');
    }
    Some(text)
}

/// Converts BCD decimal text to a value: an exact decimal by default, or a
/// binary floating value when the table requests BCD rounding.
pub fn bcd_value(text: &str, rounding: bool) -> Result<Value<'static>> {
    if rounding {
        let value: f64 = text
            .parse()
            .wrap_err_with(|| format!("invalid packed-decimal text '{}'", text))?;
        return Ok(Value::Double(value));
    }

    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

    let mut digits: i128 = 0;
    for ch in int_part.chars().chain(frac_part.chars()) {
        let digit = ch
            .to_digit(10)
            .ok_or_else(|| eyre::eyre!("invalid packed-decimal digit '{}' in '{}'", ch, text))?;
        digits = digits * 10 + i128::from(digit);
    }
    if negative {
        digits = -digits;
    }

    Ok(Value::Decimal {
        digits,
        scale: frac_part.len() as u8,
    })
}

/// Decodes a fixed Bytes field; an all-zero buffer is null.
pub fn decode_bytes(raw: &[u8]) -> Option<&[u8]> {
    if raw.iter().all(|&b| b == 0) {
        None
    } else {
        Some(raw)
    }
}

/// Decodes an Alpha field: trailing NUL padding is trimmed and the rest is
/// interpreted in the table charset. An empty result is null.
pub fn decode_alpha<'a>(raw: &'a [u8], charset: &'static Encoding) -> Option<Cow<'a, str>> {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let trimmed = &raw[..end];
    if trimmed.is_empty() {
        return None;
    }
    let (text, _) = charset.decode_without_bom_handling(trimmed);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
