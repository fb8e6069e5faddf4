//! # Record Decoding
//!
//! This module turns fixed-width record buffers into typed values. A record
//! holds one field slot per schema field, laid out contiguously in schema
//! order; a monotonic cursor walks the buffer as fields decode.
//!
//! ## Record Binary Layout
//!
//! ```text
//! +-------------+-------------+--------------------+-------------+
//! | field 0     | field 1     | field 2 (LOB slot) | field 3     |
//! | fixed bytes | fixed bytes | leader + pointer   | fixed bytes |
//! +-------------+-------------+--------------------+-------------+
//! ```
//!
//! Scalar slots hold the encoded value itself; LOB slots hold an inline
//! leader plus a 10-byte pointer into the companion blob file.
//!
//! ## Module Structure
//!
//! - `cursor`: monotonic read cursor over one record buffer
//! - `scalar`: stateless per-type byte decoders
//! - `calendar`: serial-day-number to Gregorian conversion
//! - `decode`: per-field dispatch and the row decoding loop

mod calendar;
mod cursor;
mod decode;
mod scalar;


pub use calendar::{civil_from_days, days_from_civil};
pub use cursor::RecordCursor;
pub use decode::{decode_field, decode_record};
pub use scalar::{
    bcd_value, decode_alpha, decode_auto_increment, decode_bcd_text, decode_bytes, decode_date,
    decode_logical, decode_long, decode_number, decode_short, decode_time, decode_timestamp,
};
