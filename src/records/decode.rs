//! # Per-Field Dispatch
//!
//! `decode_field` is the single entry point that turns the next field slot
//! of a record into a typed [`Value`]. It owns the "read N bytes, advance
//! cursor" contract shared by every field: the slot is taken from the
//! cursor exactly once, and no codec sees bytes beyond the field's declared
//! size.
//!
//! Dispatch is an exhaustive `match` over the closed [`FieldType`] set, so
//! supporting a new type tag is a compile-time-checked change. Scalar types
//! convert in place; LOB types parse the slot as a leader + pointer and
//! delegate to [`crate::blob`], after which textual kinds charset-decode the
//! returned bytes.
//!
//! A decoding failure aborts the current row: values are never silently
//! skipped or defaulted, because a wrong value is worse than no row on a
//! read-only path with no repair option. Null is a valid outcome and is
//! never an error.

use std::borrow::Cow;

use eyre::{ensure, Result, WrapErr};

use super::cursor::RecordCursor;
use super::scalar;
use crate::blob::{self, LobKind, LobPointer};
use crate::schema::{FieldDescriptor, TableDescriptor};
use crate::types::{FieldType, Value};

/// Decodes the next field of the record under the cursor.
pub fn decode_field<'a>(
    cursor: &mut RecordCursor<'a>,
    field: &FieldDescriptor,
    table: &TableDescriptor,
) -> Result<Value<'a>> {
    let field_type = field.field_type();
    if let Some(fixed) = field_type.fixed_size() {
        ensure!(
            field.size() == fixed,
            "field '{}' declares {} bytes but {:?} occupies {}",
            field.name(),
            field.size(),
            field_type,
            fixed
        );
    }

    let slot = cursor
        .take(field.size())
        .wrap_err_with(|| format!("field '{}' overruns the record buffer", field.name()))?;

    match field_type {
        FieldType::Alpha => Ok(match scalar::decode_alpha(slot, table.charset()) {
            Some(text) => Value::Text(text),
            None => Value::Null,
        }),
        FieldType::Date => {
            let raw: [u8; 4] = slot
                .try_into()
                .map_err(|_| eyre::eyre!("insufficient data for date field '{}'", field.name()))?;
            let (year, month, day) = scalar::decode_date(raw);
            Ok(Value::Date { year, month, day })
        }
        FieldType::Short => {
            let raw: [u8; 2] = slot
                .try_into()
                .map_err(|_| eyre::eyre!("insufficient data for short field '{}'", field.name()))?;
            Ok(match scalar::decode_short(raw) {
                Some(value) => Value::Int(i64::from(value)),
                None => Value::Null,
            })
        }
        FieldType::Long => {
            let raw: [u8; 4] = slot
                .try_into()
                .map_err(|_| eyre::eyre!("insufficient data for long field '{}'", field.name()))?;
            Ok(Value::Int(scalar::decode_long(raw)))
        }
        FieldType::AutoIncrement => {
            let raw: [u8; 4] = slot.try_into().map_err(|_| {
                eyre::eyre!("insufficient data for auto-increment field '{}'", field.name())
            })?;
            Ok(Value::Int(scalar::decode_auto_increment(raw)))
        }
        FieldType::Number | FieldType::Currency => {
            let raw: [u8; 8] = slot.try_into().map_err(|_| {
                eyre::eyre!("insufficient data for number field '{}'", field.name())
            })?;
            Ok(Value::Double(scalar::decode_number(raw)))
        }
        FieldType::Logical => Ok(match scalar::decode_logical(slot[0]) {
            Some(value) => Value::Bool(value),
            None => Value::Null,
        }),
        FieldType::Time => {
            let raw: [u8; 4] = slot
                .try_into()
                .map_err(|_| eyre::eyre!("insufficient data for time field '{}'", field.name()))?;
            Ok(match scalar::decode_time(raw) {
                Some(ms) => Value::Time(ms),
                None => Value::Null,
            })
        }
        FieldType::Timestamp => {
            let raw: [u8; 8] = slot.try_into().map_err(|_| {
                eyre::eyre!("insufficient data for timestamp field '{}'", field.name())
            })?;
            Ok(Value::Timestamp(scalar::decode_timestamp(raw)))
        }
        FieldType::Bcd => match scalar::decode_bcd_text(slot, field.precision()) {
            None => Ok(Value::Null),
            Some(text) => scalar::bcd_value(&text, table.bcd_rounding())
                .wrap_err_with(|| format!("field '{}' holds corrupt packed decimal", field.name())),
        },
        FieldType::Bytes => Ok(match scalar::decode_bytes(slot) {
            Some(bytes) => Value::Bytes(Cow::Borrowed(bytes)),
            None => Value::Null,
        }),
        FieldType::Memo
        | FieldType::FmtMemo
        | FieldType::Blob
        | FieldType::Ole
        | FieldType::Graphic => decode_lob(slot, field_type, table)
            .wrap_err_with(|| format!("failed to resolve LOB field '{}'", field.name())),
    }
}

/// Decodes every field of a record in schema order.
pub fn decode_record<'a>(record: &'a [u8], table: &TableDescriptor) -> Result<Vec<Value<'a>>> {
    let mut cursor = RecordCursor::new(record);
    let mut values = Vec::with_capacity(table.fields().len());
    for field in table.fields() {
        values.push(decode_field(&mut cursor, field, table)?);
    }
    Ok(values)
}

/// Parses a LOB slot and resolves it, converting textual kinds through the
/// table charset.
fn decode_lob<'a>(
    slot: &'a [u8],
    field_type: FieldType,
    table: &TableDescriptor,
) -> Result<Value<'a>> {
    let kind = LobKind::from_field_type(field_type)
        .ok_or_else(|| eyre::eyre!("{:?} is not a LOB field type", field_type))?;
    let pointer = LobPointer::parse(slot)?;

    let bytes = match blob::resolve(&pointer, kind, table)? {
        None => return Ok(Value::Null),
        Some(bytes) => bytes,
    };

    if field_type.is_textual() {
        let text = match bytes {
            Cow::Borrowed(raw) => table.charset().decode_without_bom_handling(raw).0,
            Cow::Owned(raw) => {
                let (text, _) = table.charset().decode_without_bom_handling(&raw);
                Cow::Owned(text.into_owned())
            }
        };
        Ok(Value::Text(text))
    } else {
        Ok(Value::Blob(bytes))
    }
}
