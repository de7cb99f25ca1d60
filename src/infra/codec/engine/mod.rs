//! Generic serialization/deserialization engine driven by static PGN descriptors.
//! It drives the bit-level reader/writer and converts between raw payloads and
//! [`FieldSet`]s, applying resolutions and the N2K "not available" convention.
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use super::bits::{sign_extend, BitReader, BitWriter};
use super::sentinel::{is_signed_sentinel, is_unsigned_sentinel, signed_sentinel, unsigned_sentinel};
use crate::core::{FieldDescriptor, FieldKind, FieldSet, PgnDescriptor, PgnValue, MAX_PGN_BYTES};
use crate::error::{DeserializationError, SerializationError};

/// Deserializes a payload into a [`FieldSet`].
///
/// Fields carrying their sentinel are left out of the set. The payload must
/// cover every fixed-width field of the layout; extra trailing bytes are ignored.
pub fn deserialize(
    payload: &[u8],
    descriptor: &'static PgnDescriptor,
) -> Result<FieldSet, DeserializationError> {
    let needed_bits = descriptor.fixed_bits();
    if payload.len() * 8 < needed_bits {
        return Err(DeserializationError::InvalidDataLength {
            expected: needed_bits.div_ceil(8),
            actual: payload.len(),
        });
    }

    let mut reader = BitReader::new(payload);
    let mut fields = FieldSet::new();

    for field in descriptor.fields {
        if let Some(value) = read_field_value(&mut reader, field)? {
            fields.insert(field.id, value);
        }
    }

    Ok(fields)
}

/// Serializes a [`FieldSet`] according to `descriptor`.
///
/// Missing fields are written as their sentinel, reserved bits as ones and
/// spare bits as zeros. The result is cut (or padded with 0xFF) to the
/// descriptor's fixed length when it has one.
pub fn serialize(
    fields: &FieldSet,
    descriptor: &'static PgnDescriptor,
) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = vec![0xFFu8; MAX_PGN_BYTES];
    let mut writer = BitWriter::new(&mut buffer);

    for field in descriptor.fields {
        write_field(&mut writer, field, fields.get(field.id))?;
    }

    let written = writer.bit_cursor().div_ceil(8);
    let len = descriptor
        .length
        .map(|l| l as usize)
        .unwrap_or(written)
        .min(MAX_PGN_BYTES);
    buffer.truncate(len);
    Ok(buffer)
}

/// Scale a physical value to its raw integer, rounding half away from zero.
pub fn to_raw(value: f64, resolution: f64) -> Option<i64> {
    round_half_away(value / resolution)
}

/// `f64 -> i64` rounding available without `std`.
pub fn round_half_away(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let shifted = if value >= 0.0 { value + 0.5 } else { value - 0.5 };
    if !(-9.2e18..=9.2e18).contains(&shifted) {
        return None;
    }
    Some(shifted as i64)
}

//==================================================================================READ
fn read_field_value(
    reader: &mut BitReader,
    field: &'static FieldDescriptor,
) -> Result<Option<PgnValue>, DeserializationError> {
    let bits = field.bits_length;
    let reader_err = |err| DeserializationError::BitReaderError { err };

    match field.kind {
        FieldKind::Number
        | FieldKind::Lookup
        | FieldKind::Pgn
        | FieldKind::Date
        | FieldKind::Time
        | FieldKind::Mmsi => {
            if !(1..=64).contains(&bits) {
                return Err(DeserializationError::InvalidFieldBits {
                    field_name: field.id,
                });
            }
            let raw = reader.read_u64(bits as u8).map_err(reader_err)?;

            if field.is_signed {
                let value = sign_extend(raw, bits);
                if is_signed_sentinel(value, bits) {
                    return Ok(None);
                }
                Ok(Some(match field.resolution {
                    Some(res) => PgnValue::F64(value as f64 * res),
                    None => PgnValue::I64(value),
                }))
            } else {
                if is_unsigned_sentinel(raw, bits) {
                    return Ok(None);
                }
                Ok(Some(match field.resolution {
                    Some(res) => PgnValue::F64(raw as f64 * res),
                    None => PgnValue::U64(raw),
                }))
            }
        }

        FieldKind::Reserved | FieldKind::Spare => {
            reader.advance(bits as usize).map_err(reader_err)?;
            Ok(None)
        }

        FieldKind::StringFix => {
            if bits % 8 != 0 {
                return Err(DeserializationError::InvalidFieldBits {
                    field_name: field.id,
                });
            }
            let mut raw = Vec::with_capacity(bits as usize / 8);
            for _ in 0..bits / 8 {
                raw.push(reader.read_u8(8).map_err(reader_err)?);
            }
            Ok(decode_ascii(&raw).map(PgnValue::Text))
        }

        FieldKind::StringLau => {
            let total_len = reader.read_u8(8).map_err(reader_err)? as usize;
            if total_len < 2 {
                return Ok(None);
            }
            let encoding = reader.read_u8(8).map_err(reader_err)?;
            let body = reader.read_slice(total_len - 2).map_err(reader_err)?;
            let text = if encoding == 0 {
                decode_utf16le(body)
            } else {
                decode_ascii(body)
            };
            Ok(text.map(PgnValue::Text))
        }

        FieldKind::Binary => {
            if bits % 8 != 0 {
                return Err(DeserializationError::InvalidFieldBits {
                    field_name: field.id,
                });
            }
            let len = if bits == 0 {
                reader.remaining_bits() / 8
            } else {
                bits as usize / 8
            };
            let slice = reader.read_slice(len).map_err(reader_err)?;
            Ok(Some(PgnValue::Bytes(slice.to_vec())))
        }
    }
}

fn is_padding(byte: u8) -> bool {
    matches!(byte, 0x00 | 0xFF | b'@' | b' ')
}

/// ASCII with trailing padding removed; `None` when nothing is left.
fn decode_ascii(raw: &[u8]) -> Option<String> {
    let end = raw.iter().rposition(|b| !is_padding(*b))? + 1;
    Some(
        raw[..end]
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect(),
    )
}

fn decode_utf16le(raw: &[u8]) -> Option<String> {
    let units = raw.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    let text: String = char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    let trimmed = text.trim_end_matches(&['\0', ' ', '@'][..]);
    (!trimmed.is_empty()).then(|| String::from(trimmed))
}

//==================================================================================WRITE
fn write_field(
    writer: &mut BitWriter,
    field: &'static FieldDescriptor,
    value: Option<&PgnValue>,
) -> Result<(), SerializationError> {
    let bits = field.bits_length;
    let writer_err = |err| SerializationError::BitWriteError { err };

    match field.kind {
        FieldKind::Number
        | FieldKind::Lookup
        | FieldKind::Pgn
        | FieldKind::Date
        | FieldKind::Time
        | FieldKind::Mmsi => {
            if !(1..=64).contains(&bits) {
                return Err(SerializationError::InvalidFieldBits {
                    field_name: field.id,
                });
            }
            let raw = match value {
                None => absent_raw(field),
                Some(value) => present_raw(field, value)?,
            };
            writer.write_u64(raw, bits as u8).map_err(writer_err)
        }

        FieldKind::Reserved => writer.fill(bits as usize, true).map_err(writer_err),
        FieldKind::Spare => writer.fill(bits as usize, false).map_err(writer_err),

        FieldKind::StringFix => {
            let width = bits as usize / 8;
            let Some(value) = value else {
                return writer.advance(bits as usize).map_err(writer_err);
            };
            let text = as_text(field, value)?;
            let mut encoded = encode_ascii(text);
            encoded.truncate(width);
            encoded.resize(width, b'@');
            for byte in encoded {
                writer.write_u8(byte, 8).map_err(writer_err)?;
            }
            Ok(())
        }

        FieldKind::StringLau => {
            let (encoding, body) = match value {
                None => (1u8, Vec::new()),
                Some(value) => {
                    let text = as_text(field, value)?;
                    if text.is_ascii() {
                        (1, encode_ascii(text))
                    } else {
                        (0, text.encode_utf16().flat_map(u16::to_le_bytes).collect())
                    }
                }
            };
            let total = u8::try_from(body.len() + 2).map_err(|_| {
                SerializationError::ValueOutOfRange { field_id: field.id }
            })?;
            writer.write_u8(total, 8).map_err(writer_err)?;
            writer.write_u8(encoding, 8).map_err(writer_err)?;
            writer.write_slice(&body).map_err(writer_err)
        }

        FieldKind::Binary => match value {
            None => writer.advance(bits as usize).map_err(writer_err),
            Some(PgnValue::Bytes(bytes)) => {
                if bits != 0 && bytes.len() > bits as usize / 8 {
                    return Err(SerializationError::ValueOutOfRange { field_id: field.id });
                }
                writer.write_slice(bytes).map_err(writer_err)?;
                let padding = (bits as usize).saturating_sub(bytes.len() * 8);
                writer.advance(padding).map_err(writer_err)
            }
            Some(_) => Err(SerializationError::TypeMismatch { field_id: field.id }),
        },
    }
}

/// Raw bits written for a missing numeric field.
fn absent_raw(field: &FieldDescriptor) -> u64 {
    let bits = field.bits_length;
    if bits < 2 {
        0
    } else if field.is_signed {
        signed_sentinel(bits) as u64 & unsigned_sentinel(bits)
    } else {
        unsigned_sentinel(bits)
    }
}

/// Raw bits for a present numeric field, rejecting values that collide with
/// the sentinel or do not fit.
fn present_raw(field: &'static FieldDescriptor, value: &PgnValue) -> Result<u64, SerializationError> {
    let bits = field.bits_length;
    let out_of_range = SerializationError::ValueOutOfRange { field_id: field.id };

    let scaled: i128 = match (field.resolution, value) {
        (_, PgnValue::Text(_) | PgnValue::Bytes(_)) => {
            return Err(SerializationError::TypeMismatch { field_id: field.id })
        }
        (Some(res), v) => to_raw(as_f64(v), res).ok_or(out_of_range.clone())? as i128,
        (None, PgnValue::F64(v)) => round_half_away(*v).ok_or(out_of_range.clone())? as i128,
        (None, PgnValue::U64(v)) => *v as i128,
        (None, PgnValue::I64(v)) => *v as i128,
    };

    if field.is_signed {
        let max = if bits >= 2 {
            signed_sentinel(bits) as i128 - 1
        } else {
            0
        };
        let min = -(1i128 << (bits - 1));
        if scaled < min || scaled > max {
            return Err(out_of_range);
        }
        Ok(scaled as i64 as u64 & unsigned_sentinel(bits))
    } else {
        let max = if bits >= 2 {
            unsigned_sentinel(bits) as i128 - 1
        } else {
            1
        };
        if scaled < 0 || scaled > max {
            return Err(out_of_range);
        }
        Ok(scaled as u64)
    }
}

fn as_f64(value: &PgnValue) -> f64 {
    match value {
        PgnValue::F64(v) => *v,
        PgnValue::U64(v) => *v as f64,
        PgnValue::I64(v) => *v as f64,
        PgnValue::Text(_) | PgnValue::Bytes(_) => f64::NAN,
    }
}

fn as_text<'v>(field: &'static FieldDescriptor, value: &'v PgnValue) -> Result<&'v str, SerializationError> {
    match value {
        PgnValue::Text(text) => Ok(text.as_str()),
        _ => Err(SerializationError::TypeMismatch { field_id: field.id }),
    }
}

fn encode_ascii(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}
