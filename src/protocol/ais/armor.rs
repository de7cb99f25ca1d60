//! Six-bit ASCII armoring of AIS payloads and the ITU text alphabet.
use alloc::string::String;

use crate::error::AisError;
use crate::infra::codec::bits::BitVector;

/// Armor character to its 6-bit value.
///
/// Valid characters are `0`..=`W` and `` ` ``..=`w`.
pub fn decode_six_bit_char(ch: u8) -> Result<u8, AisError> {
    match ch {
        b'0'..=b'W' | b'`'..=b'w' => {
            let value = ch - 48;
            Ok(if value > 40 { value - 8 } else { value })
        }
        _ => Err(AisError::InvalidArmor { ch }),
    }
}

/// 6-bit value (low six bits of `value`) to its armor character.
pub fn encode_six_bit_char(value: u8) -> u8 {
    let value = value & 0x3F;
    if value < 40 {
        value + 48
    } else {
        value + 56
    }
}

/// Unpack an armored payload. The last `fill_bits` bits are padding and are dropped.
pub fn armor_to_bits(text: &str, fill_bits: u8) -> Result<BitVector, AisError> {
    if fill_bits > 5 {
        return Err(AisError::InvalidFillBits { fill: fill_bits });
    }
    let mut bits = BitVector::new();
    for ch in text.bytes() {
        bits.push_bits(decode_six_bit_char(ch)? as u64, 6);
    }
    let len = bits.len().saturating_sub(fill_bits as usize);
    bits.truncate(len);
    Ok(bits)
}

/// Pack bits into armor characters. Returns the text and the number of
/// zero bits added to reach a 6-bit boundary.
pub fn bits_to_armor(bits: &BitVector) -> (String, u8) {
    let fill = (6 - bits.len() % 6) % 6;
    let mut padded = bits.clone();
    for _ in 0..fill {
        padded.push(false);
    }
    let text = (0..padded.len() / 6)
        .map(|i| {
            let value = padded.get_integer(i * 6, 6).unwrap_or(0) as u8;
            encode_six_bit_char(value) as char
        })
        .collect();
    (text, fill as u8)
}

//==================================================================================TEXT
fn text_char(value: u8) -> char {
    let value = value & 0x3F;
    if value < 32 {
        (value + 64) as char
    } else {
        value as char
    }
}

fn text_value(ch: char) -> u8 {
    let ch = ch.to_ascii_uppercase();
    match ch as u32 {
        code @ 64..=95 => (code - 64) as u8,
        code @ 32..=63 => code as u8,
        _ => b'?',
    }
}

/// Up to `chars` ITU characters from `start`, stopping at the end of the
/// vector. Trailing `@` and spaces are trimmed; `None` when nothing is left.
pub fn get_string(bits: &BitVector, start: usize, chars: usize) -> Option<String> {
    let available = bits.len().saturating_sub(start) / 6;
    let text: String = (0..chars.min(available))
        .filter_map(|i| bits.get_integer(start + i * 6, 6).ok())
        .map(|value| text_char(value as u8))
        .collect();
    let trimmed = text.trim_end_matches(&['@', ' '][..]);
    (!trimmed.is_empty()).then(|| String::from(trimmed))
}

/// Write exactly `chars` ITU characters at `start`, padding with `@`.
pub fn insert_string(bits: &mut BitVector, start: usize, chars: usize, text: &str) {
    let mut values = text.chars().map(text_value);
    for i in 0..chars {
        let value = values.next().unwrap_or(0);
        bits.insert_integer(start + i * 6, 6, value as u64);
    }
}
