//! Bit-level access to binary payloads.
//!
//! NMEA 2000 packs fields least significant bit first ([`BitReader`] /
//! [`BitWriter`]), while AIS packs them most significant bit first inside a
//! growable [`BitVector`]. Both sides share the same error types.
use alloc::vec::Vec;

use crate::error::{BitReaderError, BitWriterError};

/// Reader extracting LSB-first bit segments from a `&[u8]` without copying.
pub struct BitReader<'a> {
    buffer: &'a [u8],
    /// Number of bits consumed from the beginning.
    bit_cursor: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    /// Bits left before the end of the buffer.
    pub fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.bit_cursor
    }

    fn ensure_available(&self, asked: usize) -> Result<(), BitReaderError> {
        let available = self.remaining_bits();
        if asked > available {
            return Err(BitReaderError::OutOfBounds { asked, available });
        }
        Ok(())
    }

    /// Read `num_bits` bits (1..=64) starting at the cursor.
    pub fn read_u64(&mut self, num_bits: u8) -> Result<u64, BitReaderError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitReaderError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }
        self.ensure_available(num_bits as usize)?;

        let mut result: u64 = 0;
        let mut bits_read: usize = 0;
        let wanted = num_bits as usize;

        while bits_read < wanted {
            let position = self.bit_cursor + bits_read;
            let byte = self.buffer[position / 8];
            let offset = position % 8;

            let chunk = (8 - offset).min(wanted - bits_read);
            let mask = ((1u16 << chunk) - 1) as u8;
            result |= (((byte >> offset) & mask) as u64) << bits_read;

            bits_read += chunk;
        }
        self.bit_cursor += wanted;
        Ok(result)
    }

    pub fn read_u8(&mut self, num_bits: u8) -> Result<u8, BitReaderError> {
        if num_bits > 8 {
            return Err(BitReaderError::TooLongForType {
                max: 8,
                asked: num_bits,
            });
        }
        self.read_u64(num_bits).map(|val| val as u8)
    }

    /// Skip `length` bits.
    pub fn advance(&mut self, length: usize) -> Result<(), BitReaderError> {
        self.ensure_available(length)?;
        self.bit_cursor += length;
        Ok(())
    }

    /// Borrow `len` bytes from the cursor, which must sit on a byte boundary.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], BitReaderError> {
        if self.bit_cursor % 8 != 0 {
            return Err(BitReaderError::NonAlignedBit {
                cursor: self.bit_cursor,
            });
        }
        self.ensure_available(len * 8)?;

        let start = self.bit_cursor / 8;
        self.bit_cursor += len * 8;
        Ok(&self.buffer[start..start + len])
    }
}
//==================================================================================BITWRITER

/// Writer laying LSB-first bit segments into a `&mut [u8]`.
pub struct BitWriter<'a> {
    buffer: &'a mut [u8],
    bit_cursor: usize,
}

impl<'a> BitWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Position in bits (used to derive the final payload length).
    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    fn ensure_capacity(&self, asked: usize) -> Result<(), BitWriterError> {
        let available = self.buffer.len() * 8 - self.bit_cursor;
        if asked > available {
            return Err(BitWriterError::OutOfBounds { asked, available });
        }
        Ok(())
    }

    /// Write the low `num_bits` bits (1..=64) of `value`.
    pub fn write_u64(&mut self, value: u64, num_bits: u8) -> Result<(), BitWriterError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitWriterError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }
        self.ensure_capacity(num_bits as usize)?;

        let mut remaining_value = value;
        let mut written: usize = 0;
        let wanted = num_bits as usize;

        while written < wanted {
            let position = self.bit_cursor + written;
            let index = position / 8;
            let offset = position % 8;

            let chunk = (8 - offset).min(wanted - written);
            let mask = ((1u16 << chunk) - 1) as u8;
            self.buffer[index] &= !(mask << offset);
            self.buffer[index] |= (remaining_value as u8 & mask) << offset;
            remaining_value = remaining_value.checked_shr(chunk as u32).unwrap_or(0);

            written += chunk;
        }

        self.bit_cursor += wanted;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8, num_bits: u8) -> Result<(), BitWriterError> {
        if num_bits > 8 {
            return Err(BitWriterError::TooLongForType {
                max: 8,
                asked: num_bits,
            });
        }
        self.write_u64(value as u64, num_bits)
    }

    /// Fill `length` bits with a constant bit value (reserved = ones, spare = zeros).
    pub fn fill(&mut self, length: usize, ones: bool) -> Result<(), BitWriterError> {
        self.ensure_capacity(length)?;
        let pattern = if ones { u64::MAX } else { 0 };
        let mut left = length;
        while left > 0 {
            let chunk = left.min(64);
            self.write_u64(pattern, chunk as u8)?;
            left -= chunk;
        }
        Ok(())
    }

    /// Skip `length` bits, leaving the buffer content untouched.
    pub fn advance(&mut self, length: usize) -> Result<(), BitWriterError> {
        self.ensure_capacity(length)?;
        self.bit_cursor += length;
        Ok(())
    }

    /// Copy a byte slice; the cursor must sit on a byte boundary.
    pub fn write_slice(&mut self, slice: &[u8]) -> Result<(), BitWriterError> {
        if self.bit_cursor % 8 != 0 {
            return Err(BitWriterError::NonAlignedBit {
                cursor: self.bit_cursor,
            });
        }
        self.ensure_capacity(slice.len() * 8)?;
        let start = self.bit_cursor / 8;
        self.buffer[start..start + slice.len()].copy_from_slice(slice);
        self.bit_cursor += slice.len() * 8;
        Ok(())
    }
}

//==================================================================================BITVECTOR
/// Growable MSB-first bit sequence, the working representation of an AIS payload.
///
/// Bit 0 is the most significant bit of the first byte. Inserting past the end
/// grows the vector with zero bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitVector {
    bytes: Vec<u8>,
    len: usize,
}

impl BitVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vector of `len` zero bits.
    pub fn zeroed(len: usize) -> Self {
        let mut bytes = Vec::new();
        bytes.resize(len.div_ceil(8), 0);
        Self { bytes, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Shorten to `len` bits; no-op when already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
            self.bytes.truncate(len.div_ceil(8));
            if len % 8 != 0 {
                if let Some(last) = self.bytes.last_mut() {
                    *last &= 0xFFu8 << (8 - len % 8);
                }
            }
        }
    }

    fn grow_to(&mut self, len: usize) {
        if len > self.len {
            self.bytes.resize(len.div_ceil(8), 0);
            self.len = len;
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    fn set(&mut self, index: usize, bit: bool) {
        self.grow_to(index + 1);
        let mask = 0x80 >> (index % 8);
        if bit {
            self.bytes[index / 8] |= mask;
        } else {
            self.bytes[index / 8] &= !mask;
        }
    }

    pub fn push(&mut self, bit: bool) {
        let index = self.len;
        self.set(index, bit);
    }

    /// Append the low `length` bits of `value`, most significant first.
    pub fn push_bits(&mut self, value: u64, length: usize) {
        let start = self.len;
        self.insert_integer(start, length, value);
    }

    /// Unsigned MSB-first extraction of `length` (1..=64) bits at `start`.
    pub fn get_integer(&self, start: usize, length: usize) -> Result<u64, BitReaderError> {
        if !(1..=64).contains(&length) {
            return Err(BitReaderError::TooLongForType {
                max: 64,
                asked: length.min(u8::MAX as usize) as u8,
            });
        }
        if start + length > self.len {
            return Err(BitReaderError::OutOfBounds {
                asked: length,
                available: self.len.saturating_sub(start),
            });
        }
        let mut value = 0u64;
        for index in start..start + length {
            let bit = self.bytes[index / 8] & (0x80 >> (index % 8)) != 0;
            value = (value << 1) | bit as u64;
        }
        Ok(value)
    }

    /// Two's complement extraction.
    pub fn get_signed(&self, start: usize, length: usize) -> Result<i64, BitReaderError> {
        let raw = self.get_integer(start, length)?;
        Ok(sign_extend(raw, length as u32))
    }

    /// Write the low `length` bits of `value` at `start`, growing as needed.
    pub fn insert_integer(&mut self, start: usize, length: usize, value: u64) {
        for offset in 0..length {
            let shift = length - 1 - offset;
            let bit = shift < 64 && (value >> shift) & 1 == 1;
            self.set(start + offset, bit);
        }
    }

    pub fn insert_signed(&mut self, start: usize, length: usize, value: i64) {
        self.insert_integer(start, length, value as u64);
    }

    /// Packed bytes; the trailing partial byte is zero padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Interpret the low `bits` bits of `value` as a two's complement integer.
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    if bits == 0 || bits >= 64 {
        return value as i64;
    }
    let sign_bit = 1u64 << (bits - 1);
    if value & sign_bit != 0 {
        (value | (u64::MAX << bits)) as i64
    } else {
        value as i64
    }
}
