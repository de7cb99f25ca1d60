//! Defines the "data contract" between the static PGN tables and the
//! serialization/deserialization engine.
//!
//! Every supported PGN owns a static [`PgnDescriptor`]; the engine in
//! `infra::codec::engine` walks it to turn a payload into a [`FieldSet`] and back.
use alloc::string::String;
use alloc::vec::Vec;

/// Maximum payload a fast packet can carry once reassembled.
pub const MAX_PGN_BYTES: usize = 223;

/// Semantic type of a field within a PGN.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    /// Integer, optionally signed and scaled by a resolution.
    Number,
    /// Index into an enumeration.
    Lookup,
    /// Embedded Parameter Group Number (24 bits on the wire).
    Pgn,
    /// Day count since 1970-01-01. 16 bits.
    Date,
    /// Time since midnight UTC, 0.0001 s resolution. 32 bits.
    Time,
    /// Maritime Mobile Service Identity. 32 bits.
    Mmsi,
    /// Fixed-length ASCII string padded with `@`, space, NUL or 0xFF.
    StringFix,
    /// Variable-length string prefixed by length and encoding bytes (0 = UTF-16LE, 1 = ASCII).
    StringLau,
    /// Raw bytes; a zero bit length consumes the rest of the payload.
    Binary,
    /// Reserved bits, skipped on read and written as ones.
    Reserved,
    /// Spare bits, skipped on read and written as zeros.
    Spare,
}

/// Descriptor for a single PGN field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Field identifier used as key in a [`FieldSet`].
    pub id: &'static str,
    /// Semantic type.
    pub kind: FieldKind,
    /// Bit length on the wire (0 for variable-length fields).
    pub bits_length: u32,
    /// Two's complement encoding.
    pub is_signed: bool,
    /// Scale factor applied to the raw integer.
    pub resolution: Option<f64>,
}

impl FieldDescriptor {
    const fn base(id: &'static str, kind: FieldKind, bits_length: u32) -> Self {
        Self {
            id,
            kind,
            bits_length,
            is_signed: false,
            resolution: None,
        }
    }

    /// Unsigned integer field.
    pub const fn unsigned(id: &'static str, bits_length: u32) -> Self {
        Self::base(id, FieldKind::Number, bits_length)
    }

    /// Two's complement integer field.
    pub const fn signed(id: &'static str, bits_length: u32) -> Self {
        let mut field = Self::base(id, FieldKind::Number, bits_length);
        field.is_signed = true;
        field
    }

    /// Enumerated field.
    pub const fn lookup(id: &'static str, bits_length: u32) -> Self {
        Self::base(id, FieldKind::Lookup, bits_length)
    }

    pub const fn pgn(id: &'static str) -> Self {
        Self::base(id, FieldKind::Pgn, 24)
    }

    pub const fn date(id: &'static str) -> Self {
        Self::base(id, FieldKind::Date, 16)
    }

    pub const fn time(id: &'static str) -> Self {
        Self::base(id, FieldKind::Time, 32).scaled(0.0001)
    }

    pub const fn mmsi(id: &'static str) -> Self {
        Self::base(id, FieldKind::Mmsi, 32)
    }

    /// Fixed-length string of `bits_length / 8` characters.
    pub const fn string_fix(id: &'static str, bits_length: u32) -> Self {
        Self::base(id, FieldKind::StringFix, bits_length)
    }

    pub const fn string_lau(id: &'static str) -> Self {
        Self::base(id, FieldKind::StringLau, 0)
    }

    pub const fn binary(id: &'static str, bits_length: u32) -> Self {
        Self::base(id, FieldKind::Binary, bits_length)
    }

    pub const fn reserved(bits_length: u32) -> Self {
        Self::base("", FieldKind::Reserved, bits_length)
    }

    pub const fn spare(bits_length: u32) -> Self {
        Self::base("", FieldKind::Spare, bits_length)
    }

    /// Attach a resolution to a numeric field.
    pub const fn scaled(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }
}

/// Descriptor for an entire PGN layout.
#[derive(Debug)]
pub struct PgnDescriptor {
    /// PGN number.
    pub id: u32,
    /// Human readable name (diagnostics).
    pub name: &'static str,
    /// Default transmit priority.
    pub priority: u8,
    /// Fast packet or single frame.
    pub fastpacket: bool,
    /// Payload length in bytes when fixed; `None` for layouts ending with a variable field.
    pub length: Option<u16>,
    /// Ordered field list.
    pub fields: &'static [FieldDescriptor],
}

impl PgnDescriptor {
    /// Number of bits covered by the fixed part of the layout.
    pub fn fixed_bits(&self) -> usize {
        self.fields.iter().map(|f| f.bits_length as usize).sum()
    }
}

/// Dynamic value carried by a field.
#[derive(Debug, Clone, PartialEq)]
pub enum PgnValue {
    U64(u64),
    I64(i64),
    F64(f64),
    Text(String),
    Bytes(Vec<u8>),
}

//==================================================================================FIELD_SET
/// Decoded PGN content keyed by field identifier.
///
/// A field is either present with a usable value or missing. Sentinel
/// ("data not available") values never appear here: the engine drops them on
/// decode and writes them back for missing fields on encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    entries: Vec<(&'static str, PgnValue)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, PgnValue)> {
        self.entries.iter()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, id: &'static str, value: PgnValue) {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((id, value)),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<PgnValue> {
        let index = self.entries.iter().position(|(key, _)| *key == id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, id: &str) -> Option<&PgnValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    // Setters taking an `Option` leave the field missing on `None`.
    pub fn set_f64(&mut self, id: &'static str, value: Option<f64>) {
        if let Some(v) = value {
            self.insert(id, PgnValue::F64(v));
        }
    }

    pub fn set_u64(&mut self, id: &'static str, value: Option<u64>) {
        if let Some(v) = value {
            self.insert(id, PgnValue::U64(v));
        }
    }

    pub fn set_i64(&mut self, id: &'static str, value: Option<i64>) {
        if let Some(v) = value {
            self.insert(id, PgnValue::I64(v));
        }
    }

    pub fn set_text(&mut self, id: &'static str, value: Option<&str>) {
        if let Some(v) = value {
            self.insert(id, PgnValue::Text(String::from(v)));
        }
    }

    /// Numeric view of a field, whatever its stored representation.
    pub fn f64(&self, id: &str) -> Option<f64> {
        match self.get(id)? {
            PgnValue::F64(v) => Some(*v),
            PgnValue::U64(v) => Some(*v as f64),
            PgnValue::I64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn u64(&self, id: &str) -> Option<u64> {
        match self.get(id)? {
            PgnValue::U64(v) => Some(*v),
            PgnValue::I64(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    pub fn i64(&self, id: &str) -> Option<i64> {
        match self.get(id)? {
            PgnValue::I64(v) => Some(*v),
            PgnValue::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn u8(&self, id: &str) -> Option<u8> {
        self.u64(id).and_then(|v| u8::try_from(v).ok())
    }

    pub fn u16(&self, id: &str) -> Option<u16> {
        self.u64(id).and_then(|v| u16::try_from(v).ok())
    }

    pub fn u32(&self, id: &str) -> Option<u32> {
        self.u64(id).and_then(|v| u32::try_from(v).ok())
    }

    pub fn bool(&self, id: &str) -> Option<bool> {
        self.u64(id).map(|v| v != 0)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.get(id)? {
            PgnValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn bytes(&self, id: &str) -> Option<&[u8]> {
        match self.get(id)? {
            PgnValue::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }
}
