//! Public traits exposed by the codec engine. They decouple typed PGN
//! structures from the serialization/deserialization logic.
use alloc::string::String;
use alloc::vec::Vec;

use chrono::NaiveDate;

use super::{calendar, engine};
use crate::core::{FieldSet, PgnDescriptor, PgnValue};
use crate::error::{DeserializationError, SerializationError};

//==================================================================================PGN_DATA
/// Implemented by every typed PGN record.
///
/// The struct only maps itself to and from a [`FieldSet`]; bit layout,
/// resolutions and sentinels stay in the static descriptor.
pub trait PgnData: Sized {
    /// Static layout of the PGN.
    const DESCRIPTOR: &'static PgnDescriptor;

    /// Build the record from decoded fields. Fields missing from the set
    /// become `None`.
    fn from_fields(fields: &FieldSet) -> Result<Self, DeserializationError>;

    /// Flatten the record into a field set, leaving `None` values out.
    fn to_fields(&self) -> FieldSet;

    /// Deserialize a payload into a record.
    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        let fields = engine::deserialize(payload, Self::DESCRIPTOR)?;
        Self::from_fields(&fields)
    }

    /// Serialize the record into a freshly allocated payload.
    fn to_payload(&self) -> Result<Vec<u8>, SerializationError> {
        engine::serialize(&self.to_fields(), Self::DESCRIPTOR)
    }
}

//==================================================================================FIELD_VALUE
/// Typed access to one [`FieldSet`] entry, used by the record structs.
pub trait FieldValue: Sized {
    fn read(fields: &FieldSet, id: &str) -> Option<Self>;
    fn write(&self, fields: &mut FieldSet, id: &'static str);
}

impl FieldValue for f64 {
    fn read(fields: &FieldSet, id: &str) -> Option<Self> {
        fields.f64(id)
    }
    fn write(&self, fields: &mut FieldSet, id: &'static str) {
        fields.insert(id, PgnValue::F64(*self));
    }
}

impl FieldValue for i64 {
    fn read(fields: &FieldSet, id: &str) -> Option<Self> {
        fields.i64(id)
    }
    fn write(&self, fields: &mut FieldSet, id: &'static str) {
        fields.insert(id, PgnValue::I64(*self));
    }
}

macro_rules! unsigned_field_value {
    ($($ty:ty => $getter:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn read(fields: &FieldSet, id: &str) -> Option<Self> {
                    fields.$getter(id)
                }
                fn write(&self, fields: &mut FieldSet, id: &'static str) {
                    fields.insert(id, PgnValue::U64(*self as u64));
                }
            }
        )*
    };
}

unsigned_field_value!(u8 => u8, u16 => u16, u32 => u32, u64 => u64);

impl FieldValue for bool {
    fn read(fields: &FieldSet, id: &str) -> Option<Self> {
        fields.bool(id)
    }
    fn write(&self, fields: &mut FieldSet, id: &'static str) {
        fields.insert(id, PgnValue::U64(*self as u64));
    }
}

impl FieldValue for String {
    fn read(fields: &FieldSet, id: &str) -> Option<Self> {
        fields.text(id).map(String::from)
    }
    fn write(&self, fields: &mut FieldSet, id: &'static str) {
        fields.insert(id, PgnValue::Text(self.clone()));
    }
}

impl FieldValue for Vec<u8> {
    fn read(fields: &FieldSet, id: &str) -> Option<Self> {
        fields.bytes(id).map(<[u8]>::to_vec)
    }
    fn write(&self, fields: &mut FieldSet, id: &'static str) {
        fields.insert(id, PgnValue::Bytes(self.clone()));
    }
}

/// Dates travel as day counts since 1970-01-01.
impl FieldValue for NaiveDate {
    fn read(fields: &FieldSet, id: &str) -> Option<Self> {
        calendar::date_from_days(fields.u64(id)?)
    }
    fn write(&self, fields: &mut FieldSet, id: &'static str) {
        if let Some(days) = calendar::days_from_date(*self) {
            fields.insert(id, PgnValue::U64(days));
        }
    }
}
