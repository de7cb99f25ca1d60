//! ITU-R M.1371 message layouts and their mapping onto AIS PGN fields.
//!
//! One table drives both directions: each [`AisLayout`] lists the bit
//! position of every field and the PGN field id it maps to. Composite fields
//! (dimensions, ETA, UTC date, AtoN name extension) go through [`Hook`]s.
use alloc::string::String;

use chrono::{Datelike, NaiveDate};

use super::armor::{get_string, insert_string};
use crate::core::{FieldSet, PgnDescriptor, PgnValue};
use crate::error::AisError;
use crate::infra::codec::bits::BitVector;
use crate::infra::codec::calendar::{seconds_of_day, time_parts};
use crate::infra::codec::engine::round_half_away;
use crate::infra::codec::sentinel::{ais, unsigned_sentinel};
use crate::infra::codec::traits::FieldValue;
use crate::protocol::messages::ais::{
    PGN_129038_DESCRIPTOR, PGN_129039_DESCRIPTOR, PGN_129040_DESCRIPTOR, PGN_129041_DESCRIPTOR,
    PGN_129793_DESCRIPTOR, PGN_129794_DESCRIPTOR, PGN_129798_DESCRIPTOR, PGN_129801_DESCRIPTOR,
    PGN_129802_DESCRIPTOR, PGN_129809_DESCRIPTOR, PGN_129810_DESCRIPTOR,
};
use crate::protocol::messages::units::{abs, degrees, radians, sqrt, DEG_TO_RAD, NAUTICAL_MILE};

/// Longest AIS message, five slots.
pub const MAX_MESSAGE_BITS: usize = 1008;
/// Characters of the AtoN name proper; the rest goes to the extension.
pub const ATON_NAME_CHARS: usize = 20;
pub const ATON_EXTENSION_CHARS: usize = 14;
const ATON_EXTENSION_START: usize = 272;
const ATON_NAME_START: usize = 43;

/// Scale of ITU positions, 1/10000 minute.
const MINUTES: f64 = 1.0 / 600_000.0;
/// 0.1 knot in m/s.
const TENTH_KNOT: f64 = 0.1 * NAUTICAL_MILE / 3600.0;
const KNOT: f64 = NAUTICAL_MILE / 3600.0;
/// 0.1 degree in radians.
const TENTH_DEGREE: f64 = 0.1 * DEG_TO_RAD;
/// Rate of turn indicator coefficient.
const ROT_COEFFICIENT: f64 = 4.733;

//==================================================================================TYPES
/// Conversion between the raw ITU field and the PGN value.
#[derive(Debug, Clone, Copy)]
pub enum Conversion {
    /// Integer copied as is. `absent` is the ITU "not available" value, if any.
    Raw { absent: Option<u64> },
    /// PGN value = raw × `factor`.
    Scaled {
        factor: f64,
        signed: bool,
        absent: Option<i64>,
    },
    /// ROT indicator (4.733 √(°/min)) ⇄ rad/s.
    RateOfTurn,
    /// ITU text of `chars` characters; 0 runs to the end of the message.
    Text { chars: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct AisField {
    /// Field id in the PGN descriptor.
    pub id: &'static str,
    pub start: usize,
    pub bits: usize,
    pub conversion: Conversion,
}

impl AisField {
    const fn raw(id: &'static str, start: usize, bits: usize) -> Self {
        Self {
            id,
            start,
            bits,
            conversion: Conversion::Raw { absent: None },
        }
    }

    const fn raw_na(id: &'static str, start: usize, bits: usize, absent: u64) -> Self {
        Self {
            id,
            start,
            bits,
            conversion: Conversion::Raw {
                absent: Some(absent),
            },
        }
    }

    const fn scaled(id: &'static str, start: usize, bits: usize, factor: f64, absent: u64) -> Self {
        Self {
            id,
            start,
            bits,
            conversion: Conversion::Scaled {
                factor,
                signed: false,
                absent: Some(absent as i64),
            },
        }
    }

    const fn signed(id: &'static str, start: usize, bits: usize, factor: f64, absent: i64) -> Self {
        Self {
            id,
            start,
            bits,
            conversion: Conversion::Scaled {
                factor,
                signed: true,
                absent: Some(absent),
            },
        }
    }

    const fn text(id: &'static str, start: usize, chars: usize) -> Self {
        Self {
            id,
            start,
            bits: chars * 6,
            conversion: Conversion::Text { chars },
        }
    }

    const fn rate_of_turn(start: usize) -> Self {
        Self {
            id: "RateOfTurn",
            start,
            bits: 8,
            conversion: Conversion::RateOfTurn,
        }
    }
}

/// Fields spread over several ITU fields or PGN fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// To bow / stern / port / starboard ⇄ length, beam and reference points.
    Dimensions { start: usize },
    /// Dimensions, or the mothership MMSI for auxiliary craft (98xxxxxxx).
    DimensionsOrMothership { start: usize },
    /// Month / day / hour / minute ⇄ ETA date and time.
    Eta { start: usize },
    /// Year / month / day / hour / minute / second ⇄ position date and time.
    UtcDate { start: usize },
    /// Name plus name extension ⇄ one string.
    AtonName,
}

/// One ITU message type (or type and part) and its PGN.
#[derive(Debug)]
pub struct AisLayout {
    pub message_types: &'static [u8],
    /// Part number of message 24.
    pub part: Option<u8>,
    pub descriptor: &'static PgnDescriptor,
    /// Shortest payload accepted.
    pub min_bits: usize,
    /// Length of the fixed part written on encode.
    pub bits: usize,
    pub fields: &'static [AisField],
    pub hooks: &'static [Hook],
}

//==================================================================================TABLE
static CLASS_A_POSITION: [AisField; 12] = [
    AisField::raw_na("NavStatus", 38, 4, 15),
    AisField::rate_of_turn(42),
    AisField::scaled("Sog", 50, 10, TENTH_KNOT, ais::SOG),
    AisField::raw("PositionAccuracy", 60, 1),
    AisField::signed("Longitude", 61, 28, MINUTES, ais::LONGITUDE),
    AisField::signed("Latitude", 89, 27, MINUTES, ais::LATITUDE),
    AisField::scaled("Cog", 116, 12, TENTH_DEGREE, ais::COG),
    AisField::scaled("Heading", 128, 9, DEG_TO_RAD, ais::HEADING),
    AisField::raw_na("TimeStamp", 137, 6, ais::TIMESTAMP),
    AisField::raw("SpecialManeuverIndicator", 143, 2),
    AisField::raw("Raim", 148, 1),
    AisField::raw("CommunicationState", 149, 19),
];

static BASE_STATION: [AisField; 6] = [
    AisField::raw("PositionAccuracy", 78, 1),
    AisField::signed("Longitude", 79, 28, MINUTES, ais::LONGITUDE),
    AisField::signed("Latitude", 107, 27, MINUTES, ais::LATITUDE),
    AisField::raw("GnssType", 134, 4),
    AisField::raw("Raim", 148, 1),
    AisField::raw("CommunicationState", 149, 19),
];

static STATIC_VOYAGE: [AisField; 9] = [
    AisField::raw("AisVersionIndicator", 38, 2),
    AisField::raw_na("ImoNumber", 40, 30, ais::IMO),
    AisField::text("Callsign", 70, 7),
    AisField::text("Name", 112, 20),
    AisField::raw_na("TypeOfShip", 232, 8, ais::SHIP_TYPE),
    AisField::raw("GnssType", 270, 4),
    AisField::scaled("Draft", 294, 8, 0.1, ais::DRAUGHT),
    AisField::text("Destination", 302, 20),
    AisField::raw("Dte", 422, 1),
];

static SAR_AIRCRAFT: [AisField; 11] = [
    AisField::scaled("Altitude", 38, 12, 1.0, ais::ALTITUDE),
    AisField::scaled("Sog", 50, 10, KNOT, ais::SOG),
    AisField::raw("PositionAccuracy", 60, 1),
    AisField::signed("Longitude", 61, 28, MINUTES, ais::LONGITUDE),
    AisField::signed("Latitude", 89, 27, MINUTES, ais::LATITUDE),
    AisField::scaled("Cog", 116, 12, TENTH_DEGREE, ais::COG),
    AisField::raw_na("TimeStamp", 128, 6, ais::TIMESTAMP),
    AisField::raw("RegionalApplication", 134, 8),
    AisField::raw("Dte", 142, 1),
    AisField::raw("Raim", 147, 1),
    // 129798 has no field for the assigned flag (146) or the state selector (148);
    // it keeps the 19 SOTDMA/ITDMA bits after the selector, as message 1 does.
    AisField::raw("CommunicationState", 149, 19),
];

static ADDRESSED_SAFETY: [AisField; 4] = [
    AisField::raw("SequenceNumber", 38, 2),
    AisField::raw("DestinationId", 40, 30),
    AisField::raw("RetransmitFlag", 70, 1),
    AisField::text("SafetyRelatedText", 72, 0),
];

static SAFETY_BROADCAST: [AisField; 1] = [AisField::text("SafetyRelatedText", 40, 0)];

static CLASS_B_POSITION: [AisField; 18] = [
    AisField::raw("RegionalApplication", 38, 8),
    AisField::scaled("Sog", 46, 10, TENTH_KNOT, ais::SOG),
    AisField::raw("PositionAccuracy", 56, 1),
    AisField::signed("Longitude", 57, 28, MINUTES, ais::LONGITUDE),
    AisField::signed("Latitude", 85, 27, MINUTES, ais::LATITUDE),
    AisField::scaled("Cog", 112, 12, TENTH_DEGREE, ais::COG),
    AisField::scaled("Heading", 124, 9, DEG_TO_RAD, ais::HEADING),
    AisField::raw_na("TimeStamp", 133, 6, ais::TIMESTAMP),
    AisField::raw("RegionalApplicationB", 139, 2),
    AisField::raw("UnitType", 141, 1),
    AisField::raw("IntegratedDisplay", 142, 1),
    AisField::raw("Dsc", 143, 1),
    AisField::raw("Band", 144, 1),
    AisField::raw("CanHandleMsg22", 145, 1),
    AisField::raw("AisMode", 146, 1),
    AisField::raw("Raim", 147, 1),
    AisField::raw("AisCommunicationState", 148, 1),
    AisField::raw("CommunicationState", 149, 19),
];

static CLASS_B_EXTENDED: [AisField; 15] = [
    AisField::raw("RegionalApplication", 38, 8),
    AisField::scaled("Sog", 46, 10, TENTH_KNOT, ais::SOG),
    AisField::raw("PositionAccuracy", 56, 1),
    AisField::signed("Longitude", 57, 28, MINUTES, ais::LONGITUDE),
    AisField::signed("Latitude", 85, 27, MINUTES, ais::LATITUDE),
    AisField::scaled("Cog", 112, 12, TENTH_DEGREE, ais::COG),
    AisField::scaled("Heading", 124, 9, DEG_TO_RAD, ais::HEADING),
    AisField::raw_na("TimeStamp", 133, 6, ais::TIMESTAMP),
    AisField::raw("RegionalApplicationB", 139, 4),
    AisField::text("Name", 143, 20),
    AisField::raw_na("TypeOfShip", 263, 8, ais::SHIP_TYPE),
    AisField::raw("GnssType", 301, 4),
    AisField::raw("Raim", 305, 1),
    AisField::raw("Dte", 306, 1),
    AisField::raw("AisMode", 307, 1),
];

static AIDS_TO_NAVIGATION: [AisField; 11] = [
    AisField::raw("AtonType", 38, 5),
    AisField::raw("PositionAccuracy", 163, 1),
    AisField::signed("Longitude", 164, 28, MINUTES, ais::LONGITUDE),
    AisField::signed("Latitude", 192, 27, MINUTES, ais::LATITUDE),
    AisField::raw("GnssType", 249, 4),
    AisField::raw_na("TimeStamp", 253, 6, ais::TIMESTAMP),
    AisField::raw("OffPositionIndicator", 259, 1),
    AisField::raw("AtonStatus", 260, 8),
    AisField::raw("Raim", 268, 1),
    AisField::raw("VirtualAtonFlag", 269, 1),
    AisField::raw("AssignedModeFlag", 270, 1),
];

static STATIC_PART_A: [AisField; 1] = [AisField::text("Name", 40, 20)];

static STATIC_PART_B: [AisField; 3] = [
    AisField::raw_na("TypeOfShip", 40, 8, ais::SHIP_TYPE),
    AisField::text("VendorId", 48, 7),
    AisField::text("Callsign", 90, 7),
];

pub static AIS_LAYOUTS: [AisLayout; 11] = [
    AisLayout {
        message_types: &[1, 2, 3],
        part: None,
        descriptor: &PGN_129038_DESCRIPTOR,
        min_bits: 168,
        bits: 168,
        fields: &CLASS_A_POSITION,
        hooks: &[],
    },
    AisLayout {
        message_types: &[4, 11],
        part: None,
        descriptor: &PGN_129793_DESCRIPTOR,
        min_bits: 168,
        bits: 168,
        fields: &BASE_STATION,
        hooks: &[Hook::UtcDate { start: 38 }],
    },
    AisLayout {
        message_types: &[5],
        part: None,
        descriptor: &PGN_129794_DESCRIPTOR,
        min_bits: 420,
        bits: 424,
        fields: &STATIC_VOYAGE,
        hooks: &[Hook::Dimensions { start: 240 }, Hook::Eta { start: 274 }],
    },
    AisLayout {
        message_types: &[9],
        part: None,
        descriptor: &PGN_129798_DESCRIPTOR,
        min_bits: 168,
        bits: 168,
        fields: &SAR_AIRCRAFT,
        hooks: &[],
    },
    AisLayout {
        message_types: &[12],
        part: None,
        descriptor: &PGN_129801_DESCRIPTOR,
        min_bits: 72,
        bits: 72,
        fields: &ADDRESSED_SAFETY,
        hooks: &[],
    },
    AisLayout {
        message_types: &[14],
        part: None,
        descriptor: &PGN_129802_DESCRIPTOR,
        min_bits: 40,
        bits: 40,
        fields: &SAFETY_BROADCAST,
        hooks: &[],
    },
    AisLayout {
        message_types: &[18],
        part: None,
        descriptor: &PGN_129039_DESCRIPTOR,
        min_bits: 168,
        bits: 168,
        fields: &CLASS_B_POSITION,
        hooks: &[],
    },
    AisLayout {
        message_types: &[19],
        part: None,
        descriptor: &PGN_129040_DESCRIPTOR,
        min_bits: 312,
        bits: 312,
        fields: &CLASS_B_EXTENDED,
        hooks: &[Hook::Dimensions { start: 271 }],
    },
    AisLayout {
        message_types: &[21],
        part: None,
        descriptor: &PGN_129041_DESCRIPTOR,
        min_bits: 272,
        bits: 272,
        fields: &AIDS_TO_NAVIGATION,
        hooks: &[Hook::AtonName, Hook::Dimensions { start: 219 }],
    },
    AisLayout {
        message_types: &[24],
        part: Some(0),
        descriptor: &PGN_129809_DESCRIPTOR,
        min_bits: 160,
        bits: 168,
        fields: &STATIC_PART_A,
        hooks: &[],
    },
    AisLayout {
        message_types: &[24],
        part: Some(1),
        descriptor: &PGN_129810_DESCRIPTOR,
        min_bits: 162,
        bits: 168,
        fields: &STATIC_PART_B,
        hooks: &[Hook::DimensionsOrMothership { start: 132 }],
    },
];

/// Layout of an ITU message type (and part number for message 24).
pub fn layout_for_message(message_type: u8, part: Option<u8>) -> Option<&'static AisLayout> {
    AIS_LAYOUTS
        .iter()
        .find(|layout| layout.message_types.contains(&message_type) && layout.part == part)
}

pub fn layout_for_pgn(pgn: u32) -> Option<&'static AisLayout> {
    AIS_LAYOUTS.iter().find(|layout| layout.descriptor.id == pgn)
}

//==================================================================================BITS_TO_FIELDS
fn bits_err(err: crate::error::BitReaderError) -> AisError {
    AisError::Bits { err }
}

/// Decode an ITU message into the fields of its PGN.
///
/// `year` completes the ETA date, which carries no year on the air.
pub fn bits_to_fields(
    bits: &BitVector,
    year: i32,
) -> Result<(&'static AisLayout, FieldSet), AisError> {
    let message_type = bits.get_integer(0, 6).map_err(bits_err)? as u8;
    let part = match message_type {
        24 => Some(bits.get_integer(38, 2).map_err(bits_err)? as u8),
        _ => None,
    };
    let layout = layout_for_message(message_type, part)
        .ok_or(AisError::UnsupportedMessageType { kind: message_type })?;
    if bits.len() < layout.min_bits {
        return Err(AisError::TooShort {
            bits: bits.len(),
            needed: layout.min_bits,
        });
    }

    let mut fields = FieldSet::new();
    fields.insert("MessageId", PgnValue::U64(message_type as u64));
    let repeat = bits.get_integer(6, 2).map_err(bits_err)?;
    if repeat < 3 {
        fields.insert("RepeatIndicator", PgnValue::U64(repeat));
    }
    fields.insert("UserId", PgnValue::U64(bits.get_integer(8, 30).map_err(bits_err)?));

    for field in layout.fields {
        read_field(bits, field, layout.descriptor, &mut fields)?;
    }
    for hook in layout.hooks {
        read_hook(bits, *hook, year, &mut fields)?;
    }
    Ok((layout, fields))
}

/// Largest raw value the PGN field can carry without hitting its sentinel.
fn pgn_max(descriptor: &PgnDescriptor, id: &str) -> u64 {
    descriptor
        .fields
        .iter()
        .find(|field| field.id == id)
        .map_or(0, |field| match field.bits_length {
            0 => 0,
            1 => 1,
            bits => unsigned_sentinel(bits) - 1,
        })
}

fn read_field(
    bits: &BitVector,
    field: &AisField,
    descriptor: &PgnDescriptor,
    fields: &mut FieldSet,
) -> Result<(), AisError> {
    if !matches!(field.conversion, Conversion::Text { .. }) && field.start + field.bits > bits.len() {
        return Ok(());
    }
    match field.conversion {
        Conversion::Raw { absent } => {
            let raw = bits.get_integer(field.start, field.bits).map_err(bits_err)?;
            if Some(raw) != absent && raw <= pgn_max(descriptor, field.id) {
                fields.insert(field.id, PgnValue::U64(raw));
            }
        }
        Conversion::Scaled {
            factor,
            signed,
            absent,
        } => {
            let raw = if signed {
                bits.get_signed(field.start, field.bits).map_err(bits_err)?
            } else {
                bits.get_integer(field.start, field.bits).map_err(bits_err)? as i64
            };
            if Some(raw) != absent {
                fields.insert(field.id, PgnValue::F64(raw as f64 * factor));
            }
        }
        Conversion::RateOfTurn => {
            let raw = bits.get_signed(field.start, 8).map_err(bits_err)?;
            if raw != ais::ROT {
                let indicator = raw as f64 / ROT_COEFFICIENT;
                let per_minute = indicator * abs(indicator);
                fields.insert(field.id, PgnValue::F64(radians(per_minute) / 60.0));
            }
        }
        Conversion::Text { chars } => {
            let chars = match chars {
                0 => bits.len().saturating_sub(field.start) / 6,
                n => n,
            };
            if let Some(text) = get_string(bits, field.start, chars) {
                fields.insert(field.id, PgnValue::Text(text));
            }
        }
    }
    Ok(())
}

fn read_hook(bits: &BitVector, hook: Hook, year: i32, fields: &mut FieldSet) -> Result<(), AisError> {
    let int = |start: usize, len: usize| bits.get_integer(start, len).map_err(bits_err);
    match hook {
        Hook::Dimensions { start } => read_dimensions(bits, start, fields)?,
        Hook::DimensionsOrMothership { start } => {
            if is_auxiliary_craft(fields.u32("UserId")) {
                fields.insert("MothershipUserId", PgnValue::U64(int(start, 30)?));
            } else {
                read_dimensions(bits, start, fields)?;
            }
        }
        Hook::Eta { start } => {
            let (month, day) = (int(start, 4)? as u32, int(start + 4, 5)? as u32);
            let (hour, minute) = (int(start + 9, 5)? as u32, int(start + 14, 6)? as u32);
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                date.write(fields, "EtaDate");
            }
            if hour < 24 && minute < 60 {
                if let Some(seconds) = seconds_of_day(hour, minute, 0.0) {
                    fields.insert("EtaTime", PgnValue::F64(seconds));
                }
            }
        }
        Hook::UtcDate { start } => {
            let year = int(start, 14)? as i32;
            let (month, day) = (int(start + 14, 4)? as u32, int(start + 18, 5)? as u32);
            let hour = int(start + 23, 5)? as u32;
            let minute = int(start + 28, 6)? as u32;
            let second = int(start + 34, 6)?;
            if year != 0 {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    date.write(fields, "PositionDate");
                }
            }
            if hour < 24 && minute < 60 && second < 60 {
                if let Some(seconds) = seconds_of_day(hour, minute, second as f64) {
                    fields.insert("PositionTime", PgnValue::F64(seconds));
                }
            }
        }
        Hook::AtonName => {
            let mut name = get_string(bits, ATON_NAME_START, ATON_NAME_CHARS).unwrap_or_default();
            if bits.len() > ATON_EXTENSION_START {
                let chars = ((bits.len() - ATON_EXTENSION_START) / 6).min(ATON_EXTENSION_CHARS);
                if let Some(extension) = get_string(bits, ATON_EXTENSION_START, chars) {
                    // The extension continues a full 20 character name.
                    while name.len() < ATON_NAME_CHARS {
                        name.push(' ');
                    }
                    name.push_str(&extension);
                }
            }
            if !name.is_empty() {
                fields.insert("AtonName", PgnValue::Text(name));
            }
        }
    }
    Ok(())
}

fn read_dimensions(bits: &BitVector, start: usize, fields: &mut FieldSet) -> Result<(), AisError> {
    let int = |offset: usize, len: usize| bits.get_integer(start + offset, len).map_err(bits_err);
    let (bow, stern) = (int(0, 9)?, int(9, 9)?);
    let (port, starboard) = (int(18, 6)?, int(24, 6)?);
    if bow + stern > 0 {
        fields.insert("Length", PgnValue::F64((bow + stern) as f64));
        fields.insert("PositionReferenceFromBow", PgnValue::F64(bow as f64));
    }
    if port + starboard > 0 {
        fields.insert("Beam", PgnValue::F64((port + starboard) as f64));
        fields.insert("PositionReferenceFromStarboard", PgnValue::F64(starboard as f64));
    }
    Ok(())
}

/// Auxiliary craft carry MMSIs of the form 98xxxxxxx.
fn is_auxiliary_craft(mmsi: Option<u32>) -> bool {
    mmsi.is_some_and(|mmsi| mmsi / 10_000_000 == 98)
}

//==================================================================================FIELDS_TO_BITS
/// Encode the fields of an AIS PGN as an ITU message.
pub fn fields_to_bits(
    descriptor: &'static PgnDescriptor,
    fields: &FieldSet,
) -> Result<BitVector, AisError> {
    let requested = fields.u8("MessageId");
    let layout = layout_for_pgn(descriptor.id).ok_or(AisError::UnsupportedMessageType {
        kind: requested.unwrap_or(0),
    })?;
    let message_type = requested
        .filter(|kind| layout.message_types.contains(kind))
        .or_else(|| layout.message_types.first().copied())
        .unwrap_or(0);

    let mut bits = BitVector::zeroed(layout.bits);
    bits.insert_integer(0, 6, message_type as u64);
    bits.insert_integer(6, 2, fields.u64("RepeatIndicator").unwrap_or(0));
    bits.insert_integer(8, 30, fields.u64("UserId").unwrap_or(0));
    if let Some(part) = layout.part {
        bits.insert_integer(38, 2, part as u64);
    }

    for field in layout.fields {
        write_field(&mut bits, field, fields);
    }
    for hook in layout.hooks {
        write_hook(&mut bits, *hook, fields);
    }
    Ok(bits)
}

fn fits_unsigned(value: u64, bits: usize) -> bool {
    bits >= 64 || value < (1u64 << bits)
}

fn fits_signed(value: i64, bits: usize) -> bool {
    let limit = 1i64 << (bits - 1);
    (-limit..limit).contains(&value)
}

fn write_field(bits: &mut BitVector, field: &AisField, fields: &FieldSet) {
    match field.conversion {
        Conversion::Raw { absent } => {
            let value = fields
                .u64(field.id)
                .filter(|value| fits_unsigned(*value, field.bits))
                .or(absent)
                .unwrap_or(0);
            bits.insert_integer(field.start, field.bits, value);
        }
        Conversion::Scaled {
            factor,
            signed,
            absent,
        } => {
            let raw = fields
                .f64(field.id)
                .and_then(|value| round_half_away(value / factor))
                .filter(|raw| match signed {
                    true => fits_signed(*raw, field.bits),
                    false => *raw >= 0 && fits_unsigned(*raw as u64, field.bits),
                })
                .or(absent)
                .unwrap_or(0);
            bits.insert_signed(field.start, field.bits, raw);
        }
        Conversion::RateOfTurn => {
            let raw = fields.f64(field.id).map_or(ais::ROT, |rate| {
                let per_minute = degrees(rate) * 60.0;
                let indicator = round_half_away(ROT_COEFFICIENT * sqrt(abs(per_minute)))
                    .unwrap_or(127)
                    .min(127);
                if per_minute < 0.0 {
                    -indicator
                } else {
                    indicator
                }
            });
            bits.insert_signed(field.start, 8, raw);
        }
        Conversion::Text { chars } => {
            let text = fields.text(field.id).unwrap_or("");
            let chars = match chars {
                0 => text
                    .chars()
                    .count()
                    .min(MAX_MESSAGE_BITS.saturating_sub(field.start) / 6),
                n => n,
            };
            insert_string(bits, field.start, chars, text);
        }
    }
}

fn write_hook(bits: &mut BitVector, hook: Hook, fields: &FieldSet) {
    match hook {
        Hook::Dimensions { start } => write_dimensions(bits, start, fields),
        Hook::DimensionsOrMothership { start } => {
            if is_auxiliary_craft(fields.u32("UserId")) {
                let mothership = fields.u64("MothershipUserId").unwrap_or(0);
                bits.insert_integer(start, 30, mothership);
            } else {
                write_dimensions(bits, start, fields);
            }
        }
        Hook::Eta { start } => insert_date(
            bits,
            start,
            NaiveDate::read(fields, "EtaDate"),
            fields.f64("EtaTime"),
        ),
        Hook::UtcDate { start } => {
            let (year, month, day) = NaiveDate::read(fields, "PositionDate")
                .filter(|date| (1..(1 << 14)).contains(&date.year()))
                .map_or((ais::UTC_YEAR, ais::UTC_MONTH, ais::UTC_DAY), |date| {
                    (date.year() as u64, date.month() as u64, date.day() as u64)
                });
            let (hour, minute, second) = fields
                .f64("PositionTime")
                .and_then(time_parts)
                .map_or((ais::UTC_HOUR, ais::UTC_MINUTE, ais::UTC_SECOND), |(h, m, centis)| {
                    (h as u64, m as u64, (centis / 100) as u64)
                });
            bits.insert_integer(start, 14, year);
            bits.insert_integer(start + 14, 4, month);
            bits.insert_integer(start + 18, 5, day);
            bits.insert_integer(start + 23, 5, hour);
            bits.insert_integer(start + 28, 6, minute);
            bits.insert_integer(start + 34, 6, second);
        }
        Hook::AtonName => {
            let name = fields.text("AtonName").unwrap_or("");
            insert_string(bits, ATON_NAME_START, ATON_NAME_CHARS, name);
            let extension: String = name
                .chars()
                .skip(ATON_NAME_CHARS)
                .take(ATON_EXTENSION_CHARS)
                .collect();
            let extension = extension.trim_end();
            if !extension.is_empty() {
                let chars = extension.chars().count();
                insert_string(bits, ATON_EXTENSION_START, chars, extension);
            }
        }
    }
}

/// Write ETA month / day / hour / minute at `start`; absent parts get their
/// "not available" values.
pub fn insert_date(bits: &mut BitVector, start: usize, date: Option<NaiveDate>, time: Option<f64>) {
    let (month, day) = date.map_or((ais::ETA_MONTH, ais::ETA_DAY), |date| {
        (date.month() as u64, date.day() as u64)
    });
    let (hour, minute) = time
        .and_then(time_parts)
        .map_or((ais::ETA_HOUR, ais::ETA_MINUTE), |(h, m, _)| (h as u64, m as u64));
    bits.insert_integer(start, 4, month);
    bits.insert_integer(start + 4, 5, day);
    bits.insert_integer(start + 9, 5, hour);
    bits.insert_integer(start + 14, 6, minute);
}

/// Whole metres clamped to an ITU dimension field.
fn metres(value: f64, max: u64) -> u64 {
    round_half_away(value).map_or(0, |m| m.clamp(0, max as i64) as u64)
}

fn write_dimensions(bits: &mut BitVector, start: usize, fields: &FieldSet) {
    let split = |total: Option<f64>, reference: Option<f64>, max: u64| match (total, reference) {
        (Some(total), Some(reference)) => (metres(reference, max), metres(total - reference, max)),
        (Some(total), None) => (0, metres(total, max)),
        (None, _) => (0, 0),
    };
    let (bow, stern) = split(fields.f64("Length"), fields.f64("PositionReferenceFromBow"), 511);
    let (starboard, port) = split(
        fields.f64("Beam"),
        fields.f64("PositionReferenceFromStarboard"),
        63,
    );
    bits.insert_integer(start, 9, bow);
    bits.insert_integer(start + 9, 9, stern);
    bits.insert_integer(start + 18, 6, port);
    bits.insert_integer(start + 24, 6, starboard);
}
