//! Supported PGNs: static layouts, typed records, and their translation to and
//! from NMEA 0183 sentences.
//!
//! Every record field is an `Option`: `None` is the "data not available"
//! sentinel of the wire format, never a zero. Values keep the units of the
//! NMEA 2000 layout (radians, m/s, metres, kelvin, seconds) and are converted
//! when a sentence is rendered or parsed.
use alloc::vec::Vec;

use crate::error::SerializationError;
use crate::infra::codec::traits::PgnData;

/// Declares a record struct whose fields map one to one onto descriptor ids.
macro_rules! pgn_record {
    (
        $(#[$meta:meta])*
        $name:ident => $descriptor:expr,
        { $($(#[$field_meta:meta])* $field:ident: $ty:ty => $id:literal),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: Option<$ty>,)*
        }

        impl $crate::infra::codec::traits::PgnData for $name {
            const DESCRIPTOR: &'static $crate::core::PgnDescriptor = $descriptor;

            fn from_fields(
                fields: &$crate::core::FieldSet,
            ) -> Result<Self, $crate::error::DeserializationError> {
                Ok(Self {
                    $($field: $crate::infra::codec::traits::FieldValue::read(fields, $id),)*
                })
            }

            fn to_fields(&self) -> $crate::core::FieldSet {
                let mut fields = $crate::core::FieldSet::new();
                $(
                    if let Some(value) = &self.$field {
                        $crate::infra::codec::traits::FieldValue::write(value, &mut fields, $id);
                    }
                )*
                fields
            }
        }
    };
}

pub mod ais;
pub mod environment;
pub mod family;
pub mod heading;
pub mod navigation;
pub mod network;
pub mod position;
pub mod registry;
pub mod speed_depth;
pub mod state;
pub mod time;
pub mod units;

pub use family::{FamilyMask, PgnFamily};
pub use registry::{DecodeContext, EncodeContext};
pub use state::BridgeState;

use ais::*;
use environment::*;
use heading::*;
use navigation::*;
use network::*;
use position::*;
use speed_depth::*;
use time::*;

//==================================================================================PGN_MESSAGE
/// Outbound PGN ready for fragmentation. The bridge adds the source address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnMessage {
    pub pgn: u32,
    pub priority: u8,
    pub payload: Vec<u8>,
}

impl PgnMessage {
    /// Serialize a record with the default priority of its layout.
    pub fn from_record<P: PgnData>(record: &P) -> Result<Self, SerializationError> {
        Ok(Self {
            pgn: P::DESCRIPTOR.id,
            priority: P::DESCRIPTOR.priority,
            payload: record.to_payload()?,
        })
    }
}

//==================================================================================DECODED_RECORD
/// Structured output of a PGN decode, one variant per supported PGN.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPgnRecord {
    IsoRequest(Pgn59904),
    IsoAddressClaim(Pgn60928),
    SystemTime(Pgn126992),
    Heartbeat(Pgn126993),
    ProductInformation(Pgn126996),
    Rudder(Pgn127245),
    VesselHeading(Pgn127250),
    RateOfTurn(Pgn127251),
    MagneticVariation(Pgn127258),
    SpeedWaterReferenced(Pgn128259),
    WaterDepth(Pgn128267),
    PositionRapidUpdate(Pgn129025),
    CogSogRapidUpdate(Pgn129026),
    GnssPositionData(Pgn129029),
    CrossTrackError(Pgn129283),
    WindData(Pgn130306),
    EnvironmentalParameters(Pgn130310),
    Temperature(Pgn130312),
    AisClassAPositionReport(Pgn129038),
    AisClassBPositionReport(Pgn129039),
    AisClassBExtendedPositionReport(Pgn129040),
    AisAidsToNavigationReport(Pgn129041),
    AisUtcAndDateReport(Pgn129793),
    AisClassAStaticData(Pgn129794),
    AisSarAircraftPositionReport(Pgn129798),
    AisAddressedSafetyMessage(Pgn129801),
    AisSafetyBroadcastMessage(Pgn129802),
    AisClassBStaticDataPartA(Pgn129809),
    AisClassBStaticDataPartB(Pgn129810),
}

macro_rules! record_conversions {
    ($($record:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$record> for DecodedPgnRecord {
                fn from(record: $record) -> Self {
                    DecodedPgnRecord::$variant(record)
                }
            }
        )*

        impl DecodedPgnRecord {
            /// PGN number of the record.
            pub fn pgn(&self) -> u32 {
                match self {
                    $(DecodedPgnRecord::$variant(_) => <$record as PgnData>::DESCRIPTOR.id,)*
                }
            }

            /// Serialize the record back to its payload.
            pub fn to_payload(&self) -> Result<Vec<u8>, SerializationError> {
                match self {
                    $(DecodedPgnRecord::$variant(record) => record.to_payload(),)*
                }
            }
        }
    };
}

record_conversions!(
    Pgn59904 => IsoRequest,
    Pgn60928 => IsoAddressClaim,
    Pgn126992 => SystemTime,
    Pgn126993 => Heartbeat,
    Pgn126996 => ProductInformation,
    Pgn127245 => Rudder,
    Pgn127250 => VesselHeading,
    Pgn127251 => RateOfTurn,
    Pgn127258 => MagneticVariation,
    Pgn128259 => SpeedWaterReferenced,
    Pgn128267 => WaterDepth,
    Pgn129025 => PositionRapidUpdate,
    Pgn129026 => CogSogRapidUpdate,
    Pgn129029 => GnssPositionData,
    Pgn129283 => CrossTrackError,
    Pgn130306 => WindData,
    Pgn130310 => EnvironmentalParameters,
    Pgn130312 => Temperature,
    Pgn129038 => AisClassAPositionReport,
    Pgn129039 => AisClassBPositionReport,
    Pgn129040 => AisClassBExtendedPositionReport,
    Pgn129041 => AisAidsToNavigationReport,
    Pgn129793 => AisUtcAndDateReport,
    Pgn129794 => AisClassAStaticData,
    Pgn129798 => AisSarAircraftPositionReport,
    Pgn129801 => AisAddressedSafetyMessage,
    Pgn129802 => AisSafetyBroadcastMessage,
    Pgn129809 => AisClassBStaticDataPartA,
    Pgn129810 => AisClassBStaticDataPartB,
);
