//! AIS PGNs. Their content is translated field by field to and from the ITU
//! bit layouts in [`crate::protocol::ais`], which also renders the `!AIVDM`
//! sentences.
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use chrono::{Datelike, NaiveDate};

use super::registry::{DecodeContext, EncodeContext, Translate};
use super::PgnMessage;
use crate::core::{FieldDescriptor as F, PgnDescriptor};
use crate::error::EncodeError;
use crate::infra::codec::engine;
use crate::infra::codec::traits::PgnData;
use crate::protocol::ais::{self, AisFragment};
use crate::protocol::nmea0183::ParsedSentence;

/// Year assumed for ETA dates before any date has been seen.
pub const DEFAULT_ETA_YEAR: i32 = 2000;

/// Implements [`Translate`] for AIS records: the record goes back through
/// the bit layouts and out as encapsulated sentences.
macro_rules! ais_translate {
    ($($record:ident),* $(,)?) => {
        $(
            impl Translate for $record {
                fn translate(&self, ctx: &mut DecodeContext<'_>) {
                    ais::emit(Self::DESCRIPTOR, &self.to_fields(), ctx);
                }
            }
        )*
    };
}

//==================================================================================129038
static PGN_129038_FIELDS: [F; 20] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::signed("Longitude", 32).scaled(1e-07),
    F::signed("Latitude", 32).scaled(1e-07),
    F::lookup("PositionAccuracy", 1),
    F::lookup("Raim", 1),
    F::lookup("TimeStamp", 6),
    F::unsigned("Cog", 16).scaled(0.0001),
    F::unsigned("Sog", 16).scaled(0.01),
    F::unsigned("CommunicationState", 19),
    F::lookup("AisTransceiverInformation", 5),
    F::unsigned("Heading", 16).scaled(0.0001),
    F::signed("RateOfTurn", 16).scaled(3.125e-05),
    F::lookup("NavStatus", 4),
    F::lookup("SpecialManeuverIndicator", 2),
    F::reserved(2),
    F::spare(3),
    F::reserved(5),
    F::unsigned("SequenceId", 8),
];

pub static PGN_129038_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129038,
    name: "AIS Class A Position Report",
    priority: 4,
    fastpacket: true,
    length: Some(28),
    fields: &PGN_129038_FIELDS,
};

pgn_record!(
    /// AIS messages 1, 2 and 3.
    Pgn129038 => &PGN_129038_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        longitude: f64 => "Longitude",
        latitude: f64 => "Latitude",
        position_accuracy: u8 => "PositionAccuracy",
        raim: u8 => "Raim",
        /// UTC second of the report; 60 and above carry the AIS special meanings.
        time_stamp: u8 => "TimeStamp",
        /// Radians.
        cog: f64 => "Cog",
        /// m/s.
        sog: f64 => "Sog",
        communication_state: u32 => "CommunicationState",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
        /// Radians, true.
        heading: f64 => "Heading",
        /// Radians per second.
        rate_of_turn: f64 => "RateOfTurn",
        nav_status: u8 => "NavStatus",
        special_maneuver_indicator: u8 => "SpecialManeuverIndicator",
        sequence_id: u8 => "SequenceId",
    }
);

//==================================================================================129039
static PGN_129039_FIELDS: [F; 23] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::signed("Longitude", 32).scaled(1e-07),
    F::signed("Latitude", 32).scaled(1e-07),
    F::lookup("PositionAccuracy", 1),
    F::lookup("Raim", 1),
    F::lookup("TimeStamp", 6),
    F::unsigned("Cog", 16).scaled(0.0001),
    F::unsigned("Sog", 16).scaled(0.01),
    F::unsigned("CommunicationState", 19),
    F::lookup("AisTransceiverInformation", 5),
    F::unsigned("Heading", 16).scaled(0.0001),
    F::unsigned("RegionalApplication", 8),
    F::unsigned("RegionalApplicationB", 2),
    F::lookup("UnitType", 1),
    F::lookup("IntegratedDisplay", 1),
    F::lookup("Dsc", 1),
    F::lookup("Band", 1),
    F::lookup("CanHandleMsg22", 1),
    F::lookup("AisMode", 1),
    F::lookup("AisCommunicationState", 1),
    F::reserved(15),
];

pub static PGN_129039_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129039,
    name: "AIS Class B Position Report",
    priority: 4,
    fastpacket: true,
    length: Some(27),
    fields: &PGN_129039_FIELDS,
};

pgn_record!(
    /// AIS message 18.
    Pgn129039 => &PGN_129039_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        longitude: f64 => "Longitude",
        latitude: f64 => "Latitude",
        position_accuracy: u8 => "PositionAccuracy",
        raim: u8 => "Raim",
        time_stamp: u8 => "TimeStamp",
        cog: f64 => "Cog",
        sog: f64 => "Sog",
        communication_state: u32 => "CommunicationState",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
        heading: f64 => "Heading",
        regional_application: u8 => "RegionalApplication",
        regional_application_b: u8 => "RegionalApplicationB",
        /// 0 SOTDMA, 1 carrier sense.
        unit_type: u8 => "UnitType",
        integrated_display: u8 => "IntegratedDisplay",
        dsc: u8 => "Dsc",
        band: u8 => "Band",
        can_handle_msg22: u8 => "CanHandleMsg22",
        ais_mode: u8 => "AisMode",
        ais_communication_state: u8 => "AisCommunicationState",
    }
);

//==================================================================================129040
static PGN_129040_FIELDS: [F; 27] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::signed("Longitude", 32).scaled(1e-07),
    F::signed("Latitude", 32).scaled(1e-07),
    F::lookup("PositionAccuracy", 1),
    F::lookup("Raim", 1),
    F::lookup("TimeStamp", 6),
    F::unsigned("Cog", 16).scaled(0.0001),
    F::unsigned("Sog", 16).scaled(0.01),
    F::unsigned("RegionalApplication", 8),
    F::unsigned("RegionalApplicationB", 4),
    F::reserved(4),
    F::lookup("TypeOfShip", 8),
    F::unsigned("Heading", 16).scaled(0.0001),
    F::reserved(4),
    F::lookup("GnssType", 4),
    F::unsigned("Length", 16).scaled(0.1),
    F::unsigned("Beam", 16).scaled(0.1),
    F::unsigned("PositionReferenceFromStarboard", 16).scaled(0.1),
    F::unsigned("PositionReferenceFromBow", 16).scaled(0.1),
    F::string_fix("Name", 160),
    F::lookup("Dte", 1),
    F::lookup("AisMode", 1),
    F::spare(4),
    F::lookup("AisTransceiverInformation", 5),
    F::reserved(5),
];

pub static PGN_129040_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129040,
    name: "AIS Class B Extended Position Report",
    priority: 4,
    fastpacket: true,
    length: Some(54),
    fields: &PGN_129040_FIELDS,
};

pgn_record!(
    /// AIS message 19.
    Pgn129040 => &PGN_129040_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        longitude: f64 => "Longitude",
        latitude: f64 => "Latitude",
        position_accuracy: u8 => "PositionAccuracy",
        raim: u8 => "Raim",
        time_stamp: u8 => "TimeStamp",
        cog: f64 => "Cog",
        sog: f64 => "Sog",
        regional_application: u8 => "RegionalApplication",
        regional_application_b: u8 => "RegionalApplicationB",
        type_of_ship: u8 => "TypeOfShip",
        heading: f64 => "Heading",
        gnss_type: u8 => "GnssType",
        /// Metres.
        length: f64 => "Length",
        /// Metres.
        beam: f64 => "Beam",
        position_reference_from_starboard: f64 => "PositionReferenceFromStarboard",
        position_reference_from_bow: f64 => "PositionReferenceFromBow",
        name: String => "Name",
        dte: u8 => "Dte",
        ais_mode: u8 => "AisMode",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
    }
);

//==================================================================================129041
static PGN_129041_FIELDS: [F; 23] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::signed("Longitude", 32).scaled(1e-07),
    F::signed("Latitude", 32).scaled(1e-07),
    F::lookup("PositionAccuracy", 1),
    F::lookup("Raim", 1),
    F::lookup("TimeStamp", 6),
    F::unsigned("Length", 16).scaled(0.1),
    F::unsigned("Beam", 16).scaled(0.1),
    F::unsigned("PositionReferenceFromStarboard", 16).scaled(0.1),
    F::unsigned("PositionReferenceFromBow", 16).scaled(0.1),
    F::lookup("AtonType", 5),
    F::lookup("OffPositionIndicator", 1),
    F::lookup("VirtualAtonFlag", 1),
    F::lookup("AssignedModeFlag", 1),
    F::spare(1),
    F::lookup("GnssType", 4),
    F::reserved(3),
    F::unsigned("AtonStatus", 8),
    F::lookup("AisTransceiverInformation", 5),
    F::reserved(3),
    F::string_lau("AtonName"),
];

pub static PGN_129041_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129041,
    name: "AIS Aids to Navigation (AtoN) Report",
    priority: 4,
    fastpacket: true,
    length: None,
    fields: &PGN_129041_FIELDS,
};

pgn_record!(
    /// AIS message 21. The name carries the name extension when there is one.
    Pgn129041 => &PGN_129041_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        longitude: f64 => "Longitude",
        latitude: f64 => "Latitude",
        position_accuracy: u8 => "PositionAccuracy",
        raim: u8 => "Raim",
        time_stamp: u8 => "TimeStamp",
        length: f64 => "Length",
        beam: f64 => "Beam",
        position_reference_from_starboard: f64 => "PositionReferenceFromStarboard",
        position_reference_from_bow: f64 => "PositionReferenceFromBow",
        aton_type: u8 => "AtonType",
        off_position_indicator: u8 => "OffPositionIndicator",
        virtual_aton_flag: u8 => "VirtualAtonFlag",
        assigned_mode_flag: u8 => "AssignedModeFlag",
        gnss_type: u8 => "GnssType",
        aton_status: u8 => "AtonStatus",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
        aton_name: String => "AtonName",
    }
);

//==================================================================================129793
static PGN_129793_FIELDS: [F; 15] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::signed("Longitude", 32).scaled(1e-07),
    F::signed("Latitude", 32).scaled(1e-07),
    F::lookup("PositionAccuracy", 1),
    F::lookup("Raim", 1),
    F::reserved(6),
    F::time("PositionTime"),
    F::unsigned("CommunicationState", 19),
    F::lookup("AisTransceiverInformation", 5),
    F::date("PositionDate"),
    F::reserved(4),
    F::lookup("GnssType", 4),
    F::spare(8),
];

pub static PGN_129793_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129793,
    name: "AIS UTC and Date Report",
    priority: 7,
    fastpacket: true,
    length: Some(25),
    fields: &PGN_129793_FIELDS,
};

pgn_record!(
    /// AIS messages 4 and 11.
    Pgn129793 => &PGN_129793_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        longitude: f64 => "Longitude",
        latitude: f64 => "Latitude",
        position_accuracy: u8 => "PositionAccuracy",
        raim: u8 => "Raim",
        /// Seconds since midnight UTC.
        position_time: f64 => "PositionTime",
        communication_state: u32 => "CommunicationState",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
        position_date: NaiveDate => "PositionDate",
        gnss_type: u8 => "GnssType",
    }
);

//==================================================================================129794
static PGN_129794_FIELDS: [F; 21] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::unsigned("ImoNumber", 32),
    F::string_fix("Callsign", 56),
    F::string_fix("Name", 160),
    F::lookup("TypeOfShip", 8),
    F::unsigned("Length", 16).scaled(0.1),
    F::unsigned("Beam", 16).scaled(0.1),
    F::unsigned("PositionReferenceFromStarboard", 16).scaled(0.1),
    F::unsigned("PositionReferenceFromBow", 16).scaled(0.1),
    F::date("EtaDate"),
    F::time("EtaTime"),
    F::unsigned("Draft", 16).scaled(0.01),
    F::string_fix("Destination", 160),
    F::lookup("AisVersionIndicator", 2),
    F::lookup("GnssType", 4),
    F::lookup("Dte", 1),
    F::reserved(1),
    F::lookup("AisTransceiverInformation", 5),
    F::reserved(3),
];

pub static PGN_129794_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129794,
    name: "AIS Class A Static and Voyage Related Data",
    priority: 6,
    fastpacket: true,
    length: Some(75),
    fields: &PGN_129794_FIELDS,
};

pgn_record!(
    /// AIS message 5.
    Pgn129794 => &PGN_129794_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        imo_number: u32 => "ImoNumber",
        callsign: String => "Callsign",
        name: String => "Name",
        type_of_ship: u8 => "TypeOfShip",
        length: f64 => "Length",
        beam: f64 => "Beam",
        position_reference_from_starboard: f64 => "PositionReferenceFromStarboard",
        position_reference_from_bow: f64 => "PositionReferenceFromBow",
        eta_date: NaiveDate => "EtaDate",
        eta_time: f64 => "EtaTime",
        /// Metres.
        draft: f64 => "Draft",
        destination: String => "Destination",
        ais_version_indicator: u8 => "AisVersionIndicator",
        gnss_type: u8 => "GnssType",
        dte: u8 => "Dte",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
    }
);

//==================================================================================129798
static PGN_129798_FIELDS: [F; 16] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::signed("Longitude", 32).scaled(1e-07),
    F::signed("Latitude", 32).scaled(1e-07),
    F::lookup("PositionAccuracy", 1),
    F::lookup("Raim", 1),
    F::lookup("TimeStamp", 6),
    F::unsigned("Cog", 16).scaled(0.0001),
    F::unsigned("Sog", 16).scaled(0.1),
    F::unsigned("CommunicationState", 19),
    F::lookup("AisTransceiverInformation", 5),
    F::signed("Altitude", 64).scaled(1e-06),
    F::unsigned("RegionalApplication", 8),
    F::lookup("Dte", 1),
    F::reserved(7),
];

pub static PGN_129798_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129798,
    name: "AIS SAR Aircraft Position Report",
    priority: 4,
    fastpacket: true,
    length: Some(31),
    fields: &PGN_129798_FIELDS,
};

pgn_record!(
    /// AIS message 9.
    Pgn129798 => &PGN_129798_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        longitude: f64 => "Longitude",
        latitude: f64 => "Latitude",
        position_accuracy: u8 => "PositionAccuracy",
        raim: u8 => "Raim",
        time_stamp: u8 => "TimeStamp",
        cog: f64 => "Cog",
        sog: f64 => "Sog",
        communication_state: u32 => "CommunicationState",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
        /// Metres.
        altitude: f64 => "Altitude",
        regional_application: u8 => "RegionalApplication",
        dte: u8 => "Dte",
    }
);

//==================================================================================129801
static PGN_129801_FIELDS: [F; 11] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::reserved(1),
    F::lookup("AisTransceiverInformation", 5),
    F::unsigned("SequenceNumber", 2),
    F::mmsi("DestinationId"),
    F::reserved(6),
    F::unsigned("RetransmitFlag", 1),
    F::reserved(1),
    F::string_lau("SafetyRelatedText"),
];

pub static PGN_129801_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129801,
    name: "AIS Addressed Safety Related Message",
    priority: 5,
    fastpacket: true,
    length: None,
    fields: &PGN_129801_FIELDS,
};

pgn_record!(
    /// AIS message 12.
    Pgn129801 => &PGN_129801_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        /// Source MMSI.
        user_id: u32 => "UserId",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
        sequence_number: u8 => "SequenceNumber",
        destination_id: u32 => "DestinationId",
        retransmit_flag: u8 => "RetransmitFlag",
        safety_related_text: String => "SafetyRelatedText",
    }
);

//==================================================================================129802
static PGN_129802_FIELDS: [F; 6] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::lookup("AisTransceiverInformation", 5),
    F::reserved(3),
    F::string_lau("SafetyRelatedText"),
];

pub static PGN_129802_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129802,
    name: "AIS Safety Related Broadcast Message",
    priority: 5,
    fastpacket: true,
    length: None,
    fields: &PGN_129802_FIELDS,
};

pgn_record!(
    /// AIS message 14.
    Pgn129802 => &PGN_129802_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
        safety_related_text: String => "SafetyRelatedText",
    }
);

//==================================================================================129809
static PGN_129809_FIELDS: [F; 7] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::string_fix("Name", 160),
    F::lookup("AisTransceiverInformation", 5),
    F::reserved(3),
    F::unsigned("SequenceId", 8),
];

pub static PGN_129809_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129809,
    name: "AIS Class B \"CS\" Static Data Report, Part A",
    priority: 6,
    fastpacket: true,
    length: Some(27),
    fields: &PGN_129809_FIELDS,
};

pgn_record!(
    /// AIS message 24, part A.
    Pgn129809 => &PGN_129809_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        name: String => "Name",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
        sequence_id: u8 => "SequenceId",
    }
);

//==================================================================================129810
static PGN_129810_FIELDS: [F; 16] = [
    F::unsigned("MessageId", 6),
    F::lookup("RepeatIndicator", 2),
    F::mmsi("UserId"),
    F::lookup("TypeOfShip", 8),
    F::string_fix("VendorId", 56),
    F::string_fix("Callsign", 56),
    F::unsigned("Length", 16).scaled(0.1),
    F::unsigned("Beam", 16).scaled(0.1),
    F::unsigned("PositionReferenceFromStarboard", 16).scaled(0.1),
    F::unsigned("PositionReferenceFromBow", 16).scaled(0.1),
    F::mmsi("MothershipUserId"),
    F::reserved(2),
    F::spare(6),
    F::lookup("AisTransceiverInformation", 5),
    F::reserved(3),
    F::unsigned("SequenceId", 8),
];

pub static PGN_129810_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129810,
    name: "AIS Class B \"CS\" Static Data Report, Part B",
    priority: 6,
    fastpacket: true,
    length: Some(35),
    fields: &PGN_129810_FIELDS,
};

pgn_record!(
    /// AIS message 24, part B. Auxiliary craft report their mothership
    /// instead of their dimensions.
    Pgn129810 => &PGN_129810_DESCRIPTOR,
    {
        message_id: u8 => "MessageId",
        repeat_indicator: u8 => "RepeatIndicator",
        user_id: u32 => "UserId",
        type_of_ship: u8 => "TypeOfShip",
        vendor_id: String => "VendorId",
        callsign: String => "Callsign",
        length: f64 => "Length",
        beam: f64 => "Beam",
        position_reference_from_starboard: f64 => "PositionReferenceFromStarboard",
        position_reference_from_bow: f64 => "PositionReferenceFromBow",
        mothership_user_id: u32 => "MothershipUserId",
        ais_transceiver_information: u8 => "AisTransceiverInformation",
        sequence_id: u8 => "SequenceId",
    }
);

ais_translate!(
    Pgn129038, Pgn129039, Pgn129040, Pgn129041, Pgn129793, Pgn129794, Pgn129798, Pgn129801,
    Pgn129802, Pgn129809, Pgn129810,
);

//==================================================================================ENCODE
/// `!--VDM` / `!--VDO`. Fragments are buffered until the message is complete;
/// an incomplete message yields no PGN.
pub(crate) fn encode_vdm(
    sentence: &ParsedSentence<'_>,
    ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let fragment = AisFragment::from_sentence(sentence)?;
    let Some(message) = ctx.ais.push(fragment)? else {
        return Ok(Vec::new());
    };

    let year = ctx.state.date.map_or(DEFAULT_ETA_YEAR, |date| date.year());
    let (descriptor, fields) = ais::decode_message(&message, year)?;
    Ok(vec![PgnMessage {
        pgn: descriptor.id,
        priority: descriptor.priority,
        payload: engine::serialize(&fields, descriptor)?,
    }])
}
