//! Network management PGNs. They have no NMEA 0183 counterpart and are
//! decoded as records only.
use crate::core::{FieldDescriptor as F, PgnDescriptor};

use super::registry::Translate;

//==================================================================================59904
static PGN_59904_FIELDS: [F; 1] = [F::pgn("Pgn")];

pub static PGN_59904_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 59904,
    name: "ISO Request",
    priority: 6,
    fastpacket: false,
    length: Some(3),
    fields: &PGN_59904_FIELDS,
};

pgn_record!(
    /// ISO Request: asks a node (or every node) to transmit a PGN.
    Pgn59904 => &PGN_59904_DESCRIPTOR,
    {
        pgn: u32 => "Pgn",
    }
);

impl Translate for Pgn59904 {}

//==================================================================================60928
static PGN_60928_FIELDS: [F; 10] = [
    F::unsigned("UniqueNumber", 21),
    F::lookup("ManufacturerCode", 11),
    F::unsigned("DeviceInstanceLower", 3),
    F::unsigned("DeviceInstanceUpper", 5),
    F::lookup("DeviceFunction", 8),
    F::spare(1),
    F::lookup("DeviceClass", 7),
    F::unsigned("SystemInstance", 4),
    F::lookup("IndustryGroup", 3),
    F::unsigned("ArbitraryAddressCapable", 1),
];

pub static PGN_60928_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 60928,
    name: "ISO Address Claim",
    priority: 6,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_60928_FIELDS,
};

pgn_record!(
    /// ISO Address Claim: the 64-bit NAME of the claiming node.
    Pgn60928 => &PGN_60928_DESCRIPTOR,
    {
        unique_number: u32 => "UniqueNumber",
        manufacturer_code: u16 => "ManufacturerCode",
        device_instance_lower: u8 => "DeviceInstanceLower",
        device_instance_upper: u8 => "DeviceInstanceUpper",
        device_function: u8 => "DeviceFunction",
        device_class: u8 => "DeviceClass",
        system_instance: u8 => "SystemInstance",
        industry_group: u8 => "IndustryGroup",
        arbitrary_address_capable: bool => "ArbitraryAddressCapable",
    }
);

impl Pgn60928 {
    /// The NAME as the 64-bit little-endian integer used for address arbitration.
    pub fn name(&self) -> Option<u64> {
        use crate::infra::codec::traits::PgnData;
        let payload = self.to_payload().ok()?;
        let bytes: [u8; 8] = payload.as_slice().try_into().ok()?;
        Some(u64::from_le_bytes(bytes))
    }
}

impl Translate for Pgn60928 {}

//==================================================================================126993
static PGN_126993_FIELDS: [F; 6] = [
    F::unsigned("DataTransmitOffset", 16).scaled(0.01),
    F::unsigned("SequenceCounter", 8),
    F::lookup("Controller1State", 2),
    F::lookup("Controller2State", 2),
    F::lookup("EquipmentStatus", 2),
    F::reserved(34),
];

pub static PGN_126993_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 126993,
    name: "Heartbeat",
    priority: 7,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_126993_FIELDS,
};

pgn_record!(
    Pgn126993 => &PGN_126993_DESCRIPTOR,
    {
        /// Transmission interval, seconds.
        data_transmit_offset: f64 => "DataTransmitOffset",
        sequence_counter: u8 => "SequenceCounter",
        controller1_state: u8 => "Controller1State",
        controller2_state: u8 => "Controller2State",
        equipment_status: u8 => "EquipmentStatus",
    }
);

impl Translate for Pgn126993 {}

//==================================================================================126996
static PGN_126996_FIELDS: [F; 8] = [
    F::unsigned("Nmea2000Version", 16).scaled(0.001),
    F::unsigned("ProductCode", 16),
    F::string_fix("ModelId", 256),
    F::string_fix("SoftwareVersionCode", 256),
    F::string_fix("ModelVersion", 256),
    F::string_fix("ModelSerialCode", 256),
    F::unsigned("CertificationLevel", 8),
    F::unsigned("LoadEquivalency", 8),
];

pub static PGN_126996_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 126996,
    name: "Product Information",
    priority: 6,
    fastpacket: true,
    length: Some(134),
    fields: &PGN_126996_FIELDS,
};

pgn_record!(
    Pgn126996 => &PGN_126996_DESCRIPTOR,
    {
        nmea2000_version: f64 => "Nmea2000Version",
        product_code: u16 => "ProductCode",
        model_id: alloc::string::String => "ModelId",
        software_version_code: alloc::string::String => "SoftwareVersionCode",
        model_version: alloc::string::String => "ModelVersion",
        model_serial_code: alloc::string::String => "ModelSerialCode",
        certification_level: u8 => "CertificationLevel",
        /// Bus load in units of 50 mA.
        load_equivalency: u8 => "LoadEquivalency",
    }
);

impl Translate for Pgn126996 {}
