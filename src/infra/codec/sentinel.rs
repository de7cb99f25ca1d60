//! "Data not available" conventions.
//!
//! NMEA 2000 reserves the largest value of a field: all ones for unsigned
//! fields of two bits or more, the largest positive value for signed ones.
//! Single-bit fields have no such value. AIS uses per-field constants instead
//! ([`ais`]); the two families are never mixed.

/// Raw value meaning "not available" in an unsigned N2K field.
pub const fn unsigned_sentinel(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Value meaning "not available" in a signed N2K field.
pub const fn signed_sentinel(bits: u32) -> i64 {
    if bits == 0 {
        0
    } else if bits >= 64 {
        i64::MAX
    } else {
        (1i64 << (bits - 1)) - 1
    }
}

/// Check an unsigned raw value against its sentinel.
pub fn is_unsigned_sentinel(raw: u64, bits: u32) -> bool {
    bits >= 2 && raw == unsigned_sentinel(bits)
}

/// Check a sign-extended value against its sentinel.
pub fn is_signed_sentinel(value: i64, bits: u32) -> bool {
    bits >= 2 && value == signed_sentinel(bits)
}

/// Map an unsigned raw field to `None` when it carries the sentinel.
pub fn n2k_unsigned(raw: u64, bits: u32) -> Option<u64> {
    (!is_unsigned_sentinel(raw, bits)).then_some(raw)
}

/// Map a signed field to `None` when it carries the sentinel.
pub fn n2k_signed(value: i64, bits: u32) -> Option<i64> {
    (!is_signed_sentinel(value, bits)).then_some(value)
}

/// AIS "not available" constants, expressed in raw field units.
pub mod ais {
    /// Course over ground, 0.1°.
    pub const COG: u64 = 3600;
    /// Speed over ground, 0.1 kn.
    pub const SOG: u64 = 1023;
    /// True heading, degrees.
    pub const HEADING: u64 = 511;
    /// Latitude 91°, 1/10000 min.
    pub const LATITUDE: i64 = 91 * 600_000;
    /// Longitude 181°, 1/10000 min.
    pub const LONGITUDE: i64 = 181 * 600_000;
    /// Rate of turn.
    pub const ROT: i64 = -128;
    /// UTC second of the position report.
    pub const TIMESTAMP: u64 = 60;
    /// SAR aircraft altitude, metres.
    pub const ALTITUDE: u64 = 4095;
    /// Draught, 0.1 m.
    pub const DRAUGHT: u64 = 0;
    /// Ship and cargo type.
    pub const SHIP_TYPE: u64 = 0;
    /// Dimensions to bow/stern/port/starboard.
    pub const DIMENSION: u64 = 0;
    /// ETA month/day.
    pub const ETA_MONTH: u64 = 0;
    pub const ETA_DAY: u64 = 0;
    pub const ETA_HOUR: u64 = 24;
    pub const ETA_MINUTE: u64 = 60;
    /// Base station UTC fields.
    pub const UTC_YEAR: u64 = 0;
    pub const UTC_MONTH: u64 = 0;
    pub const UTC_DAY: u64 = 0;
    pub const UTC_HOUR: u64 = 24;
    pub const UTC_MINUTE: u64 = 60;
    pub const UTC_SECOND: u64 = 60;
    /// IMO number.
    pub const IMO: u64 = 0;
}
