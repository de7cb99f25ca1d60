//! Wind (MWV) and water temperature (MTW).
use alloc::vec::Vec;

use super::registry::{require_f64, single, DecodeContext, EncodeContext, Translate};
use super::units::{celsius, from_knots, heading_degrees, kelvin, radians, wrap_radians, MS_TO_KMH};
use super::PgnMessage;
use crate::core::{FieldDescriptor as F, PgnDescriptor};
use crate::error::EncodeError;
use crate::protocol::nmea0183::ParsedSentence;

/// Wind reference lookup: apparent.
pub const WIND_APPARENT: u8 = 2;
/// Wind reference lookup: true, boat referenced.
pub const WIND_TRUE_BOAT: u8 = 3;
/// Temperature source lookup: sea temperature.
pub const TEMPERATURE_SEA: u8 = 0;

fn emit_mtw(ctx: &mut DecodeContext<'_>, temperature: f64) {
    let mtw = ctx
        .sentence("MTW")
        .float(Some(celsius(temperature)), 1)
        .flag('C');
    ctx.emit(mtw);
}

//==================================================================================130306
static PGN_130306_FIELDS: [F; 5] = [
    F::unsigned("Sid", 8),
    F::unsigned("WindSpeed", 16).scaled(0.01),
    F::unsigned("WindAngle", 16).scaled(0.0001),
    F::lookup("Reference", 3),
    F::reserved(21),
];

pub static PGN_130306_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 130306,
    name: "Wind Data",
    priority: 2,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_130306_FIELDS,
};

pgn_record!(
    Pgn130306 => &PGN_130306_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        /// m/s.
        wind_speed: f64 => "WindSpeed",
        /// Radians, clockwise from the bow (or north for ground referenced wind).
        wind_angle: f64 => "WindAngle",
        reference: u8 => "Reference",
    }
);

impl Translate for Pgn130306 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        if self.wind_speed.is_none() && self.wind_angle.is_none() {
            return;
        }
        let reference = if self.reference == Some(WIND_APPARENT) { 'R' } else { 'T' };
        let mwv = ctx
            .sentence("MWV")
            .float(self.wind_angle.map(heading_degrees), 1)
            .flag(reference)
            .float(self.wind_speed, 1)
            .flag('M')
            .flag('A');
        ctx.emit(mwv);
    }
}

/// `$--MWV,angle,R|T,speed,K|M|N,status`
pub(crate) fn encode_mwv(
    sentence: &ParsedSentence<'_>,
    _ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let angle = require_f64(sentence, 0)?;
    let reference = match sentence.char(1) {
        Some('R') => WIND_APPARENT,
        Some('T') => WIND_TRUE_BOAT,
        _ => return Err(EncodeError::MissingField { index: 1 }),
    };
    let wind_speed = sentence.f64(2).map(|speed| match sentence.char(3) {
        Some('N') => from_knots(speed),
        Some('K') => speed / MS_TO_KMH,
        _ => speed,
    });

    single(&Pgn130306 {
        wind_speed,
        wind_angle: Some(wrap_radians(radians(angle))),
        reference: Some(reference),
        ..Default::default()
    })
}

//==================================================================================130310
static PGN_130310_FIELDS: [F; 5] = [
    F::unsigned("Sid", 8),
    F::unsigned("WaterTemperature", 16).scaled(0.01),
    F::unsigned("OutsideAmbientAirTemperature", 16).scaled(0.01),
    F::unsigned("AtmosphericPressure", 16).scaled(100.0),
    F::reserved(8),
];

pub static PGN_130310_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 130310,
    name: "Environmental Parameters",
    priority: 5,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_130310_FIELDS,
};

pgn_record!(
    Pgn130310 => &PGN_130310_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        /// Kelvin.
        water_temperature: f64 => "WaterTemperature",
        /// Kelvin.
        outside_ambient_air_temperature: f64 => "OutsideAmbientAirTemperature",
        /// Pascal.
        atmospheric_pressure: f64 => "AtmosphericPressure",
    }
);

impl Translate for Pgn130310 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        if let Some(temperature) = self.water_temperature {
            emit_mtw(ctx, temperature);
        }
    }
}

/// `$--MTW,celsius,C`
pub(crate) fn encode_mtw(
    sentence: &ParsedSentence<'_>,
    _ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let temperature = require_f64(sentence, 0)?;
    single(&Pgn130310 {
        water_temperature: Some(kelvin(temperature)),
        ..Default::default()
    })
}

//==================================================================================130312
static PGN_130312_FIELDS: [F; 6] = [
    F::unsigned("Sid", 8),
    F::unsigned("Instance", 8),
    F::lookup("Source", 8),
    F::unsigned("ActualTemperature", 16).scaled(0.01),
    F::unsigned("SetTemperature", 16).scaled(0.01),
    F::reserved(8),
];

pub static PGN_130312_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 130312,
    name: "Temperature",
    priority: 5,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_130312_FIELDS,
};

pgn_record!(
    Pgn130312 => &PGN_130312_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        instance: u8 => "Instance",
        source: u8 => "Source",
        /// Kelvin.
        actual_temperature: f64 => "ActualTemperature",
        /// Kelvin.
        set_temperature: f64 => "SetTemperature",
    }
);

impl Translate for Pgn130312 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        if self.source != Some(TEMPERATURE_SEA) {
            return;
        }
        if let Some(temperature) = self.actual_temperature {
            emit_mtw(ctx, temperature);
        }
    }
}
