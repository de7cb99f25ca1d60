//! Speed through water (VHW) and water depth (DPT, DBT).
use alloc::vec::Vec;

use super::registry::{require_f64, single, DecodeContext, EncodeContext, Translate};
use super::units::{
    from_knots, heading_degrees, knots, KNOTS_TO_KMH, METERS_TO_FATHOMS, METERS_TO_FEET,
};
use super::PgnMessage;
use crate::core::{FieldDescriptor as F, PgnDescriptor};
use crate::error::EncodeError;
use crate::protocol::nmea0183::ParsedSentence;

/// Speed water referenced type lookup: paddle wheel.
pub const SPEED_SENSOR_PADDLE_WHEEL: u8 = 0;

//==================================================================================128259
static PGN_128259_FIELDS: [F; 6] = [
    F::unsigned("Sid", 8),
    F::unsigned("SpeedWaterReferenced", 16).scaled(0.01),
    F::unsigned("SpeedGroundReferenced", 16).scaled(0.01),
    F::lookup("SpeedWaterReferencedType", 8),
    F::unsigned("SpeedDirection", 4),
    F::reserved(12),
];

pub static PGN_128259_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 128259,
    name: "Speed, Water Referenced",
    priority: 2,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_128259_FIELDS,
};

pgn_record!(
    /// Speed, water referenced.
    Pgn128259 => &PGN_128259_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        /// m/s.
        speed_water_referenced: f64 => "SpeedWaterReferenced",
        /// m/s.
        speed_ground_referenced: f64 => "SpeedGroundReferenced",
        speed_water_referenced_type: u8 => "SpeedWaterReferencedType",
        speed_direction: u8 => "SpeedDirection",
    }
);

impl Translate for Pgn128259 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        let Some(speed) = self.speed_water_referenced else {
            return;
        };
        let speed_knots = knots(speed);
        let vhw = ctx
            .sentence("VHW")
            .float(ctx.state.heading_true.map(heading_degrees), 1)
            .flag('T')
            .float(ctx.state.heading_magnetic.map(heading_degrees), 1)
            .flag('M')
            .float(Some(speed_knots), 2)
            .flag('N')
            .float(Some(speed_knots * KNOTS_TO_KMH), 2)
            .flag('K');
        ctx.emit(vhw);
    }
}

/// `$--VHW,true,T,magnetic,M,knots,N,kmh,K`
pub(crate) fn encode_vhw(
    sentence: &ParsedSentence<'_>,
    _ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let speed = match sentence.f64(4) {
        Some(speed_knots) => from_knots(speed_knots),
        None => from_knots(require_f64(sentence, 6)? / KNOTS_TO_KMH),
    };
    single(&Pgn128259 {
        speed_water_referenced: Some(speed),
        speed_water_referenced_type: Some(SPEED_SENSOR_PADDLE_WHEEL),
        ..Default::default()
    })
}

//==================================================================================128267
static PGN_128267_FIELDS: [F; 4] = [
    F::unsigned("Sid", 8),
    F::unsigned("Depth", 32).scaled(0.01),
    F::signed("Offset", 16).scaled(0.001),
    F::unsigned("Range", 8).scaled(10.0),
];

pub static PGN_128267_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 128267,
    name: "Water Depth",
    priority: 3,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_128267_FIELDS,
};

pgn_record!(
    Pgn128267 => &PGN_128267_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        /// Depth below transducer, metres.
        depth: f64 => "Depth",
        /// Transducer offset, metres. Positive to the waterline, negative to the keel.
        offset: f64 => "Offset",
        /// Maximum measuring range, metres.
        range: f64 => "Range",
    }
);

impl Translate for Pgn128267 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        let Some(depth) = self.depth else {
            return;
        };
        let dpt = ctx
            .sentence("DPT")
            .float(Some(depth), 2)
            .float(self.offset, 3)
            .float(self.range, 0);
        ctx.emit(dpt);
        let dbt = ctx
            .sentence("DBT")
            .float(Some(depth * METERS_TO_FEET), 1)
            .flag('f')
            .float(Some(depth), 2)
            .flag('M')
            .float(Some(depth * METERS_TO_FATHOMS), 1)
            .flag('F');
        ctx.emit(dbt);
    }
}

/// `$--DPT,depth,offset,range`
pub(crate) fn encode_dpt(
    sentence: &ParsedSentence<'_>,
    _ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    single(&Pgn128267 {
        depth: Some(require_f64(sentence, 0)?),
        offset: sentence.f64(1),
        range: sentence.f64(2),
        ..Default::default()
    })
}

/// `$--DBT,feet,f,metres,M,fathoms,F`
pub(crate) fn encode_dbt(
    sentence: &ParsedSentence<'_>,
    _ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let depth = match sentence.f64(2) {
        Some(metres) => metres,
        None => require_f64(sentence, 0)? / METERS_TO_FEET,
    };
    single(&Pgn128267 {
        depth: Some(depth),
        ..Default::default()
    })
}
