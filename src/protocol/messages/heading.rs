//! Steering PGNs: rudder (RSA), vessel heading (HDG/HDM/HDT), rate of turn
//! (ROT), magnetic variation (persisted only).
use alloc::vec::Vec;

use chrono::NaiveDate;

use super::registry::{require_f64, single, DecodeContext, EncodeContext, Translate};
use super::units::{degrees, heading_degrees, radians, wrap_radians};
use super::PgnMessage;
use crate::core::{FieldDescriptor as F, PgnDescriptor};
use crate::error::EncodeError;
use crate::protocol::nmea0183::ParsedSentence;

/// Direction reference lookup: true north.
pub const REFERENCE_TRUE: u8 = 0;
/// Direction reference lookup: magnetic north.
pub const REFERENCE_MAGNETIC: u8 = 1;

/// East positive angle to NMEA 0183 magnitude and E/W flag.
pub(crate) fn east_west(angle: Option<f64>) -> (Option<f64>, char) {
    match angle {
        Some(a) if a < 0.0 => (Some(degrees(-a)), 'W'),
        Some(a) => (Some(degrees(a)), 'E'),
        None => (None, 'E'),
    }
}

/// Magnitude at `index` with E/W at `index + 1`, east positive, in radians.
pub(crate) fn signed_east_west(sentence: &ParsedSentence<'_>, index: usize) -> Option<f64> {
    let magnitude = radians(sentence.f64(index)?);
    match sentence.char(index + 1) {
        Some('W') => Some(-magnitude),
        _ => Some(magnitude),
    }
}

//==================================================================================127245
static PGN_127245_FIELDS: [F; 6] = [
    F::unsigned("Instance", 8),
    F::lookup("DirectionOrder", 3),
    F::reserved(5),
    F::signed("AngleOrder", 16).scaled(0.0001),
    F::signed("Position", 16).scaled(0.0001),
    F::reserved(16),
];

pub static PGN_127245_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 127245,
    name: "Rudder",
    priority: 2,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_127245_FIELDS,
};

pgn_record!(
    Pgn127245 => &PGN_127245_DESCRIPTOR,
    {
        instance: u8 => "Instance",
        direction_order: u8 => "DirectionOrder",
        /// Commanded angle, radians.
        angle_order: f64 => "AngleOrder",
        /// Measured angle, radians, starboard positive.
        position: f64 => "Position",
    }
);

impl Translate for Pgn127245 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        let Some(position) = self.position else {
            return;
        };
        let rsa = ctx
            .sentence("RSA")
            .float(Some(degrees(position)), 1)
            .flag('A')
            .empty()
            .flag('V');
        ctx.emit(rsa);
    }
}

/// `$--RSA,starboard,A,port,V`
pub(crate) fn encode_rsa(
    sentence: &ParsedSentence<'_>,
    _ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    if sentence.char(1) != Some('A') {
        return Err(EncodeError::MissingField { index: 1 });
    }
    let angle = require_f64(sentence, 0)?;
    single(&Pgn127245 {
        instance: Some(0),
        position: Some(radians(angle)),
        ..Default::default()
    })
}

//==================================================================================127250
static PGN_127250_FIELDS: [F; 6] = [
    F::unsigned("Sid", 8),
    F::unsigned("Heading", 16).scaled(0.0001),
    F::signed("Deviation", 16).scaled(0.0001),
    F::signed("Variation", 16).scaled(0.0001),
    F::lookup("Reference", 2),
    F::reserved(6),
];

pub static PGN_127250_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 127250,
    name: "Vessel Heading",
    priority: 2,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_127250_FIELDS,
};

pgn_record!(
    Pgn127250 => &PGN_127250_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        /// Radians.
        heading: f64 => "Heading",
        /// Radians, east positive.
        deviation: f64 => "Deviation",
        /// Radians, east positive.
        variation: f64 => "Variation",
        /// [`REFERENCE_TRUE`] or [`REFERENCE_MAGNETIC`].
        reference: u8 => "Reference",
    }
);

impl Translate for Pgn127250 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        let Some(heading) = self.heading else {
            return;
        };
        if self.variation.is_some() {
            ctx.state.variation = self.variation;
        }

        if self.reference == Some(REFERENCE_MAGNETIC) {
            ctx.state.record_heading(heading, true);
            let (deviation, deviation_dir) = east_west(self.deviation);
            let (variation, variation_dir) = east_west(self.variation.or(ctx.state.variation));
            let hdg = ctx
                .sentence("HDG")
                .float(Some(heading_degrees(heading)), 1)
                .float(deviation, 1)
                .flag(deviation_dir)
                .float(variation, 1)
                .flag(variation_dir);
            ctx.emit(hdg);
            let hdm = ctx
                .sentence("HDM")
                .float(Some(heading_degrees(heading)), 1)
                .flag('M');
            ctx.emit(hdm);
        } else {
            ctx.state.record_heading(heading, false);
            let hdt = ctx
                .sentence("HDT")
                .float(Some(heading_degrees(heading)), 1)
                .flag('T');
            ctx.emit(hdt);
        }
    }
}

/// `$--HDG,heading,dev,E|W,var,E|W`
pub(crate) fn encode_hdg(
    sentence: &ParsedSentence<'_>,
    ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let heading = wrap_radians(radians(require_f64(sentence, 0)?));
    let variation = signed_east_west(sentence, 3);
    if variation.is_some() {
        ctx.state.variation = variation;
    }
    ctx.state.record_heading(heading, true);
    single(&Pgn127250 {
        heading: Some(heading),
        deviation: signed_east_west(sentence, 1),
        variation,
        reference: Some(REFERENCE_MAGNETIC),
        ..Default::default()
    })
}

/// `$--HDM,heading,M`
pub(crate) fn encode_hdm(
    sentence: &ParsedSentence<'_>,
    ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let heading = wrap_radians(radians(require_f64(sentence, 0)?));
    ctx.state.record_heading(heading, true);
    single(&Pgn127250 {
        heading: Some(heading),
        reference: Some(REFERENCE_MAGNETIC),
        ..Default::default()
    })
}

/// `$--HDT,heading,T`
pub(crate) fn encode_hdt(
    sentence: &ParsedSentence<'_>,
    ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let heading = wrap_radians(radians(require_f64(sentence, 0)?));
    ctx.state.record_heading(heading, false);
    single(&Pgn127250 {
        heading: Some(heading),
        reference: Some(REFERENCE_TRUE),
        ..Default::default()
    })
}

//==================================================================================127251
static PGN_127251_FIELDS: [F; 3] = [
    F::unsigned("Sid", 8),
    F::signed("Rate", 32).scaled(3.125e-08),
    F::reserved(24),
];

pub static PGN_127251_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 127251,
    name: "Rate of Turn",
    priority: 2,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_127251_FIELDS,
};

pgn_record!(
    Pgn127251 => &PGN_127251_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        /// Radians per second, starboard positive.
        rate: f64 => "Rate",
    }
);

impl Translate for Pgn127251 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        let Some(rate) = self.rate else {
            return;
        };
        // NMEA 0183 reports degrees per minute.
        let rot = ctx
            .sentence("ROT")
            .float(Some(degrees(rate) * 60.0), 1)
            .flag('A');
        ctx.emit(rot);
    }
}

/// `$--ROT,deg_per_min,A`
pub(crate) fn encode_rot(
    sentence: &ParsedSentence<'_>,
    _ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let per_minute = require_f64(sentence, 0)?;
    single(&Pgn127251 {
        rate: Some(radians(per_minute) / 60.0),
        ..Default::default()
    })
}

//==================================================================================127258
static PGN_127258_FIELDS: [F; 6] = [
    F::unsigned("Sid", 8),
    F::lookup("Source", 4),
    F::reserved(4),
    F::date("AgeOfService"),
    F::signed("Variation", 16).scaled(0.0001),
    F::reserved(16),
];

pub static PGN_127258_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 127258,
    name: "Magnetic Variation",
    priority: 7,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_127258_FIELDS,
};

pgn_record!(
    Pgn127258 => &PGN_127258_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        source: u8 => "Source",
        /// Date the variation model applies to.
        age_of_service: NaiveDate => "AgeOfService",
        /// Radians, east positive.
        variation: f64 => "Variation",
    }
);

impl Translate for Pgn127258 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        if self.variation.is_some() {
            ctx.state.variation = self.variation;
        }
    }
}
