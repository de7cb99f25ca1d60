//! Cross track error ⇄ XTE.
use alloc::vec::Vec;

use super::registry::{require_f64, single, DecodeContext, EncodeContext, Translate};
use super::units::{abs, NAUTICAL_MILE};
use super::PgnMessage;
use crate::core::{FieldDescriptor as F, PgnDescriptor};
use crate::error::EncodeError;
use crate::protocol::nmea0183::ParsedSentence;

/// XTE mode lookup, index order of the NMEA 0183 mode letters.
const XTE_MODES: [char; 5] = ['A', 'D', 'E', 'S', 'M'];

static PGN_129283_FIELDS: [F; 6] = [
    F::unsigned("Sid", 8),
    F::lookup("XteMode", 4),
    F::reserved(2),
    F::lookup("NavigationTerminated", 2),
    F::signed("Xte", 32).scaled(0.01),
    F::reserved(16),
];

pub static PGN_129283_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 129283,
    name: "Cross Track Error",
    priority: 3,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_129283_FIELDS,
};

pgn_record!(
    Pgn129283 => &PGN_129283_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        xte_mode: u8 => "XteMode",
        navigation_terminated: u8 => "NavigationTerminated",
        /// Metres. Positive when the vessel is right of course and must steer left.
        xte: f64 => "Xte",
    }
);

impl Translate for Pgn129283 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        let Some(xte) = self.xte else {
            return;
        };
        let steer = if xte < 0.0 { 'R' } else { 'L' };
        let mode = self
            .xte_mode
            .and_then(|m| XTE_MODES.get(m as usize).copied())
            .unwrap_or('A');
        let sentence = ctx
            .sentence("XTE")
            .flag('A')
            .flag('A')
            .float(Some(abs(xte) / NAUTICAL_MILE), 3)
            .flag(steer)
            .flag('N')
            .flag(mode);
        ctx.emit(sentence);
    }
}

/// `$--XTE,status,status,magnitude,L|R,N,mode`
pub(crate) fn encode_xte(
    sentence: &ParsedSentence<'_>,
    _ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let magnitude = require_f64(sentence, 2)?;
    let metres = match sentence.char(4) {
        Some('K') => magnitude * 1000.0,
        _ => magnitude * NAUTICAL_MILE,
    };
    let xte = match sentence.char(3) {
        Some('R') => -metres,
        Some('L') => metres,
        _ => return Err(EncodeError::MissingField { index: 3 }),
    };
    let xte_mode = sentence
        .char(5)
        .and_then(|c| XTE_MODES.iter().position(|m| *m == c))
        .map(|index| index as u8)
        .unwrap_or(0);

    single(&Pgn129283 {
        xte_mode: Some(xte_mode),
        navigation_terminated: Some(0),
        xte: Some(xte),
        ..Default::default()
    })
}
