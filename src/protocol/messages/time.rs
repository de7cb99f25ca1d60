//! System time ⇄ ZDA.
use alloc::vec::Vec;

use chrono::NaiveDate;

use super::registry::{require_f64, single, DecodeContext, EncodeContext, Translate};
use super::PgnMessage;
use crate::core::{FieldDescriptor as F, PgnDescriptor};
use crate::error::EncodeError;
use crate::infra::codec::calendar::{date_from_parts, date_parts};
use crate::protocol::nmea0183::ParsedSentence;

/// Time source lookup value for GPS.
pub const TIME_SOURCE_GPS: u8 = 0;

static PGN_126992_FIELDS: [F; 5] = [
    F::unsigned("Sid", 8),
    F::lookup("Source", 4),
    F::reserved(4),
    F::date("Date"),
    F::time("Time"),
];

pub static PGN_126992_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
    id: 126992,
    name: "System Time",
    priority: 3,
    fastpacket: false,
    length: Some(8),
    fields: &PGN_126992_FIELDS,
};

pgn_record!(
    Pgn126992 => &PGN_126992_DESCRIPTOR,
    {
        sid: u8 => "Sid",
        source: u8 => "Source",
        date: NaiveDate => "Date",
        /// Seconds since midnight UTC.
        time: f64 => "Time",
    }
);

impl Translate for Pgn126992 {
    fn translate(&self, ctx: &mut DecodeContext<'_>) {
        if self.date.is_some() {
            ctx.state.date = self.date;
        }
        let (day, month, year) = match self.date.map(date_parts) {
            Some((d, m, y)) => (Some(d), Some(m), Some(y)),
            None => (None, None, None),
        };
        let zda = ctx
            .sentence("ZDA")
            .time(self.time)
            .padded(day, 2)
            .padded(month, 2)
            .int(year)
            .empty()
            .empty();
        ctx.emit(zda);
    }
}

/// `$--ZDA,hhmmss.ss,dd,mm,yyyy,zh,zm`
pub(crate) fn encode_zda(
    sentence: &ParsedSentence<'_>,
    ctx: &mut EncodeContext<'_>,
) -> Result<Vec<PgnMessage>, EncodeError> {
    let time = sentence.time(0).ok_or(EncodeError::MissingField { index: 0 })?;
    let day = require_f64(sentence, 1)? as u32;
    let month = require_f64(sentence, 2)? as u32;
    let year = require_f64(sentence, 3)? as i32;
    let date = date_from_parts(day, month, year).ok_or(EncodeError::MissingField { index: 1 })?;
    ctx.state.date = Some(date);

    single(&Pgn126992 {
        source: Some(TIME_SOURCE_GPS),
        date: Some(date),
        time: Some(time),
        ..Default::default()
    })
}
