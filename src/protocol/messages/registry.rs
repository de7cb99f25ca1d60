//! Registration tables driving both directions of the translation.
//!
//! Adding a PGN means adding one [`PgnEntry`]; adding an inbound sentence
//! means adding one [`SentenceEntry`]. Nothing else dispatches on numbers.
use alloc::string::ToString;
use alloc::vec::Vec;

use super::*;
use crate::core::PgnDescriptor;
use crate::error::{DeserializationError, EncodeError};
use crate::protocol::ais::AisSentenceAssembler;
use crate::protocol::nmea0183::{ParsedSentence, Sentence, SentenceSink};
use crate::protocol::transport::can_id::CanHeader;

//==================================================================================CONTEXTS
/// What a PGN translation can read and write while producing sentences.
pub struct DecodeContext<'a> {
    /// Header of the frame(s) carrying the payload.
    pub header: CanHeader,
    /// Talker id of emitted parametric sentences.
    pub talker: &'a str,
    pub state: &'a mut BridgeState,
    pub sink: &'a mut dyn SentenceSink,
}

impl DecodeContext<'_> {
    /// Empty parametric sentence with the configured talker.
    pub fn sentence(&self, formatter: &str) -> Sentence {
        Sentence::new(self.talker, formatter)
    }

    pub fn emit(&mut self, sentence: Sentence) {
        self.sink.emit(sentence.to_string());
    }
}

/// What a sentence encoder can read and write.
pub struct EncodeContext<'a> {
    pub state: &'a mut BridgeState,
    /// Pending multi-sentence AIS messages.
    pub ais: &'a mut AisSentenceAssembler,
}

//==================================================================================TRANSLATE
/// Decode-side behaviour of a record: the sentences it produces and the state
/// it updates. Records without an NMEA 0183 counterpart keep the default.
pub trait Translate: PgnData + Into<DecodedPgnRecord> {
    fn translate(&self, _ctx: &mut DecodeContext<'_>) {}
}

pub type DecodeFn =
    fn(&[u8], &mut DecodeContext<'_>) -> Result<DecodedPgnRecord, DeserializationError>;
pub type EncodeFn =
    fn(&ParsedSentence<'_>, &mut EncodeContext<'_>) -> Result<Vec<PgnMessage>, EncodeError>;

fn decode_with<P: Translate>(
    payload: &[u8],
    ctx: &mut DecodeContext<'_>,
) -> Result<DecodedPgnRecord, DeserializationError> {
    let record = P::from_payload(payload)?;
    record.translate(ctx);
    Ok(record.into())
}

//==================================================================================PGN_TABLE
/// One supported PGN.
pub struct PgnEntry {
    pub pgn: u32,
    pub family: PgnFamily,
    pub descriptor: &'static PgnDescriptor,
    pub decode: DecodeFn,
}

impl PgnEntry {
    const fn of<P: Translate>(family: PgnFamily) -> Self {
        Self {
            pgn: P::DESCRIPTOR.id,
            family,
            descriptor: P::DESCRIPTOR,
            decode: decode_with::<P>,
        }
    }
}

pub static PGN_REGISTRY: &[PgnEntry] = &[
    PgnEntry::of::<Pgn59904>(PgnFamily::Network),
    PgnEntry::of::<Pgn60928>(PgnFamily::Network),
    PgnEntry::of::<Pgn126992>(PgnFamily::Time),
    PgnEntry::of::<Pgn126993>(PgnFamily::Network),
    PgnEntry::of::<Pgn126996>(PgnFamily::Network),
    PgnEntry::of::<Pgn127245>(PgnFamily::Heading),
    PgnEntry::of::<Pgn127250>(PgnFamily::Heading),
    PgnEntry::of::<Pgn127251>(PgnFamily::Heading),
    PgnEntry::of::<Pgn127258>(PgnFamily::Heading),
    PgnEntry::of::<Pgn128259>(PgnFamily::Speed),
    PgnEntry::of::<Pgn128267>(PgnFamily::Depth),
    PgnEntry::of::<Pgn129025>(PgnFamily::Position),
    PgnEntry::of::<Pgn129026>(PgnFamily::Position),
    PgnEntry::of::<Pgn129029>(PgnFamily::Position),
    PgnEntry::of::<Pgn129038>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129039>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129040>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129041>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129283>(PgnFamily::Navigation),
    PgnEntry::of::<Pgn129793>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129794>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129798>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129801>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129802>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129809>(PgnFamily::Ais),
    PgnEntry::of::<Pgn129810>(PgnFamily::Ais),
    PgnEntry::of::<Pgn130306>(PgnFamily::Environment),
    PgnEntry::of::<Pgn130310>(PgnFamily::Environment),
    PgnEntry::of::<Pgn130312>(PgnFamily::Environment),
];

pub fn pgn_entry(pgn: u32) -> Option<&'static PgnEntry> {
    PGN_REGISTRY.iter().find(|entry| entry.pgn == pgn)
}

//==================================================================================SENTENCE_TABLE
/// One inbound sentence formatter.
pub struct SentenceEntry {
    pub formatter: &'static str,
    pub family: PgnFamily,
    pub encode: EncodeFn,
}

pub static SENTENCE_REGISTRY: &[SentenceEntry] = &[
    SentenceEntry { formatter: "ZDA", family: PgnFamily::Time, encode: encode_zda },
    SentenceEntry { formatter: "RSA", family: PgnFamily::Heading, encode: encode_rsa },
    SentenceEntry { formatter: "HDG", family: PgnFamily::Heading, encode: encode_hdg },
    SentenceEntry { formatter: "HDM", family: PgnFamily::Heading, encode: encode_hdm },
    SentenceEntry { formatter: "HDT", family: PgnFamily::Heading, encode: encode_hdt },
    SentenceEntry { formatter: "ROT", family: PgnFamily::Heading, encode: encode_rot },
    SentenceEntry { formatter: "VHW", family: PgnFamily::Speed, encode: encode_vhw },
    SentenceEntry { formatter: "DPT", family: PgnFamily::Depth, encode: encode_dpt },
    SentenceEntry { formatter: "DBT", family: PgnFamily::Depth, encode: encode_dbt },
    SentenceEntry { formatter: "GLL", family: PgnFamily::Position, encode: encode_gll },
    SentenceEntry { formatter: "RMC", family: PgnFamily::Position, encode: encode_rmc },
    SentenceEntry { formatter: "VTG", family: PgnFamily::Position, encode: encode_vtg },
    SentenceEntry { formatter: "GGA", family: PgnFamily::Position, encode: encode_gga },
    SentenceEntry { formatter: "XTE", family: PgnFamily::Navigation, encode: encode_xte },
    SentenceEntry { formatter: "MWV", family: PgnFamily::Environment, encode: encode_mwv },
    SentenceEntry { formatter: "MTW", family: PgnFamily::Environment, encode: encode_mtw },
    SentenceEntry { formatter: "VDM", family: PgnFamily::Ais, encode: encode_vdm },
    SentenceEntry { formatter: "VDO", family: PgnFamily::Ais, encode: encode_vdm },
];

pub fn sentence_entry(formatter: &str) -> Option<&'static SentenceEntry> {
    SENTENCE_REGISTRY.iter().find(|entry| entry.formatter == formatter)
}

//==================================================================================ENCODE_HELPERS
/// Required numeric field of an inbound sentence.
pub(crate) fn require_f64(sentence: &ParsedSentence<'_>, index: usize) -> Result<f64, EncodeError> {
    sentence.f64(index).ok_or(EncodeError::MissingField { index })
}

/// Single-record encoder result.
pub(crate) fn single<P: PgnData>(record: &P) -> Result<Vec<PgnMessage>, EncodeError> {
    Ok(alloc::vec![PgnMessage::from_record(record)?])
}
