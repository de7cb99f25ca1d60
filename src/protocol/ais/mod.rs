//! AIS over NMEA: armored `!AIVDM`/`!AIVDO` sentences ⇄ AIS PGNs.
//!
//! Inbound sentences are reassembled by [`AisSentenceAssembler`], unarmored
//! into a [`BitVector`] and mapped onto a PGN field set through the layout
//! table. Outbound PGNs take the reverse path and are split over as many
//! sentences as the payload needs.
use alloc::string::String;
use alloc::vec::Vec;

use crate::core::{FieldSet, PgnDescriptor, PgnValue};
use crate::error::AisError;
use crate::infra::codec::bits::BitVector;
use crate::protocol::messages::DecodeContext;
use crate::protocol::nmea0183::Sentence;

pub mod armor;
pub mod layouts;
pub mod sentence;

pub use armor::{armor_to_bits, bits_to_armor, decode_six_bit_char, encode_six_bit_char};
pub use layouts::{bits_to_fields, fields_to_bits, layout_for_message, layout_for_pgn};
pub use sentence::{AisFragment, AisMessage, AisSentenceAssembler};

/// Talker of the sentences produced from AIS PGNs.
pub const AIS_TALKER: &str = "AI";
/// Armor characters per sentence.
pub const MAX_PAYLOAD_CHARS: usize = 60;

/// Transceiver information values for own vessel reports (`VDO`).
const OWN_VESSEL_TRANSCEIVER: [u8; 3] = [2, 3, 4];

/// Unarmor a complete message and decode it into the fields of its PGN.
pub fn decode_message(
    message: &AisMessage,
    year: i32,
) -> Result<(&'static PgnDescriptor, FieldSet), AisError> {
    let bits = armor_to_bits(&message.payload, message.fill_bits)?;
    let (layout, mut fields) = bits_to_fields(&bits, year)?;
    fields.insert(
        "AisTransceiverInformation",
        PgnValue::U64(message.transceiver() as u64),
    );
    Ok((layout.descriptor, fields))
}

/// Render an AIS PGN as `!AIVDM` (or `!AIVDO`) sentences.
///
/// `next_sequence` is only called when the message spans several sentences.
pub fn render(
    descriptor: &'static PgnDescriptor,
    fields: &FieldSet,
    next_sequence: impl FnOnce() -> u8,
) -> Result<Vec<Sentence>, AisError> {
    let bits: BitVector = fields_to_bits(descriptor, fields)?;
    let (armor, fill) = bits_to_armor(&bits);

    let transceiver = fields.u8("AisTransceiverInformation").unwrap_or(0);
    let formatter = if OWN_VESSEL_TRANSCEIVER.contains(&transceiver) {
        "VDO"
    } else {
        "VDM"
    };
    let channel = match transceiver {
        1 | 3 => "B",
        _ => "A",
    };

    let chunks: Vec<String> = armor
        .as_bytes()
        .chunks(MAX_PAYLOAD_CHARS)
        .map(|chunk| chunk.iter().map(|b| *b as char).collect())
        .collect();
    let total = chunks.len().max(1);
    let sequence = (total > 1).then(next_sequence);

    let sentences = (0..total)
        .map(|index| {
            let last = index + 1 == total;
            Sentence::encapsulated(AIS_TALKER, formatter)
                .int(Some(total))
                .int(Some(index + 1))
                .int(sequence)
                .text(channel)
                .text(chunks.get(index).map_or("", String::as_str))
                .int(Some(if last { fill } else { 0 }))
        })
        .collect();
    Ok(sentences)
}

/// Translate an AIS PGN into sentences and hand them to the sink.
pub fn emit(descriptor: &'static PgnDescriptor, fields: &FieldSet, ctx: &mut DecodeContext<'_>) {
    let state = &mut *ctx.state;
    match render(descriptor, fields, || state.next_ais_sequence()) {
        Ok(sentences) => {
            for sentence in sentences {
                ctx.emit(sentence);
            }
        }
        Err(_err) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("AIS PGN {} not rendered: {}", descriptor.id, defmt::Debug2Format(&_err));
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
