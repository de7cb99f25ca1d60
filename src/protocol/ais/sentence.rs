//! `!--VDM` / `!--VDO` fragments and their reassembly.
use alloc::string::String;

use crate::error::AisError;
use crate::protocol::nmea0183::ParsedSentence;

/// Number of sequential message ids, 0 to 9.
pub const AIS_SEQUENCE_SLOTS: usize = 10;

/// One encapsulated sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AisFragment {
    pub total_sentences: u8,
    pub sentence_number: u8,
    /// Sequential message id, only present on multi-sentence messages.
    pub sequence_id: Option<u8>,
    pub channel: Option<char>,
    /// `VDO`: report of the own vessel.
    pub own_vessel: bool,
    pub payload: String,
    pub fill_bits: u8,
}

impl AisFragment {
    /// Read `!--VDM,total,number,seq,channel,payload,fill`.
    pub fn from_sentence(sentence: &ParsedSentence<'_>) -> Result<Self, AisError> {
        let count = |index: usize| {
            sentence
                .u32(index)
                .and_then(|n| u8::try_from(n).ok())
                .ok_or(AisError::InvalidFragment)
        };
        let total_sentences = count(0)?;
        let sentence_number = count(1)?;
        if !(1..=9).contains(&total_sentences) || !(1..=total_sentences).contains(&sentence_number) {
            return Err(AisError::InvalidFragment);
        }

        let sequence_id = match sentence.field(2) {
            Some(_) => {
                let id = count(2)?;
                if id as usize >= AIS_SEQUENCE_SLOTS {
                    return Err(AisError::InvalidFragment);
                }
                Some(id)
            }
            None => None,
        };
        let payload = sentence.field(4).ok_or(AisError::InvalidFragment)?;
        let fill_bits = match sentence.field(5) {
            Some(_) => count(5)?,
            None => 0,
        };

        Ok(Self {
            total_sentences,
            sentence_number,
            sequence_id,
            channel: sentence.char(3),
            own_vessel: sentence.formatter == "VDO",
            payload: String::from(payload),
            fill_bits,
        })
    }
}

/// A complete armored AIS message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AisMessage {
    pub payload: String,
    pub fill_bits: u8,
    pub channel: Option<char>,
    pub own_vessel: bool,
}

impl AisMessage {
    /// AIS transceiver information of the PGN: channel A/B reception 0/1,
    /// own vessel transmission 2/3.
    pub fn transceiver(&self) -> u8 {
        let channel_b = matches!(self.channel, Some('B' | '2'));
        match (self.own_vessel, channel_b) {
            (false, false) => 0,
            (false, true) => 1,
            (true, false) => 2,
            (true, true) => 3,
        }
    }
}

impl From<AisFragment> for AisMessage {
    fn from(fragment: AisFragment) -> Self {
        Self {
            payload: fragment.payload,
            fill_bits: fragment.fill_bits,
            channel: fragment.channel,
            own_vessel: fragment.own_vessel,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct AisSentenceBuffer {
    sentence_number: u8,
    total_sentences: u8,
    channel: Option<char>,
    own_vessel: bool,
    text: String,
}

/// Pending multi-sentence messages, one slot per sequential message id.
#[derive(Debug, Default)]
pub struct AisSentenceAssembler {
    slots: [Option<AisSentenceBuffer>; AIS_SEQUENCE_SLOTS],
}

impl AisSentenceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots currently holding a partial message.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Feed one fragment. Returns the message once its last sentence arrives.
    ///
    /// A fragment that does not follow the buffered one resets the slot and
    /// is rejected; a new first sentence replaces whatever the slot held.
    pub fn push(&mut self, fragment: AisFragment) -> Result<Option<AisMessage>, AisError> {
        if fragment.total_sentences == 1 {
            return Ok(Some(fragment.into()));
        }

        let id = fragment.sequence_id.unwrap_or(0) as usize;
        let slot = self.slots.get_mut(id).ok_or(AisError::InvalidFragment)?;

        if fragment.sentence_number == 1 {
            *slot = Some(AisSentenceBuffer {
                sentence_number: 1,
                total_sentences: fragment.total_sentences,
                channel: fragment.channel,
                own_vessel: fragment.own_vessel,
                text: fragment.payload,
            });
            return Ok(None);
        }

        let follows = slot.as_ref().is_some_and(|buffer| {
            buffer.total_sentences == fragment.total_sentences
                && buffer.sentence_number + 1 == fragment.sentence_number
        });
        if !follows {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "AIS fragment {}/{} out of order on slot {}",
                fragment.sentence_number,
                fragment.total_sentences,
                id
            );
            *slot = None;
            return Err(AisError::InvalidFragment);
        }

        let Some(buffer) = slot.as_mut() else {
            return Err(AisError::InvalidFragment);
        };
        buffer.sentence_number = fragment.sentence_number;
        buffer.text.push_str(&fragment.payload);

        if fragment.sentence_number < fragment.total_sentences {
            return Ok(None);
        }
        let Some(buffer) = slot.take() else {
            return Err(AisError::InvalidFragment);
        };
        Ok(Some(AisMessage {
            payload: buffer.text,
            fill_bits: fragment.fill_bits,
            channel: buffer.channel,
            own_vessel: buffer.own_vessel,
        }))
    }
}
