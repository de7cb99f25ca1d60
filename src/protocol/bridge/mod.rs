//! The gateway pipeline: CAN frames in, NMEA 0183 sentences out, and the
//! reverse path from sentences to CAN frames.
//!
//! [`Bridge`] is a plain owned value. Every call takes the current instant from
//! the caller, so the same pipeline runs on a microcontroller, on a desktop
//! adapter or under a test clock. [`service`] wraps it in a task fed by
//! `embassy_sync` channels.
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use crate::error::EncodeError;
use crate::protocol::ais::AisSentenceAssembler;
use crate::protocol::messages::registry::{pgn_entry, sentence_entry};
use crate::protocol::messages::{BridgeState, DecodeContext, DecodedPgnRecord, EncodeContext, FamilyMask};
use crate::protocol::nmea0183::{ParsedSentence, SentenceSink, DEFAULT_TALKER};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanHeader;
use crate::protocol::transport::fast_packet::assembler::{
    AssemblerStats, FastPacketAssembler, ProcessResult, DEFAULT_POOL_CAPACITY,
    DEFAULT_STALE_TIMEOUT_MS,
};
use crate::protocol::transport::fast_packet::builder::FastPacketBuilder;
use crate::protocol::transport::DEFAULT_INTER_FRAME_DELAY_MS;

pub mod service;

/// Source address used until the application configures its own.
pub const DEFAULT_SOURCE_ADDRESS: u8 = 35;
/// The message counter wraps to 0 when it reaches this value.
pub const SEQUENCE_ROLLOVER: u8 = 253;

//==================================================================================CONFIG
/// Settings read by the bridge. Nothing here changes while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    /// Families translated from NMEA 2000 to NMEA 0183.
    pub rx_families: FamilyMask,
    /// Families accepted from NMEA 0183 for transmission.
    pub tx_families: FamilyMask,
    /// Own address, written in the source field of every outbound frame.
    pub source_address: u8,
    /// Talker id of parametric sentences.
    pub talker: &'static str,
    pub pool_capacity: usize,
    pub stale_timeout_ms: u64,
    /// Pause between two frames of one outbound message.
    pub inter_frame_delay_ms: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            rx_families: FamilyMask::ALL,
            tx_families: FamilyMask::ALL,
            source_address: DEFAULT_SOURCE_ADDRESS,
            talker: DEFAULT_TALKER,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            stale_timeout_ms: DEFAULT_STALE_TIMEOUT_MS,
            inter_frame_delay_ms: DEFAULT_INTER_FRAME_DELAY_MS,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rx_families(mut self, families: FamilyMask) -> Self {
        self.rx_families = families;
        self
    }

    pub fn with_tx_families(mut self, families: FamilyMask) -> Self {
        self.tx_families = families;
        self
    }

    pub fn with_source_address(mut self, source_address: u8) -> Self {
        self.source_address = source_address;
        self
    }

    /// Two-character talker id, `II` by default.
    pub fn with_talker(mut self, talker: &'static str) -> Self {
        self.talker = talker;
        self
    }

    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    pub fn with_stale_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.stale_timeout_ms = timeout_ms;
        self
    }

    pub fn with_inter_frame_delay_ms(mut self, delay_ms: u32) -> Self {
        self.inter_frame_delay_ms = delay_ms;
        self
    }
}

//==================================================================================SEQUENCE
/// Per-message counter of outbound fast packets.
///
/// Runs from 0 to `SEQUENCE_ROLLOVER - 1`; the 3-bit fast packet id is the
/// value modulo 8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceCounter(u8);

impl SequenceCounter {
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Id carried in the sequence byte of the next fast packet.
    pub const fn fast_packet_id(&self) -> u8 {
        self.0 % 8
    }

    /// Move to the next message. Returns the value before the increment.
    pub fn advance(&mut self) -> u8 {
        let current = self.0;
        self.0 = match self.0.wrapping_add(1) {
            next if next >= SEQUENCE_ROLLOVER => 0,
            next => next,
        };
        current
    }
}

//==================================================================================STATS
/// Pipeline counters. Nothing in the inbound path is reported as an error;
/// every discarded input ends up here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeStats {
    pub assembler: AssemblerStats,
    /// Payloads decoded into a record.
    pub decoded: u32,
    /// Payloads the codec rejected.
    pub decode_errors: u32,
    /// Frames of PGNs without a registry entry.
    pub unsupported: u32,
    /// Frames of a family disabled for reception.
    pub filtered: u32,
    /// Sentences turned into PGNs.
    pub encoded: u32,
    /// Sentences that produced an error.
    pub encode_errors: u32,
}

//==================================================================================BRIDGE
/// Owns every piece of mutable pipeline state.
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    assembler: FastPacketAssembler,
    ais: AisSentenceAssembler,
    state: BridgeState,
    sequence: SequenceCounter,
    stats: BridgeStats,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            assembler: FastPacketAssembler::with_capacity(
                config.pool_capacity,
                Duration::from_millis(config.stale_timeout_ms),
            ),
            ais: AisSentenceAssembler::new(),
            state: BridgeState::new(),
            sequence: SequenceCounter::new(),
            stats: BridgeStats::default(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Values remembered across messages.
    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    pub fn sequence(&self) -> SequenceCounter {
        self.sequence
    }

    pub fn stats(&self) -> BridgeStats {
        BridgeStats {
            assembler: self.assembler.stats(),
            ..self.stats
        }
    }

    //==================================================================================N2K_TO_0183
    /// Feed one received frame.
    ///
    /// Sentences produced by a completed message go to `sink`; the decoded
    /// record is returned. Incomplete, unknown, filtered and malformed input
    /// yields `None` and shows up in [`Bridge::stats`].
    pub fn on_frame(
        &mut self,
        frame: &CanFrame,
        now: Instant,
        sink: &mut dyn SentenceSink,
    ) -> Option<DecodedPgnRecord> {
        let header = frame.header();
        let Some(entry) = pgn_entry(header.pgn) else {
            self.stats.unsupported = self.stats.unsupported.wrapping_add(1);
            return None;
        };
        if !self.config.rx_families.contains(entry.family) {
            self.stats.filtered = self.stats.filtered.wrapping_add(1);
            return None;
        }

        let data = &frame.data[..frame.len.min(frame.data.len())];
        let message = match self.assembler.process_frame(header, data, now) {
            ProcessResult::MessageComplete(message) => message,
            ProcessResult::FragmentConsumed | ProcessResult::Ignored => return None,
        };

        let mut ctx = DecodeContext {
            header: message.header,
            talker: self.config.talker,
            state: &mut self.state,
            sink,
        };
        match (entry.decode)(&message.payload, &mut ctx) {
            Ok(record) => {
                self.stats.decoded = self.stats.decoded.wrapping_add(1);
                Some(record)
            }
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "PGN {} from {} not decoded: {}",
                    header.pgn,
                    header.source,
                    defmt::Debug2Format(&_err)
                );
                self.stats.decode_errors = self.stats.decode_errors.wrapping_add(1);
                None
            }
        }
    }

    /// Reclaim fast packet slots without progress. Returns the number freed.
    pub fn collect_garbage(&mut self, now: Instant) -> usize {
        self.assembler.collect_garbage(now)
    }

    //==================================================================================0183_TO_N2K
    /// Translate one sentence into the PGN payloads it maps to, with the
    /// header each one must be sent under.
    ///
    /// An AIS fragment that does not complete its message returns an empty list.
    pub fn encode_message(&mut self, line: &str) -> Result<Vec<(CanHeader, Vec<u8>)>, EncodeError> {
        let result = self.encode_inner(line);
        match &result {
            Ok(_) => self.stats.encoded = self.stats.encoded.wrapping_add(1),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("sentence not encoded: {}", defmt::Debug2Format(_err));
                self.stats.encode_errors = self.stats.encode_errors.wrapping_add(1);
            }
        }
        result
    }

    fn encode_inner(&mut self, line: &str) -> Result<Vec<(CanHeader, Vec<u8>)>, EncodeError> {
        let sentence = ParsedSentence::parse(line)?;
        let entry = sentence_entry(sentence.formatter).ok_or(EncodeError::UnsupportedSentence)?;
        if !self.config.tx_families.contains(entry.family) {
            return Err(EncodeError::FamilyDisabled);
        }

        let mut ctx = EncodeContext {
            state: &mut self.state,
            ais: &mut self.ais,
        };
        let messages = (entry.encode)(&sentence, &mut ctx)?;

        let source = self.config.source_address;
        Ok(messages
            .into_iter()
            .map(|message| {
                let header = CanHeader::new(message.pgn, source).with_priority(message.priority);
                (header, message.payload)
            })
            .collect())
    }

    /// Translate one sentence straight into the frames to transmit.
    ///
    /// Each fast packet takes the next value of the message counter.
    pub fn encode_frames(&mut self, line: &str) -> Result<Vec<CanFrame>, EncodeError> {
        let messages = self.encode_message(line)?;
        let mut frames = Vec::new();
        for (header, payload) in &messages {
            let builder = FastPacketBuilder::new(*header, payload, self.sequence.fast_packet_id())?;
            if builder.is_fast() {
                self.sequence.advance();
            }
            frames.extend(builder.build());
        }
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
