//! NMEA 2000 Fast Packet assembler: rebuilds application messages by
//! aggregating the CAN frames of concurrent multi-frame conversations.
//!
//! Slots live in a fixed-capacity arena with a free list. A conversation is
//! identified by PGN, source, destination and the 3-bit message id of its
//! first frame. Losses never surface as errors: they end the conversation and
//! show up in [`AssemblerStats`].
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use super::{is_fast_message, CONTINUATION_FRAME_DATA, FIRST_FRAME_DATA, MAX_FAST_PACKET_PAYLOAD};
use crate::protocol::transport::can_id::CanHeader;

//==================================================================================Constants

/// Default number of conversations tracked in parallel.
pub const DEFAULT_POOL_CAPACITY: usize = 100;
/// Default time without progress after which a slot is reclaimed.
pub const DEFAULT_STALE_TIMEOUT_MS: u64 = 250;
/// At most one sequence-gap log line per window.
const GAP_LOG_WINDOW_MS: u64 = 1000;

//==================================================================================Enums and Structs
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Frame discarded (orphan continuation, gap, invalid first frame, pool exhausted).
    Ignored,
    /// Frame integrated; more fragments are expected.
    FragmentConsumed,
    /// A complete payload is available. Single-frame PGNs complete immediately.
    MessageComplete(CompletedMessage),
}

/// Reassembled payload handed to the PGN codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedMessage {
    pub header: CanHeader,
    pub payload: Vec<u8>,
}

/// Counters describing what the assembler saw and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AssemblerStats {
    /// Every frame handed to the assembler.
    pub frames: u32,
    /// Payloads delivered (single frame or reassembled).
    pub completed: u32,
    /// First frame received while the same conversation was still filling.
    pub overruns: u32,
    /// Frame counter did not follow the previous one.
    pub sequence_gaps: u32,
    /// Slots reclaimed by the garbage collector.
    pub stale_evictions: u32,
    /// First frames dropped because no slot was available.
    pub pool_exhausted: u32,
    /// Continuation frames without a conversation.
    pub orphan_frames: u32,
    /// First frames announcing an impossible length, or empty frames.
    pub invalid_frames: u32,
}

impl AssemblerStats {
    /// Partially received messages thrown away.
    pub fn dropped_messages(&self) -> u32 {
        self.overruns
            .wrapping_add(self.sequence_gaps)
            .wrapping_add(self.stale_evictions)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SlotState {
    Free,
    Filling,
}

/// One in-flight conversation.
#[derive(Debug)]
struct FastMessageSlot {
    state: SlotState,
    /// Time of the last accepted frame.
    arrival_time: Instant,
    header: CanHeader,
    /// Full sequence byte of the last accepted frame.
    sequence_id: u8,
    expected_length: usize,
    data: Vec<u8>,
}

impl FastMessageSlot {
    fn new() -> Self {
        Self {
            state: SlotState::Free,
            arrival_time: Instant::from_ticks(0),
            header: CanHeader::new(0, 0),
            sequence_id: 0,
            expected_length: 0,
            data: Vec::new(),
        }
    }

    fn epoch(&self) -> u8 {
        self.sequence_id >> 5
    }

    fn frame_index(&self) -> u8 {
        self.sequence_id & 0x1F
    }

    fn matches(&self, header: &CanHeader, epoch: u8) -> bool {
        self.state == SlotState::Filling
            && self.header.pgn == header.pgn
            && self.header.source == header.source
            && self.header.destination == header.destination
            && self.epoch() == epoch
    }
}

/// Rolling window limiting log output.
#[derive(Debug)]
struct LogWindow {
    window: Duration,
    last: Option<Instant>,
}

impl LogWindow {
    fn admit(&mut self, now: Instant) -> bool {
        let open = match self.last {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.window),
        };
        if open {
            self.last = Some(now);
        }
        open
    }
}

/// Main assembler: owns the slot arena.
#[derive(Debug)]
pub struct FastPacketAssembler {
    slots: Vec<FastMessageSlot>,
    free: Vec<usize>,
    stale_timeout: Duration,
    stats: AssemblerStats,
    gap_log: LogWindow,
}

impl Default for FastPacketAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FastPacketAssembler {
    /// Assembler with the default capacity and staleness timeout.
    pub fn new() -> Self {
        Self::with_capacity(
            DEFAULT_POOL_CAPACITY,
            Duration::from_millis(DEFAULT_STALE_TIMEOUT_MS),
        )
    }

    pub fn with_capacity(capacity: usize, stale_timeout: Duration) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, FastMessageSlot::new);
        Self {
            slots,
            free: (0..capacity).rev().collect(),
            stale_timeout,
            stats: AssemblerStats::default(),
            gap_log: LogWindow {
                window: Duration::from_millis(GAP_LOG_WINDOW_MS),
                last: None,
            },
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Conversations currently filling.
    pub fn in_flight(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }

    //==================================================================================Process Functions
    /// Process one CAN frame.
    ///
    /// * `header` – decoded identifier of the frame
    /// * `data` – valid payload bytes of the frame (DLC applied)
    /// * `now` – arrival time, used for staleness
    pub fn process_frame(&mut self, header: CanHeader, data: &[u8], now: Instant) -> ProcessResult {
        self.stats.frames = self.stats.frames.wrapping_add(1);

        if !is_fast_message(header.pgn) {
            self.stats.completed = self.stats.completed.wrapping_add(1);
            return ProcessResult::MessageComplete(CompletedMessage {
                header,
                payload: data.to_vec(),
            });
        }

        let Some(&sequence) = data.first() else {
            self.stats.invalid_frames = self.stats.invalid_frames.wrapping_add(1);
            return ProcessResult::Ignored;
        };
        let epoch = sequence >> 5;
        let frame_index = sequence & 0x1F;

        if let Some(index) = self.slots.iter().position(|s| s.matches(&header, epoch)) {
            let slot = &self.slots[index];
            if frame_index == slot.frame_index().wrapping_add(1) {
                return self.append(index, sequence, &data[1..], now);
            }

            self.release(index);
            if frame_index != 0 {
                self.stats.sequence_gaps = self.stats.sequence_gaps.wrapping_add(1);
                if self.gap_log.admit(now) {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "fast packet gap: pgn {} src {} frame {}",
                        header.pgn,
                        header.source,
                        frame_index
                    );
                }
                return ProcessResult::Ignored;
            }
            // A new first frame replaces the unfinished message.
            self.stats.overruns = self.stats.overruns.wrapping_add(1);
        } else if frame_index != 0 {
            self.stats.orphan_frames = self.stats.orphan_frames.wrapping_add(1);
            return ProcessResult::Ignored;
        }

        self.start(header, sequence, data, now)
    }

    /// Free every slot without progress for longer than the staleness timeout.
    /// Returns the number of slots reclaimed.
    pub fn collect_garbage(&mut self, now: Instant) -> usize {
        let mut reclaimed = 0;
        for index in 0..self.slots.len() {
            let slot = &self.slots[index];
            if slot.state != SlotState::Filling {
                continue;
            }
            let stale = now
                .checked_duration_since(slot.arrival_time)
                .is_some_and(|age| age > self.stale_timeout);
            if stale {
                self.release(index);
                self.stats.stale_evictions = self.stats.stale_evictions.wrapping_add(1);
                reclaimed += 1;
            }
        }
        #[cfg(feature = "defmt")]
        if reclaimed > 0 {
            defmt::debug!("fast packet gc reclaimed {} slots", reclaimed);
        }
        reclaimed
    }

    fn start(&mut self, header: CanHeader, sequence: u8, data: &[u8], now: Instant) -> ProcessResult {
        let expected_length = data.get(1).copied().unwrap_or(0) as usize;
        if expected_length == 0 || expected_length > MAX_FAST_PACKET_PAYLOAD {
            self.stats.invalid_frames = self.stats.invalid_frames.wrapping_add(1);
            return ProcessResult::Ignored;
        }

        let available = data.len().saturating_sub(2).min(FIRST_FRAME_DATA);
        let chunk = &data[2..2 + available];

        // Short messages fit in the first frame.
        if chunk.len() >= expected_length {
            self.stats.completed = self.stats.completed.wrapping_add(1);
            return ProcessResult::MessageComplete(CompletedMessage {
                header,
                payload: chunk[..expected_length].to_vec(),
            });
        }

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.collect_garbage(now);
                match self.free.pop() {
                    Some(index) => index,
                    None => {
                        self.stats.pool_exhausted = self.stats.pool_exhausted.wrapping_add(1);
                        return ProcessResult::Ignored;
                    }
                }
            }
        };

        let slot = &mut self.slots[index];
        slot.state = SlotState::Filling;
        slot.arrival_time = now;
        slot.header = header;
        slot.sequence_id = sequence;
        slot.expected_length = expected_length;
        slot.data.clear();
        slot.data.extend_from_slice(chunk);

        ProcessResult::FragmentConsumed
    }

    fn append(&mut self, index: usize, sequence: u8, body: &[u8], now: Instant) -> ProcessResult {
        let slot = &mut self.slots[index];
        let missing = slot.expected_length - slot.data.len();
        let take = missing.min(CONTINUATION_FRAME_DATA).min(body.len());
        slot.data.extend_from_slice(&body[..take]);
        slot.sequence_id = sequence;
        slot.arrival_time = now;

        if slot.data.len() < slot.expected_length {
            return ProcessResult::FragmentConsumed;
        }

        let message = CompletedMessage {
            header: slot.header,
            payload: core::mem::take(&mut slot.data),
        };
        self.release(index);
        self.stats.completed = self.stats.completed.wrapping_add(1);
        ProcessResult::MessageComplete(message)
    }

    fn release(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if slot.state == SlotState::Filling {
            slot.state = SlotState::Free;
            slot.data.clear();
            self.free.push(index);
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
