//! CAN frame generator for outbound messages. Splits an application payload
//! into a single frame or into the Fast Packet first/continuation layout.
use alloc::vec::Vec;

use super::{is_fast_message, CONTINUATION_FRAME_DATA, FIRST_FRAME_DATA, MAX_FAST_PACKET_PAYLOAD};
use crate::error::FragmentError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::{CanHeader, CanId};

/// Payloads above this size never fit a single CAN frame.
const SINGLE_FRAME_MAX: usize = 8;

#[derive(Debug, Clone)]
/// Shared parameters for all frames composing one message.
pub struct FastPacketBuilder<'a> {
    id: CanId,
    payload: &'a [u8],
    /// 3-bit message id written in the high bits of every sequence byte.
    sequence_id: u8,
    fast: bool,
}

/// Lazy iterator returning frames one by one as they are encoded.
#[derive(Debug)]
pub struct FrameIterator<'a> {
    builder: FastPacketBuilder<'a>,
    frame_index: u8,
    bytes_sent: usize,
    done: bool,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = CanFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let payload = self.builder.payload;
        let mut data = [0xFF; 8];

        if !self.builder.fast {
            data[..payload.len()].copy_from_slice(payload);
            self.done = true;
            return Some(CanFrame::new(self.builder.id, data));
        }

        data[0] = ((self.builder.sequence_id & 0x07) << 5) | (self.frame_index & 0x1F);
        if self.frame_index == 0 {
            data[1] = payload.len() as u8;
            let count = FIRST_FRAME_DATA.min(payload.len());
            data[2..2 + count].copy_from_slice(&payload[..count]);
            self.bytes_sent = count;
        } else {
            let count = CONTINUATION_FRAME_DATA.min(payload.len() - self.bytes_sent);
            data[1..1 + count].copy_from_slice(&payload[self.bytes_sent..self.bytes_sent + count]);
            self.bytes_sent += count;
        }

        self.frame_index = self.frame_index.wrapping_add(1);
        if self.bytes_sent >= payload.len() {
            self.done = true;
        }
        Some(CanFrame::new(self.builder.id, data))
    }
}

impl<'a> FastPacketBuilder<'a> {
    /// Prepare the frames of one message.
    ///
    /// PGNs listed as fast packet, and any payload longer than 8 bytes, use the
    /// multi-frame layout. `sequence_id` is masked to its 3 low bits.
    pub fn new(header: CanHeader, payload: &'a [u8], sequence_id: u8) -> Result<Self, FragmentError> {
        if payload.is_empty() {
            return Err(FragmentError::EmptyPayload);
        }
        if payload.len() > MAX_FAST_PACKET_PAYLOAD {
            return Err(FragmentError::PayloadTooLong {
                len: payload.len(),
                max: MAX_FAST_PACKET_PAYLOAD,
            });
        }
        Ok(Self {
            id: header.encode()?,
            payload,
            sequence_id: sequence_id & 0x07,
            fast: is_fast_message(header.pgn) || payload.len() > SINGLE_FRAME_MAX,
        })
    }

    /// Whether the message uses the Fast Packet layout.
    pub fn is_fast(&self) -> bool {
        self.fast
    }

    /// Number of frames [`FastPacketBuilder::build`] will yield.
    pub fn frame_count(&self) -> usize {
        if !self.fast {
            return 1;
        }
        let rest = self.payload.len().saturating_sub(FIRST_FRAME_DATA);
        1 + rest.div_ceil(CONTINUATION_FRAME_DATA)
    }

    /// Start the iteration; each call to `next` yields the next frame.
    pub fn build(self) -> FrameIterator<'a> {
        FrameIterator {
            builder: self,
            frame_index: 0,
            bytes_sent: 0,
            done: false,
        }
    }
}

/// Fragment a payload into its complete frame sequence.
pub fn fragment(header: CanHeader, payload: &[u8], sequence_id: u8) -> Result<Vec<CanFrame>, FragmentError> {
    Ok(FastPacketBuilder::new(header, payload, sequence_id)?
        .build()
        .collect())
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
