//! In-memory representation of an NMEA 2000 CAN frame and its conversions
//! to the raw 12-byte adapter format and to `embedded_can` frames.
use embedded_can::{ExtendedId, Frame, Id};

use crate::protocol::transport::can_id::{CanHeader, CanId};

/// Size of a raw adapter frame: 4 identifier bytes then 8 data bytes.
pub const RAW_FRAME_LEN: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw NMEA 2000 frame as read from the CAN bus.
pub struct CanFrame {
    /// Full 29-bit CAN identifier stored inside a `u32`.
    pub id: CanId,
    /// Payload buffer. Classic CAN frames always provide eight bytes.
    pub data: [u8; 8],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Frame with a full 8-byte payload.
    pub fn new(id: CanId, data: [u8; 8]) -> Self {
        Self { id, data, len: 8 }
    }

    /// Decoded header of this frame.
    pub fn header(&self) -> CanHeader {
        CanHeader::decode(self.id)
    }

    /// Parse the adapter layout: little-endian identifier, then data.
    pub fn from_raw(raw: [u8; RAW_FRAME_LEN]) -> Self {
        let mut data = [0u8; 8];
        data.copy_from_slice(&raw[4..]);
        Self {
            id: CanId::from_bytes([raw[0], raw[1], raw[2], raw[3]]),
            data,
            len: 8,
        }
    }

    /// Adapter layout of this frame; unused data bytes are sent as 0xFF.
    pub fn to_raw(&self) -> [u8; RAW_FRAME_LEN] {
        let mut raw = [0xFFu8; RAW_FRAME_LEN];
        raw[..4].copy_from_slice(&self.id.to_bytes());
        let len = self.len.min(8);
        raw[4..4 + len].copy_from_slice(&self.data[..len]);
        raw
    }

    /// Convert from any `embedded_can` frame. Standard identifiers and remote
    /// frames are not NMEA 2000 traffic and yield `None`.
    pub fn from_frame<F: Frame>(frame: &F) -> Option<Self> {
        if frame.is_remote_frame() {
            return None;
        }
        let id = match frame.id() {
            Id::Extended(extended) => CanId(extended.as_raw()),
            Id::Standard(_) => return None,
        };
        let payload = frame.data();
        let len = payload.len().min(8);
        let mut data = [0xFFu8; 8];
        data[..len].copy_from_slice(&payload[..len]);
        Some(Self { id, data, len })
    }

    /// Build an `embedded_can` frame for transmission.
    pub fn to_frame<F: Frame>(&self) -> Option<F> {
        let id = ExtendedId::new(self.id.0)?;
        F::new(id, &self.data[..self.len.min(8)])
    }
}
