//! Creation and extraction of the 29-bit CAN identifiers used by
//! NMEA 2000 (derived from SAE J1939).
//!
//! On the wire the identifier is handled as four little-endian bytes:
//! byte0 = source, byte1 = PDU specific, byte2 = PDU format, byte3 = data page
//! (bit 0) and priority (bits 2-4).
use crate::error::CanIdBuildError;

/// Broadcast destination address.
pub const BROADCAST: u8 = 255;
/// PDU formats above this value are broadcast (PDU2) and carry the PGN low byte.
pub const PDU2_THRESHOLD: u8 = 239;
/// Largest PGN representable in the identifier.
pub const MAX_PGN: u32 = 0x1_FFFF;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Extended CAN identifier (29 bits) stored in a `u32`.
pub struct CanId(pub u32);

impl CanId {
    /// Four-byte little-endian identifier as carried by raw frames.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        CanId(u32::from_le_bytes(bytes) & 0x1FFF_FFFF)
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Priority (3 bits, 0-7).
    pub fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// PGN following the addressing rules of [`CanHeader::decode`].
    pub fn pgn(&self) -> u32 {
        CanHeader::decode(*self).pgn
    }

    /// Destination address (255 for broadcast PGNs).
    pub fn destination(&self) -> u8 {
        CanHeader::decode(*self).destination
    }

    /// Source address of the sending node.
    pub fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

//==================================================================================CAN_HEADER
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Decoded view of an identifier.
pub struct CanHeader {
    /// 0 (highest) to 7.
    pub priority: u8,
    pub source: u8,
    /// 255 means broadcast.
    pub destination: u8,
    /// 17-bit PGN (data page + PDU format + PDU specific).
    pub pgn: u32,
}

impl CanHeader {
    /// Broadcast header with the default priority 6.
    pub fn new(pgn: u32, source: u8) -> Self {
        Self {
            priority: 6,
            source,
            destination: BROADCAST,
            pgn,
        }
    }

    /// Sets the priority, keeping only the low three bits.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// Assigns a destination address. Only meaningful for PDU1 PGNs.
    pub fn with_destination(mut self, destination: u8) -> Self {
        self.destination = destination;
        self
    }

    /// Whether the destination is the whole bus.
    pub fn is_broadcast(&self) -> bool {
        self.destination == BROADCAST
    }

    /// Splits an identifier into its fields. Never fails.
    ///
    /// With the data page bit set the destination is always broadcast and the
    /// PDU specific byte joins the PGN only above the PDU2 threshold. Without it,
    /// PDU formats above 239 are broadcast PGNs and lower ones carry an explicit
    /// destination in the PDU specific byte.
    pub fn decode(id: CanId) -> Self {
        let [source, ps, pf, flags] = id.to_bytes();
        let data_page = (flags & 0x01) as u32;
        let priority = (flags >> 2) & 0x07;

        let (destination, pgn) = if data_page == 1 {
            let low = if pf > PDU2_THRESHOLD { ps as u32 } else { 0 };
            (BROADCAST, (data_page << 16) | ((pf as u32) << 8) | low)
        } else if pf > PDU2_THRESHOLD {
            (BROADCAST, ((pf as u32) << 8) | ps as u32)
        } else {
            (ps, (pf as u32) << 8)
        };

        Self {
            priority,
            source,
            destination,
            pgn,
        }
    }

    /// Exact inverse of [`CanHeader::decode`].
    ///
    /// Fails only when the PGN exceeds 17 bits. The priority is masked to 3 bits.
    pub fn encode(&self) -> Result<CanId, CanIdBuildError> {
        if self.pgn > MAX_PGN {
            return Err(CanIdBuildError::PgnOutOfRange { pgn: self.pgn });
        }
        let data_page = ((self.pgn >> 16) & 0x01) as u8;
        let pf = ((self.pgn >> 8) & 0xFF) as u8;
        let ps = if pf > PDU2_THRESHOLD {
            (self.pgn & 0xFF) as u8
        } else {
            self.destination
        };
        let flags = ((self.priority & 0x07) << 2) | data_page;

        Ok(CanId::from_bytes([self.source, ps, pf, flags]))
    }
}

impl From<CanId> for CanHeader {
    fn from(id: CanId) -> Self {
        CanHeader::decode(id)
    }
}

impl TryFrom<CanHeader> for CanId {
    type Error = CanIdBuildError;

    fn try_from(header: CanHeader) -> Result<Self, Self::Error> {
        header.encode()
    }
}
