//! NMEA 2000 Fast Packet support: carries payloads of up to 223 bytes across
//! successive CAN frames.
//!
//! First frame: `[sequence][total length][6 data bytes]`.
//! Continuation frames: `[sequence][7 data bytes]`.
//! The sequence byte holds a 3-bit message id (high bits) shared by every frame
//! of a message and a 5-bit frame counter (low bits).
pub use crate::core::MAX_PGN_BYTES as MAX_FAST_PACKET_PAYLOAD;
pub use crate::protocol::catalog::is_fast_message;

/// Payload bytes carried by the first frame.
pub const FIRST_FRAME_DATA: usize = 6;
/// Payload bytes carried by each continuation frame.
pub const CONTINUATION_FRAME_DATA: usize = 7;

pub mod assembler;
pub mod builder;

#[cfg(test)]
mod tests;
