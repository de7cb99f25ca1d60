//! NMEA 2000 transport layer: CAN frame representations, 29-bit identifier
//! management, Fast Packet reassembly and fragmentation, and bus abstraction traits.

pub mod can_frame;
pub mod can_id;
pub mod fast_packet;
pub mod traits;

/// Default pause between two frames of the same outbound message (ms).
///
/// Serial CAN adapters working half-duplex lose frames written back to back;
/// 10 ms keeps them in step at the cost of about 0.3 s for a 223-byte payload.
/// Set it to 0 for controllers with a deep TX queue.
pub const DEFAULT_INTER_FRAME_DELAY_MS: u32 = 10;

/// Recommended upper bound for sending a single CAN frame (ms).
///
/// [`CanBus`](traits::can_bus::CanBus) implementations **SHOULD** bound
/// `send()` so a disconnected bus cannot block the bridge forever.
///
/// ```rust,ignore
/// use embassy_time::{with_timeout, Duration};
/// use korri_bridge::protocol::transport::CAN_SEND_TIMEOUT_MS;
///
/// async fn send(&mut self, frame: &CanFrame) -> Result<(), Error> {
///     with_timeout(
///         Duration::from_millis(CAN_SEND_TIMEOUT_MS as u64),
///         self.can.transmit_async(&to_driver_frame(frame)),
///     )
///     .await
///     .map_err(|_| Error::Timeout)?
/// }
/// ```
pub const CAN_SEND_TIMEOUT_MS: u32 = 100;
