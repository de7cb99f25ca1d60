//! Boundary with the CAN adapter. The bridge never talks to hardware directly;
//! drivers, desktop adapters and test doubles implement [`CanBus`].
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Asynchronous frame transport.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Transmit one physical frame.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
    /// Wait for the next received frame.
    fn recv<'a>(&'a mut self) -> impl Future<Output = Result<CanFrame, Self::Error>> + 'a;
}
