//! `CanBus` extension transmitting whole messages: the payload is fragmented
//! when needed and the frames go out in order, paced by a [`BridgeTimer`].
//!
//! # Inter-frame delay
//!
//! Half-duplex adapters drop frames sent back to back. The caller picks the
//! delay inserted between consecutive frames of one message; the bridge uses
//! [`DEFAULT_INTER_FRAME_DELAY_MS`](crate::protocol::transport::DEFAULT_INTER_FRAME_DELAY_MS).
use crate::{
    error::{EncodeError, TransmitError},
    protocol::transport::{
        can_frame::CanFrame,
        can_id::CanHeader,
        fast_packet::builder::FastPacketBuilder,
        traits::{bridge_timer::BridgeTimer, can_bus::CanBus},
    },
};

/// Trait extending `CanBus` with message-level transmission.
pub trait FrameSender: CanBus {
    /// Fragment `payload` and send every frame.
    ///
    /// * `header` – identifier fields shared by every frame
    /// * `sequence_id` – fast packet message id (3 low bits used)
    /// * `delay_ms` – pause between two frames of this message (none before the first)
    ///
    /// # Errors
    ///
    /// - [`TransmitError::Encode`] when the payload cannot be fragmented
    /// - [`TransmitError::Send`] when the bus refuses a frame
    fn send_payload<'a, T: BridgeTimer>(
        &'a mut self,
        header: CanHeader,
        payload: &'a [u8],
        sequence_id: u8,
        delay_ms: u32,
        timer: &'a mut T,
    ) -> impl core::future::Future<Output = Result<(), TransmitError<Self::Error>>> + 'a;

    /// Send already built frames with the same pacing.
    fn send_frames<'a, T: BridgeTimer>(
        &'a mut self,
        frames: &'a [CanFrame],
        delay_ms: u32,
        timer: &'a mut T,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>> + 'a;
}

impl<C: CanBus> FrameSender for C {
    fn send_payload<'a, T: BridgeTimer>(
        &'a mut self,
        header: CanHeader,
        payload: &'a [u8],
        sequence_id: u8,
        delay_ms: u32,
        timer: &'a mut T,
    ) -> impl core::future::Future<Output = Result<(), TransmitError<Self::Error>>> + 'a {
        async move {
            let builder = FastPacketBuilder::new(header, payload, sequence_id)
                .map_err(|err| TransmitError::Encode(EncodeError::Fragment(err)))?;

            for (index, frame) in builder.build().enumerate() {
                if index > 0 && delay_ms > 0 {
                    timer.delay_ms(delay_ms).await;
                }
                self.send(&frame).await.map_err(TransmitError::Send)?;
            }
            Ok(())
        }
    }

    fn send_frames<'a, T: BridgeTimer>(
        &'a mut self,
        frames: &'a [CanFrame],
        delay_ms: u32,
        timer: &'a mut T,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>> + 'a {
        async move {
            for (index, frame) in frames.iter().enumerate() {
                if index > 0 && delay_ms > 0 {
                    timer.delay_ms(delay_ms).await;
                }
                self.send(frame).await?;
            }
            Ok(())
        }
    }
}
