//! Bridge running as its own task.
//!
//! The runner owns the [`Bridge`], the CAN bus and the timer. Other tasks talk
//! to it through pre-allocated [`embassy_sync::Channel`] instances:
//!
//! * a command channel (`BridgeHandle`) to queue outbound sentences or raw frames;
//! * a sentence channel (`BridgeSentences`) to pull the NMEA 0183 output.
//!
//! Either channel is optional. Firmware only pays for the directions it uses.
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use embassy_time::{Duration, Instant};
use futures_util::{future::select, future::Either, pin_mut};

use super::{Bridge, BridgeStats};
use crate::error::BridgeRunError;
use crate::protocol::nmea0183::NullSink;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::bridge_timer::BridgeTimer;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::traits::frame_sender::FrameSender;

/// Commands queued by producer tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCommand {
    /// NMEA 0183 sentence to translate and transmit.
    SendSentence(String),
    /// Frame transmitted as is.
    SendFrame(CanFrame),
}

/// Service assembling the runner components.
pub struct BridgeService<
    'a,
    C: CanBus,
    T: BridgeTimer,
    const CMD_CAP: usize,
    const SENTENCE_CAP: usize,
> where
    C::Error: Debug,
{
    bridge: Bridge,
    bus: C,
    timer: T,
    command_channel: Option<&'a Channel<CriticalSectionRawMutex, BridgeCommand, CMD_CAP>>,
    sentence_channel: Option<&'a Channel<CriticalSectionRawMutex, String, SENTENCE_CAP>>,
}

impl<'a, C, T, const CMD_CAP: usize, const SENTENCE_CAP: usize>
    BridgeService<'a, C, T, CMD_CAP, SENTENCE_CAP>
where
    C: CanBus,
    C::Error: Debug,
    T: BridgeTimer,
{
    pub fn new(
        bridge: Bridge,
        bus: C,
        timer: T,
        command_channel: Option<&'a Channel<CriticalSectionRawMutex, BridgeCommand, CMD_CAP>>,
        sentence_channel: Option<&'a Channel<CriticalSectionRawMutex, String, SENTENCE_CAP>>,
    ) -> Self {
        Self {
            bridge,
            bus,
            timer,
            command_channel,
            sentence_channel,
        }
    }

    /// Split into handle/receiver/runner components.
    pub fn into_parts(self) -> BridgeServiceParts<'a, C, T, CMD_CAP, SENTENCE_CAP> {
        let handle = self.command_channel.map(|channel| BridgeHandle {
            sender: channel.sender(),
        });
        let sentences = self.sentence_channel.map(|channel| BridgeSentences {
            receiver: channel.receiver(),
        });
        let last_gc = self.timer.now();
        BridgeServiceParts {
            handle,
            sentences,
            runner: BridgeRunner {
                bridge: self.bridge,
                bus: self.bus,
                timer: self.timer,
                command_channel: self.command_channel,
                sentence_channel: self.sentence_channel,
                last_gc,
            },
        }
    }
}

/// Bundle returned by [`BridgeService::into_parts`].
pub struct BridgeServiceParts<'a, C, T, const CMD_CAP: usize, const SENTENCE_CAP: usize>
where
    C: CanBus,
    C::Error: Debug,
    T: BridgeTimer,
{
    pub handle: Option<BridgeHandle<'a, CMD_CAP>>,
    pub sentences: Option<BridgeSentences<'a, SENTENCE_CAP>>,
    pub runner: BridgeRunner<'a, C, T, CMD_CAP, SENTENCE_CAP>,
}

/// Runner that drives the bridge loop.
pub struct BridgeRunner<'a, C, T, const CMD_CAP: usize, const SENTENCE_CAP: usize>
where
    C: CanBus,
    C::Error: Debug,
    T: BridgeTimer,
{
    bridge: Bridge,
    bus: C,
    timer: T,
    command_channel: Option<&'a Channel<CriticalSectionRawMutex, BridgeCommand, CMD_CAP>>,
    sentence_channel: Option<&'a Channel<CriticalSectionRawMutex, String, SENTENCE_CAP>>,
    last_gc: Instant,
}

impl<'a, C, T, const CMD_CAP: usize, const SENTENCE_CAP: usize>
    BridgeRunner<'a, C, T, CMD_CAP, SENTENCE_CAP>
where
    C: CanBus,
    C::Error: Debug,
    T: BridgeTimer,
{
    pub fn stats(&self) -> BridgeStats {
        self.bridge.stats()
    }

    /// Run until the bus fails. Encode failures are counted, never fatal.
    pub async fn drive(mut self) -> Result<(), BridgeRunError<C::Error>> {
        let command_channel = self.command_channel;

        loop {
            match command_channel {
                Some(cmd_ch) => {
                    let mut command_to_process = None;
                    let mut frame_to_process = None;
                    let mut recv_error = None;

                    {
                        let cmd_future = cmd_ch.receive();
                        let recv_future = self.bus.recv();
                        pin_mut!(cmd_future);
                        pin_mut!(recv_future);

                        match select(recv_future, cmd_future).await {
                            Either::Left((result, pending_cmd)) => {
                                match result {
                                    Ok(frame) => frame_to_process = Some(frame),
                                    Err(err) => recv_error = Some(err),
                                }
                                drop(pending_cmd);
                            }
                            Either::Right((command, pending_recv)) => {
                                command_to_process = Some(command);
                                drop(pending_recv);
                            }
                        }
                    }

                    if let Some(err) = recv_error {
                        return Err(BridgeRunError::Receive(err));
                    }
                    if let Some(frame) = frame_to_process {
                        self.process_frame(&frame).await;
                    }
                    if let Some(command) = command_to_process {
                        self.handle_command(command).await?;
                    }
                }
                None => {
                    let frame = self.bus.recv().await.map_err(BridgeRunError::Receive)?;
                    self.process_frame(&frame).await;
                }
            }
        }
    }

    async fn process_frame(&mut self, frame: &CanFrame) {
        let now = self.timer.now();
        self.collect_garbage(now);

        match self.sentence_channel {
            Some(channel) => {
                let mut emitted: Vec<String> = Vec::new();
                self.bridge.on_frame(frame, now, &mut emitted);
                for sentence in emitted {
                    channel.send(sentence).await;
                }
            }
            None => {
                self.bridge.on_frame(frame, now, &mut NullSink);
            }
        }
    }

    /// Sweep stale slots at most once per staleness period.
    fn collect_garbage(&mut self, now: Instant) {
        let period = Duration::from_millis(self.bridge.config().stale_timeout_ms);
        let due = now
            .checked_duration_since(self.last_gc)
            .is_some_and(|elapsed| elapsed >= period);
        if due {
            self.bridge.collect_garbage(now);
            self.last_gc = now;
        }
    }

    async fn handle_command(&mut self, command: BridgeCommand) -> Result<(), BridgeRunError<C::Error>> {
        let delay_ms = self.bridge.config().inter_frame_delay_ms;
        match command {
            BridgeCommand::SendFrame(frame) => {
                self.bus.send(&frame).await.map_err(BridgeRunError::Send)
            }
            BridgeCommand::SendSentence(line) => {
                let Ok(frames) = self.bridge.encode_frames(&line) else {
                    return Ok(());
                };
                #[cfg(feature = "defmt")]
                defmt::trace!("sending {} frames", frames.len());
                self.bus
                    .send_frames(&frames, delay_ms, &mut self.timer)
                    .await
                    .map_err(BridgeRunError::Send)
            }
        }
    }
}

/// Transmission handle (optional).
pub struct BridgeHandle<'a, const CMD_CAP: usize> {
    sender: Sender<'a, CriticalSectionRawMutex, BridgeCommand, CMD_CAP>,
}

impl<'a, const CMD_CAP: usize> BridgeHandle<'a, CMD_CAP> {
    /// Queue a sentence for translation and transmission.
    pub async fn send_sentence(&self, line: &str) {
        self.sender
            .send(BridgeCommand::SendSentence(String::from(line)))
            .await;
    }

    pub async fn send_frame(&self, frame: &CanFrame) {
        self.sender.send(BridgeCommand::SendFrame(frame.clone())).await;
    }
}

/// Optional receiver of the sentences produced from bus traffic.
pub struct BridgeSentences<'a, const SENTENCE_CAP: usize> {
    receiver: Receiver<'a, CriticalSectionRawMutex, String, SENTENCE_CAP>,
}

impl<'a, const SENTENCE_CAP: usize> BridgeSentences<'a, SENTENCE_CAP> {
    pub async fn recv(&mut self) -> String {
        self.receiver.receive().await
    }

    /// Next sentence if one is already queued.
    pub fn try_recv(&mut self) -> Option<String> {
        self.receiver.try_receive().ok()
    }
}
