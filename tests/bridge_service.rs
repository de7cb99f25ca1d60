//! The bridge running as a task: frames from the bus come out as sentences,
//! queued sentences go out as paced frames.
mod helpers;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Instant;
use helpers::{MockCanBus, MockTimer};
use korri_bridge::protocol::bridge::service::{BridgeCommand, BridgeService};
use korri_bridge::protocol::bridge::{Bridge, BridgeConfig};
use korri_bridge::protocol::transport::can_frame::CanFrame;
use korri_bridge::protocol::transport::can_id::CanHeader;
use korri_bridge::protocol::transport::traits::can_bus::CanBus;
use static_cell::StaticCell;
use tokio::time::Duration;

const CLASS_A: &str = "!AIVDM,1,1,,A,15M67FCP1so?uffE`FepT@3n0000,0*63";

static COMMAND_CHANNEL: StaticCell<Channel<CriticalSectionRawMutex, BridgeCommand, 4>> =
    StaticCell::new();
static SENTENCE_CHANNEL: StaticCell<Channel<CriticalSectionRawMutex, String, 8>> =
    StaticCell::new();

fn cog_sog_frame() -> CanFrame {
    // Course 1.0 rad, speed 10.00 m/s.
    let id = CanHeader::new(129026, 12).with_priority(2).encode().unwrap();
    CanFrame::new(id, [0x00, 0xFC, 0x10, 0x27, 0xE8, 0x03, 0xFF, 0xFF])
}

#[tokio::test]
async fn service_translates_both_directions() {
    let command_channel = COMMAND_CHANNEL.init(Channel::new());
    let sentence_channel = SENTENCE_CHANNEL.init(Channel::new());

    let (dut_bus, mut host_bus) = MockCanBus::create_pair();
    let config = BridgeConfig::new().with_source_address(77);
    let service = BridgeService::<_, _, 4, 8>::new(
        Bridge::new(config),
        dut_bus,
        MockTimer::new(),
        Some(&*command_channel),
        Some(&*sentence_channel),
    );
    let parts = service.into_parts();
    let handle = parts
        .handle
        .expect("handle must exist when command channel is provided");
    let mut sentences = parts
        .sentences
        .expect("receiver must exist when sentence channel is provided");
    let runner_future = parts.runner.drive();
    tokio::pin!(runner_future);

    tokio::select! {
        result = &mut runner_future => {
            panic!("bridge ended unexpectedly: {:?}", result);
        }
        _ = async {
            // Bus to sentences.
            host_bus.send(&cog_sog_frame()).await.expect("host send");
            let line = sentences.recv().await;
            assert!(
                line.starts_with("$IIVTG,57.3,T,,M,19.44,N,36.00,K,A*"),
                "unexpected sentence {line}"
            );

            // Sentence to bus, one frame every 10 ms.
            let started = tokio::time::Instant::now();
            handle.send_sentence(CLASS_A).await;
            let mut frames = Vec::new();
            for _ in 0..5 {
                frames.push(host_bus.recv().await.expect("AIS frame expected on CAN bus"));
            }
            assert!(started.elapsed() >= Duration::from_millis(40));
            assert!(frames.iter().all(|frame| frame.header().pgn == 129038));
            assert!(frames.iter().all(|frame| frame.header().source == 77));

            let mut receiver = Bridge::default();
            let mut emitted: Vec<String> = Vec::new();
            for (i, frame) in frames.iter().enumerate() {
                receiver.on_frame(frame, Instant::from_millis(i as u64), &mut emitted);
            }
            assert_eq!(emitted, [CLASS_A]);

            // Raw frames are forwarded untouched.
            let raw = cog_sog_frame();
            handle.send_frame(&raw).await;
            assert_eq!(host_bus.recv().await.expect("raw frame"), raw);

            // A sentence the bridge cannot encode is dropped, the loop keeps going.
            handle.send_sentence("$GPXXX,1,2").await;
            handle.send_sentence("$HCHDT,123.4,T").await;
            let heading = host_bus.recv().await.expect("heading frame");
            assert_eq!(heading.header().pgn, 127250);
        } => {}
    }
}

#[tokio::test]
async fn runner_without_channels_only_reads() {
    let (dut_bus, mut host_bus) = MockCanBus::create_pair();
    let service = BridgeService::<_, _, 1, 1>::new(
        Bridge::default(),
        dut_bus,
        MockTimer::new(),
        None,
        None,
    );
    let parts = service.into_parts();
    assert!(parts.handle.is_none());
    assert!(parts.sentences.is_none());
    let runner_future = parts.runner.drive();
    tokio::pin!(runner_future);

    host_bus.send(&cog_sog_frame()).await.expect("host send");
    drop(host_bus);

    // Closing the bus surfaces as a receive error once the frame is consumed.
    let result = tokio::time::timeout(Duration::from_secs(1), &mut runner_future)
        .await
        .expect("runner must stop when the bus closes");
    assert!(result.is_err());
}

#[tokio::test]
/// `FrameSender` fragments a payload itself and keeps the caller's sequence id.
async fn frame_sender_fragments_payload() {
    use korri_bridge::protocol::transport::traits::frame_sender::FrameSender;

    let (mut dut_bus, mut host_bus) = MockCanBus::create_pair();
    let mut timer = MockTimer::new();
    let payload: Vec<u8> = (0..18).collect();
    let header = CanHeader::new(126996, 35);

    dut_bus
        .send_payload(header, &payload, 3, 0, &mut timer)
        .await
        .expect("send_payload must succeed");

    let mut frames = Vec::new();
    for _ in 0..3 {
        frames.push(host_bus.recv().await.expect("fast packet frame"));
    }
    assert_eq!(frames[0].data[..2], [0x60, 18]);
    assert_eq!(frames[1].data[0], 0x61);
    assert_eq!(frames[2].data, [0x62, 13, 14, 15, 16, 17, 0xFF, 0xFF]);
}
