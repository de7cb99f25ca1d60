use alloc::string::String;
use alloc::vec::Vec;

use embassy_time::Instant;

use super::*;
use crate::error::SentenceError;
use crate::infra::codec::traits::PgnData;
use crate::protocol::messages::heading::Pgn127250;
use crate::protocol::messages::PgnFamily;

const GLL: &str = "$GPGLL,4916.45,N,12311.12,W,225444,A";
const CLASS_A: &str = "!AIVDM,1,1,,A,15M67FCP1so?uffE`FepT@3n0000,0*63";
const STATIC_VOYAGE: [&str; 2] = [
    "!AIVDM,2,1,3,A,55?MbV02;H;s<HtKP00EHE:0@T4@Dl0000000016L961O5Gf0NSQEp6ClRh0,0*0C",
    "!AIVDM,2,2,3,A,00000000000,2*27",
];

fn body(line: &str) -> &str {
    line.split('*').next().unwrap_or(line)
}

/// Push every frame through `bridge`, collecting the sentences it emits.
fn feed(bridge: &mut Bridge, frames: &[CanFrame]) -> (Vec<DecodedPgnRecord>, Vec<String>) {
    let mut sink: Vec<String> = Vec::new();
    let records = frames
        .iter()
        .enumerate()
        .filter_map(|(i, frame)| bridge.on_frame(frame, Instant::from_millis(i as u64), &mut sink))
        .collect();
    (records, sink)
}

fn frame(pgn: u32, source: u8, payload: &[u8]) -> CanFrame {
    let mut data = [0xFF; 8];
    data[..payload.len()].copy_from_slice(payload);
    CanFrame {
        id: CanHeader::new(pgn, source).encode().unwrap(),
        data,
        len: payload.len(),
    }
}

#[test]
fn test_default_config() {
    let config = BridgeConfig::default();
    assert_eq!(config.rx_families, FamilyMask::ALL);
    assert_eq!(config.tx_families, FamilyMask::ALL);
    assert_eq!(config.talker, "II");
    assert_eq!(config.pool_capacity, 100);
    assert_eq!(config.stale_timeout_ms, 250);
    assert_eq!(config.inter_frame_delay_ms, 10);
}

#[test]
fn test_sequence_counter_rolls_over() {
    let mut counter = SequenceCounter::new();
    for expected in 0..SEQUENCE_ROLLOVER {
        assert_eq!(counter.fast_packet_id(), expected % 8);
        assert_eq!(counter.advance(), expected);
    }
    assert_eq!(counter.value(), 0);
}

//==================================================================================PIPELINE
#[test]
/// A GLL sentence crosses the bus and comes back as GLL.
fn test_position_round_trip() {
    let mut sender = Bridge::new(BridgeConfig::new().with_source_address(42));
    let frames = sender.encode_frames(GLL).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].header().pgn, 129025);
    assert_eq!(frames[0].header().source, 42);
    assert_eq!(frames[0].header().priority, 2);
    // Single frames leave the message counter alone.
    assert_eq!(sender.sequence().value(), 0);

    let mut receiver = Bridge::default();
    let (records, lines) = feed(&mut receiver, &frames);
    assert!(matches!(records[..], [DecodedPgnRecord::PositionRapidUpdate(_)]));
    assert_eq!(lines.len(), 1);
    assert_eq!(body(&lines[0]), "$IIGLL,4916.4500,N,12311.1200,W,,A,A");
    assert_eq!(receiver.stats().decoded, 1);
}

#[test]
fn test_configured_talker() {
    let frames = Bridge::default().encode_frames(GLL).unwrap();
    let mut receiver = Bridge::new(BridgeConfig::new().with_talker("GP"));
    let (_, lines) = feed(&mut receiver, &frames);
    assert!(lines[0].starts_with("$GPGLL,"));
}

#[test]
/// A class A report goes out as a fast packet and is rendered identically.
fn test_ais_round_trip() {
    let mut sender = Bridge::default();
    let messages = sender.encode_message(CLASS_A).unwrap();
    assert_eq!(messages.len(), 1);
    let (header, payload) = &messages[0];
    assert_eq!(header.pgn, 129038);
    assert_eq!(header.priority, 4);
    assert_eq!(header.source, DEFAULT_SOURCE_ADDRESS);
    assert_eq!(payload.len(), 28);

    let frames = sender.encode_frames(CLASS_A).unwrap();
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[0].data[1], 28);

    let mut receiver = Bridge::default();
    let (records, lines) = feed(&mut receiver, &frames);
    assert!(matches!(records[..], [DecodedPgnRecord::AisClassAPositionReport(_)]));
    assert_eq!(lines, [CLASS_A]);
}

#[test]
/// Each fast packet takes a new id; the first sentence of a pair yields nothing.
fn test_fast_packet_ids_advance() {
    let mut bridge = Bridge::default();
    let first = bridge.encode_frames(CLASS_A).unwrap();
    assert!(bridge.encode_frames(STATIC_VOYAGE[0]).unwrap().is_empty());
    let second = bridge.encode_frames(STATIC_VOYAGE[1]).unwrap();

    assert!(first.iter().all(|frame| frame.data[0] >> 5 == 0));
    assert!(second.iter().all(|frame| frame.data[0] >> 5 == 1));
    assert_eq!(second[0].header().pgn, 129794);
    assert_eq!(bridge.sequence().value(), 2);
}

//==================================================================================FILTERS
#[test]
fn test_disabled_rx_family_is_dropped() {
    let frames = Bridge::default().encode_frames(GLL).unwrap();
    let config = BridgeConfig::new().with_rx_families(FamilyMask::ALL.without(PgnFamily::Position));
    let mut receiver = Bridge::new(config);

    let (records, lines) = feed(&mut receiver, &frames);
    assert!(records.is_empty());
    assert!(lines.is_empty());
    assert_eq!(receiver.stats().filtered, 1);
    assert_eq!(receiver.stats().assembler.frames, 0);
}

#[test]
fn test_disabled_tx_family_is_refused() {
    let config = BridgeConfig::new().with_tx_families(FamilyMask::NONE.with(PgnFamily::Heading));
    let mut bridge = Bridge::new(config);
    assert_eq!(bridge.encode_message(GLL), Err(EncodeError::FamilyDisabled));
    assert!(bridge.encode_message("$HCHDT,123.4,T").is_ok());
    assert_eq!(bridge.stats().encode_errors, 1);
    assert_eq!(bridge.stats().encoded, 1);
}

#[test]
fn test_encode_errors() {
    let mut bridge = Bridge::default();
    assert_eq!(bridge.encode_message("$GPXXX,1,2"), Err(EncodeError::UnsupportedSentence));
    assert_eq!(
        bridge.encode_message("GPGLL,4916.45,N"),
        Err(EncodeError::Sentence(SentenceError::MissingDelimiter))
    );
    assert!(matches!(
        bridge.encode_message("$HCHDT,123.4,T*00"),
        Err(EncodeError::Sentence(SentenceError::ChecksumMismatch { .. }))
    ));
    assert_eq!(bridge.stats().encode_errors, 3);
}

#[test]
/// Oversized angles are reduced in one step; the heading still goes out.
fn test_huge_heading_is_wrapped() {
    let mut bridge = Bridge::default();
    let messages = bridge.encode_message("$GPHDT,1e300,T").unwrap();
    let record = Pgn127250::from_payload(&messages[0].1).unwrap();
    let heading = record.heading.unwrap();
    assert!((0.0..2.0 * core::f64::consts::PI).contains(&heading));
    assert_eq!(bridge.stats().encoded, 1);
}

//==================================================================================INBOUND_FAILURES
#[test]
fn test_unknown_pgn_is_counted() {
    let mut bridge = Bridge::default();
    let (records, _) = feed(&mut bridge, &[frame(65280, 9, &[1, 2, 3, 4, 5, 6, 7, 8])]);
    assert!(records.is_empty());
    assert_eq!(bridge.stats().unsupported, 1);
}

#[test]
fn test_short_payload_is_counted() {
    let mut bridge = Bridge::default();
    let (records, lines) = feed(&mut bridge, &[frame(129025, 9, &[1, 2, 3, 4])]);
    assert!(records.is_empty());
    assert!(lines.is_empty());
    assert_eq!(bridge.stats().decode_errors, 1);
    assert_eq!(bridge.stats().assembler.completed, 1);
}

#[test]
/// An abandoned fast packet is reclaimed once the staleness timeout expires.
fn test_stale_fast_packet_collected() {
    let frames = Bridge::default().encode_frames(CLASS_A).unwrap();
    let mut bridge = Bridge::default();
    let (records, _) = feed(&mut bridge, &frames[..2]);
    assert!(records.is_empty());

    assert_eq!(bridge.collect_garbage(Instant::from_millis(100)), 0);
    assert_eq!(bridge.collect_garbage(Instant::from_millis(400)), 1);
    assert_eq!(bridge.stats().assembler.stale_evictions, 1);

    // The rest of the message is now orphaned.
    let mut sink: Vec<String> = Vec::new();
    for frame in &frames[2..] {
        assert!(bridge.on_frame(frame, Instant::from_millis(401), &mut sink).is_none());
    }
    assert!(sink.is_empty());
    assert_eq!(bridge.stats().assembler.orphan_frames, 3);
}

#[test]
/// Values learnt from one PGN show up in sentences rendered from another.
fn test_state_survives_between_frames() {
    let mut sender = Bridge::default();
    let mut frames = sender.encode_frames("$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K,A").unwrap();
    frames.extend(sender.encode_frames("$GPRMC,225446,A,4916.45,N,12311.12,W,000.5,054.7,191194,020.3,E").unwrap());

    assert_eq!(frames.len(), 3);
    assert!(sender.state().date.is_some());

    let mut receiver = Bridge::default();
    let (records, lines) = feed(&mut receiver, &frames);
    assert_eq!(records.len(), 3);
    assert_eq!(lines.len(), 3);
    assert!(receiver.state().cog.is_some());
    assert!(receiver.state().sog.is_some());
    // Neither 129025 nor 129026 carries the date of RMC.
    assert_eq!(receiver.state().date, None);
}
