//! Sentences sent through one bridge, carried as CAN frames and rendered by a
//! second bridge listening on the same bus.

use embassy_time::Instant;
use korri_bridge::protocol::bridge::{Bridge, BridgeConfig};
use korri_bridge::protocol::messages::{DecodedPgnRecord, FamilyMask, PgnFamily};
use korri_bridge::protocol::transport::can_frame::CanFrame;

fn body(line: &str) -> &str {
    line.split('*').next().unwrap_or(line)
}

/// Encode on one side, replay the frames through the raw adapter layout, decode on the other.
fn cross(sender: &mut Bridge, receiver: &mut Bridge, line: &str) -> (Vec<DecodedPgnRecord>, Vec<String>) {
    let frames = sender.encode_frames(line).expect("sentence must encode");
    let mut sink: Vec<String> = Vec::new();
    let mut records = Vec::new();
    for (i, frame) in frames.iter().enumerate() {
        let wire = CanFrame::from_raw(frame.to_raw());
        if let Some(record) = receiver.on_frame(&wire, Instant::from_millis(i as u64), &mut sink) {
            records.push(record);
        }
    }
    (records, sink)
}

#[test]
fn test_parametric_sentences_survive_the_bus() {
    let cases = [
        ("$GPHDT,45.5,T", "$IIHDT,45.5,T"),
        ("$TIROT,-12.0,A", "$IIROT,-12.0,A"),
        ("$GPZDA,201530.00,04,07,2002,00,00", "$IIZDA,201530.00,04,07,2002,,"),
        ("$IIMTW,17.5,C", "$IIMTW,17.5,C"),
        ("$WIMWV,270.0,T,20.0,N,A", "$IIMWV,270.0,T,10.3,M,A"),
        ("$GPGLL,4916.45,N,12311.12,W,225444,A", "$IIGLL,4916.4500,N,12311.1200,W,,A,A"),
    ];

    let mut sender = Bridge::default();
    let mut receiver = Bridge::default();
    for (input, expected) in cases {
        let (records, lines) = cross(&mut sender, &mut receiver, input);
        assert_eq!(records.len(), 1, "{input}");
        let bodies: Vec<&str> = lines.iter().map(|line| body(line)).collect();
        assert_eq!(bodies, [expected], "{input}");
    }
    assert_eq!(receiver.stats().decode_errors, 0);
}

#[test]
/// Course 1.0 rad and speed 10.00 m/s, as raw single-frame bytes.
fn test_cog_sog_rapid_update_bytes() {
    let id = korri_bridge::protocol::transport::can_id::CanHeader::new(129026, 3)
        .encode()
        .unwrap();
    let frame = CanFrame::new(id, [0x00, 0xFC, 0x10, 0x27, 0xE8, 0x03, 0xFF, 0xFF]);

    let mut bridge = Bridge::default();
    let mut sink: Vec<String> = Vec::new();
    let record = bridge.on_frame(&frame, Instant::from_millis(0), &mut sink);
    let Some(DecodedPgnRecord::CogSogRapidUpdate(cog_sog)) = record else {
        panic!("unexpected record {record:?}");
    };
    assert!((cog_sog.cog.unwrap() - 1.0).abs() < 1e-9);
    assert!((cog_sog.sog.unwrap() - 10.0).abs() < 1e-9);
    assert_eq!(body(&sink[0]), "$IIVTG,57.3,T,,M,19.44,N,36.00,K,A");
}

#[test]
/// Two-sentence AIS static data: one PGN, rendered back as two sentences.
fn test_multi_sentence_ais_survives_the_bus() {
    let first = "!AIVDM,2,1,3,A,55?MbV02;H;s<HtKP00EHE:0@T4@Dl0000000016L961O5Gf0NSQEp6ClRh0,0*0C";
    let second = "!AIVDM,2,2,3,A,00000000000,2*27";

    let mut sender = Bridge::default();
    let mut receiver = Bridge::default();
    let (records, lines) = cross(&mut sender, &mut receiver, first);
    assert!(records.is_empty() && lines.is_empty());

    let (records, lines) = cross(&mut sender, &mut receiver, second);
    assert!(matches!(records[..], [DecodedPgnRecord::AisClassAStaticData(_)]));
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("!AIVDM,2,1,0,A,55?MbV02;H;s<HtKP00EHE:0@T4@Dl0000000016L961O5Gf0NSQEp6ClRh0,0*"));
    assert!(lines[1].starts_with("!AIVDM,2,2,0,A,00000000000,2*"));
}

#[test]
/// Families switched off on either side stop the traffic at that side.
fn test_family_masks() {
    let only_heading = FamilyMask::NONE.with(PgnFamily::Heading);
    let mut sender = Bridge::new(BridgeConfig::new().with_tx_families(only_heading));
    assert!(sender.encode_frames("$IIMTW,17.5,C").is_err());

    let mut receiver = Bridge::new(BridgeConfig::new().with_rx_families(FamilyMask::NONE));
    let (records, lines) = cross(&mut sender, &mut receiver, "$GPHDT,45.5,T");
    assert!(records.is_empty() && lines.is_empty());
    assert_eq!(receiver.stats().filtered, 1);
}
