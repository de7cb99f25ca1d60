//! Tests for the frame generator (`FrameIterator`).
// BUILDER
use super::*;
use crate::protocol::transport::can_id::CanHeader;

#[test]
/// Short payload of a single-frame PGN: one frame padded with 0xFF.
fn test_builder_single_frame() {
    let payload = [1, 2, 3, 4, 5];
    let builder = FastPacketBuilder::new(CanHeader::new(129025, 42), &payload, 0).unwrap();
    assert!(!builder.is_fast());
    assert_eq!(builder.frame_count(), 1);
    let mut iter = builder.build();

    let frame = iter.next().unwrap();
    assert_eq!(frame.len, 8);
    assert_eq!(frame.data, [1, 2, 3, 4, 5, 0xFF, 0xFF, 0xFF]);
    assert_eq!(frame.header().pgn, 129025);
    assert_eq!(frame.header().source, 42);

    assert!(iter.next().is_none());
}

#[test]
/// Ten-byte payload split across two frames.
fn test_builder_two_frames() {
    let payload = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let frames = fragment(CanHeader::new(129540, 50), &payload, 0).unwrap();
    assert_eq!(frames.len(), 2);

    assert_eq!(frames[0].data, [0, 10, 1, 2, 3, 4, 5, 6]);
    assert_eq!(frames[1].data, [1, 7, 8, 9, 10, 0xFF, 0xFF, 0xFF]);
    assert!(frames.iter().all(|f| f.len == 8));
}

#[test]
/// A fast PGN stays fast-framed even when the payload fits eight bytes.
fn test_fast_pgn_short_payload() {
    let payload = [0xAB; 5];
    let frames = fragment(CanHeader::new(129029, 1), &payload, 3).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].data, [0b011_00000, 5, 0xAB, 0xAB, 0xAB, 0xAB, 0xAB, 0xFF]);
}

#[test]
/// A long payload is fast-framed even for a PGN missing from the fast table.
fn test_long_payload_on_single_frame_pgn() {
    let payload = [7u8; 12];
    let builder = FastPacketBuilder::new(CanHeader::new(65280, 1), &payload, 0).unwrap();
    assert!(builder.is_fast());
    assert_eq!(builder.frame_count(), 2);
}

#[test]
/// 18 bytes: first frame with 6, then 7, then 5 with the last two bytes padded.
fn test_product_information_layout() {
    let payload: [u8; 18] = core::array::from_fn(|i| i as u8 + 1);
    let frames = fragment(CanHeader::new(126996, 35), &payload, 2).unwrap();

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].data, [0x40, 18, 1, 2, 3, 4, 5, 6]);
    assert_eq!(frames[1].data, [0x41, 7, 8, 9, 10, 11, 12, 13]);
    assert_eq!(frames[2].data, [0x42, 14, 15, 16, 17, 18, 0xFF, 0xFF]);
}

#[test]
/// 21 bytes need a fourth frame holding the last byte.
fn test_twenty_one_bytes_layout() {
    let payload: [u8; 21] = core::array::from_fn(|i| i as u8);
    let builder = FastPacketBuilder::new(CanHeader::new(126996, 35), &payload, 0).unwrap();
    assert_eq!(builder.frame_count(), 4);
    let frames: alloc::vec::Vec<_> = builder.build().collect();
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[3].data, [3, 20, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
/// Maximum payload: 32 frames with counters 0 to 31.
fn test_builder_max_payload() {
    let payload = [0xAA; 223];
    let builder = FastPacketBuilder::new(CanHeader::new(129540, 25), &payload, 7).unwrap();
    assert_eq!(builder.frame_count(), 32);

    let frames: alloc::vec::Vec<_> = builder.build().collect();
    assert_eq!(frames.len(), 32);
    assert_eq!(frames[0].data[1], 223);
    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame.data[0], (7 << 5) | index as u8);
    }
}

#[test]
fn test_builder_rejects_oversize_and_empty() {
    let payload = [0u8; 224];
    assert_eq!(
        FastPacketBuilder::new(CanHeader::new(129540, 1), &payload, 0).err(),
        Some(FragmentError::PayloadTooLong { len: 224, max: 223 })
    );
    assert_eq!(
        FastPacketBuilder::new(CanHeader::new(129540, 1), &[], 0).err(),
        Some(FragmentError::EmptyPayload)
    );
}

#[test]
fn test_builder_rejects_wide_pgn() {
    assert!(matches!(
        FastPacketBuilder::new(CanHeader::new(0x2_0000, 1), &[1, 2], 0),
        Err(FragmentError::Header(_))
    ));
}

#[test]
/// Only the low three bits of the caller's sequence id are used.
fn test_sequence_id_masked() {
    let frames = fragment(CanHeader::new(129029, 1), &[0u8; 10], 0x0D).unwrap();
    assert_eq!(frames[0].data[0] >> 5, 0x05);
    assert_eq!(frames[1].data[0], 0b101_00001);
}

#[test]
/// Addressed PGNs keep their destination in every frame.
fn test_destination_in_identifier() {
    let header = CanHeader::new(126208, 9).with_destination(0x30).with_priority(3);
    let frames = fragment(header, &[1u8; 12], 0).unwrap();
    for frame in &frames {
        assert_eq!(frame.header(), header);
    }
}
