//! Round trips through the builder and the assembler.
use alloc::vec::Vec;

use embassy_time::Instant;

use crate::protocol::transport::can_id::CanHeader;
use crate::protocol::transport::fast_packet::{
    assembler::{CompletedMessage, FastPacketAssembler, ProcessResult},
    builder::fragment,
};

fn reassemble(assembler: &mut FastPacketAssembler, header: CanHeader, payload: &[u8], sequence_id: u8) -> Option<CompletedMessage> {
    let mut result = None;
    for (i, frame) in fragment(header, payload, sequence_id).unwrap().iter().enumerate() {
        let outcome = assembler.process_frame(frame.header(), &frame.data[..frame.len], Instant::from_millis(i as u64));
        if let ProcessResult::MessageComplete(message) = outcome {
            assert!(result.is_none(), "completed twice");
            result = Some(message);
        }
    }
    result
}

#[test]
/// Every payload length from 9 to 223 survives fragment then reassemble.
fn test_roundtrip_all_lengths() {
    let mut assembler = FastPacketAssembler::new();
    let header = CanHeader::new(129540, 42);
    for len in 9..=223usize {
        let payload: Vec<u8> = (0..len).map(|i| (i * 7 + len) as u8).collect();
        let message = reassemble(&mut assembler, header, &payload, (len % 8) as u8).expect("complete message");
        assert_eq!(message.header, header);
        assert_eq!(message.payload, payload);
    }
    assert_eq!(assembler.in_flight(), 0);
    assert_eq!(assembler.stats().dropped_messages(), 0);
}

#[test]
/// Product information, 21 bytes, on the wire and back.
fn test_roundtrip_product_information() {
    let mut assembler = FastPacketAssembler::new();
    let payload: Vec<u8> = (100..121).collect();
    let message = reassemble(&mut assembler, CanHeader::new(126996, 35), &payload, 1).unwrap();
    assert_eq!(message.payload, payload);
}

#[test]
/// Interleaved conversations must remain independent.
fn test_roundtrip_with_interleaved_frames() {
    let payload_a = [0xAA; 20];
    let payload_b: [u8; 15] = core::array::from_fn(|i| i as u8 + 1);
    let frames_a = fragment(CanHeader::new(129540, 10), &payload_a, 0).unwrap();
    let frames_b = fragment(CanHeader::new(129029, 20), &payload_b, 0).unwrap();

    let mut assembler = FastPacketAssembler::new();
    let mut done = Vec::new();
    let longest = frames_a.len().max(frames_b.len());
    for i in 0..longest {
        for frames in [&frames_a, &frames_b] {
            if let Some(frame) = frames.get(i) {
                if let ProcessResult::MessageComplete(message) =
                    assembler.process_frame(frame.header(), &frame.data, Instant::from_millis(i as u64))
                {
                    done.push(message);
                }
            }
        }
    }

    assert_eq!(done.len(), 2);
    let a = done.iter().find(|m| m.header.source == 10).unwrap();
    let b = done.iter().find(|m| m.header.source == 20).unwrap();
    assert_eq!(a.payload, payload_a);
    assert_eq!(b.payload, payload_b);
}
