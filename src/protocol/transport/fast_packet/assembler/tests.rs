//! Fast Packet reassembly tests covering sequencing, slot reuse, and concurrency.
// ASSEMBLER
use super::*;

const GNSS: u32 = 129029;

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

fn header(source: u8) -> CanHeader {
    CanHeader::new(GNSS, source)
}

fn complete(payload: &[u8], source: u8) -> ProcessResult {
    ProcessResult::MessageComplete(CompletedMessage {
        header: header(source),
        payload: payload.to_vec(),
    })
}

#[test]
/// Rebuild a complete message from three valid fragments.
fn test_full_fast_packet_reassembly() {
    let mut assembler = FastPacketAssembler::new();
    // Total length 15: 6 + 7 + 2 bytes.
    let frame0: [u8; 8] = [0b000_00000, 15, 1, 2, 3, 4, 5, 6];
    let frame1: [u8; 8] = [0b000_00001, 7, 8, 9, 10, 11, 12, 13];
    let frame2: [u8; 8] = [0b000_00010, 14, 15, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

    assert_eq!(
        assembler.process_frame(header(42), &frame0, at(0)),
        ProcessResult::FragmentConsumed
    );
    assert_eq!(
        assembler.process_frame(header(42), &frame1, at(1)),
        ProcessResult::FragmentConsumed
    );
    let expected: [u8; 15] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
    assert_eq!(
        assembler.process_frame(header(42), &frame2, at(2)),
        complete(&expected, 42)
    );
    assert_eq!(assembler.in_flight(), 0);
    assert_eq!(assembler.stats().completed, 1);
}

#[test]
/// Single-frame PGNs are delivered untouched.
fn test_single_frame_pgn_passes_through() {
    let mut assembler = FastPacketAssembler::new();
    let rapid = CanHeader::new(129025, 3);
    let data = [1, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(
        assembler.process_frame(rapid, &data, at(0)),
        ProcessResult::MessageComplete(CompletedMessage {
            header: rapid,
            payload: data.to_vec(),
        })
    );
    assert_eq!(assembler.in_flight(), 0);
}

#[test]
/// A fast message that fits in its first frame completes immediately.
fn test_short_fast_message_completes_on_first_frame() {
    let mut assembler = FastPacketAssembler::new();
    let frame = [0b010_00000, 4, 9, 8, 7, 6, 0xFF, 0xFF];
    assert_eq!(
        assembler.process_frame(header(5), &frame, at(0)),
        complete(&[9, 8, 7, 6], 5)
    );
    assert_eq!(assembler.in_flight(), 0);
}

#[test]
/// Frames 0, 1, 3: one dropped message, nothing delivered, then a new epoch works.
fn test_sequence_gap_recovery() {
    let mut assembler = FastPacketAssembler::new();
    let frames: [[u8; 8]; 4] = [
        [0b001_00000, 25, 1, 2, 3, 4, 5, 6],
        [0b001_00001, 7, 8, 9, 10, 11, 12, 13],
        [0b001_00010, 14, 15, 16, 17, 18, 19, 20],
        [0b001_00011, 21, 22, 23, 24, 25, 0xFF, 0xFF],
    ];

    assert_eq!(
        assembler.process_frame(header(10), &frames[0], at(0)),
        ProcessResult::FragmentConsumed
    );
    assert_eq!(
        assembler.process_frame(header(10), &frames[1], at(1)),
        ProcessResult::FragmentConsumed
    );
    assert_eq!(
        assembler.process_frame(header(10), &frames[3], at(2)),
        ProcessResult::Ignored
    );
    assert_eq!(assembler.stats().sequence_gaps, 1);
    assert_eq!(assembler.stats().dropped_messages(), 1);
    assert_eq!(assembler.stats().completed, 0);
    assert_eq!(assembler.in_flight(), 0);

    // Fresh conversation on the next epoch.
    let expected: alloc::vec::Vec<u8> = (1..=25).collect();
    let mut last = ProcessResult::Ignored;
    for (i, frame) in frames.iter().enumerate() {
        let mut next = *frame;
        next[0] = (0b010 << 5) | i as u8;
        last = assembler.process_frame(header(10), &next, at(10 + i as u64));
    }
    assert_eq!(last, complete(&expected, 10));
    assert_eq!(assembler.stats().dropped_messages(), 1);
}

#[test]
/// Continuation frames of an unknown conversation are dropped.
fn test_orphan_continuation_ignored() {
    let mut assembler = FastPacketAssembler::new();
    let frame = [0b000_00011, 1, 2, 3, 4, 5, 6, 7];
    assert_eq!(
        assembler.process_frame(header(1), &frame, at(0)),
        ProcessResult::Ignored
    );
    assert_eq!(assembler.stats().orphan_frames, 1);
    assert_eq!(assembler.in_flight(), 0);
}

#[test]
/// A first frame for a conversation already filling replaces it.
fn test_overrun_restarts_conversation() {
    let mut assembler = FastPacketAssembler::new();
    let first = [0b011_00000, 10, 1, 1, 1, 1, 1, 1];
    assembler.process_frame(header(7), &first, at(0));

    let restart = [0b011_00000, 10, 2, 2, 2, 2, 2, 2];
    assert_eq!(
        assembler.process_frame(header(7), &restart, at(1)),
        ProcessResult::FragmentConsumed
    );
    assert_eq!(assembler.stats().overruns, 1);
    assert_eq!(assembler.in_flight(), 1);

    let tail = [0b011_00001, 3, 3, 3, 3, 0xFF, 0xFF, 0xFF];
    assert_eq!(
        assembler.process_frame(header(7), &tail, at(2)),
        complete(&[2, 2, 2, 2, 2, 2, 3, 3, 3, 3], 7)
    );
}

#[test]
/// First frames with a zero or oversized length never open a slot.
fn test_invalid_first_frame() {
    let mut assembler = FastPacketAssembler::new();
    assert_eq!(
        assembler.process_frame(header(1), &[0, 0, 1, 2, 3, 4, 5, 6], at(0)),
        ProcessResult::Ignored
    );
    assert_eq!(
        assembler.process_frame(header(1), &[0, 224, 1, 2, 3, 4, 5, 6], at(0)),
        ProcessResult::Ignored
    );
    assert_eq!(assembler.stats().invalid_frames, 2);
    assert_eq!(assembler.in_flight(), 0);
}

#[test]
/// Interleaved conversations from different sources stay independent.
fn test_multiple_concurrent_sessions() {
    let mut assembler = FastPacketAssembler::new();
    let a0 = [0, 10, 1, 2, 3, 4, 5, 6];
    let b0 = [0, 9, 11, 12, 13, 14, 15, 16];
    let a1 = [1, 7, 8, 9, 10, 0xFF, 0xFF, 0xFF];
    let b1 = [1, 17, 18, 19, 0xFF, 0xFF, 0xFF, 0xFF];

    assert_eq!(assembler.process_frame(header(10), &a0, at(0)), ProcessResult::FragmentConsumed);
    assert_eq!(assembler.process_frame(header(20), &b0, at(0)), ProcessResult::FragmentConsumed);
    assert_eq!(assembler.in_flight(), 2);
    assert_eq!(
        assembler.process_frame(header(10), &a1, at(1)),
        complete(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 10)
    );
    assert_eq!(
        assembler.process_frame(header(20), &b1, at(1)),
        complete(&[11, 12, 13, 14, 15, 16, 17, 18, 19], 20)
    );
}

#[test]
/// Same source and PGN with different message ids are separate conversations.
fn test_epochs_do_not_collide() {
    let mut assembler = FastPacketAssembler::new();
    assembler.process_frame(header(4), &[0b001_00000, 9, 1, 1, 1, 1, 1, 1], at(0));
    assembler.process_frame(header(4), &[0b010_00000, 9, 2, 2, 2, 2, 2, 2], at(0));
    assert_eq!(assembler.in_flight(), 2);
    assert_eq!(
        assembler.process_frame(header(4), &[0b010_00001, 2, 2, 2, 0xFF, 0xFF, 0xFF, 0xFF], at(1)),
        complete(&[2; 9], 4)
    );
}

#[test]
/// A slot without progress beyond the timeout is reclaimed and reusable.
fn test_stale_slot_eviction() {
    let mut assembler = FastPacketAssembler::with_capacity(1, Duration::from_millis(250));
    assembler.process_frame(header(1), &[0, 20, 1, 2, 3, 4, 5, 6], at(0));
    assert_eq!(assembler.in_flight(), 1);

    // Exactly at the timeout: still alive.
    assert_eq!(assembler.collect_garbage(at(250)), 0);
    assert_eq!(assembler.collect_garbage(at(251)), 1);
    assert_eq!(assembler.in_flight(), 0);
    assert_eq!(assembler.stats().stale_evictions, 1);

    assert_eq!(
        assembler.process_frame(header(2), &[0, 20, 1, 2, 3, 4, 5, 6], at(300)),
        ProcessResult::FragmentConsumed
    );
    assert_eq!(assembler.in_flight(), 1);
}

#[test]
/// Progress refreshes the arrival time.
fn test_progress_keeps_slot_alive() {
    let mut assembler = FastPacketAssembler::with_capacity(2, Duration::from_millis(250));
    assembler.process_frame(header(1), &[0, 30, 1, 2, 3, 4, 5, 6], at(0));
    assembler.process_frame(header(1), &[1, 7, 8, 9, 10, 11, 12, 13], at(200));
    assert_eq!(assembler.collect_garbage(at(400)), 0);
    assert_eq!(assembler.collect_garbage(at(451)), 1);
}

#[test]
/// With every slot busy, a new first frame triggers one collection before giving up.
fn test_pool_exhaustion() {
    let mut assembler = FastPacketAssembler::with_capacity(2, Duration::from_millis(250));
    assembler.process_frame(header(1), &[0, 20, 1, 2, 3, 4, 5, 6], at(0));
    assembler.process_frame(header(2), &[0, 20, 1, 2, 3, 4, 5, 6], at(100));

    assert_eq!(
        assembler.process_frame(header(3), &[0, 20, 1, 2, 3, 4, 5, 6], at(200)),
        ProcessResult::Ignored
    );
    assert_eq!(assembler.stats().pool_exhausted, 1);

    // The first slot is stale by now and gets recycled on demand.
    assert_eq!(
        assembler.process_frame(header(3), &[0, 20, 1, 2, 3, 4, 5, 6], at(300)),
        ProcessResult::FragmentConsumed
    );
    assert_eq!(assembler.stats().stale_evictions, 1);
    assert_eq!(assembler.in_flight(), 2);
}

#[test]
/// Different destinations keep separate slots for the same source.
fn test_destination_is_part_of_the_key() {
    let mut assembler = FastPacketAssembler::new();
    let request = |dest| CanHeader::new(126208, 9).with_destination(dest);
    assembler.process_frame(request(255), &[0, 9, 1, 1, 1, 1, 1, 1], at(0));
    assembler.process_frame(request(12), &[0, 9, 2, 2, 2, 2, 2, 2], at(0));
    assert_eq!(assembler.in_flight(), 2);
}
