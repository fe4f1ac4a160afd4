//! Ring buffer properties against a `VecDeque` model.

use std::collections::VecDeque;

use proptest::prelude::*;
use rt_framelog::{Frame, FrameHeader, FrameRing, LogLevel, RingError, Timestamp, HEADER_SIZE};

const CAP: usize = 64;

#[derive(Debug, Clone)]
enum Op {
    Push(Vec<u8>),
    Pop(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..40).prop_map(Op::Push),
        (0usize..40).prop_map(Op::Pop),
    ]
}

fn encode_frame(seq: u32, msg: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; HEADER_SIZE + msg.len()];
    FrameHeader::new(seq, LogLevel::Debug, Timestamp::from_u64(seq as u64), msg.len() as u32)
        .encode(&mut out);
    out[HEADER_SIZE..].copy_from_slice(msg);
    out
}

proptest! {
    #[test]
    fn ring_matches_fifo_model(ops in prop::collection::vec(op(), 1..200)) {
        let mut ring = FrameRing::<CAP>::new();
        let mut model: VecDeque<u8> = VecDeque::new();

        for op in ops {
            match op {
                Op::Push(data) => {
                    let before = (ring.used(), ring.write_index(), ring.read_index());
                    match ring.push(&data) {
                        Ok(()) => model.extend(&data),
                        Err(RingError::InsufficientSpace { requested, available }) => {
                            prop_assert_eq!(requested, data.len());
                            prop_assert_eq!(available, CAP - model.len());
                            prop_assert!(requested > available);
                            prop_assert_eq!((ring.used(), ring.write_index(), ring.read_index()), before);
                        }
                        Err(other) => prop_assert!(false, "unexpected {:?}", other),
                    }
                }
                Op::Pop(n) => {
                    let mut out = vec![0u8; n];
                    match ring.pop(&mut out) {
                        Ok(()) => {
                            let expected: Vec<u8> = model.drain(..n).collect();
                            prop_assert_eq!(out, expected);
                        }
                        Err(_) => prop_assert!(n > model.len()),
                    }
                }
            }

            prop_assert_eq!(ring.used(), model.len());
            prop_assert_eq!(ring.avail(), CAP - model.len());
            prop_assert!(ring.write_index() < CAP);
            prop_assert!(ring.read_index() < CAP);
            prop_assert_eq!((ring.read_index() + ring.used()) % CAP, ring.write_index());
        }
    }

    #[test]
    fn frame_survives_wrap(prefill in 0usize..CAP, msg in prop::collection::vec(any::<u8>(), 0..=(CAP - HEADER_SIZE))) {
        let mut ring = FrameRing::<CAP>::new();

        // Shift the indices so the frame lands at an arbitrary offset
        let filler = vec![0xAAu8; prefill];
        ring.push(&filler).unwrap();
        let mut sink = vec![0u8; prefill];
        ring.pop(&mut sink).unwrap();

        let frame = encode_frame(7, &msg);
        ring.push(&frame).unwrap();

        let header = ring.peek_header().unwrap();
        prop_assert_eq!(header.frame_size(), frame.len());

        let mut out = vec![0u8; header.frame_size()];
        ring.pop(&mut out).unwrap();
        prop_assert_eq!(&out, &frame);

        let parsed = Frame::parse(&out).unwrap();
        prop_assert_eq!(parsed.sequence(), 7);
        prop_assert_eq!(parsed.message(), &msg[..]);
        prop_assert!(ring.is_empty());
    }
}

#[test]
fn test_frames_drain_whole_and_in_order() {
    let mut ring = FrameRing::<CAP>::new();
    let a = encode_frame(1, b"first\n");
    let b = encode_frame(2, b"second\n");
    ring.push(&a).unwrap();
    ring.push(&b).unwrap();

    // Third frame does not fit and leaves the first two intact
    let c = encode_frame(3, b"third frame is too long\n");
    assert!(ring.push(&c).is_err());

    for expected in [&a, &b] {
        let size = ring.peek_header().unwrap().frame_size();
        let mut out = vec![0u8; size];
        ring.pop(&mut out).unwrap();
        assert_eq!(&out, expected);
    }
    assert!(ring.is_empty());
}
