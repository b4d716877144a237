//! Property-based tests for frame decoding
//!
//! These tests verify that decoding does not depend on how the transport
//! happened to chunk the body:
//! - Any split of the bytes yields the same frames as one big chunk
//! - The last display state equals the last record parsed alone
//! - Malformed frames never hide the frames after them

use super::decoder::StreamDecoder;
use super::record::{DisplayState, FrameOutcome, StreamRecord};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Text with multi-byte characters so splits land inside code points
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?éüß日本語🎉\n\"\\\\]{0,30}"
}

#[derive(Debug, Clone)]
enum WireFrame {
    Content(String),
    Error(String),
    Garbage(String),
}

impl WireFrame {
    fn encode(&self) -> String {
        match self {
            WireFrame::Content(text) => {
                format!("data:{}\n\n", serde_json::json!({ "content": text }))
            }
            WireFrame::Error(text) => format!("data:{}\n\n", serde_json::json!({ "error": text })),
            WireFrame::Garbage(text) => format!("data:{{{text}\n\n"),
        }
    }
}

fn arb_frame() -> impl Strategy<Value = WireFrame> {
    prop_oneof![
        4 => arb_text().prop_map(WireFrame::Content),
        1 => arb_text().prop_map(WireFrame::Error),
        1 => "[a-z:]{0,10}".prop_map(WireFrame::Garbage),
    ]
}

fn encode_all(frames: &[WireFrame]) -> Vec<u8> {
    frames.iter().map(WireFrame::encode).collect::<String>().into_bytes()
}

/// Split `bytes` at the given (unsorted, possibly repeated) cut points
fn split_at_points(bytes: &[u8], points: &[usize]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = points
        .iter()
        .map(|p| if bytes.is_empty() { 0 } else { p % (bytes.len() + 1) })
        .collect();
    cuts.sort_unstable();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(bytes[start..cut].to_vec());
        start = cut;
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

fn decode_chunks(chunks: &[Vec<u8>]) -> Vec<FrameOutcome> {
    let mut decoder = StreamDecoder::new();
    let mut outcomes: Vec<FrameOutcome> = chunks.iter().flat_map(|c| decoder.feed(c)).collect();
    outcomes.extend(decoder.finish());
    outcomes
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Chunking never changes the decoded frames
    #[test]
    fn prop_chunk_boundary_invariance(
        frames in proptest::collection::vec(arb_frame(), 0..8),
        points in proptest::collection::vec(any::<usize>(), 0..12),
    ) {
        let bytes = encode_all(&frames);
        let whole = decode_chunks(&[bytes.clone()]);
        let split = decode_chunks(&split_at_points(&bytes, &points));
        prop_assert_eq!(whole, split);
    }

    /// Byte-at-a-time delivery is the worst case split
    #[test]
    fn prop_single_byte_chunks(frames in proptest::collection::vec(arb_frame(), 0..5)) {
        let bytes = encode_all(&frames);
        let whole = decode_chunks(&[bytes.clone()]);
        let bytewise: Vec<Vec<u8>> = bytes.iter().map(|b| vec![*b]).collect();
        prop_assert_eq!(whole, decode_chunks(&bytewise));
    }

    /// Every frame produces exactly one outcome, in order
    #[test]
    fn prop_one_outcome_per_frame(frames in proptest::collection::vec(arb_frame(), 0..8)) {
        let outcomes = decode_chunks(&[encode_all(&frames)]);
        prop_assert_eq!(outcomes.len(), frames.len());

        for (frame, outcome) in frames.iter().zip(&outcomes) {
            match frame {
                WireFrame::Content(text) => {
                    prop_assert_eq!(outcome, &Ok(StreamRecord::Content(text.clone())));
                }
                WireFrame::Error(text) => {
                    prop_assert_eq!(outcome, &Ok(StreamRecord::Error(text.clone())));
                }
                WireFrame::Garbage(_) => prop_assert!(outcome.is_err()),
            }
        }
    }

    /// The final display state depends only on the final frame
    #[test]
    fn prop_last_write_wins(
        frames in proptest::collection::vec(arb_frame(), 1..8),
        points in proptest::collection::vec(any::<usize>(), 0..6),
    ) {
        let bytes = encode_all(&frames);
        let all = decode_chunks(&split_at_points(&bytes, &points));
        let last_alone = decode_chunks(&[frames[frames.len() - 1].encode().into_bytes()]);

        let final_state = all.into_iter().last().map(DisplayState::from);
        let expected = last_alone.into_iter().last().map(DisplayState::from);
        prop_assert_eq!(final_state, expected);
    }
}
