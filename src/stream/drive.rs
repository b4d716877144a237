//! Async driver feeding a reply body through the decoder

use super::decoder::StreamDecoder;
use super::record::{DisplayState, FrameOutcome};
use crate::client::TransportError;
use futures::{Stream, StreamExt};

/// Counts gathered while decoding one reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub chunks: usize,
    pub records: usize,
    pub decode_failures: usize,
}

/// Decode a reply body, handing the new display state to `on_state` once
/// per resolved frame.
///
/// Returns when the body ends. A chunk-level transport error aborts
/// immediately; frames already delivered stay delivered.
pub async fn decode_reply<S, F>(
    mut body: S,
    mut on_state: F,
) -> Result<DecodeSummary, TransportError>
where
    S: Stream<Item = Result<Vec<u8>, TransportError>> + Unpin,
    F: FnMut(DisplayState),
{
    let mut decoder = StreamDecoder::new();
    let mut summary = DecodeSummary::default();

    let mut emit = |outcome: FrameOutcome, summary: &mut DecodeSummary| {
        summary.records += 1;
        if let Err(e) = &outcome {
            summary.decode_failures += 1;
            tracing::warn!(error = %e, "Failed to decode reply frame");
        }
        on_state(outcome.into());
    };

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        summary.chunks += 1;
        for outcome in decoder.feed(&chunk) {
            emit(outcome, &mut summary);
        }
    }

    if let Some(outcome) = decoder.finish() {
        emit(outcome, &mut summary);
    }

    tracing::debug!(
        chunks = summary.chunks,
        records = summary.records,
        decode_failures = summary.decode_failures,
        "Reply stream finished"
    );

    Ok(summary)
}
