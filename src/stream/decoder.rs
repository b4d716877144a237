//! Sans-IO frame decoder

use super::record::{parse_frame, FrameOutcome};
use super::FRAME_SEPARATOR;

/// Reassembles byte chunks into parsed frames.
///
/// Holds the undecoded tail of a split UTF-8 sequence and the text of the
/// frame currently being received, so chunk boundaries never change the
/// frames produced.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    /// Incomplete UTF-8 sequence left over from the previous chunk
    carry: Vec<u8>,
    /// Decoded text not yet terminated by a separator
    buffer: String,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every frame it completed, in order
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<FrameOutcome> {
        self.decode_utf8(chunk);
        self.drain_frames()
    }

    /// Flush at end of stream.
    ///
    /// A trailing unterminated frame is returned only if it parses cleanly;
    /// anything else left in the buffer is dropped.
    pub fn finish(mut self) -> Option<FrameOutcome> {
        if !self.carry.is_empty() {
            self.buffer.push(char::REPLACEMENT_CHARACTER);
            self.carry.clear();
        }

        match parse_frame(&self.buffer) {
            Some(Ok(record)) => Some(Ok(record)),
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Discarding incomplete trailing frame");
                None
            }
            None => None,
        }
    }

    /// Bytes or text still held waiting for more input
    #[allow(dead_code)] // Used in tests
    pub fn pending_len(&self) -> usize {
        self.carry.len() + self.buffer.len()
    }

    fn decode_utf8(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.carry);
        bytes.extend_from_slice(chunk);

        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(e) => {
                    let (valid, invalid) = rest.split_at(e.valid_up_to());
                    // `valid` is well-formed by construction, so this never substitutes
                    self.buffer.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            rest = invalid.get(len..).unwrap_or_default();
                        }
                        None => {
                            // Truncated sequence at the end of the chunk
                            self.carry = invalid.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }

    fn drain_frames(&mut self) -> Vec<FrameOutcome> {
        let mut outcomes = Vec::new();
        while let Some(end) = self.buffer.find(FRAME_SEPARATOR) {
            let frame: String = self.buffer.drain(..end).collect();
            self.buffer.drain(..FRAME_SEPARATOR.len());
            if let Some(outcome) = parse_frame(&frame) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }
}
