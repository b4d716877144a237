//! Incremental decoding of streamed assistant replies
//!
//! The reply body is a sequence of `data:{json}` frames separated by a blank
//! line. [`decoder::StreamDecoder`] is a sans-IO state machine over raw byte
//! chunks; [`decode_reply`] drives it from an async byte stream.

pub mod decoder;
mod drive;
pub mod record;

#[cfg(test)]
mod proptests;

pub use drive::{decode_reply, DecodeSummary};
pub use record::DisplayState;

/// Blank line between frames
pub const FRAME_SEPARATOR: &str = "\n\n";

/// Literal prefix every frame starts with
pub const DATA_PREFIX: &str = "data:";
