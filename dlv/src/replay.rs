//! Frame source backed by recorded bytes.
//!
//! A recording is the concatenation of 4-byte frames exactly as read from the
//! bus. It can come from a binary dump file or a hex string.

use std::path::Path;

use thiserror::Error;

use crate::frame::{Frame, FrameError, FRAME_LEN};
use crate::sensor::FrameSource;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("recording exhausted")]
    Exhausted,

    /// Recording ended partway through a frame
    #[error("truncated trailing frame: {0}")]
    Truncated(#[from] FrameError),

    #[error("invalid hex input: {0}")]
    InvalidHex(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Replays frames from an in-memory recording
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    data: Vec<u8>,
    pos: usize,
}

impl ReplaySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    /// Load a binary dump from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        Ok(Self::new(std::fs::read(path)?))
    }

    /// Parse a hex recording such as `"00 00 00 00"`, `"0x1f,0x40"` or `"1f400000"`
    pub fn from_hex(hex: &str) -> Result<Self, ReplayError> {
        Ok(Self::new(parse_hex_bytes(hex)?))
    }

    /// Whole frames not yet replayed
    pub fn frames_remaining(&self) -> usize {
        (self.data.len() - self.pos) / FRAME_LEN
    }

    /// Bytes left over after the last whole frame
    pub fn trailing_bytes(&self) -> usize {
        (self.data.len() - self.pos) % FRAME_LEN
    }

    /// Whole frames not yet replayed, viewed in place
    pub fn pending_frames(&self) -> &[Frame] {
        let end = self.pos + self.frames_remaining() * FRAME_LEN;
        bytemuck::cast_slice(&self.data[self.pos..end])
    }

    /// Restart from the first frame
    pub fn rewind(&mut self) {
        self.pos = 0;
    }
}

impl FrameSource for ReplaySource {
    type Error = ReplayError;

    fn read_frame(&mut self) -> Result<Frame, Self::Error> {
        let rest = &self.data[self.pos..];
        if rest.is_empty() {
            return Err(ReplayError::Exhausted);
        }

        let frame = Frame::try_from(&rest[..rest.len().min(FRAME_LEN)])?;
        self.pos += FRAME_LEN;
        Ok(frame)
    }
}

/// Parse hex bytes separated by whitespace or commas, with optional `0x`
/// prefixes. Each token may hold several bytes (`"1f40"` is two bytes).
pub fn parse_hex_bytes(hex: &str) -> Result<Vec<u8>, ReplayError> {
    let mut bytes = Vec::new();

    for token in hex.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);

        if digits.is_empty()
            || digits.len() % 2 != 0
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ReplayError::InvalidHex(token.to_string()));
        }

        for i in (0..digits.len()).step_by(2) {
            let byte = u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ReplayError::InvalidHex(token.to_string()))?;
            bytes.push(byte);
        }
    }

    Ok(bytes)
}
