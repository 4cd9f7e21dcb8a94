//! Raw 4-byte DLV data frame and its packed bit fields
//!
//! Bit layout, byte 0 first on the wire:
//!
//! ```text
//! byte 0          byte 1          byte 2          byte 3
//! S S P P P P P P P P P P P P P P T T T T T T T T T T T x x x x x
//! ```
//!
//! - `S`: 2-bit status
//! - `P`: 14-bit pressure code, MSB first
//! - `T`: 11-bit temperature code, MSB first
//! - `x`: unused

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::status::Status;

/// Number of bytes returned by the sensor per read
pub const FRAME_LEN: usize = 4;

/// Largest 14-bit pressure code
pub const RAW_PRESSURE_MAX: u16 = (1 << 14) - 1;

/// Largest 11-bit temperature code
pub const RAW_TEMPERATURE_MAX: u16 = (1 << 11) - 1;

const STATUS_SHIFT: u8 = 6;
const PRESSURE_HIGH_MASK: u8 = 0b0011_1111;
const TEMPERATURE_LOW_MASK: u8 = 0b1110_0000;
const TEMPERATURE_LOW_SHIFT: u8 = 5;

/// Errors raised when building a frame from untrusted bytes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// Fields unpacked from a frame, before calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFields {
    pub status: Status,
    /// 14-bit pressure code (0..=16383)
    pub pressure: u16,
    /// 11-bit temperature code (0..=2047)
    pub temperature: u16,
}

/// One 4-byte frame as received on the bus, with no reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes access
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Status bits 7-6 of byte 0
    pub fn status(&self) -> Status {
        Status::from_bits(self.0[0] >> STATUS_SHIFT)
    }

    /// Bits 5-0 of byte 0 followed by all of byte 1
    pub fn raw_pressure(&self) -> u16 {
        (u16::from(self.0[0] & PRESSURE_HIGH_MASK) << 8) | u16::from(self.0[1])
    }

    /// All of byte 2 followed by bits 7-5 of byte 3
    pub fn raw_temperature(&self) -> u16 {
        (u16::from(self.0[2]) << 3)
            | u16::from((self.0[3] & TEMPERATURE_LOW_MASK) >> TEMPERATURE_LOW_SHIFT)
    }

    /// Unpack all three fields. Never fails; plausibility is not checked here.
    pub fn extract(&self) -> RawFields {
        RawFields {
            status: self.status(),
            pressure: self.raw_pressure(),
            temperature: self.raw_temperature(),
        }
    }

    /// Pack fields back into wire layout.
    ///
    /// Codes wider than their field are truncated to the field width and the
    /// five unused trailing bits are zero.
    pub fn pack(fields: RawFields) -> Self {
        let pressure = fields.pressure & RAW_PRESSURE_MAX;
        let temperature = fields.temperature & RAW_TEMPERATURE_MAX;

        Self([
            (fields.status.bits() << STATUS_SHIFT) | (pressure >> 8) as u8,
            (pressure & 0xFF) as u8,
            (temperature >> 3) as u8,
            ((temperature & 0b111) as u8) << TEMPERATURE_LOW_SHIFT,
        ])
    }
}

impl From<[u8; FRAME_LEN]> for Frame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = FrameError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; FRAME_LEN] = bytes.try_into().map_err(|_| FrameError::Length {
            expected: FRAME_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_frame_size() {
        assert_eq!(std::mem::size_of::<Frame>(), FRAME_LEN);
    }

    #[test]
    fn test_all_zero_frame() {
        let fields = Frame::from_bytes([0x00; 4]).extract();
        assert_eq!(fields.status, Status::Current);
        assert_eq!(fields.pressure, 0);
        assert_eq!(fields.temperature, 0);
    }

    #[test]
    fn test_all_ones_frame() {
        let fields = Frame::from_bytes([0xFF; 4]).extract();
        assert_eq!(fields.status, Status::Error);
        assert_eq!(fields.pressure, RAW_PRESSURE_MAX);
        assert_eq!(fields.temperature, RAW_TEMPERATURE_MAX);
    }

    #[test]
    fn test_status_bits_position() {
        let status = |b0| Frame::from_bytes([b0, 0, 0, 0]).status();
        assert_eq!(status(0b0100_0000), Status::Reserved);
        assert_eq!(status(0b1000_0000), Status::StaleData);
        assert_eq!(status(0b1100_0000), Status::Error);
        // Status must not leak into the pressure field
        let frame = Frame::from_bytes([0b1100_0000, 0, 0, 0]);
        assert_eq!(frame.raw_pressure(), 0);
    }

    #[test]
    fn test_pressure_bits_position() {
        // Lowest bit of byte 0 is pressure bit 8
        assert_eq!(Frame::from_bytes([0x01, 0x00, 0, 0]).raw_pressure(), 0x0100);
        // Bit 5 of byte 0 is pressure bit 13
        assert_eq!(Frame::from_bytes([0x20, 0x00, 0, 0]).raw_pressure(), 0x2000);
        assert_eq!(Frame::from_bytes([0x00, 0xAB, 0, 0]).raw_pressure(), 0x00AB);
        assert_eq!(Frame::from_bytes([0x19, 0x99, 0, 0]).raw_pressure(), 0x1999);
    }

    #[test]
    fn test_temperature_bits_position() {
        let temperature = |b2, b3| Frame::from_bytes([0, 0, b2, b3]).raw_temperature();
        // Byte 2 holds temperature bits 10-3
        assert_eq!(temperature(0x01, 0x00), 0b1000);
        assert_eq!(temperature(0x80, 0x00), 0x400);
        // Bits 7-5 of byte 3 are temperature bits 2-0
        assert_eq!(temperature(0x00, 0x20), 0b001);
        assert_eq!(temperature(0x00, 0xE0), 0b111);
        // Bits 4-0 of byte 3 are ignored
        assert_eq!(temperature(0x00, 0x1F), 0);
    }

    #[test]
    fn test_extract_is_deterministic_and_in_range() {
        for b0 in (0..=255u8).step_by(7) {
            for b1 in (0..=255u8).step_by(17) {
                for b2 in (0..=255u8).step_by(11) {
                    for b3 in (0..=255u8).step_by(13) {
                        let frame = Frame::from_bytes([b0, b1, b2, b3]);
                        let a = frame.extract();
                        assert_eq!(a, frame.extract());
                        assert!(a.pressure <= RAW_PRESSURE_MAX);
                        assert!(a.temperature <= RAW_TEMPERATURE_MAX);
                        assert_eq!(a.pressure & 0xFF, u16::from(b1));
                    }
                }
            }
        }
    }

    #[test]
    fn test_pack_then_extract_reproduces_fields() {
        for status in Status::iter() {
            for pressure in (0..=RAW_PRESSURE_MAX).step_by(97) {
                for temperature in (0..=RAW_TEMPERATURE_MAX).step_by(31) {
                    let fields = RawFields {
                        status,
                        pressure,
                        temperature,
                    };
                    assert_eq!(Frame::pack(fields).extract(), fields);
                }
            }
        }
        let edge = RawFields {
            status: Status::Error,
            pressure: RAW_PRESSURE_MAX,
            temperature: RAW_TEMPERATURE_MAX,
        };
        assert_eq!(Frame::pack(edge).extract(), edge);
    }

    #[test]
    fn test_try_from_slice() {
        let frame = Frame::try_from(&[0x12, 0x34, 0x56, 0x78][..]).unwrap();
        assert_eq!(frame.as_bytes(), &[0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_try_from_wrong_length() {
        assert_eq!(
            Frame::try_from(&[0x00, 0x00, 0x00][..]),
            Err(FrameError::Length {
                expected: 4,
                actual: 3
            })
        );
        assert!(Frame::try_from(&[0u8; 5][..]).is_err());
    }

    #[test]
    fn test_cast_from_dump() {
        let dump = [0x00u8, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
        let frames: &[Frame] = bytemuck::cast_slice(&dump);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].extract().status, Status::Error);
    }
}
