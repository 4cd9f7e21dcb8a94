//! Sensor status field decoding
//!
//! The two most significant bits of the first frame byte carry the
//! sensor's own report on the data that follows.

use serde::{Deserialize, Serialize};

/// Mask for the 2-bit status field once shifted down
pub const STATUS_MASK: u8 = 0b11;

/// Sensor-reported health of a frame
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[repr(u8)]
pub enum Status {
    /// Fresh data from the latest conversion cycle
    Current = 0,
    /// Reserved by the manufacturer, not expected in normal operation
    Reserved = 1,
    /// Data already fetched since the last conversion cycle
    StaleData = 2,
    /// Sensor diagnostic fault
    Error = 3,
}

impl Status {
    /// Decode a status from the low two bits of `bits`.
    ///
    /// Higher bits are ignored, so every input maps to a status.
    pub fn from_bits(bits: u8) -> Self {
        match bits & STATUS_MASK {
            0 => Status::Current,
            1 => Status::Reserved,
            2 => Status::StaleData,
            _ => Status::Error,
        }
    }

    /// The 2-bit code for this status
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Whether the physical values decoded alongside this status can be trusted.
    ///
    /// Stale and error frames still produce values, but they do not describe
    /// the current state of the sensor.
    pub fn is_valid(self) -> bool {
        !matches!(self, Status::StaleData | Status::Error)
    }
}
