//! Decoded measurement produced for each frame

use serde::{Deserialize, Serialize};

use crate::status::Status;
use crate::units::OutputUnits;

/// One decoded and calibrated frame.
///
/// Physical values are computed even when `status` reports stale or faulty
/// data; use [`valid_values`](Self::valid_values) to drop them in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sensor-reported health of this frame
    pub status: Status,
    /// 14-bit pressure code as read
    pub raw_pressure: u16,
    /// 11-bit temperature code as read
    pub raw_temperature: u16,
    /// Pressure in `units.pressure`
    pub pressure: f64,
    /// Temperature in `units.temperature`
    pub temperature: f64,
    /// Units the physical values are expressed in
    pub units: OutputUnits,
}

impl Reading {
    /// False for stale or error frames
    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    /// True only when the sensor flagged a fault; stale data is not an error
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    /// `(pressure, temperature)` if the sensor vouches for them, `None` for
    /// stale or error frames.
    pub fn valid_values(&self) -> Option<(f64, f64)> {
        self.is_valid().then_some((self.pressure, self.temperature))
    }
}
