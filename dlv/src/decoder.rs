//! Frame to reading pipeline: unpack, calibrate, convert.

use crate::calibration::{Calibration, SensorConfig};
use crate::frame::{Frame, RawFields};
use crate::reading::Reading;
use crate::units::{OutputUnits, PressureUnit, TemperatureUnit};

/// Pure decoder for one sensor.
///
/// Holds the calibration derived from the sensor config and the currently
/// selected output units. Decoding has no side effects, so the same frame
/// always decodes to the same reading under the same units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDecoder {
    config: SensorConfig,
    calibration: Calibration,
    units: OutputUnits,
}

impl FrameDecoder {
    pub fn new(config: SensorConfig, units: OutputUnits) -> Self {
        Self {
            config,
            calibration: config.calibration(),
            units,
        }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn units(&self) -> OutputUnits {
        self.units
    }

    /// Select the pressure unit for subsequent decodes
    pub fn set_pressure_unit(&mut self, unit: PressureUnit) {
        self.units.pressure = unit;
    }

    /// Select the temperature unit for subsequent decodes
    pub fn set_temperature_unit(&mut self, unit: TemperatureUnit) {
        self.units.temperature = unit;
    }

    /// Decode a frame into a reading in the current units
    pub fn decode(&self, frame: &Frame) -> Reading {
        self.decode_fields(frame.extract())
    }

    /// Calibrate already unpacked fields into a reading in the current units
    pub fn decode_fields(&self, fields: RawFields) -> Reading {
        let psi = self.calibration.transfer_pressure(fields.pressure);
        let celsius = self.calibration.transfer_temperature(fields.temperature);
        let (pressure, temperature) = self.units.convert(psi, celsius);

        Reading {
            status: fields.status,
            raw_pressure: fields.pressure,
            raw_temperature: fields.temperature,
            pressure,
            temperature,
            units: self.units,
        }
    }

    /// Recompute a previous reading's physical values in the current units.
    ///
    /// Only the raw codes and status of `reading` are used, so the result is
    /// what decoding the original frame now would give.
    pub fn reconvert(&self, reading: &Reading) -> Reading {
        self.decode_fields(RawFields {
            status: reading.status,
            pressure: reading.raw_pressure,
            temperature: reading.raw_temperature,
        })
    }
}
