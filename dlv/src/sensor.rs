//! DLV sensor driver on top of an abstract frame transport.
//!
//! The transport only has to hand back one 4-byte frame per request, in wire
//! order. Bus arbitration, retries and addressing stay on the transport side.
//!
//! # Example
//!
//! ```
//! use dlv::{DlvSensor, OutputUnits, PartNumber, ReplaySource};
//!
//! let source = ReplaySource::new(vec![0x00, 0x00, 0x00, 0x00]);
//! let mut sensor = DlvSensor::from_part(source, PartNumber::Dlv030D, OutputUnits::default());
//!
//! let reading = sensor.read()?;
//! assert_eq!(reading.raw_pressure, 0);
//! assert!((reading.pressure + 37.5).abs() < 1e-9);
//! # Ok::<(), dlv::SensorError<dlv::ReplayError>>(())
//! ```

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::calibration::SensorConfig;
use crate::decoder::FrameDecoder;
use crate::frame::{Frame, FRAME_LEN};
use crate::part_number::PartNumber;
use crate::reading::Reading;
use crate::units::{OutputUnits, PressureUnit, TemperatureUnit};

/// Default I2C address from the datasheet
pub const I2C_ADDRESS: u8 = 0x28;

/// Bytes requested from the sensor per read
pub const READ_LENGTH: usize = FRAME_LEN;

/// Source of raw frames, typically an I2C read of [`READ_LENGTH`] bytes at
/// [`I2C_ADDRESS`].
///
/// Abstracts the bus so the driver can run against recorded data or mocks.
pub trait FrameSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch exactly one frame, bytes in the order received
    fn read_frame(&mut self) -> Result<Frame, Self::Error>;
}

#[derive(Error, Debug)]
pub enum SensorError<E: std::error::Error + 'static> {
    #[error("frame transport failed: {0}")]
    Transport(#[source] E),
}

/// One DLV sensor: a transport, its decoder, and the most recent reading
#[derive(Debug)]
pub struct DlvSensor<S> {
    source: S,
    decoder: FrameDecoder,
    last: Option<Reading>,
}

impl<S: FrameSource> DlvSensor<S> {
    pub fn new(source: S, config: SensorConfig, units: OutputUnits) -> Self {
        info!(
            kind = %config.kind(),
            pressure_max_psi = config.pressure_max(),
            pressure_unit = %units.pressure,
            temperature_unit = %units.temperature,
            "DLV sensor configured"
        );
        Self {
            source,
            decoder: FrameDecoder::new(config, units),
            last: None,
        }
    }

    /// Configure from a catalogue part number
    pub fn from_part(source: S, part: PartNumber, units: OutputUnits) -> Self {
        debug!(%part, "Using part number calibration");
        Self::new(source, part.config(), units)
    }

    /// Read one frame and decode it.
    ///
    /// The reading replaces the previously stored one. Stale and error frames
    /// are returned like any other; check [`Reading::is_valid`].
    pub fn read(&mut self) -> Result<Reading, SensorError<S::Error>> {
        let frame = self.source.read_frame().map_err(SensorError::Transport)?;
        trace!(bytes = ?frame.as_bytes(), "Frame received");

        let reading = self.decoder.decode(&frame);
        debug!(
            status = %reading.status,
            raw_pressure = reading.raw_pressure,
            raw_temperature = reading.raw_temperature,
            "Frame decoded"
        );
        if !reading.is_valid() {
            warn!(status = %reading.status, "Sensor reported degraded data");
        }

        self.last = Some(reading);
        Ok(reading)
    }

    /// Most recent reading, if any read has succeeded
    pub fn last_reading(&self) -> Option<&Reading> {
        self.last.as_ref()
    }

    /// Most recent reading expressed in the current output units
    pub fn last_reading_converted(&self) -> Option<Reading> {
        self.last.map(|reading| self.decoder.reconvert(&reading))
    }

    pub fn set_pressure_unit(&mut self, unit: PressureUnit) {
        self.decoder.set_pressure_unit(unit);
    }

    pub fn set_temperature_unit(&mut self, unit: TemperatureUnit) {
        self.decoder.set_temperature_unit(unit);
    }

    pub fn units(&self) -> OutputUnits {
        self.decoder.units()
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Release the transport
    pub fn into_inner(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::SensorKind;
    use crate::frame::RawFields;
    use crate::status::Status;
    use approx::assert_abs_diff_eq;
    use std::collections::VecDeque;

    #[derive(Error, Debug)]
    #[error("bus NACK")]
    struct Nack;

    /// Transport that hands out queued frames and then NACKs
    #[derive(Default)]
    struct MockBus {
        frames: VecDeque<Frame>,
        requests: usize,
    }

    impl MockBus {
        fn with_frames(frames: impl IntoIterator<Item = Frame>) -> Self {
            Self {
                frames: frames.into_iter().collect(),
                requests: 0,
            }
        }
    }

    impl FrameSource for MockBus {
        type Error = Nack;

        fn read_frame(&mut self) -> Result<Frame, Self::Error> {
            self.requests += 1;
            self.frames.pop_front().ok_or(Nack)
        }
    }

    fn frame(status: Status, pressure: u16, temperature: u16) -> Frame {
        Frame::pack(RawFields {
            status,
            pressure,
            temperature,
        })
    }

    #[test]
    fn test_address_and_length() {
        assert_eq!(I2C_ADDRESS, 0x28);
        assert_eq!(READ_LENGTH, 4);
    }

    #[test]
    fn test_read_decodes_and_stores_last() {
        let bus = MockBus::with_frames([frame(Status::Current, 1638, 2047)]);
        let mut sensor = DlvSensor::from_part(bus, PartNumber::Dlv015G, OutputUnits::default());
        assert!(sensor.last_reading().is_none());

        let reading = sensor.read().unwrap();
        assert_eq!(reading.status, Status::Current);
        assert_abs_diff_eq!(reading.pressure, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(reading.temperature, 150.0, epsilon = 1e-9);
        assert_eq!(sensor.last_reading(), Some(&reading));
        assert_eq!(sensor.source_mut().requests, 1);
    }

    #[test]
    fn test_each_read_overwrites_last() {
        let bus = MockBus::with_frames([
            frame(Status::Current, 8192, 0),
            frame(Status::StaleData, 9000, 100),
        ]);
        let config = SensorConfig::new(SensorKind::Differential, 5.0).unwrap();
        let mut sensor = DlvSensor::new(bus, config, OutputUnits::default());

        sensor.read().unwrap();
        let second = sensor.read().unwrap();
        assert_eq!(second.status, Status::StaleData);
        assert_eq!(sensor.last_reading().map(|r| r.raw_pressure), Some(9000));
    }

    #[test]
    fn test_transport_failure_keeps_previous_reading() {
        let bus = MockBus::with_frames([frame(Status::Current, 4000, 500)]);
        let mut sensor = DlvSensor::from_part(bus, PartNumber::Dlv005D, OutputUnits::default());

        let first = sensor.read().unwrap();
        let err = sensor.read().unwrap_err();
        assert!(matches!(err, SensorError::Transport(Nack)));
        assert_eq!(err.to_string(), "frame transport failed: bus NACK");
        assert_eq!(sensor.last_reading(), Some(&first));
    }

    #[test]
    fn test_error_status_passes_through() {
        let bus = MockBus::with_frames([frame(Status::Error, 0, 0)]);
        let mut sensor = DlvSensor::from_part(bus, PartNumber::Dlv030D, OutputUnits::default());

        let reading = sensor.read().unwrap();
        assert_eq!(reading.status, Status::Error);
        assert!(!reading.is_valid());
        assert_abs_diff_eq!(reading.pressure, -37.5, epsilon = 1e-9);
        assert_eq!(reading.valid_values(), None);
    }

    #[test]
    fn test_unit_change_reconverts_last_reading() {
        let bus = MockBus::with_frames([frame(Status::Current, 8192, 0)]);
        let mut sensor = DlvSensor::from_part(bus, PartNumber::Dlv030D, OutputUnits::default());
        let stored = sensor.read().unwrap();

        sensor.set_temperature_unit(TemperatureUnit::Fahrenheit);
        sensor.set_pressure_unit(PressureUnit::InchesH2O);

        // Stored reading keeps the units it was decoded with
        assert_eq!(sensor.last_reading(), Some(&stored));

        let converted = sensor.last_reading_converted().unwrap();
        assert_eq!(converted.raw_pressure, stored.raw_pressure);
        assert_eq!(converted.raw_temperature, stored.raw_temperature);
        assert_abs_diff_eq!(converted.temperature, -58.0, epsilon = 1e-9);
        assert_eq!(converted.units.pressure, PressureUnit::InchesH2O);
    }

    #[test]
    fn test_into_inner_returns_transport() {
        let bus = MockBus::with_frames([frame(Status::Current, 0, 0)]);
        let mut sensor = DlvSensor::from_part(bus, PartNumber::Dlv005G, OutputUnits::default());
        sensor.read().unwrap();
        let bus = sensor.into_inner();
        assert_eq!(bus.requests, 1);
        assert!(bus.frames.is_empty());
    }
}
