//! AllSensors DLV series low voltage digital pressure sensor decoding
//!
//! Turns the 4-byte frames a DLV sensor returns over I2C into calibrated
//! pressure and temperature readings in caller-selected units.
//!
//! See the DLV datasheet: <https://www.allsensors.com/datasheets/DS-0336_Rev_E.pdf>
//!
//! The pipeline is:
//! 1. [`Frame::extract`] unpacks status, 14-bit pressure and 11-bit temperature codes
//! 2. [`Calibration`] applies the datasheet transfer functions (PSI, degC)
//! 3. [`OutputUnits`] converts to the selected units
//!
//! [`FrameDecoder`] runs all three without I/O. [`DlvSensor`] adds a
//! [`FrameSource`] transport and keeps the most recent [`Reading`].

mod calibration;
mod decoder;
mod frame;
mod part_number;
mod profile;
mod reading;
mod replay;
mod sensor;
mod status;
mod units;

pub use calibration::{
    transfer_temperature, Calibration, ConfigError, SensorConfig, SensorKind, FULL_SCALE_REF,
    PRESSURE_GAIN, ZERO_REF_DIFFERENTIAL, ZERO_REF_ONE_SIDED,
};
pub use decoder::FrameDecoder;
pub use frame::{Frame, FrameError, RawFields, FRAME_LEN, RAW_PRESSURE_MAX, RAW_TEMPERATURE_MAX};
pub use part_number::{PartNumber, PartNumberError};
pub use profile::{ProfileError, SensorProfile};
pub use reading::Reading;
pub use replay::{parse_hex_bytes, ReplayError, ReplaySource};
pub use sensor::{DlvSensor, FrameSource, SensorError, I2C_ADDRESS, READ_LENGTH};
pub use status::{Status, STATUS_MASK};
pub use units::{
    OutputUnits, PressureUnit, TemperatureUnit, IN_H2O_PER_PSI, KELVIN_OFFSET, PASCAL_PER_PSI,
};
