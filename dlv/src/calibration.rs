//! Raw code to physical value transfer functions for DLV sensors.
//!
//! Implements the linear output transfer functions from the DLV series
//! datasheet (DS-0336):
//!
//! ```text
//! Pressure(psi)     = 1.25 x ((P_out_dig - OS_dig) / 2^14) x FSS(psi)
//! Temperature(degC) = T_out_dig x (200 / (2^11 - 1)) - 50
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 2^14, the digital full-scale reference of the pressure output
pub const FULL_SCALE_REF: f64 = 16384.0;

/// Gain applied on top of the full-scale span
pub const PRESSURE_GAIN: f64 = 1.25;

/// Pressure code for zero on gage and absolute parts (10% of 2^14)
pub const ZERO_REF_ONE_SIDED: u16 = 1638;

/// Pressure code for zero on differential parts (mid-scale)
pub const ZERO_REF_DIFFERENTIAL: u16 = 8192;

const TEMPERATURE_SPAN_C: f64 = 200.0;
const TEMPERATURE_CODE_MAX: f64 = 2047.0;
const TEMPERATURE_OFFSET_C: f64 = -50.0;

/// Sensor variant, the letter after the range in a part number
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum::Display,
    strum::EnumIter,
)]
pub enum SensorKind {
    /// DLV-xxxG: pressure relative to ambient
    Gage,
    /// DLV-xxxD: pressure between two ports, zero at mid-scale
    Differential,
    /// DLV-xxxA: pressure relative to vacuum
    Absolute,
}

impl SensorKind {
    /// Part number suffix letter
    pub fn code(self) -> char {
        match self {
            SensorKind::Gage => 'G',
            SensorKind::Differential => 'D',
            SensorKind::Absolute => 'A',
        }
    }

    /// Look up a kind from its part number suffix letter (case-insensitive)
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'G' => Some(SensorKind::Gage),
            'D' => Some(SensorKind::Differential),
            'A' => Some(SensorKind::Absolute),
            _ => None,
        }
    }
}

/// Errors in sensor construction parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("pressure_max must be finite and greater than zero, got {0}")]
    InvalidPressureMax(f64),
}

/// Construction parameters for one physical sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    kind: SensorKind,
    pressure_max: f64,
}

impl SensorConfig {
    /// Create a config for a `kind` sensor rated to `pressure_max` PSI.
    ///
    /// For differential parts `pressure_max` is the one-sided magnitude, so a
    /// 30 PSI differential part reads -30..+30 PSI.
    pub fn new(kind: SensorKind, pressure_max: f64) -> Result<Self, ConfigError> {
        if !pressure_max.is_finite() || pressure_max <= 0.0 {
            return Err(ConfigError::InvalidPressureMax(pressure_max));
        }
        Ok(Self { kind, pressure_max })
    }

    /// Build from a known-good rating table entry without validation
    pub(crate) fn rated(kind: SensorKind, pressure_max: f64) -> Self {
        debug_assert!(pressure_max > 0.0);
        Self { kind, pressure_max }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Declared full-scale magnitude in PSI
    pub fn pressure_max(&self) -> f64 {
        self.pressure_max
    }

    /// Derive the transfer function constants for this sensor
    pub fn calibration(&self) -> Calibration {
        Calibration::new(self.kind, self.pressure_max)
    }
}

/// Transfer function constants, fixed for a sensor's lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pressure_zero_ref: f64,
    pressure_range: f64,
}

impl Calibration {
    /// Derive constants from sensor kind and one-sided full scale in PSI.
    pub fn new(kind: SensorKind, pressure_max: f64) -> Self {
        match kind {
            SensorKind::Gage | SensorKind::Absolute => Self {
                pressure_zero_ref: f64::from(ZERO_REF_ONE_SIDED),
                pressure_range: pressure_max,
            },
            SensorKind::Differential => Self {
                pressure_zero_ref: f64::from(ZERO_REF_DIFFERENTIAL),
                pressure_range: pressure_max * 2.0,
            },
        }
    }

    /// Pressure code corresponding to zero physical pressure
    pub fn pressure_zero_ref(&self) -> f64 {
        self.pressure_zero_ref
    }

    /// Full-scale span in PSI
    pub fn pressure_range(&self) -> f64 {
        self.pressure_range
    }

    /// Convert a raw 14-bit pressure code to PSI.
    ///
    /// Codes below the zero reference give negative pressure.
    pub fn transfer_pressure(&self, raw: u16) -> f64 {
        let offset = (f64::from(raw) - self.pressure_zero_ref) / FULL_SCALE_REF;
        PRESSURE_GAIN * offset * self.pressure_range
    }

    /// Convert a raw 11-bit temperature code to degrees Celsius.
    pub fn transfer_temperature(&self, raw: u16) -> f64 {
        transfer_temperature(raw)
    }
}

/// Convert a raw 11-bit temperature code to degrees Celsius.
///
/// The mapping is the same for every DLV variant: 0 is -50 degC and 2047 is
/// +150 degC.
pub fn transfer_temperature(raw: u16) -> f64 {
    f64::from(raw) * (TEMPERATURE_SPAN_C / TEMPERATURE_CODE_MAX) + TEMPERATURE_OFFSET_C
}
