//! Output unit selection and conversion from the canonical units.
//!
//! Transfer functions always produce PSI and degrees Celsius; conversion to
//! the caller's units happens last.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Inches of water column (4 degC) per PSI
pub const IN_H2O_PER_PSI: f64 = 27.679904;

/// Pascal per PSI
pub const PASCAL_PER_PSI: f64 = 6894.75729;

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum::Display,
    strum::EnumIter,
)]
pub enum PressureUnit {
    #[default]
    #[strum(to_string = "psi")]
    Psi,
    #[value(name = "inh2o", alias = "in-h2o")]
    #[strum(to_string = "inH2O")]
    InchesH2O,
    #[strum(to_string = "Pa")]
    Pascal,
}

impl PressureUnit {
    /// Convert a pressure in PSI into this unit
    pub fn convert_psi(self, psi: f64) -> f64 {
        match self {
            PressureUnit::Psi => psi,
            PressureUnit::InchesH2O => psi * IN_H2O_PER_PSI,
            PressureUnit::Pascal => psi * PASCAL_PER_PSI,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum::Display,
    strum::EnumIter,
)]
pub enum TemperatureUnit {
    #[default]
    #[strum(to_string = "degC")]
    Celsius,
    #[strum(to_string = "degF")]
    Fahrenheit,
    #[strum(to_string = "K")]
    Kelvin,
}

impl TemperatureUnit {
    /// Convert a temperature in degrees Celsius into this unit
    pub fn convert_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 1.8 + 32.0,
            TemperatureUnit::Kelvin => celsius + KELVIN_OFFSET,
        }
    }
}

/// Units applied to decoded values.
///
/// The default is PSI and Celsius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputUnits {
    pub pressure: PressureUnit,
    pub temperature: TemperatureUnit,
}

impl OutputUnits {
    pub fn new(pressure: PressureUnit, temperature: TemperatureUnit) -> Self {
        Self {
            pressure,
            temperature,
        }
    }

    /// Convert a (PSI, Celsius) pair into these units
    pub fn convert(&self, psi: f64, celsius: f64) -> (f64, f64) {
        (
            self.pressure.convert_psi(psi),
            self.temperature.convert_celsius(celsius),
        )
    }
}
