//! Purchasable DLV part numbers and their calibration parameters.
//!
//! Part numbers follow `DLV-<range><kind>`, where `<range>` is the full
//! scale in PSI and `<kind>` is G (gage), D (differential) or A (absolute).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::calibration::{SensorConfig, SensorKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartNumberError {
    #[error("unknown DLV part number: {0}")]
    Unknown(String),
}

/// Known DLV part numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
#[serde(try_from = "String", into = "String")]
pub enum PartNumber {
    Dlv005D,
    Dlv015D,
    Dlv030D,
    Dlv060D,
    Dlv005G,
    Dlv015G,
    Dlv030G,
    Dlv060G,
    Dlv015A,
    Dlv030A,
}

impl PartNumber {
    /// Calibration table: kind and full scale in PSI
    fn entry(self) -> (SensorKind, f64) {
        use SensorKind::*;
        match self {
            PartNumber::Dlv005D => (Differential, 5.0),
            PartNumber::Dlv015D => (Differential, 15.0),
            PartNumber::Dlv030D => (Differential, 30.0),
            PartNumber::Dlv060D => (Differential, 60.0),
            PartNumber::Dlv005G => (Gage, 5.0),
            PartNumber::Dlv015G => (Gage, 15.0),
            PartNumber::Dlv030G => (Gage, 30.0),
            PartNumber::Dlv060G => (Gage, 60.0),
            PartNumber::Dlv015A => (Absolute, 15.0),
            PartNumber::Dlv030A => (Absolute, 30.0),
        }
    }

    pub fn kind(self) -> SensorKind {
        self.entry().0
    }

    /// Rated full-scale magnitude in PSI
    pub fn pressure_max(self) -> f64 {
        self.entry().1
    }

    /// Sensor config for this part
    pub fn config(self) -> SensorConfig {
        let (kind, max) = self.entry();
        SensorConfig::rated(kind, max)
    }
}

impl std::fmt::Display for PartNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (kind, max) = self.entry();
        write!(f, "DLV-{:03}{}", max as u32, kind.code())
    }
}

impl FromStr for PartNumber {
    type Err = PartNumberError;

    /// Parse `DLV-030D` style strings, ignoring case and surrounding whitespace.
    ///
    /// Trailing option suffixes after the kind letter (e.g. `DLV-030D-E1BD-C-NI3F`)
    /// are accepted and ignored since they do not affect calibration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || PartNumberError::Unknown(s.to_string());
        let upper = s.trim().to_ascii_uppercase();
        let base = upper.get(..8).ok_or_else(unknown)?;
        let rest = &upper[8..];
        if !(rest.is_empty() || rest.starts_with('-')) {
            return Err(unknown());
        }

        PartNumber::iter()
            .find(|part| part.to_string() == base)
            .ok_or_else(unknown)
    }
}

impl TryFrom<String> for PartNumber {
    type Error = PartNumberError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PartNumber> for String {
    fn from(part: PartNumber) -> Self {
        part.to_string()
    }
}
