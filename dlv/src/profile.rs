//! JSON sensor profiles.
//!
//! A profile names the attached part (or its kind and range directly) and
//! the preferred output units, so tools don't need them on every invocation:
//!
//! ```json
//! {
//!   "part": "DLV-030D",
//!   "units": { "pressure": "InchesH2O", "temperature": "Celsius" }
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calibration::{ConfigError, SensorConfig, SensorKind};
use crate::part_number::PartNumber;
use crate::units::OutputUnits;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Neither a part number nor both kind and range were given
    #[error("profile needs either `part` or both `kind` and `pressure_max_psi`")]
    Incomplete,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorProfile {
    /// Catalogue part; takes precedence over `kind`/`pressure_max_psi`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<PartNumber>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SensorKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_max_psi: Option<f64>,

    #[serde(default)]
    pub units: OutputUnits,
}

impl SensorProfile {
    pub fn for_part(part: PartNumber, units: OutputUnits) -> Self {
        Self {
            part: Some(part),
            units,
            ..Self::default()
        }
    }

    /// Resolve the sensor config this profile describes
    pub fn config(&self) -> Result<SensorConfig, ProfileError> {
        if let Some(part) = self.part {
            return Ok(part.config());
        }
        match (self.kind, self.pressure_max_psi) {
            (Some(kind), Some(max)) => Ok(SensorConfig::new(kind, max)?),
            _ => Err(ProfileError::Incomplete),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ProfileError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ProfileError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
