//! Run configuration: reference category, standard energy and parser layout.
//!
//! Values come from [`Config::default`], optionally overridden by a TOML file
//! and then by command-line flags.
//!
//! ```toml
//! reference_label = "C"
//! standard_energy = 284.8
//! excluded_label = "O"
//!
//! [parser]
//! region_header_lines = 4
//! layer_header_lines = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Adventitious carbon C 1s binding energy, eV.
pub const DEFAULT_STANDARD_ENERGY: f64 = 284.6;
pub const DEFAULT_REFERENCE_LABEL: &str = "C";
/// Label skipped by the viewer in addition to the reference.
pub const DEFAULT_EXCLUDED_LABEL: &str = "O";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("standard energy `{value}` is not a number")]
    InvalidStandardEnergy { value: String },
    #[error("standard energy must be finite, got {0}")]
    NonFiniteStandardEnergy(f64),
}

/// Layout of the fixed header blocks inside a `Region` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Lines discarded after the label line.
    pub region_header_lines: usize,
    /// Lines discarded per `Layer` sub-header, the marker line included.
    pub layer_header_lines: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            region_header_lines: 4,
            layer_header_lines: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Category whose peak anchors the calibration.
    pub reference_label: String,
    /// Expected energy of the reference peak, same units as the input.
    pub standard_energy: f64,
    /// Second label left out of the viewer (still exported).
    pub excluded_label: String,
    pub parser: ParserConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_label: DEFAULT_REFERENCE_LABEL.to_string(),
            standard_energy: DEFAULT_STANDARD_ENERGY,
            excluded_label: DEFAULT_EXCLUDED_LABEL.to_string(),
            parser: ParserConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.standard_energy.is_finite() {
            return Err(ConfigError::NonFiniteStandardEnergy(self.standard_energy));
        }
        Ok(())
    }
}

/// Parse an operator-supplied standard energy.
pub fn parse_standard_energy(s: &str) -> Result<f64, ConfigError> {
    let value = s
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidStandardEnergy {
            value: s.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ConfigError::NonFiniteStandardEnergy(value));
    }
    Ok(value)
}
