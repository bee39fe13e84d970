//! Configuration for a sampling run.
//!
//! A [`SamplingConfig`] carries the window size, the Lab reference white,
//! the export format switches and, optionally, the list of sample points.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use sample_colors::SamplingConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = SamplingConfig::from_json_file(Path::new("points.json"))?;
//!
//! // Or use defaults
//! let config = SamplingConfig::default();
//! # Ok::<(), sample_colors::SamplingError>(())
//! ```
//!
//! Every field is optional in JSON; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::WhitePoint;
use crate::constants::{export, window};
use crate::error::{Result, SamplingError};
use crate::pixel::Coordinate;
use crate::sampling::WindowSize;

/// Complete configuration for sampling one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Window edge length (3 means 3x3)
    pub window_size: i64,

    /// Reference white for Lab output
    pub lab_white_point: WhitePoint,

    /// Decimal places for exported values
    pub precision: usize,

    /// Output CSV path
    pub output_path: PathBuf,

    /// Write the file name, color profile and bit depth lines
    pub include_metadata: bool,

    /// Append a column with the number of pixels averaged per point
    pub include_sample_count: bool,

    /// Sample centers, in export order
    pub points: Vec<Coordinate>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            window_size: window::DEFAULT_SIZE,
            lab_white_point: WhitePoint::default(),
            precision: export::DEFAULT_PRECISION,
            output_path: PathBuf::from(export::DEFAULT_OUTPUT_FILE),
            include_metadata: true,
            include_sample_count: false,
            points: Vec::new(),
        }
    }
}

impl SamplingConfig {
    /// Validated window size
    pub fn window(&self) -> Result<WindowSize> {
        WindowSize::new(self.window_size)
    }

    /// Check every parameter that can be checked without an image
    pub fn validate(&self) -> Result<()> {
        self.window()?;
        if self.precision > export::MAX_PRECISION {
            return Err(SamplingError::invalid_parameter("precision", self.precision));
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SamplingError::config(format!("cannot read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
            .map_err(|e| SamplingError::config(format!("cannot parse {}", path.display()), e))
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SamplingError::config("cannot serialize configuration", e))?;
        std::fs::write(path, json)
            .map_err(|e| SamplingError::config(format!("cannot write {}", path.display()), e))?;
        Ok(())
    }
}
