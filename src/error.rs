//! Error types for the sample_colors library

use thiserror::Error;

/// Result type alias for sample_colors operations
pub type Result<T> = std::result::Result<T, SamplingError>;

/// Error types for window sampling, loading and export
#[derive(Error, Debug)]
pub enum SamplingError {
    /// Invalid input parameters (window size, projections, point coordinates)
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// A pixel coordinate fell outside the image
    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// A pixel source could not deliver a sample
    #[error("Pixel access failed: {message}")]
    PixelAccess {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration file could not be read, parsed or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Results could not be written
    #[error("Export failed: {message}")]
    ExportError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SamplingError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an export error with context
    pub fn export<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExportError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a pixel access error without an underlying cause
    pub fn pixel_access(message: impl Into<String>) -> Self {
        Self::PixelAccess {
            message: message.into(),
            source: None,
        }
    }

    /// Check if the error concerns a single point rather than the whole run
    ///
    /// Callers driving a batch may choose to skip such points and continue.
    pub fn is_point_local(&self) -> bool {
        matches!(
            self,
            SamplingError::OutOfBounds { .. } | SamplingError::PixelAccess { .. }
        )
    }

    /// Get user-friendly error description for command-line display
    pub fn user_message(&self) -> String {
        match self {
            SamplingError::InvalidParameter { parameter, value } if parameter == "window_size" => {
                format!(
                    "Invalid sample size '{}'. Please enter a positive integer (e.g. 3 for 3x3).",
                    value
                )
            }
            SamplingError::InvalidParameter { parameter, value } => {
                format!("Invalid value '{}' for {}.", value, parameter)
            }
            SamplingError::OutOfBounds { x, y, width, height } => {
                format!(
                    "Point ({}, {}) lies outside the image ({}x{}). Move it inside the frame.",
                    x, y, width, height
                )
            }
            SamplingError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            SamplingError::ConfigError { message, .. } => {
                format!("Could not use the configuration file: {}", message)
            }
            SamplingError::ExportError { message, .. } => {
                format!("Could not write the results: {}", message)
            }
            SamplingError::PixelAccess { .. } => {
                "Could not read pixel data from the image.".to_string()
            }
        }
    }
}
