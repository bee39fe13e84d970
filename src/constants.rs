//! Default values and reference constants for window sampling
//!
//! This module contains compile-time constants shared by the configuration
//! and the CSV exporter.

/// Window sampling defaults
pub mod window {
    /// Default neighborhood edge length (3 means a 3x3 window)
    pub const DEFAULT_SIZE: i64 = 3;
}

/// Tabular export defaults
pub mod export {
    /// Decimal places written for every channel value
    pub const DEFAULT_PRECISION: usize = 2;

    /// Largest accepted decimal precision
    pub const MAX_PRECISION: usize = 10;

    /// Default output file name
    pub const DEFAULT_OUTPUT_FILE: &str = "color_values.csv";

    /// Column separator, including the trailing space
    pub const SEPARATOR: &str = ", ";

    /// Label of the first column
    pub const POINT_COLUMN: &str = "Sample Point";

    /// Label of the optional sample count column
    pub const SAMPLE_COUNT_COLUMN: &str = "Samples";
}
