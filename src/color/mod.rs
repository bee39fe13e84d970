//! Color conversion and projection module
//!
//! This module handles the sRGB to Lab conversion and the projection
//! functions the averaging engine applies to every sampled pixel.

pub mod conversion;
pub mod projection;

pub use conversion::{ColorConverter, WhitePoint};
pub use projection::{FnProjection, LabProjection, Projection, RgbProjection};
