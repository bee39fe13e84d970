//! Read-only access to image pixel data
//!
//! The averaging engine only talks to images through the [`PixelSource`]
//! capability, so any bitmap, decoded file or test stub can be sampled.

pub mod source;

pub use source::{ColorSample, Coordinate, PixelSource, RgbImageSource};
