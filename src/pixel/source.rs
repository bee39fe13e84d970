//! Pixel source capability and the `image` crate adapter

use image::RgbImage;
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::{Result, SamplingError};

/// Base color representation delivered by a pixel source (8-bit sRGB)
pub type ColorSample = Srgb<u8>;

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Coordinate shifted by an offset
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Check `0 <= x < width` and `0 <= y < height`
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.x < i64::from(width) && self.y >= 0 && self.y < i64::from(height)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = SamplingError;

    /// Parse `"X,Y"` (whitespace around either number is ignored)
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SamplingError::invalid_parameter("point", s);
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse::<i64>().map_err(|_| invalid())?;
        let y = y.trim().parse::<i64>().map_err(|_| invalid())?;
        Ok(Self::new(x, y))
    }
}

/// Read-only image pixel access
///
/// Implementations must answer [`PixelSource::color_at`] for every in-bounds
/// coordinate. Queries are assumed free of side effects.
pub trait PixelSource {
    /// Image width in pixels
    fn width(&self) -> u32;

    /// Image height in pixels
    fn height(&self) -> u32;

    /// Color of the pixel at `(x, y)`
    ///
    /// # Errors
    ///
    /// Implementations return `SamplingError::PixelAccess` when the
    /// underlying data is unavailable.
    fn color_at(&self, x: u32, y: u32) -> Result<ColorSample>;

    /// Bounds-checked query
    ///
    /// Fails with `SamplingError::OutOfBounds` instead of clamping.
    fn checked_color_at(&self, at: Coordinate) -> Result<ColorSample> {
        if !at.is_within(self.width(), self.height()) {
            return Err(SamplingError::OutOfBounds {
                x: at.x,
                y: at.y,
                width: self.width(),
                height: self.height(),
            });
        }
        // in-bounds implies both fit in u32
        self.color_at(at.x as u32, at.y as u32)
    }
}

impl<S: PixelSource + ?Sized> PixelSource for &S {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn color_at(&self, x: u32, y: u32) -> Result<ColorSample> {
        (**self).color_at(x, y)
    }
}

/// Pixel source backed by a decoded 8-bit RGB image
#[derive(Debug, Clone)]
pub struct RgbImageSource {
    image: RgbImage,
}

impl RgbImageSource {
    /// Wrap a decoded image
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Borrow the wrapped image
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Unwrap the image
    pub fn into_inner(self) -> RgbImage {
        self.image
    }
}

impl From<RgbImage> for RgbImageSource {
    fn from(image: RgbImage) -> Self {
        Self::new(image)
    }
}

impl PixelSource for RgbImageSource {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn color_at(&self, x: u32, y: u32) -> Result<ColorSample> {
        let pixel = self.image.get_pixel_checked(x, y).ok_or_else(|| {
            SamplingError::pixel_access(format!(
                "no pixel at ({}, {}) in {}x{} image",
                x,
                y,
                self.image.width(),
                self.image.height()
            ))
        })?;
        let [r, g, b] = pixel.0;
        Ok(Srgb::new(r, g, b))
    }
}
