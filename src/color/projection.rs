//! Projections from a base color sample into output channel tuples
//!
//! A [`Projection`] is a pure, total function from one [`ColorSample`] to a
//! fixed number of `f64` channels. The averaging engine applies every
//! requested projection to each in-bounds pixel and averages per channel.

use crate::color::conversion::{ColorConverter, WhitePoint};
use crate::pixel::ColorSample;

/// Mapping from a base color sample to a channel tuple
pub trait Projection {
    /// Short label for the target representation (e.g. `"RGB"`)
    fn name(&self) -> &str;

    /// Column names, one per output channel
    fn channel_names(&self) -> &[&'static str];

    /// Number of output channels
    fn channel_count(&self) -> usize {
        self.channel_names().len()
    }

    /// Write the projected channels of `sample` into `out`
    ///
    /// `out.len()` always equals [`Projection::channel_count`].
    fn project_into(&self, sample: ColorSample, out: &mut [f64]);
}

impl<P: Projection + ?Sized> Projection for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn channel_names(&self) -> &[&'static str] {
        (**self).channel_names()
    }

    fn project_into(&self, sample: ColorSample, out: &mut [f64]) {
        (**self).project_into(sample, out)
    }
}

/// Identity RGB passthrough on the 0-255 scale
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbProjection;

impl Projection for RgbProjection {
    fn name(&self) -> &str {
        "RGB"
    }

    fn channel_names(&self) -> &[&'static str] {
        &["R", "G", "B"]
    }

    fn project_into(&self, sample: ColorSample, out: &mut [f64]) {
        out[0] = f64::from(sample.red);
        out[1] = f64::from(sample.green);
        out[2] = f64::from(sample.blue);
    }
}

/// CIE L*a*b* under a selectable reference white
#[derive(Debug, Clone, Copy, Default)]
pub struct LabProjection {
    converter: ColorConverter,
}

impl LabProjection {
    /// Lab projection under `white_point`
    pub fn new(white_point: WhitePoint) -> Self {
        Self {
            converter: ColorConverter::new(white_point),
        }
    }

    /// Reference white of the produced Lab values
    pub fn white_point(&self) -> WhitePoint {
        self.converter.white_point()
    }
}

impl Projection for LabProjection {
    fn name(&self) -> &str {
        match self.converter.white_point() {
            WhitePoint::D50 => "Lab (D50)",
            WhitePoint::D65 => "Lab (D65)",
        }
    }

    fn channel_names(&self) -> &[&'static str] {
        &["L*", "a*", "b*"]
    }

    fn project_into(&self, sample: ColorSample, out: &mut [f64]) {
        out.copy_from_slice(&self.converter.srgb_to_lab(sample));
    }
}

/// Projection backed by a closure returning `N` channels
///
/// ```
/// use sample_colors::color::{FnProjection, Projection};
/// use palette::Srgb;
///
/// let luma = FnProjection::new("Luma", ["Y"], |c: Srgb<u8>| {
///     [0.299 * c.red as f64 + 0.587 * c.green as f64 + 0.114 * c.blue as f64]
/// });
/// let mut out = [0.0];
/// luma.project_into(Srgb::new(255, 255, 255), &mut out);
/// assert!((out[0] - 255.0).abs() < 1e-9);
/// ```
pub struct FnProjection<F, const N: usize> {
    name: String,
    channel_names: [&'static str; N],
    project: F,
}

impl<F, const N: usize> FnProjection<F, N>
where
    F: Fn(ColorSample) -> [f64; N],
{
    pub fn new(name: impl Into<String>, channel_names: [&'static str; N], project: F) -> Self {
        Self {
            name: name.into(),
            channel_names,
            project,
        }
    }
}

impl<F, const N: usize> Projection for FnProjection<F, N>
where
    F: Fn(ColorSample) -> [f64; N],
{
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_names(&self) -> &[&'static str] {
        &self.channel_names
    }

    fn project_into(&self, sample: ColorSample, out: &mut [f64]) {
        out.copy_from_slice(&(self.project)(sample));
    }
}

impl<F, const N: usize> std::fmt::Debug for FnProjection<F, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProjection")
            .field("name", &self.name)
            .field("channel_names", &self.channel_names)
            .finish_non_exhaustive()
    }
}
