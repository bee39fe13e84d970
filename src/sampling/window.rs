//! Windowed neighborhood averaging
//!
//! For a center `(x, y)` and window size `n`, every offset `(i, j)` with
//! `i, j` in `[-r, r]`, `r = floor(n / 2)`, is visited. Offsets landing
//! outside the image are skipped (not clamped, not zero-filled), and each
//! channel mean divides by the number of offsets that were actually read.
//!
//! Consequences worth knowing when reading results:
//! - Even sizes visit `(2r + 1)²` offsets, so a size of 4 samples a 5x5
//!   window. This mirrors the long-standing behavior of the export tool and
//!   is kept as-is rather than validated as intended.
//! - Near the border `sample_count` drops below the full window, so edge
//!   points average fewer pixels than interior ones. Check
//!   [`AveragedColor::is_truncated`] before comparing them.
//! - Any positive size is accepted. Only offsets that overlap the image are
//!   visited, so a window larger than the image costs one pass over the image.

use std::num::IntErrorKind;

use serde::Serialize;

use crate::color::{LabProjection, Projection, RgbProjection, WhitePoint};
use crate::pixel::{Coordinate, PixelSource};
use crate::{Result, SamplingError};

/// Validated window edge length (always >= 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WindowSize(u64);

impl WindowSize {
    /// Validate a window size
    ///
    /// # Errors
    ///
    /// `SamplingError::InvalidParameter` if `size` is not positive.
    pub fn new(size: i64) -> Result<Self> {
        if size < 1 {
            return Err(SamplingError::invalid_parameter("window_size", size));
        }
        Ok(Self(size.unsigned_abs()))
    }

    /// Validate a floating-point window size, which must be integral
    ///
    /// Sizes beyond `i64::MAX` saturate; such a window covers any image.
    pub fn from_f64(size: f64) -> Result<Self> {
        if !size.is_finite() || size.fract() != 0.0 || size < 1.0 {
            return Err(SamplingError::invalid_parameter("window_size", size));
        }
        Self::new(size as i64)
    }

    /// Requested edge length
    pub fn get(self) -> u64 {
        self.0
    }

    /// `floor(size / 2)`
    pub fn radius(self) -> i64 {
        (self.0 / 2) as i64
    }

    /// Offsets visited for an unobstructed window: `(2r + 1)²`, saturating
    /// at `usize::MAX`
    pub fn offset_count(self) -> usize {
        let side = usize::try_from(2 * self.radius() + 1).unwrap_or(usize::MAX);
        side.saturating_mul(side)
    }

    /// Iterate offsets `(i, j)` in visiting order (`i` outer, `j` inner)
    pub fn offsets(self) -> impl Iterator<Item = (i64, i64)> {
        let r = self.radius();
        (-r..=r).flat_map(move |i| (-r..=r).map(move |j| (i, j)))
    }
}

impl TryFrom<i64> for WindowSize {
    type Error = SamplingError;

    fn try_from(size: i64) -> Result<Self> {
        Self::new(size)
    }
}

impl TryFrom<f64> for WindowSize {
    type Error = SamplingError;

    fn try_from(size: f64) -> Result<Self> {
        Self::from_f64(size)
    }
}

impl std::str::FromStr for WindowSize {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i64>() {
            Ok(size) => Self::new(size),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Self::new(i64::MAX),
            Err(_) => Err(SamplingError::invalid_parameter("window_size", s)),
        }
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// Per-channel means for one projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMeans {
    /// Projection label (e.g. `"RGB"`)
    pub name: String,
    /// Column names, parallel to `values`
    pub channel_names: Vec<&'static str>,
    /// Arithmetic mean of every channel
    pub values: Vec<f64>,
}

/// Averaged color of one window, for every requested projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragedColor {
    /// Means in projection order
    pub projections: Vec<ChannelMeans>,
    /// In-bounds offsets that contributed (shared by all projections)
    pub sample_count: usize,
    /// Offsets an unobstructed window would have contributed
    pub window_count: usize,
}

impl AveragedColor {
    /// Means of the projection at `index`
    pub fn get(&self, index: usize) -> Option<&ChannelMeans> {
        self.projections.get(index)
    }

    /// Means of the first projection named `name`
    pub fn by_name(&self, name: &str) -> Option<&ChannelMeans> {
        self.projections.iter().find(|p| p.name == name)
    }

    /// Whether part of the window fell outside the image
    pub fn is_truncated(&self) -> bool {
        self.sample_count < self.window_count
    }

    /// All channel values in projection order, flattened
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.projections.iter().flat_map(|p| p.values.iter().copied())
    }
}

/// Window averaging engine over a fixed list of projections
pub struct WindowAverager {
    projections: Vec<Box<dyn Projection>>,
}

impl std::fmt::Debug for WindowAverager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.projections.iter().map(|p| p.name()).collect();
        f.debug_struct("WindowAverager")
            .field("projections", &names)
            .finish()
    }
}

impl WindowAverager {
    /// Create an averager
    ///
    /// # Errors
    ///
    /// `SamplingError::InvalidParameter` if `projections` is empty.
    pub fn new(projections: Vec<Box<dyn Projection>>) -> Result<Self> {
        if projections.is_empty() {
            return Err(SamplingError::invalid_parameter("projections", "[]"));
        }
        Ok(Self { projections })
    }

    /// Averager producing RGB followed by Lab under `white_point`
    pub fn standard(white_point: WhitePoint) -> Self {
        Self {
            projections: vec![
                Box::new(RgbProjection),
                Box::new(LabProjection::new(white_point)),
            ],
        }
    }

    /// Projections in output order
    pub fn projections(&self) -> &[Box<dyn Projection>] {
        &self.projections
    }

    /// Column names of every projection, in output order
    pub fn channel_names(&self) -> Vec<&'static str> {
        self.projections
            .iter()
            .flat_map(|p| p.channel_names().iter().copied())
            .collect()
    }

    /// Average the window around `center`
    ///
    /// `center` is expected to lie inside `source`; a center outside the
    /// image is reported as `SamplingError::OutOfBounds` before any pixel
    /// is read. Errors from `source` abort the call unchanged.
    pub fn average_at<S>(&self, source: &S, center: Coordinate, size: WindowSize) -> Result<AveragedColor>
    where
        S: PixelSource + ?Sized,
    {
        let projections: Vec<&dyn Projection> =
            self.projections.iter().map(|p| p.as_ref()).collect();
        average_window(source, center, size, &projections)
    }
}

/// Validate `size`, then average the window around `center`
///
/// Nothing is read from `source` unless `size` is a positive integer.
///
/// # Errors
///
/// - `SamplingError::InvalidParameter` for a non-positive size or an empty
///   projection list
/// - `SamplingError::OutOfBounds` for a center outside the image
/// - whatever `source` returns for a failed pixel read
pub fn average_at<S>(
    source: &S,
    center: Coordinate,
    size: i64,
    projections: &[&dyn Projection],
) -> Result<AveragedColor>
where
    S: PixelSource + ?Sized,
{
    let size = WindowSize::new(size)?;
    if projections.is_empty() {
        return Err(SamplingError::invalid_parameter("projections", "[]"));
    }
    average_window(source, center, size, projections)
}

fn average_window<S>(
    source: &S,
    center: Coordinate,
    size: WindowSize,
    projections: &[&dyn Projection],
) -> Result<AveragedColor>
where
    S: PixelSource + ?Sized,
{
    let (width, height) = (source.width(), source.height());
    if !center.is_within(width, height) {
        return Err(SamplingError::OutOfBounds {
            x: center.x,
            y: center.y,
            width,
            height,
        });
    }

    let mut sums: Vec<Vec<f64>> = projections
        .iter()
        .map(|p| vec![0.0; p.channel_count()])
        .collect();
    let mut scratch = vec![0.0; sums.iter().map(Vec::len).max().unwrap_or(0)];
    let mut sample_count = 0usize;

    // Offsets outside the image contribute nothing, so only the overlap of
    // the window and the image is walked (same order as `WindowSize::offsets`).
    let r = size.radius();
    let columns = (-r).max(-center.x)..=r.min(i64::from(width) - 1 - center.x);
    let rows = (-r).max(-center.y)..=r.min(i64::from(height) - 1 - center.y);

    for i in columns {
        for j in rows.clone() {
            let sample = source.checked_color_at(center.offset(i, j))?;
            for (projection, sum) in projections.iter().zip(sums.iter_mut()) {
                let out = &mut scratch[..sum.len()];
                projection.project_into(sample, out);
                for (acc, value) in sum.iter_mut().zip(out.iter()) {
                    *acc += *value;
                }
            }
            sample_count += 1;
        }
    }

    // the center itself is in bounds, so at least one sample was read
    let divisor = sample_count as f64;
    let projections = projections
        .iter()
        .zip(sums)
        .map(|(projection, sum)| ChannelMeans {
            name: projection.name().to_string(),
            channel_names: projection.channel_names().to_vec(),
            values: sum.into_iter().map(|total| total / divisor).collect(),
        })
        .collect();

    Ok(AveragedColor {
        projections,
        sample_count,
        window_count: size.offset_count(),
    })
}
