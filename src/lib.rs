//! # Sample Colors
//!
//! A Rust crate for measuring average colors around chosen points of an image.
//!
//! For every sample point the library averages a square window of pixels and
//! reports the mean in several color representations at once (8-bit RGB and
//! CIE L*a*b* out of the box). Results can be written as CSV.
//!
//! - Pixel access goes through the [`PixelSource`] trait, so any in-memory
//!   bitmap or test stub can be sampled.
//! - Color representations are [`Projection`]s; add your own with
//!   [`color::FnProjection`].
//! - Windows that cross the image edge average only the in-bounds pixels and
//!   report how many were used in [`AveragedColor::sample_count`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use sample_colors::{sample_image, Coordinate, SamplingConfig};
//! use std::path::Path;
//!
//! let config = SamplingConfig {
//!     window_size: 5,
//!     points: vec![Coordinate::new(120, 80), Coordinate::new(300, 410)],
//!     ..Default::default()
//! };
//! let report = sample_image(Path::new("chart.png"), &config)?;
//! report.export_to_path(&config.output_path, &config)?;
//! # Ok::<(), sample_colors::SamplingError>(())
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod image_loader;
pub mod pixel;
pub mod sampling;

pub use color::{LabProjection, Projection, RgbProjection, WhitePoint};
pub use config::SamplingConfig;
pub use error::{Result, SamplingError};
pub use export::CsvExporter;
pub use image_loader::{load_image, ImageMetadata};
pub use pixel::{ColorSample, Coordinate, PixelSource, RgbImageSource};
pub use sampling::{
    average_at, AveragedColor, BatchSampler, ChannelMeans, SampleRecord, WindowAverager,
    WindowSize,
};

/// Sampled points of one image together with export context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleReport {
    /// Present when the pixels came from a file
    pub metadata: Option<ImageMetadata>,
    /// Column names of all projections, in output order
    pub channel_names: Vec<&'static str>,
    /// One record per sample point, in input order
    pub records: Vec<SampleRecord>,
}

impl SampleReport {
    /// Records whose window was cut by the image edge
    pub fn truncated(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.iter().filter(|r| r.color.is_truncated())
    }

    /// Write the report as CSV using the format switches of `config`
    pub fn write_csv<W: Write>(&self, writer: &mut W, config: &SamplingConfig) -> Result<()> {
        CsvExporter::from_config(config).export(
            writer,
            self.metadata.as_ref(),
            &self.channel_names,
            &self.records,
        )
    }

    /// Write the report as a CSV file
    pub fn export_to_path(&self, path: &Path, config: &SamplingConfig) -> Result<()> {
        CsvExporter::from_config(config).export_to_path(
            path,
            self.metadata.as_ref(),
            &self.channel_names,
            &self.records,
        )
    }
}

/// Sample `centers` of an in-memory source
///
/// Checks the configuration and every center before reading any pixel, then
/// averages RGB and Lab (per `config.lab_white_point`) around each center.
///
/// # Errors
///
/// - `SamplingError::InvalidParameter` for an invalid window size or precision
/// - `SamplingError::OutOfBounds` for the first center outside the image
/// - any error raised by `source`
pub fn sample_source<S>(source: &S, centers: &[Coordinate], config: &SamplingConfig) -> Result<SampleReport>
where
    S: PixelSource + ?Sized,
{
    config.validate()?;
    let size = config.window()?;

    let (width, height) = (source.width(), source.height());
    if let Some(center) = centers.iter().find(|c| !c.is_within(width, height)) {
        return Err(SamplingError::OutOfBounds {
            x: center.x,
            y: center.y,
            width,
            height,
        });
    }

    let averager = WindowAverager::standard(config.lab_white_point);
    let records = BatchSampler::new(source, &averager, size).sample_all(centers.iter().copied())?;

    let truncated = records.iter().filter(|r| r.color.is_truncated()).count();
    tracing::info!(
        points = records.len(),
        truncated,
        window = %size,
        white_point = %config.lab_white_point,
        "Sampled points"
    );

    Ok(SampleReport {
        metadata: None,
        channel_names: averager.channel_names(),
        records,
    })
}

/// Load an image and sample `config.points`
///
/// The configuration is validated before the file is opened.
pub fn sample_image(image_path: &Path, config: &SamplingConfig) -> Result<SampleReport> {
    config.validate()?;
    let loaded = load_image(image_path)?;
    let mut report = sample_source(&loaded.source, &config.points, config)?;
    report.metadata = Some(loaded.metadata);
    Ok(report)
}
