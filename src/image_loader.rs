//! Image loading into a sampling-ready pixel source
//!
//! Decodes any format the `image` crate supports into 8-bit RGB and records
//! the metadata written at the top of the CSV export: file name, color
//! profile and bits per channel.
//!
//! Pixel values are taken as encoded; no color management is applied, so
//! images with a non-sRGB embedded profile are measured in their own RGB.

use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader};
use serde::Serialize;

use crate::error::{Result, SamplingError};
use crate::pixel::RgbImageSource;

/// Profile label used when the file carries no ICC profile
pub const ASSUMED_PROFILE: &str = "sRGB (assumed)";

/// Descriptive metadata for the export header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    /// File name without directories
    pub file_name: String,
    /// ICC profile description, or [`ASSUMED_PROFILE`]
    pub color_profile: String,
    /// Bits per color channel of the decoded image
    pub bit_depth: u16,
}

/// Decoded image ready for sampling
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Pixels reduced to 8-bit RGB
    pub source: RgbImageSource,
    /// Header information for the export
    pub metadata: ImageMetadata,
}

/// Load an image from disk
///
/// The format is detected from the file contents, falling back to the
/// extension. Higher bit depths and alpha channels are reduced to 8-bit RGB.
///
/// # Errors
///
/// Returns `SamplingError::ImageLoadError` if the file cannot be opened,
/// the format is unknown, or decoding fails.
///
/// # Example
///
/// ```rust,no_run
/// use sample_colors::image_loader::load_image;
/// use sample_colors::PixelSource;
/// use std::path::Path;
///
/// let loaded = load_image(Path::new("photo.png"))?;
/// println!("{}: {}x{}", loaded.metadata.file_name, loaded.source.width(), loaded.source.height());
/// # Ok::<(), sample_colors::SamplingError>(())
/// ```
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| SamplingError::image_load(format!("Failed to open {}", path.display()), e))?
        .with_guessed_format()
        .map_err(|e| SamplingError::image_load(format!("Failed to read {}", path.display()), e))?;

    if reader.format().is_none() {
        return Err(SamplingError::ImageLoadError {
            message: format!("Unknown image format for file: {}", path.display()),
            source: None,
        });
    }

    let mut decoder = reader.into_decoder().map_err(|e| {
        SamplingError::image_load(format!("Unsupported image: {}", path.display()), e)
    })?;

    // Some decoders cannot report profiles; that is not fatal.
    let icc = decoder.icc_profile().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "ICC profile unavailable");
        None
    });

    let image = DynamicImage::from_decoder(decoder).map_err(|e| {
        SamplingError::image_load(format!("Failed to decode {}", path.display()), e)
    })?;

    let metadata = ImageMetadata {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        color_profile: icc
            .as_deref()
            .map(profile_label)
            .unwrap_or_else(|| ASSUMED_PROFILE.to_string()),
        bit_depth: bits_per_channel(&image),
    };

    tracing::info!(
        file = %metadata.file_name,
        width = image.width(),
        height = image.height(),
        bit_depth = metadata.bit_depth,
        profile = %metadata.color_profile,
        "Loaded image"
    );

    Ok(LoadedImage {
        source: RgbImageSource::new(image.to_rgb8()),
        metadata,
    })
}

/// Bits per channel of the decoded color type
pub fn bits_per_channel(image: &DynamicImage) -> u16 {
    let color = image.color();
    color.bits_per_pixel() / u16::from(color.channel_count().max(1))
}

fn profile_label(icc: &[u8]) -> String {
    icc_description(icc).unwrap_or_else(|| format!("Embedded ICC profile ({} bytes)", icc.len()))
}

/// Read the profile description (`desc` tag) from raw ICC bytes
///
/// Handles the ICC v2 `desc` text type and the v4 `mluc` type (first
/// record). Returns `None` for anything malformed.
pub fn icc_description(icc: &[u8]) -> Option<String> {
    const HEADER_LEN: usize = 128;
    const TAG_ENTRY_LEN: usize = 12;

    // The declared count cannot exceed the entries that fit in the blob.
    let room = icc.len().saturating_sub(HEADER_LEN + 4) / TAG_ENTRY_LEN;
    let tag_count = (read_u32(icc, HEADER_LEN)? as usize).min(room);
    let (offset, size) = (0..tag_count).find_map(|i| {
        let entry = HEADER_LEN + 4 + i * TAG_ENTRY_LEN;
        let signature = icc.get(entry..entry + 4)?;
        if signature != b"desc" {
            return None;
        }
        Some((read_u32(icc, entry + 4)? as usize, read_u32(icc, entry + 8)? as usize))
    })?;
    let tag = icc.get(offset..offset.checked_add(size)?)?;

    let text = match tag.get(0..4)? {
        b"desc" => {
            let len = read_u32(tag, 8)? as usize;
            let bytes = tag.get(12..12 + len)?;
            let bytes = bytes.split(|b| *b == 0).next().unwrap_or(bytes);
            String::from_utf8_lossy(bytes).into_owned()
        }
        b"mluc" => {
            let records = read_u32(tag, 8)?;
            if records == 0 {
                return None;
            }
            let len = read_u32(tag, 20)? as usize;
            let start = read_u32(tag, 24)? as usize;
            let units: Vec<u16> = tag
                .get(start..start.checked_add(len)?)?
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => return None,
    };

    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at + 4)?;
    Some(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}
