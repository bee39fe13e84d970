//! CSV formatting of sampled colors
//!
//! Layout:
//!
//! ```text
//! Filename:, photo.png
//! Color Profile:, sRGB (assumed)
//! Bit Depth:, 8-bit
//!
//! Sample Point, R, G, B, L*, a*, b*
//! Point 1, 12.00, 34.00, 56.00, 13.45, -0.52, -19.87
//! ```
//!
//! The metadata block is optional. Values use a fixed number of decimals.
//! Text cells containing a comma, quote or line break are double-quoted.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::SamplingConfig;
use crate::constants::export::{
    DEFAULT_PRECISION, POINT_COLUMN, SAMPLE_COUNT_COLUMN, SEPARATOR,
};
use crate::error::{Result, SamplingError};
use crate::image_loader::ImageMetadata;
use crate::sampling::SampleRecord;

/// Writes sample records as comma-separated rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvExporter {
    precision: usize,
    include_metadata: bool,
    include_sample_count: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            include_metadata: true,
            include_sample_count: false,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter matching the format switches of `config`
    pub fn from_config(config: &SamplingConfig) -> Self {
        Self {
            precision: config.precision,
            include_metadata: config.include_metadata,
            include_sample_count: config.include_sample_count,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    pub fn with_sample_count(mut self, include: bool) -> Self {
        self.include_sample_count = include;
        self
    }

    /// Write metadata (when enabled and available) and the column header
    pub fn write_header<W: Write>(
        &self,
        writer: &mut W,
        metadata: Option<&ImageMetadata>,
        channel_names: &[&str],
    ) -> Result<()> {
        if let (true, Some(meta)) = (self.include_metadata, metadata) {
            writeln!(writer, "Filename:{}{}", SEPARATOR, quote_cell(&meta.file_name))
                .map_err(write_error)?;
            writeln!(writer, "Color Profile:{}{}", SEPARATOR, quote_cell(&meta.color_profile))
                .map_err(write_error)?;
            writeln!(writer, "Bit Depth:{}{}-bit", SEPARATOR, meta.bit_depth)
                .map_err(write_error)?;
            writeln!(writer).map_err(write_error)?;
        }

        let mut columns = Vec::with_capacity(channel_names.len() + 2);
        columns.push(Cow::Borrowed(POINT_COLUMN));
        columns.extend(channel_names.iter().map(|name| quote_cell(name)));
        if self.include_sample_count {
            columns.push(Cow::Borrowed(SAMPLE_COUNT_COLUMN));
        }
        writeln!(writer, "{}", columns.join(SEPARATOR)).map_err(write_error)
    }

    /// Write one `Point N, ...` row
    pub fn write_record<W: Write>(&self, writer: &mut W, record: &SampleRecord) -> Result<()> {
        writeln!(writer, "{}", self.format_record(record)).map_err(write_error)
    }

    /// Format one row without the line terminator
    pub fn format_record(&self, record: &SampleRecord) -> String {
        let mut cells = vec![format!("Point {}", record.index)];
        cells.extend(
            record
                .color
                .values()
                .map(|value| format!("{:.*}", self.precision, value)),
        );
        if self.include_sample_count {
            cells.push(record.color.sample_count.to_string());
        }
        cells.join(SEPARATOR)
    }

    /// Write header and every record
    pub fn export<W: Write>(
        &self,
        writer: &mut W,
        metadata: Option<&ImageMetadata>,
        channel_names: &[&str],
        records: &[SampleRecord],
    ) -> Result<()> {
        self.write_header(writer, metadata, channel_names)?;
        for record in records {
            self.write_record(writer, record)?;
        }
        writer.flush().map_err(write_error)
    }

    /// Create (or overwrite) `path` and export into it
    pub fn export_to_path(
        &self,
        path: &Path,
        metadata: Option<&ImageMetadata>,
        channel_names: &[&str],
        records: &[SampleRecord],
    ) -> Result<()> {
        let file = File::create(path).map_err(|e| {
            SamplingError::export(format!("cannot create {}", path.display()), e)
        })?;
        let mut writer = BufWriter::new(file);
        self.export(&mut writer, metadata, channel_names, records)?;
        tracing::info!(path = %path.display(), rows = records.len(), "Exported color values");
        Ok(())
    }
}

/// Quote `text` if it would otherwise split or break the row
fn quote_cell(text: &str) -> Cow<'_, str> {
    if text.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

fn write_error(e: std::io::Error) -> SamplingError {
    SamplingError::export("write failed", e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Coordinate;
    use crate::sampling::{AveragedColor, ChannelMeans};
    use pretty_assertions::assert_eq;

    fn record(index: usize, rgb: [f64; 3], lab: [f64; 3], sample_count: usize) -> SampleRecord {
        SampleRecord {
            index,
            center: Coordinate::new(0, 0),
            color: AveragedColor {
                projections: vec![
                    ChannelMeans {
                        name: "RGB".into(),
                        channel_names: vec!["R", "G", "B"],
                        values: rgb.to_vec(),
                    },
                    ChannelMeans {
                        name: "Lab (D50)".into(),
                        channel_names: vec!["L*", "a*", "b*"],
                        values: lab.to_vec(),
                    },
                ],
                sample_count,
                window_count: 9,
            },
        }
    }

    fn metadata() -> ImageMetadata {
        ImageMetadata {
            file_name: "card.tif".into(),
            color_profile: "Adobe RGB (1998)".into(),
            bit_depth: 16,
        }
    }

    const CHANNELS: [&str; 6] = ["R", "G", "B", "L*", "a*", "b*"];

    fn render(exporter: CsvExporter, metadata: Option<&ImageMetadata>, records: &[SampleRecord]) -> String {
        let mut out = Vec::new();
        exporter.export(&mut out, metadata, &CHANNELS, records).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_full_layout() {
        let records = [
            record(1, [10.0, 20.0, 30.0], [7.5, 0.126, -11.0], 9),
            record(2, [254.556, 0.0, 1.0 / 3.0], [99.999, -0.006, 3.14159], 4),
        ];
        let expected = "\
Filename:, card.tif
Color Profile:, Adobe RGB (1998)
Bit Depth:, 16-bit

Sample Point, R, G, B, L*, a*, b*
Point 1, 10.00, 20.00, 30.00, 7.50, 0.13, -11.00
Point 2, 254.56, 0.00, 0.33, 100.00, -0.01, 3.14
";
        assert_eq!(render(CsvExporter::new(), Some(&metadata()), &records), expected);
    }

    #[test]
    fn test_without_metadata_and_with_counts() {
        let exporter = CsvExporter::new()
            .with_metadata(false)
            .with_sample_count(true)
            .with_precision(1);
        let records = [record(1, [1.0, 2.0, 3.0], [4.0, 5.0, 6.0], 4)];
        let expected = "\
Sample Point, R, G, B, L*, a*, b*, Samples
Point 1, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 4
";
        assert_eq!(render(exporter, Some(&metadata()), &records), expected);
    }

    #[test]
    fn test_text_cells_with_commas_are_quoted() {
        let meta = ImageMetadata {
            file_name: "scan, final.png".into(),
            color_profile: "Vendor \"Wide\" RGB".into(),
            bit_depth: 8,
        };
        let mut out = Vec::new();
        CsvExporter::new()
            .export(&mut out, Some(&meta), &["R,G", "B"], &[])
            .unwrap();
        let expected = "\
Filename:, \"scan, final.png\"
Color Profile:, \"Vendor \"\"Wide\"\" RGB\"
Bit Depth:, 8-bit

Sample Point, \"R,G\", B
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        assert_eq!(quote_cell("Adobe RGB (1998)"), "Adobe RGB (1998)");
    }

    #[test]
    fn test_metadata_skipped_when_unknown() {
        let text = render(CsvExporter::new(), None, &[]);
        assert_eq!(text, "Sample Point, R, G, B, L*, a*, b*\n");
    }

    #[test]
    fn test_from_config() {
        let config = SamplingConfig {
            precision: 4,
            include_metadata: false,
            include_sample_count: true,
            ..Default::default()
        };
        let exporter = CsvExporter::from_config(&config);
        assert_eq!(
            exporter,
            CsvExporter::new().with_precision(4).with_metadata(false).with_sample_count(true)
        );
    }

    #[test]
    fn test_export_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = [record(1, [1.0, 1.0, 1.0], [0.0, 0.0, 0.0], 9)];
        CsvExporter::new()
            .export_to_path(&path, None, &CHANNELS, &records)
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("Point 1, 1.00, 1.00, 1.00, 0.00, 0.00, 0.00\n"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let err = CsvExporter::new()
            .export_to_path(Path::new("no/such/dir/out.csv"), None, &CHANNELS, &[])
            .unwrap_err();
        assert!(matches!(err, SamplingError::ExportError { .. }));
    }
}
