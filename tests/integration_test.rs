//! Integration tests for the complete sampling pipeline
//!
//! These tests validate the end-to-end workflow including:
//! - Image loading and metadata extraction
//! - Window averaging at interior, edge and corner points
//! - Lab conversion under both reference whites
//! - CSV export layout
//! - Error handling for invalid input

use image::{Rgb, RgbImage};
use pretty_assertions::assert_eq;
use sample_colors::{
    average_at, sample_image, BatchSampler, Coordinate, LabProjection, PixelSource, Projection,
    RgbProjection, SamplingConfig, SamplingError, WhitePoint, WindowAverager, WindowSize,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a 20x10 image whose left half is (10, 20, 30) and right half (200, 150, 100)
fn two_tone_png(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("two_tone.png");
    RgbImage::from_fn(20, 10, |x, _| {
        if x < 10 {
            Rgb([10, 20, 30])
        } else {
            Rgb([200, 150, 100])
        }
    })
    .save(&path)
    .unwrap();
    path
}

// ============================================================================
// End-to-End Tests
// ============================================================================

#[test]
fn test_sample_image_constant_regions() {
    let dir = TempDir::new().unwrap();
    let path = two_tone_png(&dir);
    let config = SamplingConfig {
        points: vec![Coordinate::new(4, 5), Coordinate::new(15, 5), Coordinate::new(0, 0)],
        ..Default::default()
    };

    let report = sample_image(&path, &config).unwrap();
    let metadata = report.metadata.as_ref().unwrap();
    assert_eq!(metadata.file_name, "two_tone.png");
    assert_eq!(metadata.bit_depth, 8);

    let left = &report.records[0].color;
    assert_eq!(left.get(0).unwrap().values, vec![10.0, 20.0, 30.0]);
    assert_eq!(left.sample_count, 9);

    let right = &report.records[1].color;
    assert_eq!(right.get(0).unwrap().values, vec![200.0, 150.0, 100.0]);

    // Constant region: the Lab mean equals the Lab of the constant color
    let mut expected_lab = [0.0; 3];
    LabProjection::new(WhitePoint::D50)
        .project_into(palette::Srgb::new(200, 150, 100), &mut expected_lab);
    for (got, want) in right.get(1).unwrap().values.iter().zip(expected_lab) {
        assert!((got - want).abs() < 1e-9);
    }

    let corner = &report.records[2].color;
    assert_eq!(corner.sample_count, 4);
    assert_eq!(corner.get(0).unwrap().values, vec![10.0, 20.0, 30.0]);
}

#[test]
fn test_sample_image_boundary_between_regions() {
    let dir = TempDir::new().unwrap();
    let path = two_tone_png(&dir);
    let config = SamplingConfig {
        window_size: 2,
        points: vec![Coordinate::new(10, 5)],
        ..Default::default()
    };

    // size 2 -> radius 1: columns 9 (left tone), 10 and 11 (right tone)
    let report = sample_image(&path, &config).unwrap();
    let rgb = &report.records[0].color.get(0).unwrap().values;
    assert!((rgb[0] - (10.0 + 2.0 * 200.0) / 3.0).abs() < 1e-9);
    assert!((rgb[1] - (20.0 + 2.0 * 150.0) / 3.0).abs() < 1e-9);
    assert!((rgb[2] - (30.0 + 2.0 * 100.0) / 3.0).abs() < 1e-9);
    assert_eq!(report.records[0].color.sample_count, 9);
}

#[test]
fn test_csv_export_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = two_tone_png(&dir);
    let output = dir.path().join("color_values.csv");
    let config = SamplingConfig {
        output_path: output.clone(),
        include_sample_count: true,
        points: vec![Coordinate::new(2, 2), Coordinate::new(19, 9)],
        ..Default::default()
    };

    let report = sample_image(&path, &config).unwrap();
    report.export_to_path(&config.output_path, &config).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Filename:, two_tone.png");
    assert_eq!(lines[1], "Color Profile:, sRGB (assumed)");
    assert_eq!(lines[2], "Bit Depth:, 8-bit");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "Sample Point, R, G, B, L*, a*, b*, Samples");
    assert!(lines[5].starts_with("Point 1, 10.00, 20.00, 30.00, "));
    assert!(lines[5].ends_with(", 9"));
    assert!(lines[6].starts_with("Point 2, 200.00, 150.00, 100.00, "));
    assert!(lines[6].ends_with(", 4"));
    assert_eq!(lines.len(), 7);
}

#[test]
fn test_white_point_changes_lab_only() {
    let dir = TempDir::new().unwrap();
    let path = two_tone_png(&dir);
    let points = vec![Coordinate::new(15, 5)];

    let d50 = sample_image(
        &path,
        &SamplingConfig {
            points: points.clone(),
            ..Default::default()
        },
    )
    .unwrap();
    let d65 = sample_image(
        &path,
        &SamplingConfig {
            lab_white_point: WhitePoint::D65,
            points,
            ..Default::default()
        },
    )
    .unwrap();

    let (a, b) = (&d50.records[0].color, &d65.records[0].color);
    assert_eq!(a.get(0), b.get(0));
    assert_ne!(a.get(1).unwrap().values, b.get(1).unwrap().values);
}

// ============================================================================
// Custom Sources and Projections
// ============================================================================

/// Pixel source backed by a closure, as a host application adapter would be
struct FnSource<F> {
    width: u32,
    height: u32,
    pixel: F,
}

impl<F> PixelSource for FnSource<F>
where
    F: Fn(u32, u32) -> [u8; 3],
{
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_at(&self, x: u32, y: u32) -> sample_colors::Result<sample_colors::ColorSample> {
        let [r, g, b] = (self.pixel)(x, y);
        Ok(palette::Srgb::new(r, g, b))
    }
}

#[test]
fn test_custom_source_batch_order() {
    let source = FnSource {
        width: 10,
        height: 10,
        pixel: |x: u32, y: u32| [(x * 10) as u8, (y * 10) as u8, 0],
    };
    let averager = WindowAverager::new(vec![Box::new(RgbProjection)]).unwrap();
    let sampler = BatchSampler::new(&source, &averager, WindowSize::new(3).unwrap());

    let centers = [Coordinate::new(5, 5), Coordinate::new(1, 1), Coordinate::new(9, 9)];
    let records = sampler.sample_all(centers).unwrap();

    let summary: Vec<(usize, Coordinate, usize)> = records
        .iter()
        .map(|r| (r.index, r.center, r.color.sample_count))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, Coordinate::new(5, 5), 9),
            (2, Coordinate::new(1, 1), 9),
            (3, Coordinate::new(9, 9), 4),
        ]
    );
    assert_eq!(records[0].color.get(0).unwrap().values, vec![50.0, 50.0, 0.0]);
    // corner window covers columns 8 and 9
    assert_eq!(records[2].color.get(0).unwrap().values, vec![85.0, 85.0, 0.0]);
}

#[test]
fn test_free_function_with_linear_projection() {
    let source = FnSource {
        width: 5,
        height: 5,
        pixel: |x: u32, _y: u32| [(x * 50) as u8, 0, 0],
    };
    let doubled = sample_colors::color::FnProjection::new(
        "Doubled",
        ["2R", "2G", "2B"],
        |c: sample_colors::ColorSample| {
            [2.0 * f64::from(c.red), 2.0 * f64::from(c.green), 2.0 * f64::from(c.blue)]
        },
    );
    let rgb = RgbProjection;
    let projections: [&dyn Projection; 2] = [&rgb, &doubled];

    let result = average_at(&source, Coordinate::new(4, 2), 3, &projections).unwrap();
    assert_eq!(result.sample_count, 6);
    let plain = &result.get(0).unwrap().values;
    let twice = &result.get(1).unwrap().values;
    assert!((plain[0] - 175.0).abs() < 1e-9);
    assert!((twice[0] - 350.0).abs() < 1e-9);
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_sample_image_file_not_found() {
    let config = SamplingConfig {
        points: vec![Coordinate::new(0, 0)],
        ..Default::default()
    };
    let err = sample_image(Path::new("nonexistent_file.png"), &config).unwrap_err();
    assert!(matches!(err, SamplingError::ImageLoadError { .. }));
}

#[test]
fn test_invalid_window_rejected_before_loading() {
    let config = SamplingConfig {
        window_size: 0,
        points: vec![Coordinate::new(0, 0)],
        ..Default::default()
    };
    // The file does not exist; the window size is reported first
    let err = sample_image(Path::new("nonexistent_file.png"), &config).unwrap_err();
    assert!(matches!(err, SamplingError::InvalidParameter { .. }));
}

#[test]
fn test_point_outside_image() {
    let dir = TempDir::new().unwrap();
    let path = two_tone_png(&dir);
    let config = SamplingConfig {
        points: vec![Coordinate::new(3, 3), Coordinate::new(3, 10)],
        ..Default::default()
    };
    let err = sample_image(&path, &config).unwrap_err();
    match err {
        SamplingError::OutOfBounds { x, y, width, height } => {
            assert_eq!((x, y, width, height), (3, 10, 20, 10));
        }
        other => panic!("Expected OutOfBounds, got: {:?}", other),
    }
}

#[test]
fn test_config_file_drives_run() {
    let dir = TempDir::new().unwrap();
    let path = two_tone_png(&dir);
    let config_path = dir.path().join("points.json");
    std::fs::write(
        &config_path,
        r#"{ "window_size": 1, "include_metadata": false, "points": [{ "x": 12, "y": 3 }] }"#,
    )
    .unwrap();

    let config = SamplingConfig::from_json_file(&config_path).unwrap();
    let report = sample_image(&path, &config).unwrap();
    let mut out = Vec::new();
    report.write_csv(&mut out, &config).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Sample Point, R, G, B, L*, a*, b*\nPoint 1, 200.00, 150.00, 100.00, "));
}
