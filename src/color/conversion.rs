//! Color space conversion utilities
//!
//! Provides the conversions behind the built-in projections:
//! - 8-bit sRGB to normalized sRGB
//! - sRGB to CIE L*a*b* under a D65 or D50 reference white
//!
//! D50 results go through Bradford chromatic adaptation from sRGB's native
//! D65 white, which is how ICC-based editors report Lab.

use palette::chromatic_adaptation::AdaptInto;
use palette::white_point::{D50, D65};
use palette::{FromColor, Lab, Srgb, Xyz};
use serde::{Deserialize, Serialize};

use crate::pixel::ColorSample;
use crate::{Result, SamplingError};

/// Reference white used for Lab output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitePoint {
    /// ICC profile connection space white (print and editing workflows)
    #[default]
    D50,
    /// sRGB native white
    D65,
}

impl WhitePoint {
    /// Short label, `"D50"` or `"D65"`
    pub fn name(&self) -> &'static str {
        match self {
            WhitePoint::D50 => "D50",
            WhitePoint::D65 => "D65",
        }
    }
}

impl std::fmt::Display for WhitePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for WhitePoint {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "d50" => Ok(WhitePoint::D50),
            "d65" => Ok(WhitePoint::D65),
            _ => Err(SamplingError::invalid_parameter("white_point", s)),
        }
    }
}

/// Color converter for a fixed Lab reference white
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter {
    white_point: WhitePoint,
}

impl ColorConverter {
    /// Converter producing Lab under `white_point`
    pub fn new(white_point: WhitePoint) -> Self {
        Self { white_point }
    }

    /// Reference white used for Lab output
    pub fn white_point(&self) -> WhitePoint {
        self.white_point
    }

    /// Normalize an 8-bit sample to [0, 1] channels
    pub fn normalize(&self, sample: ColorSample) -> Srgb<f64> {
        sample.into_format::<f64>()
    }

    /// Convert an 8-bit sRGB sample to `[L*, a*, b*]`
    ///
    /// L* is in [0, 100]; a* and b* are unbounded but stay within
    /// roughly [-128, 127] for sRGB input.
    pub fn srgb_to_lab(&self, sample: ColorSample) -> [f64; 3] {
        let srgb = self.normalize(sample);
        match self.white_point {
            WhitePoint::D65 => {
                let lab = Lab::<D65, f64>::from_color(srgb);
                [lab.l, lab.a, lab.b]
            }
            WhitePoint::D50 => {
                let xyz = Xyz::<D65, f64>::from_color(srgb);
                let adapted: Xyz<D50, f64> = xyz.adapt_into();
                let lab = Lab::<D50, f64>::from_color(adapted);
                [lab.l, lab.a, lab.b]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_point_parse() {
        assert_eq!("d50".parse::<WhitePoint>().unwrap(), WhitePoint::D50);
        assert_eq!(" D65 ".parse::<WhitePoint>().unwrap(), WhitePoint::D65);
        assert!("d75".parse::<WhitePoint>().is_err());
        assert_eq!(WhitePoint::default(), WhitePoint::D50);
    }

    #[test]
    fn test_lab_black() {
        for wp in [WhitePoint::D50, WhitePoint::D65] {
            let lab = ColorConverter::new(wp).srgb_to_lab(Srgb::new(0, 0, 0));
            assert!(lab[0].abs() < 1e-6);
        }
    }

    #[test]
    fn test_lab_white_is_neutral() {
        for wp in [WhitePoint::D50, WhitePoint::D65] {
            let lab = ColorConverter::new(wp).srgb_to_lab(Srgb::new(255, 255, 255));
            assert!((lab[0] - 100.0).abs() < 0.1, "{}: L* = {}", wp, lab[0]);
            assert!(lab[1].abs() < 0.5, "{}: a* = {}", wp, lab[1]);
            assert!(lab[2].abs() < 0.5, "{}: b* = {}", wp, lab[2]);
        }
    }

    #[test]
    fn test_lab_mid_gray() {
        let lab = ColorConverter::new(WhitePoint::D65).srgb_to_lab(Srgb::new(119, 119, 119));
        // sRGB 119 is close to L* = 50
        assert!((lab[0] - 50.0).abs() < 1.0);
    }

    #[test]
    fn test_lab_red_hue() {
        for wp in [WhitePoint::D50, WhitePoint::D65] {
            let lab = ColorConverter::new(wp).srgb_to_lab(Srgb::new(255, 0, 0));
            assert!(lab[0] > 50.0 && lab[0] < 56.0);
            assert!(lab[1] > 60.0);
            assert!(lab[2] > 40.0);
        }
    }

    #[test]
    fn test_white_points_differ_for_chromatic_colors() {
        let blue = Srgb::new(0, 0, 255);
        let d50 = ColorConverter::new(WhitePoint::D50).srgb_to_lab(blue);
        let d65 = ColorConverter::new(WhitePoint::D65).srgb_to_lab(blue);
        let distance: f64 = d50.iter().zip(d65).map(|(a, b)| (a - b).powi(2)).sum();
        assert!(distance.sqrt() > 1.0);
    }

    #[test]
    fn test_normalize() {
        let srgb = ColorConverter::default().normalize(Srgb::new(255, 0, 51));
        assert!((srgb.red - 1.0).abs() < 1e-12);
        assert!(srgb.green.abs() < 1e-12);
        assert!((srgb.blue - 0.2).abs() < 1e-12);
    }
}
