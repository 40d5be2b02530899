//! Page deskewing.
//!
//! The photographed transcript is rarely level. The table's ruled rows are the
//! most reliable horizontal cue on the page, so the rotation is measured on
//! them:
//!
//! 1. Gamma-correct and inverse-threshold the grayscale page so ink is 255.
//! 2. Extract Hough segments and split them into vertical and horizontal
//!    families; merge each family by position.
//! 3. Span every horizontal cluster from its leftmost to its rightmost
//!    endpoint, keep the dominant parallel group, order it top to bottom and
//!    take the longest line inside its longest equally spaced run.
//! 4. Rotate the original color page about its center so that line is level,
//!    filling uncovered corners with white.
//!
//! Failures are returned; a page is never passed on unrotated by default.

mod reference;

pub use reference::{rotation_for, select_reference, SkewReference};

use crate::cluster::{extract_line_families, ClassifyParams};
use crate::error::{DetectionError, Result};
use crate::image::{gamma_correct, threshold_inv, to_gray};
use crate::segments::{detect_segments, HoughOptions};

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Parameters of the deskew stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewParams {
    pub gamma: f32,
    pub threshold: u8,
    pub hough: HoughOptions,
    pub classify: ClassifyParams,
    /// Absolute cosine above which two representatives count as parallel.
    pub parallel_min_cos: f32,
    /// Spacing tolerance of the periodic run, in pixels.
    pub periodic_tolerance_px: f32,
    /// Threshold of the rotated binary preview kept for diagnostics.
    pub preview_threshold: u8,
}

impl Default for SkewParams {
    fn default() -> Self {
        Self {
            gamma: 3.5,
            threshold: 160,
            hough: HoughOptions::new(1.0, 1.0, 100, 30, 2),
            classify: ClassifyParams::new(30.0, 0.0, 20.0, 20.0),
            parallel_min_cos: 0.992,
            periodic_tolerance_px: 15.0,
            preview_threshold: 200,
        }
    }
}

/// Measured rotation and the evidence behind it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkewEstimate {
    /// Clockwise rotation applied to level the page, in degrees.
    pub rotation_deg: f32,
    pub reference: SkewReference,
    pub segment_count: usize,
    pub vertical_lines: usize,
    pub horizontal_lines: usize,
    pub elapsed_ms: f64,
}

/// Deskewed page plus grayscale and binary previews of it.
#[derive(Clone, Debug)]
pub struct SkewCorrection {
    pub image: RgbImage,
    /// Gamma-corrected grayscale, rotated with black fill.
    pub gray: GrayImage,
    /// Inverse-threshold of `gray`.
    pub binary: GrayImage,
    pub estimate: SkewEstimate,
}

/// Measure the page rotation without applying it.
pub fn estimate_skew(source: &RgbImage, params: &SkewParams) -> Result<SkewEstimate> {
    estimate_skew_gray(&gamma_correct(&to_gray(source), params.gamma), params)
}

/// Measure the rotation on an already gamma-corrected grayscale page.
pub fn estimate_skew_gray(gray: &GrayImage, params: &SkewParams) -> Result<SkewEstimate> {
    let t0 = Instant::now();
    let binary = threshold_inv(gray, params.threshold);
    let hough = detect_segments(&binary, &params.hough);
    if hough.segments.is_empty() {
        return Err(DetectionError::InsufficientLineDetection {
            stage: "skew",
            found: 0,
            minimum: 1,
        });
    }
    let families = extract_line_families(&hough.segments, &params.classify);
    let reference = select_reference(&families, params.parallel_min_cos, params.periodic_tolerance_px)?;
    let rotation_deg = rotation_for(&reference.line);
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;
    debug!(
        "skew: segments={} vertical={} horizontal={} run={}..={} rotation_deg={:.3} elapsed_ms={:.3}",
        hough.segments.len(),
        families.vertical.len(),
        families.horizontal.len(),
        reference.run.start,
        reference.run.end,
        rotation_deg,
        elapsed_ms
    );
    Ok(SkewEstimate {
        rotation_deg,
        reference,
        segment_count: hough.segments.len(),
        vertical_lines: families.vertical.len(),
        horizontal_lines: families.horizontal.len(),
        elapsed_ms,
    })
}

/// Estimate the rotation and apply it to the page.
pub fn correct_skew(source: &RgbImage, params: &SkewParams) -> Result<SkewCorrection> {
    let gray = gamma_correct(&to_gray(source), params.gamma);
    let estimate = estimate_skew_gray(&gray, params)?;
    let theta = estimate.rotation_deg.to_radians();
    let (image, gray) = if theta == 0.0 {
        (source.clone(), gray)
    } else {
        (
            rotate_about_center(source, theta, Interpolation::Bilinear, Rgb([255, 255, 255])),
            rotate_about_center(&gray, theta, Interpolation::Bilinear, Luma([0])),
        )
    };
    let binary = threshold_inv(&gray, params.preview_threshold);
    Ok(SkewCorrection {
        image,
        gray,
        binary,
        estimate,
    })
}
