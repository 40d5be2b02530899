//! Column boundaries from the header band and the bottom probe strip.
use crate::cluster::{extract_line_families, ClassifyParams, Orientation};
use crate::error::{DetectionError, Result};
use crate::image::{crop, gamma_correct, threshold_inv, Rect};
use crate::segments::{detect_segments, HoughOptions, HoughResult};

use image::GrayImage;
use imageproc::edges::canny;
use log::debug;
use serde::{Deserialize, Serialize};

/// Edge-detection settings shared by the grid and header passes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    pub threshold: u8,
    pub canny_low: f32,
    pub canny_high: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            threshold: 150,
            canny_low: 2.0,
            canny_high: 180.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnParams {
    /// Rows below the table start covered by the header band.
    pub header_rows: usize,
    /// Left columns skipped by the header band.
    pub inset_px: u32,
    /// Column boundaries kept, left to right.
    pub count: usize,
    pub hough: HoughOptions,
    pub classify: ClassifyParams,
}

impl Default for ColumnParams {
    fn default() -> Self {
        Self {
            header_rows: 12,
            inset_px: 30,
            count: 4,
            hough: HoughOptions::new(2.0, 1.0, 150, 30, 2),
            classify: ClassifyParams::new(15.0, 0.999, 25.0, 5.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottomProbeParams {
    /// Column boundary the strip is centred on.
    pub column_index: usize,
    pub half_width_px: u32,
    pub gamma: f32,
    pub threshold: u8,
    pub hough: HoughOptions,
    /// Allowance between the probe's lowest ink and the last row boundary.
    pub slack_px: f32,
}

impl Default for BottomProbeParams {
    fn default() -> Self {
        Self {
            column_index: 2,
            half_width_px: 10,
            gamma: 3.0,
            threshold: 200,
            hough: HoughOptions::new(4.0, 1.0, 100, 25, 2),
            slack_px: 10.0,
        }
    }
}

/// Inverse-threshold, run Canny and extract Hough segments.
pub fn edge_segments(gray: &GrayImage, edges: &EdgeParams, hough: &HoughOptions) -> HoughResult {
    let binary = threshold_inv(gray, edges.threshold);
    let edge_map = canny(&binary, edges.canny_low, edges.canny_high);
    detect_segments(&edge_map, hough)
}

/// X positions (in `table` coordinates) of the first `params.count` vertical
/// grid lines inside `band`, ascending.
pub fn header_columns(table: &GrayImage, band: Rect, edges: &EdgeParams, params: &ColumnParams) -> Result<Vec<f32>> {
    let header = crop(table, band)
        .ok_or_else(|| DetectionError::boundary("header band falls outside the table"))?;
    let hough = edge_segments(&header, edges, &params.hough);
    let families = extract_line_families(&hough.segments, &params.classify);
    let xs: Vec<f32> = families
        .positions(Orientation::Vertical)
        .into_iter()
        .map(|x| x + band.x as f32)
        .collect();
    debug!(
        "header band {:?}: segments={} verticals={:?}",
        band,
        hough.segments.len(),
        xs
    );
    if xs.len() < params.count {
        return Err(DetectionError::boundary(format!(
            "header band has {} column boundaries, need {}",
            xs.len(),
            params.count
        )));
    }
    Ok(xs.into_iter().take(params.count).collect())
}

/// Lowest ink y (in `table` coordinates) of the ruling inside `strip`.
pub fn bottom_extent(table: &GrayImage, strip: Rect, params: &BottomProbeParams) -> Result<f32> {
    let probe = crop(table, strip)
        .ok_or_else(|| DetectionError::boundary("bottom probe strip falls outside the table"))?;
    let binary = threshold_inv(&gamma_correct(&probe, params.gamma), params.threshold);
    let hough = detect_segments(&binary, &params.hough);
    let max_y = hough
        .segments
        .iter()
        .map(|s| s.max_y())
        .max_by(|a, b| a.total_cmp(b))
        .ok_or_else(|| DetectionError::boundary("no ruling found in the bottom probe strip"))?;
    debug!(
        "bottom probe {:?}: segments={} max_y={:.1}",
        strip,
        hough.segments.len(),
        max_y
    );
    Ok(max_y + strip.y as f32)
}
