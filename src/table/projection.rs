//! Coarse horizontal bounds from a column ink projection.
use crate::error::{DetectionError, Result};
use crate::image::{column_ink_profile, downscale_half, threshold_inv};

use image::GrayImage;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    pub threshold: u8,
    /// Added to the mean column count to form the content threshold.
    pub margin: f32,
    /// Minimum run width at half resolution.
    pub min_run_px: usize,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            threshold: 180,
            margin: 0.0,
            min_run_px: 100,
        }
    }
}

/// Half-open column range `[start, end)` whose ink count exceeds the profile
/// threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnRun {
    pub start: usize,
    pub end: usize,
}

impl ColumnRun {
    pub(crate) fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Horizontal extent of the table in full-resolution pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnBounds {
    pub x: u32,
    pub width: u32,
    /// Runs found at half resolution.
    pub runs: Vec<ColumnRun>,
}

/// Runs of columns above `mean + margin`, keeping only those wider than
/// `min_len`.
pub fn content_runs(profile: &[u32], margin: f32, min_len: usize) -> Vec<ColumnRun> {
    if profile.is_empty() {
        return Vec::new();
    }
    let mean = profile.iter().map(|&c| c as f64).sum::<f64>() / profile.len() as f64;
    let threshold = mean + margin as f64;

    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    for (x, &count) in profile.iter().enumerate() {
        match (count as f64 > threshold, open) {
            (true, None) => open = Some(x),
            (false, Some(start)) => {
                runs.push(ColumnRun { start, end: x });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push(ColumnRun {
            start,
            end: profile.len(),
        });
    }
    runs.retain(|r| r.len() > min_len);
    runs
}

/// Bound the table horizontally: threshold, halve, project onto columns and
/// span from the first qualifying run's start to the last one's end.
pub fn horizontal_bounds(gray: &GrayImage, params: &ProjectionParams) -> Result<ColumnBounds> {
    let binary = downscale_half(&threshold_inv(gray, params.threshold));
    let profile = column_ink_profile(&binary);
    let runs = content_runs(&profile, params.margin, params.min_run_px);
    let (first, last) = match (runs.first(), runs.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(DetectionError::boundary(format!(
                "no column run wider than {} px at half resolution",
                params.min_run_px
            )))
        }
    };
    let x = (2 * first.start) as u32;
    let right = ((2 * last.end) as u32).min(gray.width());
    if right <= x {
        return Err(DetectionError::boundary("content columns collapse to zero width"));
    }
    Ok(ColumnBounds {
        x,
        width: right - x,
        runs,
    })
}
