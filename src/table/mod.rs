//! Localization of the score table on a deskewed page.
//!
//! The search narrows in four passes, each working on a sub-image of the
//! previous one:
//!
//! 1. **Projection.** Column ink counts of a half-resolution binary page
//!    bound the table horizontally.
//! 2. **Grid.** Canny edges and Hough segments inside that crop give the
//!    horizontal row boundaries. The dominant row pitch picks the first table
//!    row; counting pitches from there finds the last expected one.
//! 3. **Header band.** Vertical lines inside the first rows, right of a fixed
//!    inset, give the column boundaries.
//! 4. **Bottom probe.** A narrow strip centred on one column boundary shows
//!    where the vertical ruling stops, i.e. the real bottom of the table.
//!
//! The resulting [`TableRegion`] holds the cropped grayscale table together
//! with its row and column boundaries in the crop's own coordinates.

mod columns;
mod projection;
mod rows;

pub use columns::{bottom_extent, edge_segments, header_columns, BottomProbeParams, ColumnParams, EdgeParams};
pub use projection::{content_runs, horizontal_bounds, ColumnBounds, ColumnRun, ProjectionParams};
pub use rows::{dominant_pitch, strictly_increasing, table_bottom, table_end, table_start, RowParams};

use crate::cluster::{extract_line_families, ClassifyParams, Orientation};
use crate::error::{DetectionError, Result};
use crate::image::{crop, gamma_correct, to_gray, Rect};
use crate::line::Line;
use crate::segments::HoughOptions;

use image::{GrayImage, RgbImage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Parameters of table localization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableParams {
    pub gamma: f32,
    pub projection: ProjectionParams,
    pub edges: EdgeParams,
    pub grid_hough: HoughOptions,
    pub grid_classify: ClassifyParams,
    pub rows: RowParams,
    pub columns: ColumnParams,
    pub bottom: BottomProbeParams,
    /// Vertical margin kept above the first and below the last row.
    pub margin_px: u32,
    /// Margin kept right of the last column boundary.
    pub right_margin_px: u32,
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            gamma: 2.5,
            projection: ProjectionParams::default(),
            edges: EdgeParams::default(),
            grid_hough: HoughOptions::new(2.0, 1.0, 150, 50, 2),
            grid_classify: ClassifyParams::new(30.0, 0.999, 10.0, 5.0),
            rows: RowParams::default(),
            columns: ColumnParams::default(),
            bottom: BottomProbeParams::default(),
            margin_px: 3,
            right_margin_px: 5,
        }
    }
}

/// What each localization pass saw.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableTrace {
    pub content_runs: Vec<ColumnRun>,
    pub crop: Rect,
    pub grid_segments: usize,
    pub horizontal_lines: usize,
    pub vertical_lines: usize,
    pub pitch: f32,
    pub start_index: usize,
    pub end_index: usize,
    pub bottom_index: usize,
    pub bottom_probe_y: f32,
    pub elapsed_ms: f64,
}

/// Score table cut out of the deskewed page.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRegion {
    /// Location of `image` in the deskewed page.
    pub bounds: Rect,
    /// Gamma-corrected grayscale crop.
    #[serde(skip)]
    pub image: GrayImage,
    /// Row boundaries in `image` coordinates, top to bottom.
    pub rows: Vec<Line>,
    /// Column boundaries in `image` coordinates, left to right.
    pub columns: Vec<Line>,
    pub trace: TableTrace,
}

impl TableRegion {
    /// Build a region from boundary positions given in `image` coordinates.
    pub fn from_positions(bounds: Rect, image: GrayImage, row_ys: &[f32], column_xs: &[f32]) -> Self {
        let (w, h) = (image.width() as f32, image.height() as f32);
        let rows = row_ys
            .iter()
            .map(|&y| Line::horizontal(y, 0.0, (w - 1.0).max(1.0)))
            .collect();
        let columns = column_xs
            .iter()
            .map(|&x| Line::vertical(x, 0.0, (h - 1.0).max(1.0)))
            .collect();
        Self {
            bounds,
            image,
            rows,
            columns,
            trace: TableTrace::default(),
        }
    }

    pub fn origin(&self) -> [u32; 2] {
        [self.bounds.x, self.bounds.y]
    }

    /// Row boundary y positions in region coordinates.
    pub fn row_positions(&self) -> Vec<f32> {
        self.rows.iter().map(|l| l.image_midpoint()[1]).collect()
    }

    /// Column boundary x positions in region coordinates.
    pub fn column_positions(&self) -> Vec<f32> {
        self.columns.iter().map(|l| l.image_midpoint()[0]).collect()
    }
}

/// Locate the score table on a deskewed page.
pub fn locate_table(page: &RgbImage, params: &TableParams) -> Result<TableRegion> {
    let t0 = Instant::now();
    let gray = gamma_correct(&to_gray(page), params.gamma);

    // 1) horizontal bounds
    let bounds = horizontal_bounds(&gray, &params.projection)?;
    let crop_rect = Rect::new(bounds.x, 0, bounds.width, gray.height());
    let table = crop(&gray, crop_rect)
        .ok_or_else(|| DetectionError::boundary("content columns fall outside the page"))?;

    // 2) row boundaries
    let grid = edge_segments(&table, &params.edges, &params.grid_hough);
    if grid.segments.is_empty() {
        return Err(DetectionError::InsufficientLineDetection {
            stage: "table grid",
            found: 0,
            minimum: 1,
        });
    }
    let families = extract_line_families(&grid.segments, &params.grid_classify);
    let ys = strictly_increasing(families.positions(Orientation::Horizontal), 1.0);
    if ys.len() < 2 {
        return Err(DetectionError::InsufficientLineDetection {
            stage: "table rows",
            found: ys.len(),
            minimum: 2,
        });
    }
    let pitch = dominant_pitch(&ys, params.rows.snap_px)
        .ok_or_else(|| DetectionError::boundary("row boundaries share no spacing"))?;
    let start = table_start(&ys, pitch, params.rows.snap_px, params.rows.max_header_gap_px)
        .ok_or_else(|| DetectionError::boundary(format!("no row pair {pitch} px apart")))?;
    let end = table_end(&ys, start, params.rows.expected_rows)?;

    // 3) column boundaries from the header band
    let header_last = (start + params.columns.header_rows).min(end);
    let band = Rect::from_signed(
        params.columns.inset_px as i64,
        ys[start].round() as i64,
        table.width() as i64 - params.columns.inset_px as i64,
        (ys[header_last] - ys[start]).round() as i64,
    )
    .and_then(|r| r.clamp_to(table.width(), table.height()))
    .ok_or_else(|| DetectionError::boundary("header band is empty"))?;
    let xs = header_columns(&table, band, &params.edges, &params.columns)?;

    // 4) bottom probe
    let probe_x = *xs.get(params.bottom.column_index).ok_or_else(|| {
        DetectionError::boundary(format!(
            "bottom probe column {} out of {} boundaries",
            params.bottom.column_index,
            xs.len()
        ))
    })?;
    let last_y = ys[ys.len() - 1];
    let strip = Rect::from_signed(
        (probe_x - params.bottom.half_width_px as f32).round() as i64,
        ys[start].round() as i64,
        2 * params.bottom.half_width_px as i64,
        (last_y - ys[start]).round() as i64,
    )
    .and_then(|r| r.clamp_to(table.width(), table.height()))
    .ok_or_else(|| DetectionError::boundary("bottom probe strip is empty"))?;
    let bottom_probe_y = bottom_extent(&table, strip, &params.bottom)?;
    let bottom = table_bottom(&ys, start, end, bottom_probe_y + params.bottom.slack_px)?;

    // region
    let margin = params.margin_px as f32;
    let top = (ys[start] - margin).max(0.0).round() as u32;
    let bottom_px = ((ys[bottom] + margin).round() as u32).min(table.height());
    let right = ((xs[xs.len() - 1] + params.right_margin_px as f32).round() as u32).min(table.width());
    let local = Rect::from_signed(0, top as i64, right as i64, bottom_px as i64 - top as i64)
        .ok_or_else(|| DetectionError::boundary("table region collapses to zero size"))?;
    let image = crop(&table, local)
        .ok_or_else(|| DetectionError::boundary("table region falls outside the crop"))?;

    let row_ys: Vec<f32> = ys[start..=bottom].iter().map(|y| y - top as f32).collect();
    let mut region = TableRegion::from_positions(local.translate(bounds.x, 0), image, &row_ys, &xs);
    region.trace = TableTrace {
        content_runs: bounds.runs,
        crop: crop_rect,
        grid_segments: grid.segments.len(),
        horizontal_lines: ys.len(),
        vertical_lines: families.vertical.len(),
        pitch,
        start_index: start,
        end_index: end,
        bottom_index: bottom,
        bottom_probe_y,
        elapsed_ms: t0.elapsed().as_secs_f64() * 1000.0,
    };
    debug!(
        "table: bounds={:?} rows={} columns={} pitch={} start={} end={} bottom={} elapsed_ms={:.3}",
        region.bounds,
        region.rows.len(),
        region.columns.len(),
        pitch,
        start,
        end,
        bottom,
        region.trace.elapsed_ms
    );
    Ok(region)
}
