//! Row-boundary bookkeeping: pitch estimation and the first/last table rows.
use crate::error::{DetectionError, Result};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowParams {
    /// Grid used to snap row positions before measuring the pitch.
    pub snap_px: f32,
    /// Rows above the first pitched pair are absorbed while their gap stays
    /// below this value.
    pub max_header_gap_px: f32,
    /// Row boundaries the template carries.
    pub expected_rows: usize,
}

impl Default for RowParams {
    fn default() -> Self {
        Self {
            snap_px: 5.0,
            max_header_gap_px: 50.0,
            expected_rows: 18,
        }
    }
}

fn snap(positions: &[f32], grid: f32) -> Vec<i64> {
    let grid = grid.max(1e-3);
    positions
        .iter()
        .map(|&p| (p / grid).round() as i64)
        .collect()
}

/// Most frequent non-zero pairwise distance between snapped positions.
/// Ties go to the smaller distance.
pub fn dominant_pitch(positions: &[f32], grid: f32) -> Option<f32> {
    let snapped = snap(positions, grid);
    let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
    for (i, a) in snapped.iter().enumerate() {
        for b in &snapped[i + 1..] {
            let d = (b - a).abs();
            if d > 0 {
                *histogram.entry(d).or_insert(0) += 1;
            }
        }
    }
    let mut best: Option<(i64, usize)> = None;
    for (&d, &count) in &histogram {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((d, count));
        }
    }
    best.map(|(d, _)| d as f32 * grid.max(1e-3))
}

/// Index of the first row that belongs to the table.
///
/// Starts at the first position with a partner exactly one pitch away (after
/// snapping), then absorbs preceding rows while their gap stays below
/// `max_gap`.
pub fn table_start(positions: &[f32], pitch: f32, grid: f32, max_gap: f32) -> Option<usize> {
    let snapped = snap(positions, grid);
    let step = (pitch / grid.max(1e-3)).round() as i64;
    let mut start = (0..snapped.len())
        .find(|&i| snapped[i + 1..].iter().any(|&s| (s - snapped[i]).abs() == step))?;
    while start > 0 && positions[start] - positions[start - 1] < max_gap {
        start -= 1;
    }
    Some(start)
}

/// Index of the last expected row boundary.
///
/// Every following gap counts as `round(gap / step)` rows, where `step` is the
/// first gap after `start`; the walk stops once `expected` boundaries are
/// reached.
pub fn table_end(positions: &[f32], start: usize, expected: usize) -> Result<usize> {
    if expected <= 1 {
        return Ok(start);
    }
    let step = match (positions.get(start), positions.get(start + 1)) {
        (Some(a), Some(b)) if b > a => b - a,
        _ => {
            return Err(DetectionError::boundary(format!(
                "no row boundary follows row {start}"
            )))
        }
    };
    let mut count = 1usize;
    for i in start + 1..positions.len() {
        count += ((positions[i] - positions[i - 1]) / step).round().max(0.0) as usize;
        if count >= expected {
            return Ok(i);
        }
    }
    Err(DetectionError::boundary(format!(
        "counted {count} of {expected} row boundaries"
    )))
}

/// Last row in `start..=end` whose position does not exceed `limit`.
pub fn table_bottom(positions: &[f32], start: usize, end: usize, limit: f32) -> Result<usize> {
    let end = end.min(positions.len().saturating_sub(1));
    let bottom = (start..=end)
        .rev()
        .find(|&i| positions[i] <= limit)
        .unwrap_or(start);
    if bottom <= start {
        return Err(DetectionError::boundary(
            "bottom probe ends above the second row boundary",
        ));
    }
    Ok(bottom)
}

/// Drop positions closer than `min_gap` to their predecessor so the sequence
/// is strictly increasing.
pub fn strictly_increasing(mut positions: Vec<f32>, min_gap: f32) -> Vec<f32> {
    positions.sort_by(|a, b| a.total_cmp(b));
    positions.dedup_by(|b, a| *b - *a < min_gap);
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(first: f32, pitch: f32, n: usize) -> Vec<f32> {
        (0..n).map(|i| first + pitch * i as f32).collect()
    }

    #[test]
    fn pitch_is_most_common_spacing() {
        let ys = [101.0, 149.0, 202.0, 251.0, 298.0, 420.0];
        assert_eq!(dominant_pitch(&ys, 5.0), Some(50.0));
    }

    #[test]
    fn pitch_ties_prefer_smaller_distance() {
        // Distances 30, 40, 70: each once.
        assert_eq!(dominant_pitch(&[0.0, 30.0, 70.0], 5.0), Some(30.0));
    }

    #[test]
    fn single_row_has_no_pitch() {
        assert_eq!(dominant_pitch(&[10.0], 5.0), None);
    }

    #[test]
    fn start_skips_isolated_header_lines() {
        let mut ys = vec![10.0];
        ys.extend(uniform(200.0, 50.0, 6));
        assert_eq!(table_start(&ys, 50.0, 5.0, 50.0), Some(1));
    }

    #[test]
    fn start_absorbs_tight_rows_above() {
        // First pitched pair is 200/250; the two rows above sit 15 px apart.
        let ys = [170.0, 185.0, 200.0, 250.0, 300.0];
        assert_eq!(table_start(&ys, 50.0, 5.0, 50.0), Some(0));
    }

    #[test]
    fn end_counts_merged_rows() {
        // Row 4 missing: its gap counts twice.
        let ys = [100.0, 150.0, 200.0, 250.0, 350.0, 400.0];
        assert_eq!(table_end(&ys, 0, 6).expect("end"), 4);
        assert_eq!(table_end(&ys, 0, 7).expect("end"), 5);
    }

    #[test]
    fn end_fails_when_rows_run_out() {
        let ys = uniform(100.0, 50.0, 5);
        assert!(matches!(
            table_end(&ys, 0, 18),
            Err(DetectionError::TableBoundaryNotFound { .. })
        ));
    }

    #[test]
    fn bottom_is_last_row_above_limit() {
        let ys = uniform(100.0, 50.0, 10);
        assert_eq!(table_bottom(&ys, 0, 9, 362.0).expect("bottom"), 5);
        assert_eq!(table_bottom(&ys, 0, 7, 10_000.0).expect("bottom"), 7);
        assert!(table_bottom(&ys, 0, 9, 120.0).is_err());
    }

    #[test]
    fn near_duplicates_are_dropped() {
        let ys = strictly_increasing(vec![150.0, 100.0, 100.4, 200.0], 1.0);
        assert_eq!(ys, vec![100.0, 150.0, 200.0]);
    }
}
