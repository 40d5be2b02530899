//! Selection of the baseline used to measure page rotation.
use crate::cluster::{classify_by_direction, find_periodic_run, LineCluster, PeriodicRun};
use crate::error::{DetectionError, Result};
use crate::line::Line;
use serde::Serialize;

/// Baseline picked from the horizontal family and the periodic run it came
/// from.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkewReference {
    pub line: Line,
    pub run: PeriodicRun,
    /// Representatives in the dominant parallel group.
    pub family_size: usize,
}

/// Pick the longest horizontal representative inside the longest equally
/// spaced run of the dominant parallel group.
pub fn select_reference(families: &LineCluster, parallel_min_cos: f32, tolerance_px: f32) -> Result<SkewReference> {
    let representatives: Vec<Line> = families.horizontal.iter().filter_map(|c| c.span()).collect();
    if representatives.len() < 2 {
        return Err(DetectionError::InsufficientLineDetection {
            stage: "skew",
            found: representatives.len(),
            minimum: 2,
        });
    }

    let groups = classify_by_direction(&representatives, parallel_min_cos);
    let mut dominant = groups.into_iter().next().unwrap_or_default();
    if dominant.len() < 2 {
        return Err(DetectionError::skew(format!(
            "dominant parallel group has {} line(s)",
            dominant.len()
        )));
    }
    dominant.sort_by(|a, b| a.image_midpoint()[1].total_cmp(&b.image_midpoint()[1]));

    let run = find_periodic_run(&dominant, tolerance_px)
        .ok_or_else(|| DetectionError::skew("no periodic run among horizontal lines"))?;
    let line = dominant[run.indices()]
        .iter()
        .max_by(|a, b| a.length().total_cmp(&b.length()))
        .copied()
        .ok_or_else(|| DetectionError::skew("empty periodic run"))?;

    Ok(SkewReference {
        line,
        run,
        family_size: dominant.len(),
    })
}

/// Clockwise rotation in degrees that levels `line`.
///
/// The baseline's slope in the y-up frame is `-a/b`; rotating the image
/// clockwise by `atan(-a/b)` brings it to horizontal. A vertical reference
/// (`b == 0`) yields no rotation.
pub fn rotation_for(line: &Line) -> f32 {
    if line.b() == 0.0 {
        return 0.0;
    }
    (-line.a() / line.b()).atan().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{extract_line_families, ClassifyParams};
    use crate::segments::{Segment, SegmentId};

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn rising_baseline_needs_clockwise_rotation() {
        // Right end higher on the page (smaller image y).
        let line = Line::from_image_points([0.0, 110.0], [500.0, 100.0]);
        let deg = rotation_for(&line);
        assert!(approx(deg, (10.0f32 / 500.0).atan().to_degrees(), 1e-3), "{deg}");
        assert!(deg > 0.0);
    }

    #[test]
    fn falling_baseline_needs_counter_clockwise_rotation() {
        let line = Line::from_image_points([0.0, 100.0], [500.0, 110.0]);
        assert!(rotation_for(&line) < 0.0);
    }

    #[test]
    fn sign_is_independent_of_endpoint_order() {
        // Right endpoint closer to the origin than the left one.
        let line = Line::from_image_points([0.0, 1000.0], [100.0, 980.0]);
        let deg = rotation_for(&line);
        assert!(approx(deg, (0.2f32).atan().to_degrees(), 1e-3), "{deg}");
    }

    #[test]
    fn level_baseline_needs_no_rotation() {
        assert_eq!(rotation_for(&Line::horizontal(50.0, 0.0, 100.0)), 0.0);
        assert_eq!(rotation_for(&Line::vertical(50.0, 0.0, 100.0)), 0.0);
    }

    #[test]
    fn reference_comes_from_periodic_rows() {
        let mut segments = Vec::new();
        for i in 0..8u32 {
            let y = 100.0 + 40.0 * i as f32;
            let x1 = if i == 3 { 600.0 } else { 400.0 };
            segments.push(Segment::new(SegmentId(i), [50.0, y], [x1, y]));
        }
        let families = extract_line_families(&segments, &ClassifyParams::new(30.0, 0.0, 20.0, 20.0));
        let reference = select_reference(&families, 0.992, 15.0).expect("reference");
        assert_eq!((reference.run.start, reference.run.end), (0, 7));
        assert!(approx(reference.line.length(), 550.0, 1e-3));
    }

    #[test]
    fn single_row_is_insufficient() {
        let segments = vec![Segment::new(SegmentId(0), [0.0, 10.0], [300.0, 10.0])];
        let families = extract_line_families(&segments, &ClassifyParams::default());
        assert!(matches!(
            select_reference(&families, 0.992, 15.0),
            Err(DetectionError::InsufficientLineDetection { found: 1, .. })
        ));
    }
}
