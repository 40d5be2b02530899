use crate::line::Line;
use serde::Serialize;

/// Inclusive index range `[start, end]` of an equally spaced stretch of lines.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PeriodicRun {
    pub start: usize,
    pub end: usize,
    /// Mean spacing inside the run.
    pub pitch: f32,
}

impl PeriodicRun {
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Longest run of consecutive lines whose spacing stays within `tolerance` of
/// the run's first spacing.
///
/// `lines` must be ordered along their common normal. The earliest run wins
/// ties. Returns `None` for fewer than two lines.
pub fn find_periodic_run(lines: &[Line], tolerance: f32) -> Option<PeriodicRun> {
    if lines.len() < 2 {
        return None;
    }
    let gaps: Vec<f32> = lines.windows(2).map(|w| w[0].distance_to(&w[1])).collect();

    let mut best = (0usize, 1usize);
    let mut run_start = 0usize;
    let mut reference = gaps[0];
    for (i, &gap) in gaps.iter().enumerate().skip(1) {
        if (gap - reference).abs() >= tolerance {
            run_start = i;
            reference = gap;
        }
        let end = i + 1;
        if end - run_start > best.1 - best.0 {
            best = (run_start, end);
        }
    }

    let (start, end) = best;
    let pitch = gaps[start..end].iter().sum::<f32>() / (end - start) as f32;
    Some(PeriodicRun { start, end, pitch })
}
