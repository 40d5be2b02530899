use super::position::{group_by_position, Cluster};
use crate::angle::cone_cos;
use crate::line::Line;
use crate::segments::Segment;

use log::debug;
use serde::{Deserialize, Serialize};

/// Orientation class of a grid line in image space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Thresholds for splitting segments into vertical and horizontal families
/// and for merging each family into grid lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyParams {
    /// A segment is vertical when its normal lies more than this many degrees
    /// away from the image's vertical axis.
    pub vertical_cone_deg: f32,
    /// Minimum absolute cosine between a horizontal segment's normal and the
    /// vertical axis. Segments in neither class are dropped.
    pub horizontal_min_cos: f32,
    /// Position tolerance when merging vertical segments, in pixels.
    pub vertical_merge_px: f32,
    /// Position tolerance when merging horizontal segments, in pixels.
    pub horizontal_merge_px: f32,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            vertical_cone_deg: 30.0,
            horizontal_min_cos: 0.999,
            vertical_merge_px: 10.0,
            horizontal_merge_px: 5.0,
        }
    }
}

impl ClassifyParams {
    pub fn new(vertical_cone_deg: f32, horizontal_min_cos: f32, vertical_merge_px: f32, horizontal_merge_px: f32) -> Self {
        Self {
            vertical_cone_deg,
            horizontal_min_cos,
            vertical_merge_px,
            horizontal_merge_px,
        }
    }

    /// Orientation of `line`, or `None` when it falls between the two cones.
    pub fn classify(&self, line: &Line) -> Option<Orientation> {
        if line.is_degenerate() {
            return None;
        }
        let cos = line.angle_cosine([0.0, 1.0]).abs();
        if cos < cone_cos(self.vertical_cone_deg) {
            Some(Orientation::Vertical)
        } else if cos >= self.horizontal_min_cos {
            Some(Orientation::Horizontal)
        } else {
            None
        }
    }
}

/// Vertical and horizontal grid lines found in one image, each family ordered
/// by ascending position.
#[derive(Clone, Debug, Default, Serialize)]
pub struct LineCluster {
    pub vertical: Vec<Cluster>,
    pub horizontal: Vec<Cluster>,
}

impl LineCluster {
    pub fn family(&self, orientation: Orientation) -> &[Cluster] {
        match orientation {
            Orientation::Vertical => &self.vertical,
            Orientation::Horizontal => &self.horizontal,
        }
    }

    /// Representative positions of one family, ascending.
    pub fn positions(&self, orientation: Orientation) -> Vec<f32> {
        self.family(orientation).iter().map(|c| c.position).collect()
    }
}

/// Classify segments by orientation and merge each family into grid lines.
pub fn extract_line_families(segments: &[Segment], params: &ClassifyParams) -> LineCluster {
    let mut vertical = Vec::new();
    let mut horizontal = Vec::new();
    for seg in segments {
        let line = seg.to_line();
        match params.classify(&line) {
            Some(Orientation::Vertical) => vertical.push(line),
            Some(Orientation::Horizontal) => horizontal.push(line),
            None => {}
        }
    }
    let families = LineCluster {
        vertical: group_by_position(&vertical, Orientation::Vertical, params.vertical_merge_px),
        horizontal: group_by_position(&horizontal, Orientation::Horizontal, params.horizontal_merge_px),
    };
    debug!(
        "line families: segments={} vertical={}→{} horizontal={}→{}",
        segments.len(),
        vertical.len(),
        families.vertical.len(),
        horizontal.len(),
        families.horizontal.len()
    );
    families
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::SegmentId;

    fn seg(id: u32, p0: [f32; 2], p1: [f32; 2]) -> Segment {
        Segment::new(SegmentId(id), p0, p1)
    }

    #[test]
    fn classify_respects_cones() {
        let params = ClassifyParams::default();
        assert_eq!(
            params.classify(&Line::vertical(5.0, 0.0, 100.0)),
            Some(Orientation::Vertical)
        );
        assert_eq!(
            params.classify(&Line::horizontal(5.0, 0.0, 100.0)),
            Some(Orientation::Horizontal)
        );
        // 10° off horizontal: neither class with the strict horizontal cone.
        let tilted = Line::from_image_points([0.0, 0.0], [100.0, 17.6]);
        assert_eq!(params.classify(&tilted), None);
    }

    #[test]
    fn families_are_grouped_and_sorted() {
        let segments = vec![
            seg(0, [0.0, 210.0], [300.0, 210.0]),
            seg(1, [0.0, 100.0], [300.0, 100.0]),
            seg(2, [150.0, 0.0], [150.0, 300.0]),
            seg(3, [10.0, 102.0], [200.0, 102.0]),
            seg(4, [40.0, 0.0], [40.0, 300.0]),
        ];
        let families = extract_line_families(&segments, &ClassifyParams::default());
        assert_eq!(families.horizontal.len(), 2);
        assert_eq!(families.vertical.len(), 2);
        let ys = families.positions(Orientation::Horizontal);
        assert!(ys[0] < ys[1]);
        assert!((ys[0] - 101.0).abs() < 2.0);
        assert_eq!(families.positions(Orientation::Vertical), vec![40.0, 150.0]);
    }

    #[test]
    fn extraction_is_repeatable() {
        let segments: Vec<Segment> = (0..24u32)
            .map(|i| {
                let off = (i * 5 % 12) as f32 * 40.0 + (i % 3) as f32 * 2.0;
                if i % 2 == 0 {
                    seg(i, [10.0, off], [400.0, off + 1.0])
                } else {
                    seg(i, [off, 5.0], [off + 1.0, 480.0])
                }
            })
            .collect();
        let params = ClassifyParams::default();
        let a = extract_line_families(&segments, &params);
        let b = extract_line_families(&segments, &params);
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            assert_eq!(a.positions(orientation), b.positions(orientation));
            let members = |f: &LineCluster| -> Vec<Vec<Line>> {
                f.family(orientation).iter().map(|c| c.members.clone()).collect()
            };
            assert_eq!(members(&a), members(&b));
        }
    }
}
