use crate::line::Line;
use serde::{Deserialize, Serialize};

/// Identifier of a segment within one extraction run, in detection order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u32);

/// Finite segment in image coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub p0: [f32; 2],
    pub p1: [f32; 2],
}

impl Segment {
    pub fn new(id: SegmentId, p0: [f32; 2], p1: [f32; 2]) -> Self {
        Self { id, p0, p1 }
    }

    pub fn length(&self) -> f32 {
        let dx = self.p1[0] - self.p0[0];
        let dy = self.p1[1] - self.p0[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Largest image-space y among both endpoints.
    pub fn max_y(&self) -> f32 {
        self.p0[1].max(self.p1[1])
    }

    /// Implicit line through the segment.
    pub fn to_line(&self) -> Line {
        Line::from_image_points(self.p0, self.p1)
    }
}
