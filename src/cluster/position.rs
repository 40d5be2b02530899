use super::Orientation;
use crate::line::{Line, Point};
use serde::Serialize;

/// A group of near-collinear lines sharing one orientation.
///
/// `position` is the representative offset in image coordinates: the x of a
/// vertical cluster, the y of a horizontal one.
#[derive(Clone, Debug, Serialize)]
pub struct Cluster {
    pub orientation: Orientation,
    pub position: f32,
    pub members: Vec<Line>,
}

/// Image-space coordinate of a point along the axis perpendicular to
/// `orientation`.
#[inline]
pub(crate) fn axis_coord(p: Point, orientation: Orientation) -> f32 {
    match orientation {
        Orientation::Vertical => p[0],
        Orientation::Horizontal => -p[1],
    }
}

/// Running representative after absorbing `line`: the previous value and both
/// endpoints of the newcomer weigh equally.
fn absorbed_position(position: f32, line: &Line, orientation: Orientation) -> f32 {
    (position + axis_coord(line.p1(), orientation) + axis_coord(line.p2(), orientation)) / 3.0
}

impl Cluster {
    fn seed(line: Line, orientation: Orientation) -> Self {
        Self {
            orientation,
            position: axis_coord(line.p1(), orientation),
            members: vec![line],
        }
    }

    /// Line spanning the two most extreme member endpoints along the cluster's
    /// own direction (leftmost to rightmost for a horizontal cluster, topmost
    /// to bottommost for a vertical one). `None` when they coincide.
    pub fn span(&self) -> Option<Line> {
        let along = |p: &[f32; 2]| match self.orientation {
            Orientation::Horizontal => p[0],
            Orientation::Vertical => -p[1],
        };
        let endpoints = self
            .members
            .iter()
            .flat_map(|l| [l.image_p1(), l.image_p2()]);
        // Ties resolve to the earliest member on both ends.
        let first = endpoints
            .clone()
            .min_by(|a, b| along(a).total_cmp(&along(b)))?;
        let last = endpoints.min_by(|a, b| along(b).total_cmp(&along(a)))?;
        let line = Line::from_image_points(first, last);
        (!line.is_degenerate()).then_some(line)
    }
}

/// Group lines whose first endpoint lies within `threshold` pixels of an
/// existing cluster's representative.
///
/// Each line joins the first matching cluster only, so clusters are disjoint.
/// Members are ordered along the perpendicular axis, and clusters are returned
/// in ascending `position`.
pub fn group_by_position(lines: &[Line], orientation: Orientation, threshold: f32) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    for line in lines {
        let coord = axis_coord(line.p1(), orientation);
        match clusters
            .iter_mut()
            .find(|c| (c.position - coord).abs() < threshold)
        {
            Some(cluster) => {
                cluster.position = absorbed_position(cluster.position, line, orientation);
                cluster.members.push(*line);
            }
            None => clusters.push(Cluster::seed(*line, orientation)),
        }
    }
    for cluster in &mut clusters {
        cluster
            .members
            .sort_by(|a, b| axis_coord(a.p1(), orientation).total_cmp(&axis_coord(b.p1(), orientation)));
    }
    clusters.sort_by(|a, b| a.position.total_cmp(&b.position));
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_rows_merge_and_distant_rows_split() {
        let lines = [
            Line::horizontal(100.0, 0.0, 200.0),
            Line::horizontal(103.0, 10.0, 190.0),
            Line::horizontal(160.0, 0.0, 200.0),
            Line::horizontal(101.0, 50.0, 90.0),
        ];
        let clusters = group_by_position(&lines, Orientation::Horizontal, 5.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members.len(), 3);
        assert_eq!(clusters[1].members.len(), 1);
        assert!((clusters[0].position - 101.0).abs() < 2.0);
        assert!((clusters[1].position - 160.0).abs() < 1e-4);
    }

    #[test]
    fn representative_is_running_average() {
        let lines = [
            Line::vertical(10.0, 0.0, 100.0),
            Line::vertical(13.0, 0.0, 100.0),
        ];
        let clusters = group_by_position(&lines, Orientation::Vertical, 5.0);
        assert_eq!(clusters.len(), 1);
        assert!((clusters[0].position - 12.0).abs() < 1e-4);
    }

    #[test]
    fn each_line_joins_one_cluster() {
        let lines: Vec<Line> = (0..6)
            .map(|i| Line::vertical(i as f32 * 4.0, 0.0, 50.0))
            .collect();
        let clusters = group_by_position(&lines, Orientation::Vertical, 6.0);
        let total: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, lines.len());
    }

    #[test]
    fn span_covers_extreme_endpoints() {
        let lines = [
            Line::horizontal(100.0, 20.0, 120.0),
            Line::horizontal(104.0, 150.0, 400.0),
        ];
        let clusters = group_by_position(&lines, Orientation::Horizontal, 10.0);
        let span = clusters[0].span().expect("span");
        let (a, b) = (span.image_p1(), span.image_p2());
        let xs = (a[0].min(b[0]), a[0].max(b[0]));
        assert_eq!(xs, (20.0, 400.0));
    }

    fn snapshot(clusters: &[Cluster]) -> Vec<(f32, Vec<Line>)> {
        clusters.iter().map(|c| (c.position, c.members.clone())).collect()
    }

    #[test]
    fn regrouping_the_same_input_is_deterministic() {
        // Interleaved rows 50 px apart with fragments just inside and just
        // outside the merge threshold.
        let lines: Vec<Line> = (0..20)
            .map(|i| {
                let row = (i * 7 % 10) as f32 * 50.0 + 100.0;
                let jitter = [0.0, 4.9, -4.9, 5.1][i % 4];
                let x0 = (i % 3) as f32 * 30.0;
                Line::horizontal(row + jitter, x0, x0 + 200.0)
            })
            .collect();
        let a = group_by_position(&lines, Orientation::Horizontal, 5.0);
        let b = group_by_position(&lines, Orientation::Horizontal, 5.0);
        assert_eq!(snapshot(&a), snapshot(&b));
        let total: usize = a.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, lines.len());
    }
}
