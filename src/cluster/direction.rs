use crate::angle::cos_between_dirless;
use crate::line::Line;

/// Bucket lines by parallelism.
///
/// A line joins the first group whose leading member's normal makes an
/// absolute cosine above `min_cos` with its own normal; otherwise it starts a
/// new group. Groups are returned by descending population, ties keeping
/// creation order.
pub fn classify_by_direction(lines: &[Line], min_cos: f32) -> Vec<Vec<Line>> {
    let mut groups: Vec<Vec<Line>> = Vec::new();
    for line in lines {
        let normal = line.normal();
        match groups
            .iter_mut()
            .find(|g| cos_between_dirless(&g[0].normal(), &normal) > min_cos)
        {
            Some(group) => group.push(*line),
            None => groups.push(vec![*line]),
        }
    }
    groups.sort_by_key(|g| std::cmp::Reverse(g.len()));
    groups
}
