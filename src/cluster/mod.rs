//! Grouping of detected segments into grid lines.
//!
//! - [`group_by_position`]: merges near-collinear segments of one orientation
//!   into [`Cluster`]s keyed by their offset along the perpendicular axis.
//! - [`classify_by_direction`]: buckets lines by parallelism.
//! - [`find_periodic_run`]: finds the longest equally spaced stretch in an
//!   axis-ordered sequence of lines.
//! - [`extract_line_families`]: the combination used by every stage, turning
//!   raw Hough output into a vertical and a horizontal [`LineCluster`] family.

mod direction;
mod families;
mod periodic;
mod position;

pub use direction::classify_by_direction;
pub use families::{extract_line_families, ClassifyParams, LineCluster, Orientation};
pub use periodic::{find_periodic_run, PeriodicRun};
pub use position::{group_by_position, Cluster};
