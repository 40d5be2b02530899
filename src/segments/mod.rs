//! Progressive probabilistic Hough segment extractor.
//!
//! Every stage of the pipeline turns a binary (or edge) image into a list of
//! finite segments with the same primitive. The algorithm is the classic
//! progressive probabilistic Hough transform:
//!
//! - Collect all non-zero pixels into a mask and visit them in a random order
//!   (seeded, so runs are reproducible).
//! - Each visited pixel votes into a `(theta, rho)` accumulator. As soon as the
//!   strongest bin the pixel touched reaches `threshold`, walk the image along
//!   that bin's direction from the pixel in both senses, tolerating at most
//!   `max_line_gap` consecutive empty pixels.
//! - If the walked span is at least `min_line_length` along either axis, its
//!   pixels are removed from the mask and their votes withdrawn; the span is
//!   emitted as a segment. Shorter spans only clear the mask.
//!
//! Segments are reported in image coordinates (`y` grows downwards) with
//! integer endpoints; convert with [`Segment::to_line`] for geometry.
//!
//! Complexity
//! - One vote costs `O(n_theta)`; every non-zero pixel votes at most once, so a
//!   run is `O(n_pixels · n_theta)` plus the walks.

mod hough;
mod options;
mod segment;

pub use hough::HoughResult;
pub use options::HoughOptions;
pub use segment::{Segment, SegmentId};

use image::GrayImage;

/// Extract segments from a binary image. Non-zero pixels are foreground.
pub fn detect_segments(binary: &GrayImage, options: &HoughOptions) -> HoughResult {
    hough::HoughExtractor::new(binary, options.clone()).extract()
}

#[cfg(test)]
mod tests;
