//! Angle utilities shared by the line primitive and the segment classifiers.
//!
//! Orientation tests throughout the crate compare cosines instead of explicit
//! angles, which keeps the comparisons free of branch cuts around ±90°.

/// Signed cosine of the angle between two 2D vectors.
///
/// Returns `0.0` when either vector has (near) zero length, so degenerate
/// inputs never classify as parallel.
#[inline]
pub fn cos_between(a: &[f32; 2], b: &[f32; 2]) -> f32 {
    let na = (a[0] * a[0] + a[1] * a[1]).sqrt();
    let nb = (b[0] * b[0] + b[1] * b[1]).sqrt();
    if na <= 1e-9 || nb <= 1e-9 {
        return 0.0;
    }
    ((a[0] * b[0] + a[1] * b[1]) / (na * nb)).clamp(-1.0, 1.0)
}

/// Cosine of the orientation difference between two vectors, ignoring their
/// sign. Lies in `[0, 1]`; `1` means parallel or antiparallel.
#[inline]
pub fn cos_between_dirless(a: &[f32; 2], b: &[f32; 2]) -> f32 {
    cos_between(a, b).abs()
}

/// Cosine of a cone half-angle given in degrees.
#[inline]
pub fn cone_cos(half_angle_deg: f32) -> f32 {
    half_angle_deg.to_radians().cos()
}
