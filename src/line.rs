//! Implicit-form line primitive.
//!
//! A [`Line`] stores its two endpoints in a *geometric* frame where the y axis
//! points up, i.e. an image pixel `(x, y)` becomes the point `(x, -y)`. All
//! coefficient arithmetic (normal, offset, intersection) happens in that
//! frame; [`Line::image_p1`] and friends mirror results back into image
//! coordinates.
//!
//! Endpoints are stored in canonical order: `p1` is the endpoint closer to the
//! origin, with a lexicographic tie-break, so `Line::new(a, b) == Line::new(b, a)`.

use crate::angle::cos_between;
use nalgebra::Vector3;
use serde::Serialize;

/// A 2D point `[x, y]`.
pub type Point = [f32; 2];

/// Flip a point between image (y down) and geometric (y up) frames.
#[inline]
pub fn mirror(p: Point) -> Point {
    [p[0], -p[1]]
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Line {
    p1: Point,
    p2: Point,
    /// `(a, b, c)` with `a·x + b·y + c = 0`.
    coeffs: Vector3<f32>,
}

fn closer_to_origin(a: &Point, b: &Point) -> bool {
    let ma = a[0] * a[0] + a[1] * a[1];
    let mb = b[0] * b[0] + b[1] * b[1];
    if ma != mb {
        return ma < mb;
    }
    (a[0], a[1]) <= (b[0], b[1])
}

impl Line {
    /// Build a line through two points given in the geometric frame.
    pub fn new(a: Point, b: Point) -> Self {
        let (p1, p2) = if closer_to_origin(&a, &b) { (a, b) } else { (b, a) };
        let ca = p1[1] - p2[1];
        let cb = p2[0] - p1[0];
        let cc = -(ca * p1[0] + cb * p1[1]);
        Self {
            p1,
            p2,
            coeffs: Vector3::new(ca, cb, cc),
        }
    }

    /// Build a line from two image-space pixel coordinates.
    pub fn from_image_points(a: Point, b: Point) -> Self {
        Self::new(mirror(a), mirror(b))
    }

    /// Horizontal image line at row `y` spanning `[x0, x1]`.
    pub fn horizontal(y: f32, x0: f32, x1: f32) -> Self {
        Self::from_image_points([x0, y], [x1, y])
    }

    /// Vertical image line at column `x` spanning `[y0, y1]`.
    pub fn vertical(x: f32, y0: f32, y1: f32) -> Self {
        Self::from_image_points([x, y0], [x, y1])
    }

    #[inline]
    pub fn p1(&self) -> Point {
        self.p1
    }

    #[inline]
    pub fn p2(&self) -> Point {
        self.p2
    }

    #[inline]
    pub fn image_p1(&self) -> Point {
        mirror(self.p1)
    }

    #[inline]
    pub fn image_p2(&self) -> Point {
        mirror(self.p2)
    }

    /// Midpoint in image coordinates.
    pub fn image_midpoint(&self) -> Point {
        mirror([
            0.5 * (self.p1[0] + self.p2[0]),
            0.5 * (self.p1[1] + self.p2[1]),
        ])
    }

    #[inline]
    pub fn a(&self) -> f32 {
        self.coeffs.x
    }

    #[inline]
    pub fn b(&self) -> f32 {
        self.coeffs.y
    }

    #[inline]
    pub fn c(&self) -> f32 {
        self.coeffs.z
    }

    /// Normal vector `(a, b)`.
    #[inline]
    pub fn normal(&self) -> [f32; 2] {
        [self.coeffs.x, self.coeffs.y]
    }

    pub fn length(&self) -> f32 {
        let dx = self.p2[0] - self.p1[0];
        let dy = self.p2[1] - self.p1[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// True when both endpoints coincide.
    pub fn is_degenerate(&self) -> bool {
        self.coeffs.x == 0.0 && self.coeffs.y == 0.0
    }

    /// Cosine between this line's normal and `v`.
    ///
    /// Sign depends on endpoint order; orientation tests should use the
    /// absolute value.
    pub fn angle_cosine(&self, v: [f32; 2]) -> f32 {
        cos_between(&self.normal(), &v)
    }

    /// Intersection point in the geometric frame, or `None` for parallel or
    /// degenerate pairs.
    pub fn intersect(&self, other: &Line) -> Option<Point> {
        let h = self.coeffs.cross(&other.coeffs);
        if h.z.abs() <= 1e-9 {
            return None;
        }
        Some([h.x / h.z, h.y / h.z])
    }

    /// Intersection point mirrored into image coordinates.
    pub fn intersect_image(&self, other: &Line) -> Option<Point> {
        self.intersect(other).map(mirror)
    }

    /// Perpendicular distance from a geometric-frame point to this line.
    pub fn distance_to_point(&self, p: Point) -> f32 {
        let norm = (self.coeffs.x * self.coeffs.x + self.coeffs.y * self.coeffs.y).sqrt();
        if norm <= 1e-9 {
            return 0.0;
        }
        (self.coeffs.x * p[0] + self.coeffs.y * p[1] + self.coeffs.z).abs() / norm
    }

    /// Perpendicular distance from this line to `other`, measured at
    /// `other`'s first endpoint. Meaningful for near-parallel pairs.
    pub fn distance_to(&self, other: &Line) -> f32 {
        self.distance_to_point(other.p1)
    }
}
