use serde::{Deserialize, Serialize};

/// Parameters of the probabilistic Hough extractor.
///
/// Lengths are expressed in pixels of the image handed to the extractor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughOptions {
    /// Distance resolution of the accumulator in pixels.
    pub rho: f32,
    /// Angle resolution of the accumulator in degrees.
    pub theta_deg: f32,
    /// Minimum accumulator votes before a line is traced.
    pub threshold: i32,
    /// Minimum extent along x or y for an emitted segment.
    pub min_line_length: u32,
    /// Maximum run of empty pixels bridged while tracing.
    pub max_line_gap: u32,
    /// Seed of the pixel visiting order.
    pub seed: u64,
}

impl Default for HoughOptions {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta_deg: 1.0,
            threshold: 100,
            min_line_length: 30,
            max_line_gap: 2,
            seed: 0x5eed,
        }
    }
}

impl HoughOptions {
    pub fn new(rho: f32, theta_deg: f32, threshold: i32, min_line_length: u32, max_line_gap: u32) -> Self {
        Self {
            rho,
            theta_deg,
            threshold,
            min_line_length,
            max_line_gap,
            ..Self::default()
        }
    }
}
