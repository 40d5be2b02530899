use super::{HoughOptions, Segment, SegmentId};
use image::GrayImage;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Instant;

/// Fixed-point shift used while stepping along a traced line.
const SHIFT: i32 = 16;

/// Output of one extraction run.
#[derive(Clone, Debug, Default)]
pub struct HoughResult {
    pub segments: Vec<Segment>,
    pub elapsed_ms: f64,
}

pub(crate) struct HoughExtractor<'a> {
    image: &'a GrayImage,
    options: HoughOptions,
}

/// Per-run state: vote accumulator, foreground mask and trig tables.
struct Accumulator {
    width: usize,
    height: usize,
    num_rho: usize,
    half_rho: i32,
    trig: Vec<(f32, f32)>,
    votes: Vec<i32>,
    mask: Vec<bool>,
}

impl Accumulator {
    fn new(width: usize, height: usize, options: &HoughOptions) -> Self {
        let rho = options.rho.max(1e-3);
        let theta = options.theta_deg.max(1e-3).to_radians();
        let irho = 1.0 / rho;
        let num_angle = ((std::f32::consts::PI / theta).round() as usize).max(1);
        let num_rho = ((((width + height) * 2 + 1) as f32 / rho).round() as usize).max(1);
        let trig = (0..num_angle)
            .map(|n| {
                let ang = n as f32 * theta;
                (ang.cos() * irho, ang.sin() * irho)
            })
            .collect();
        Self {
            width,
            height,
            num_rho,
            half_rho: (num_rho as i32 - 1) / 2,
            trig,
            votes: vec![0; num_angle * num_rho],
            mask: vec![false; width * height],
        }
    }

    #[inline]
    fn rho_index(&self, x: i32, y: i32, n: usize) -> usize {
        let (c, s) = self.trig[n];
        let r = (x as f32 * c + y as f32 * s).round() as i32 + self.half_rho;
        r.clamp(0, self.num_rho as i32 - 1) as usize
    }

    /// Add the pixel's votes and return the strongest bin it touched.
    fn vote(&mut self, x: i32, y: i32) -> (i32, usize) {
        let mut best = (i32::MIN, 0usize);
        for n in 0..self.trig.len() {
            let idx = n * self.num_rho + self.rho_index(x, y, n);
            self.votes[idx] += 1;
            if self.votes[idx] > best.0 {
                best = (self.votes[idx], n);
            }
        }
        best
    }

    fn withdraw(&mut self, x: i32, y: i32) {
        for n in 0..self.trig.len() {
            let idx = n * self.num_rho + self.rho_index(x, y, n);
            self.votes[idx] -= 1;
        }
    }

    #[inline]
    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn mask_index(&self, x: i64, y: i64) -> usize {
        y as usize * self.width + x as usize
    }
}

/// Fixed-point walker along one bin's direction.
#[derive(Clone, Copy)]
struct Walker {
    x_major: bool,
    x0: i64,
    y0: i64,
    dx: i64,
    dy: i64,
}

impl Walker {
    fn new(x: i32, y: i32, cos_t: f32, sin_t: f32) -> Self {
        // Direction along the line is perpendicular to the bin's normal.
        let a = -sin_t;
        let b = cos_t;
        let one = (1i64 << SHIFT) as f32;
        if a.abs() > b.abs() {
            Self {
                x_major: true,
                x0: x as i64,
                y0: ((y as i64) << SHIFT) + (1 << (SHIFT - 1)),
                dx: if a > 0.0 { 1 } else { -1 },
                dy: (b * one / a.abs()).round() as i64,
            }
        } else {
            Self {
                x_major: false,
                x0: ((x as i64) << SHIFT) + (1 << (SHIFT - 1)),
                y0: y as i64,
                dx: (a * one / b.abs()).round() as i64,
                dy: if b > 0.0 { 1 } else { -1 },
            }
        }
    }

    #[inline]
    fn pixel(&self, px: i64, py: i64) -> (i64, i64) {
        if self.x_major {
            (px, py >> SHIFT)
        } else {
            (px >> SHIFT, py)
        }
    }

    fn step(&self, sense: usize) -> (i64, i64) {
        if sense == 0 {
            (self.dx, self.dy)
        } else {
            (-self.dx, -self.dy)
        }
    }
}

impl<'a> HoughExtractor<'a> {
    pub fn new(image: &'a GrayImage, options: HoughOptions) -> Self {
        Self { image, options }
    }

    pub fn extract(&self) -> HoughResult {
        let t0 = Instant::now();
        let (width, height) = (self.image.width() as usize, self.image.height() as usize);
        if width == 0 || height == 0 {
            return HoughResult::default();
        }
        let mut acc = Accumulator::new(width, height, &self.options);

        let mut points: Vec<(i32, i32)> = Vec::new();
        for (x, y, px) in self.image.enumerate_pixels() {
            if px[0] != 0 {
                let idx = y as usize * width + x as usize;
                acc.mask[idx] = true;
                points.push((x as i32, y as i32));
            }
        }
        let mut rng = StdRng::seed_from_u64(self.options.seed);
        points.shuffle(&mut rng);

        let min_len = self.options.min_line_length as i64;
        let max_gap = self.options.max_line_gap as i64;
        let mut segments = Vec::new();

        for &(x, y) in &points {
            if !acc.mask[acc.mask_index(x as i64, y as i64)] {
                continue;
            }
            let (max_votes, max_n) = acc.vote(x, y);
            if max_votes < self.options.threshold {
                continue;
            }

            let (cos_t, sin_t) = acc.trig[max_n];
            let walker = Walker::new(x, y, cos_t, sin_t);

            // Trace both senses, remembering the last foreground pixel.
            let mut ends = [(x as i64, y as i64); 2];
            for (sense, end) in ends.iter_mut().enumerate() {
                let (dx, dy) = walker.step(sense);
                let (mut px, mut py) = (walker.x0, walker.y0);
                let mut gap = 0i64;
                loop {
                    let (j, i) = walker.pixel(px, py);
                    if !acc.in_bounds(j, i) {
                        break;
                    }
                    if acc.mask[acc.mask_index(j, i)] {
                        gap = 0;
                        *end = (j, i);
                    } else {
                        gap += 1;
                        if gap > max_gap {
                            break;
                        }
                    }
                    px += dx;
                    py += dy;
                }
            }

            let good = (ends[1].0 - ends[0].0).abs() >= min_len
                || (ends[1].1 - ends[0].1).abs() >= min_len;

            // Clear the traced pixels; withdraw their votes for accepted lines.
            for (sense, end) in ends.iter().enumerate() {
                let (dx, dy) = walker.step(sense);
                let (mut px, mut py) = (walker.x0, walker.y0);
                loop {
                    let (j, i) = walker.pixel(px, py);
                    if !acc.in_bounds(j, i) {
                        break;
                    }
                    let idx = acc.mask_index(j, i);
                    if acc.mask[idx] {
                        if good {
                            acc.withdraw(j as i32, i as i32);
                        }
                        acc.mask[idx] = false;
                    }
                    if (j, i) == *end {
                        break;
                    }
                    px += dx;
                    py += dy;
                }
            }

            if good {
                let id = SegmentId(segments.len() as u32);
                segments.push(Segment::new(
                    id,
                    [ends[0].0 as f32, ends[0].1 as f32],
                    [ends[1].0 as f32, ends[1].1 as f32],
                ));
            }
        }

        let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "Hough: {}x{} points={} segments={} elapsed_ms={:.3}",
            width,
            height,
            points.len(),
            segments.len(),
            elapsed_ms
        );
        HoughResult {
            segments,
            elapsed_ms,
        }
    }
}
