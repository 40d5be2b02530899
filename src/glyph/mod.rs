//! Splitting a score cell into its two digit glyphs.
//!
//! Scores are written as two digits (tens and tenths, e.g. `8 5` for 8.5).
//! The cell is binarized, its column ink histogram locates the leftmost and
//! rightmost inked columns, and the inked span is cut in half. Each half is
//! resized to the classifier's input canvas.

use crate::error::{DetectionError, Result};
use crate::image::{crop, resize_to, threshold_inv, Rect};

use image::GrayImage;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphParams {
    /// Border trimmed from the raw cell before thresholding.
    pub cell_inset_px: u32,
    pub threshold: u8,
    /// A column is inked when it holds more than this many ink pixels.
    pub min_column_ink: u32,
    /// Padding added left and right of the inked span.
    pub margin_px: i64,
    /// Gap left between the two halves.
    pub split_gap_px: i64,
    /// Side of the square canvas glyphs are resized to.
    pub canvas_px: u32,
}

impl Default for GlyphParams {
    fn default() -> Self {
        Self {
            cell_inset_px: 4,
            threshold: 200,
            min_column_ink: 3,
            margin_px: 4,
            split_gap_px: 2,
            canvas_px: 28,
        }
    }
}

/// One digit cut from a cell.
#[derive(Clone, Debug)]
pub struct Glyph {
    /// Location in the binarized cell.
    pub bounds: Rect,
    /// `canvas_px × canvas_px` binary image, ink is 255.
    pub image: GrayImage,
}

/// Trim the cell border (`inset` left, right and top) and inverse-threshold.
/// Cells too small to trim are thresholded whole.
pub fn binarize_cell(cell: &GrayImage, params: &GlyphParams) -> GrayImage {
    let inset = params.cell_inset_px;
    let trimmed = Rect::new(
        inset,
        inset,
        cell.width().saturating_sub(2 * inset),
        cell.height().saturating_sub(inset),
    );
    match crop(cell, trimmed) {
        Some(inner) => threshold_inv(&inner, params.threshold),
        None => threshold_inv(cell, params.threshold),
    }
}

/// Bounds of the two digit halves in a binary cell, or `None` when the inked
/// span is missing or touches the cell border.
pub fn glyph_bounds(binary: &GrayImage, params: &GlyphParams) -> Option<[Rect; 2]> {
    let (w, h) = (binary.width() as i64, binary.height() as i64);
    let mut histogram = vec![0u32; w as usize];
    for (x, _, px) in binary.enumerate_pixels() {
        if px[0] != 0 {
            histogram[x as usize] += 1;
        }
    }
    let first = histogram.iter().position(|&c| c > params.min_column_ink)? as i64;
    let last = histogram.iter().rposition(|&c| c > params.min_column_ink)? as i64;

    let left = first - params.margin_px;
    let right = last + params.margin_px + 1;
    if left <= 0 || right >= w {
        return None;
    }
    let half = (right - left) / 2;
    let width = half - params.split_gap_px;
    if width <= 0 {
        return None;
    }
    let a = Rect::from_signed(left, 0, width, h)?;
    let b = Rect::from_signed(left + half + params.split_gap_px, 0, width, h)?;
    Some([a, b])
}

/// Cut a binary cell into two canvas-sized glyphs. Returns an empty vector
/// for blank or malformed cells.
pub fn segment_glyphs(binary: &GrayImage, params: &GlyphParams) -> Vec<Glyph> {
    let Some(bounds) = glyph_bounds(binary, params) else {
        debug!("glyphs: no interior ink span in {}x{} cell", binary.width(), binary.height());
        return Vec::new();
    };
    bounds
        .iter()
        .filter_map(|&rect| {
            let piece = crop(binary, rect)?;
            Some(Glyph {
                bounds: rect,
                image: resize_to(&piece, params.canvas_px, params.canvas_px),
            })
        })
        .collect()
}

/// Like [`segment_glyphs`] but insists on exactly two glyphs.
pub fn glyph_pair(binary: &GrayImage, params: &GlyphParams) -> Result<[Glyph; 2]> {
    let mut glyphs = segment_glyphs(binary, params).into_iter();
    match (glyphs.next(), glyphs.next()) {
        (Some(a), Some(b)) => Ok([a, b]),
        _ => Err(DetectionError::EmptyGlyphRegion),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn two_blobs() -> GrayImage {
        GrayImage::from_fn(60, 40, |x, y| {
            let ink = ((12..24).contains(&x) || (34..46).contains(&x)) && (8..32).contains(&y);
            Luma([if ink { 255 } else { 0 }])
        })
    }

    #[test]
    fn two_blobs_give_two_disjoint_glyphs() {
        let params = GlyphParams::default();
        let binary = two_blobs();
        let glyphs = segment_glyphs(&binary, &params);
        assert_eq!(glyphs.len(), 2);
        let (a, b) = (glyphs[0].bounds, glyphs[1].bounds);
        assert!(a.right() <= b.x, "{a:?} overlaps {b:?}");
        for g in &glyphs {
            assert!(g.bounds.x > 0 && g.bounds.right() < binary.width());
            assert!(g.bounds.bottom() <= binary.height());
            assert_eq!(g.image.dimensions(), (28, 28));
        }
        assert_eq!(a, Rect::new(8, 0, 19, 40));
        assert_eq!(b, Rect::new(31, 0, 19, 40));
    }

    #[test]
    fn blank_cell_has_no_glyphs() {
        let binary = GrayImage::new(60, 40);
        assert!(segment_glyphs(&binary, &GlyphParams::default()).is_empty());
        assert!(matches!(
            glyph_pair(&binary, &GlyphParams::default()),
            Err(DetectionError::EmptyGlyphRegion)
        ));
    }

    #[test]
    fn ink_touching_the_border_is_rejected() {
        let binary = GrayImage::from_fn(60, 40, |x, _| Luma([if x < 20 { 255 } else { 0 }]));
        assert!(glyph_bounds(&binary, &GlyphParams::default()).is_none());
    }

    #[test]
    fn thin_specks_are_ignored() {
        let binary = GrayImage::from_fn(60, 40, |x, y| Luma([if x == 30 && y < 3 { 255 } else { 0 }]));
        assert!(glyph_bounds(&binary, &GlyphParams::default()).is_none());
    }

    #[test]
    fn binarize_trims_border_and_inverts() {
        let cell = GrayImage::from_fn(50, 30, |x, _| Luma([if x < 2 { 0 } else { 255 }]));
        let binary = binarize_cell(&cell, &GlyphParams::default());
        assert_eq!(binary.dimensions(), (42, 26));
        assert!(binary.pixels().all(|p| p[0] == 0));
    }
}
