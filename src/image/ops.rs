//! Per-pixel and geometric operations used by the detection stages.
//!
//! - `gamma_correct`: power-law lookup on an 8-bit gray image.
//! - `threshold_inv`: inverse binary threshold, ink becomes 255.
//! - `crop` / `resize_to` / `downscale_half`: thin wrappers over `imageops`.
//! - `column_ink_profile` / `ink_count` / `ink_density`: projections of a
//!   binary image.
use super::Rect;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma, Pixel, RgbImage};

/// Luminance conversion of the photographed page.
pub fn to_gray(src: &RgbImage) -> GrayImage {
    imageops::grayscale(src)
}

/// Apply `out = 255 · (in / 255)^gamma`. Values above 1 darken mid-tones,
/// which thickens faint ink before thresholding.
pub fn gamma_correct(src: &GrayImage, gamma: f32) -> GrayImage {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let v = (i as f32 / 255.0).powf(gamma) * 255.0;
        *slot = v.round().clamp(0.0, 255.0) as u8;
    }
    let mut out = src.clone();
    for px in out.pixels_mut() {
        px[0] = lut[px[0] as usize];
    }
    out
}

/// Pixels at or below `thresh` become 255 (ink), brighter ones 0.
pub fn threshold_inv(src: &GrayImage, thresh: u8) -> GrayImage {
    GrayImage::from_fn(src.width(), src.height(), |x, y| {
        if src.get_pixel(x, y)[0] > thresh {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// Copy out a sub-image; `None` when `rect` does not fit.
pub fn crop<P>(src: &ImageBuffer<P, Vec<P::Subpixel>>, rect: Rect) -> Option<ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: Pixel + 'static,
{
    if !rect.fits(src.width(), src.height()) {
        return None;
    }
    Some(imageops::crop_imm(src, rect.x, rect.y, rect.w, rect.h).to_image())
}

/// Resize to an exact size with a triangle filter.
pub fn resize_to(src: &GrayImage, width: u32, height: u32) -> GrayImage {
    imageops::resize(src, width.max(1), height.max(1), FilterType::Triangle)
}

/// Halve both dimensions (rounding down, at least one pixel).
pub fn downscale_half(src: &GrayImage) -> GrayImage {
    resize_to(src, src.width() / 2, src.height() / 2)
}

/// Number of non-zero pixels in every column.
pub fn column_ink_profile(src: &GrayImage) -> Vec<u32> {
    let mut profile = vec![0u32; src.width() as usize];
    for (x, _, px) in src.enumerate_pixels() {
        if px[0] != 0 {
            profile[x as usize] += 1;
        }
    }
    profile
}

/// Number of non-zero pixels.
pub fn ink_count(src: &GrayImage) -> u64 {
    src.pixels().filter(|px| px[0] != 0).count() as u64
}

/// Fraction of non-zero pixels, `0.0` for an empty image.
pub fn ink_density(src: &GrayImage) -> f32 {
    let area = src.width() as u64 * src.height() as u64;
    if area == 0 {
        return 0.0;
    }
    ink_count(src) as f32 / area as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_keeps_extremes_and_darkens_midtones() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[0u8, 128, 255][x as usize]]));
        let out = gamma_correct(&img, 2.5);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(2, 0)[0], 255);
        assert!(out.get_pixel(1, 0)[0] < 60);
    }

    #[test]
    fn inverse_threshold_marks_dark_pixels() {
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([[10u8, 150, 151, 250][x as usize]]));
        let out = threshold_inv(&img, 150);
        let values: Vec<u8> = out.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![255, 255, 0, 0]);
    }

    #[test]
    fn crop_rejects_out_of_bounds() {
        let img = GrayImage::new(10, 10);
        assert!(crop(&img, Rect::new(5, 5, 6, 2)).is_none());
        let out = crop(&img, Rect::new(5, 5, 5, 2)).expect("fits");
        assert_eq!(out.dimensions(), (5, 2));
    }

    #[test]
    fn column_profile_counts_ink() {
        let img = GrayImage::from_fn(3, 4, |x, y| if x == 1 || y == 0 { Luma([255]) } else { Luma([0]) });
        assert_eq!(column_ink_profile(&img), vec![1, 4, 1]);
        assert_eq!(ink_count(&img), 6);
        assert!((ink_density(&img) - 0.5).abs() < 1e-6);
    }
}
