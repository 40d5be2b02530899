use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::rect::Rect;

const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

/// White page with a ruled table: 3 px strokes centred on every row `y`
/// (spanning `left..=right`) and on every column `x` plus the left border
/// (spanning the first to last row).
#[allow(dead_code)]
pub fn ruled_page(width: u32, height: u32, rows: &[u32], columns: &[u32], left: u32, right: u32) -> RgbImage {
    let mut page = RgbImage::from_pixel(width, height, PAPER);
    let (Some(&top), Some(&bottom)) = (rows.first(), rows.last()) else {
        return page;
    };
    for &y in rows {
        let rect = Rect::at(left as i32, y as i32 - 1).of_size(right - left + 1, 3);
        draw_filled_rect_mut(&mut page, rect, INK);
    }
    for &x in std::iter::once(&left).chain(columns) {
        let rect = Rect::at(x as i32 - 1, top as i32 - 1).of_size(3, bottom - top + 3);
        draw_filled_rect_mut(&mut page, rect, INK);
    }
    page
}

/// Evenly spaced row positions `start, start + pitch, ...`.
#[allow(dead_code)]
pub fn evenly_spaced(start: u32, pitch: u32, count: u32) -> Vec<u32> {
    (0..count).map(|i| start + i * pitch).collect()
}

/// Rotate clockwise by `degrees` about the centre, filling with paper.
#[allow(dead_code)]
pub fn rotated(page: &RgbImage, degrees: f32) -> RgbImage {
    rotate_about_center(page, degrees.to_radians(), Interpolation::Bilinear, PAPER)
}
