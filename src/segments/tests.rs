use super::*;
use image::{GrayImage, Luma};

fn canvas(width: u32, height: u32) -> GrayImage {
    GrayImage::new(width, height)
}

fn draw_row(img: &mut GrayImage, y: u32, x0: u32, x1: u32) {
    for x in x0..=x1 {
        img.put_pixel(x, y, Luma([255]));
    }
}

fn draw_col(img: &mut GrayImage, x: u32, y0: u32, y1: u32) {
    for y in y0..=y1 {
        img.put_pixel(x, y, Luma([255]));
    }
}

#[test]
fn hough_finds_horizontal_line() {
    let mut img = canvas(200, 100);
    draw_row(&mut img, 40, 20, 179);
    let result = detect_segments(&img, &HoughOptions::new(1.0, 1.0, 50, 30, 2));
    assert_eq!(result.segments.len(), 1, "got {:?}", result.segments);
    let seg = &result.segments[0];
    assert_eq!(seg.p0[1], 40.0);
    assert_eq!(seg.p1[1], 40.0);
    let (lo, hi) = (seg.p0[0].min(seg.p1[0]), seg.p0[0].max(seg.p1[0]));
    assert_eq!((lo, hi), (20.0, 179.0));
}

#[test]
fn hough_finds_vertical_line() {
    let mut img = canvas(100, 200);
    draw_col(&mut img, 60, 10, 189);
    let result = detect_segments(&img, &HoughOptions::new(1.0, 1.0, 50, 30, 2));
    assert!(!result.segments.is_empty());
    let longest = result
        .segments
        .iter()
        .max_by(|a, b| a.length().total_cmp(&b.length()))
        .expect("segment");
    assert!(longest.length() >= 170.0, "length {}", longest.length());
    assert_eq!(longest.p0[0], 60.0);
    assert_eq!(longest.p1[0], 60.0);
}

#[test]
fn hough_bridges_small_gaps_only() {
    let mut img = canvas(300, 60);
    draw_row(&mut img, 30, 10, 99);
    draw_row(&mut img, 30, 102, 199);
    // 20 px hole: must split.
    draw_row(&mut img, 30, 220, 289);
    let result = detect_segments(&img, &HoughOptions::new(1.0, 1.0, 40, 30, 2));
    let spans: Vec<(f32, f32)> = result
        .segments
        .iter()
        .map(|s| (s.p0[0].min(s.p1[0]), s.p0[0].max(s.p1[0])))
        .collect();
    assert!(spans.iter().all(|&(lo, hi)| !(lo < 200.0 && hi > 220.0)), "spans {spans:?}");
    assert!(spans.iter().any(|&(lo, hi)| lo <= 10.0 && hi >= 199.0), "spans {spans:?}");
}

#[test]
fn hough_ignores_short_strokes() {
    let mut img = canvas(100, 100);
    draw_row(&mut img, 50, 10, 25);
    let result = detect_segments(&img, &HoughOptions::new(1.0, 1.0, 5, 30, 2));
    assert!(result.segments.is_empty(), "got {:?}", result.segments);
}

#[test]
fn hough_on_empty_image_is_empty() {
    let img = canvas(64, 64);
    assert!(detect_segments(&img, &HoughOptions::default()).segments.is_empty());
}

#[test]
fn seeded_runs_are_reproducible() {
    let mut img = canvas(160, 160);
    draw_row(&mut img, 20, 5, 150);
    draw_col(&mut img, 80, 5, 150);
    let opts = HoughOptions::new(1.0, 1.0, 40, 30, 2);
    let a = detect_segments(&img, &opts);
    let b = detect_segments(&img, &opts);
    assert_eq!(a.segments, b.segments);
}
