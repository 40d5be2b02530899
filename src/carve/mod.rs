//! Per-subject score cells.
//!
//! Once the table is bounded, its row and column boundaries are intersected to
//! cut three cells per subject row: first semester, second semester and the
//! yearly average. Two template revisions exist; they are told apart by ink in
//! the name column of the last rows (see [`detect_form`]).

mod subject;

pub use subject::{FormVariant, Subject, SubjectName};

use crate::error::{DetectionError, Result};
use crate::image::{crop, ink_density, threshold_inv, Rect};
use crate::line::{Line, Point};
use crate::table::TableRegion;

use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveParams {
    /// The name-column probe runs only when the last two row gaps sum to
    /// less than this.
    pub form_gap_px: f32,
    pub probe_inset_x: i64,
    pub probe_inset_y: i64,
    pub probe_threshold: u8,
    /// Ink fraction above which the probe reports the new template.
    pub probe_min_density: f32,
    pub cell_inset_x: i64,
    pub cell_inset_y: i64,
}

impl Default for CarveParams {
    fn default() -> Self {
        Self {
            form_gap_px: 100.0,
            probe_inset_x: 10,
            probe_inset_y: 8,
            probe_threshold: 180,
            probe_min_density: 0.08,
            cell_inset_x: 4,
            cell_inset_y: 2,
        }
    }
}

/// Carved subjects and the template they were read with.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Carving {
    pub form: FormVariant,
    pub subjects: Vec<Subject>,
}

fn corner(a: &Line, b: &Line) -> Result<Point> {
    a.intersect_image(b).ok_or(DetectionError::DegenerateIntersection)
}

/// Rectangle spanned by two image-space corners, shrunk by the insets.
fn inset_rect(top_left: Point, bottom_right: Point, dx: i64, dy: i64) -> Option<Rect> {
    let x0 = top_left[0].round() as i64;
    let y0 = top_left[1].round() as i64;
    let x1 = bottom_right[0].round() as i64;
    let y1 = bottom_right[1].round() as i64;
    Rect::from_signed(x0 + dx, y0 + dy, x1 - x0 - 2 * dx, y1 - y0 - 2 * dy)
}

/// Decide the template revision.
///
/// The new template adds a fourth trailing subject with a short name row. When
/// the last two row gaps are tight, the name column between the third-last
/// and last row boundaries is inspected: enough ink there means the new
/// template.
pub fn detect_form(region: &TableRegion, params: &CarveParams) -> Result<FormVariant> {
    let rows = &region.rows;
    let n = rows.len();
    if n < 3 {
        return Err(DetectionError::boundary(format!(
            "form probe needs 3 row boundaries, table has {n}"
        )));
    }
    let first_column = region
        .columns
        .first()
        .ok_or_else(|| DetectionError::boundary("form probe needs a column boundary"))?;
    let ys = region.row_positions();
    if ys[n - 1] - ys[n - 3] >= params.form_gap_px {
        return Ok(FormVariant::Old);
    }

    let left_edge = Line::vertical(0.0, 0.0, (region.image.height().max(2) - 1) as f32);
    let top_left = corner(&rows[n - 3], &left_edge)?;
    let bottom_right = corner(&rows[n - 1], first_column)?;
    let rect = inset_rect(top_left, bottom_right, params.probe_inset_x, params.probe_inset_y)
        .ok_or_else(|| DetectionError::boundary("form probe rectangle is empty"))?;
    let probe = crop(&region.image, rect)
        .ok_or_else(|| DetectionError::boundary("form probe falls outside the table"))?;
    let density = ink_density(&threshold_inv(&probe, params.probe_threshold));
    debug!("form probe {:?}: density={:.4}", rect, density);
    Ok(if density > params.probe_min_density {
        FormVariant::New
    } else {
        FormVariant::Old
    })
}

/// Cut the semester and yearly cells of every subject row.
pub fn carve_subjects(region: &TableRegion, params: &CarveParams) -> Result<Carving> {
    let form = detect_form(region, params)?;
    let names = form.subjects();
    if region.rows.len() < names.len() + 1 {
        return Err(DetectionError::boundary(format!(
            "{:?} template needs {} row boundaries, table has {}",
            form,
            names.len() + 1,
            region.rows.len()
        )));
    }
    if region.columns.len() < 4 {
        return Err(DetectionError::boundary(format!(
            "need 4 column boundaries, table has {}",
            region.columns.len()
        )));
    }

    let mut subjects = Vec::with_capacity(names.len());
    for (i, &name) in names.iter().enumerate() {
        let (upper, lower) = (&region.rows[i], &region.rows[i + 1]);
        let mut cells = [Rect::default(); 3];
        let mut images = Vec::with_capacity(3);
        for (k, cell) in cells.iter_mut().enumerate() {
            let top_left = corner(upper, &region.columns[k])?;
            let bottom_right = corner(lower, &region.columns[k + 1])?;
            let rect = inset_rect(top_left, bottom_right, params.cell_inset_x, params.cell_inset_y)
                .ok_or_else(|| DetectionError::boundary(format!("{name} cell {k} is empty")))?;
            let image = crop(&region.image, rect)
                .ok_or_else(|| DetectionError::boundary(format!("{name} cell {k} falls outside the table")))?;
            *cell = rect;
            images.push(image);
        }
        let mut images = images.into_iter();
        let (Some(semester1), Some(semester2), Some(yearly)) = (images.next(), images.next(), images.next()) else {
            return Err(DetectionError::boundary(format!("{name} row lost a cell")));
        };
        subjects.push(Subject {
            name,
            row: i + 1,
            score: 0.0,
            cells,
            semester1,
            semester2,
            yearly,
        });
    }
    debug!("carved {} subjects ({:?} template)", subjects.len(), form);
    Ok(Carving { form, subjects })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Blank white region with evenly spaced boundaries and optional ink in
    /// the name column of the last two rows.
    fn region(row_ys: &[f32], inked_tail: bool) -> TableRegion {
        let columns = [300.0, 450.0, 600.0, 750.0];
        let height = (row_ys[row_ys.len() - 1] + 4.0) as u32;
        let mut image = GrayImage::from_pixel(760, height, Luma([255]));
        if inked_tail {
            let y0 = row_ys[row_ys.len() - 3] as u32 + 10;
            let y1 = row_ys[row_ys.len() - 1] as u32 - 10;
            for y in y0..y1 {
                for x in 20..280 {
                    if (x / 3 + y / 3) % 3 == 0 {
                        image.put_pixel(x, y, Luma([0]));
                    }
                }
            }
        }
        TableRegion::from_positions(Rect::new(0, 0, 760, height), image, row_ys, &columns)
    }

    fn rows(tail_gap: f32, count: usize) -> Vec<f32> {
        let mut ys: Vec<f32> = (0..count - 2).map(|i| 3.0 + 50.0 * i as f32).collect();
        let last = ys[ys.len() - 1];
        ys.push(last + tail_gap);
        ys.push(last + 2.0 * tail_gap);
        ys
    }

    #[test]
    fn wide_tail_is_old_form_without_probing() {
        let region = region(&rows(50.0, 14), false);
        assert_eq!(detect_form(&region, &CarveParams::default()).expect("form"), FormVariant::Old);
    }

    #[test]
    fn inked_tight_tail_is_new_form() {
        let region = region(&rows(40.0, 14), true);
        assert_eq!(detect_form(&region, &CarveParams::default()).expect("form"), FormVariant::New);
    }

    #[test]
    fn blank_tight_tail_is_old_form() {
        let region = region(&rows(40.0, 14), false);
        assert_eq!(detect_form(&region, &CarveParams::default()).expect("form"), FormVariant::Old);
    }

    #[test]
    fn too_few_rows_is_an_error() {
        let region = region(&[3.0, 53.0, 103.0], false);
        let mut short = region.clone();
        short.rows.truncate(2);
        assert!(matches!(
            detect_form(&short, &CarveParams::default()),
            Err(DetectionError::TableBoundaryNotFound { .. })
        ));
    }

    #[test]
    fn old_form_cells_follow_the_grid() {
        let region = region(&rows(50.0, 14), false);
        let carving = carve_subjects(&region, &CarveParams::default()).expect("carving");
        assert_eq!(carving.form, FormVariant::Old);
        assert_eq!(carving.subjects.len(), 12);
        assert_eq!(carving.subjects[0].name, SubjectName::Math);
        assert_eq!(carving.subjects[11].name, SubjectName::PhysicalEducation);
        let math = &carving.subjects[0];
        assert_eq!(math.cells[0], Rect::new(304, 5, 142, 46));
        assert_eq!(math.cells[1], Rect::new(454, 5, 142, 46));
        assert_eq!(math.cells[2], Rect::new(604, 5, 142, 46));
        assert_eq!(math.yearly.dimensions(), (142, 46));
        let english = &carving.subjects[8];
        assert_eq!(english.name, SubjectName::English);
        assert_eq!(english.cells[0].y, 3 + 8 * 50 + 2);
    }

    #[test]
    fn new_form_needs_fourteen_boundaries() {
        let region = region(&rows(40.0, 13), true);
        assert!(matches!(
            carve_subjects(&region, &CarveParams::default()),
            Err(DetectionError::TableBoundaryNotFound { .. })
        ));
        let region = self::region(&rows(40.0, 14), true);
        let carving = carve_subjects(&region, &CarveParams::default()).expect("carving");
        assert_eq!(carving.form, FormVariant::New);
        assert_eq!(carving.subjects.len(), 13);
        assert_eq!(carving.subjects[9].name, SubjectName::CivicEducation);
    }
}
