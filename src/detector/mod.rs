//! Transcript detector chaining deskew, table localization and carving.
//!
//! Overview
//! - [`crate::skew`] levels the page using the table's ruled rows.
//! - [`crate::table`] bounds the score table on the levelled page and recovers
//!   its row and column boundaries.
//! - [`crate::carve`] picks the template revision and cuts three score cells
//!   per subject.
//! - Optionally, [`crate::recognition`] reads each yearly cell through an
//!   injected digit classifier.
//!
//! Every stage reports failure as a [`DetectionError`]; a run either yields a
//! complete [`Transcript`] or names the stage that gave up.
//!
//! ```no_run
//! use transcript_grid::{DetectorParams, TranscriptDetector};
//!
//! # fn example(page: image::RgbImage) -> transcript_grid::Result<()> {
//! let detector = TranscriptDetector::new(DetectorParams::default());
//! let transcript = detector.process(&page)?;
//! for subject in &transcript.subjects {
//!     println!("{} {:?}", subject.name, subject.cells);
//! }
//! # Ok(())
//! # }
//! ```

pub mod params;

pub use params::DetectorParams;

use crate::carve::{carve_subjects, FormVariant, Subject};
use crate::diagnostics::{InputDescriptor, TimingBreakdown};
use crate::error::{DetectionError, Result};
use crate::recognition::{fill_scores, DigitClassifier};
use crate::skew::{correct_skew, SkewEstimate};
use crate::table::{locate_table, TableRegion};

use image::{GrayImage, RgbImage};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Everything recovered from one transcript page.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub input: InputDescriptor,
    /// Deskewed page.
    #[serde(skip)]
    pub page: RgbImage,
    /// Binary preview of the deskewed page.
    #[serde(skip)]
    pub preview: GrayImage,
    pub skew: SkewEstimate,
    pub table: TableRegion,
    pub form: FormVariant,
    pub subjects: Vec<Subject>,
    pub timings: TimingBreakdown,
}

/// Stateless detector; one instance can serve many pages concurrently.
#[derive(Clone, Debug, Default)]
pub struct TranscriptDetector {
    params: DetectorParams,
}

impl TranscriptDetector {
    pub fn new(params: DetectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Deskew the page, locate the table and carve the subject cells.
    pub fn process(&self, source: &RgbImage) -> Result<Transcript> {
        let total = Instant::now();
        let mut timings = TimingBreakdown::default();

        let t = Instant::now();
        let corrected = correct_skew(source, &self.params.skew)?;
        timings.record("skew", t);

        let t = Instant::now();
        let table = locate_table(&corrected.image, &self.params.table)?;
        timings.record("table", t);

        let t = Instant::now();
        let carving = carve_subjects(&table, &self.params.carve)?;
        timings.record("carve", t);

        timings.total_ms = total.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "transcript: {}x{} rotation_deg={:.3} form={:?} subjects={} total_ms={:.3}",
            source.width(),
            source.height(),
            corrected.estimate.rotation_deg,
            carving.form,
            carving.subjects.len(),
            timings.total_ms
        );
        Ok(Transcript {
            input: InputDescriptor {
                width: source.width(),
                height: source.height(),
            },
            page: corrected.image,
            preview: corrected.binary,
            skew: corrected.estimate,
            table,
            form: carving.form,
            subjects: carving.subjects,
            timings,
        })
    }

    /// [`process`](Self::process) followed by score reading on every subject.
    pub fn process_with_classifier<C>(&self, source: &RgbImage, classifier: &C) -> Result<Transcript>
    where
        C: DigitClassifier + ?Sized,
    {
        let mut transcript = self.process(source)?;
        let t = Instant::now();
        fill_scores(&mut transcript.subjects, classifier, &self.params.glyph)?;
        transcript.timings.record("recognition", t);
        Ok(transcript)
    }

    /// Process independent pages in parallel. Results keep the input order.
    pub fn process_batch(&self, sources: &[RgbImage]) -> Vec<Result<Transcript>> {
        sources.par_iter().map(|page| self.process(page)).collect()
    }
}

/// Stage that produced an error, for reporting.
pub fn failed_stage(err: &DetectionError) -> &'static str {
    match err {
        DetectionError::InsufficientLineDetection { stage, .. } => *stage,
        DetectionError::AmbiguousSkewReference { .. } => "skew",
        DetectionError::TableBoundaryNotFound { .. } => "table",
        DetectionError::DegenerateIntersection => "carve",
        DetectionError::EmptyGlyphRegion => "glyph",
        DetectionError::Classifier(_) => "recognition",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn blank_page_fails_in_skew() {
        let page = RgbImage::from_pixel(320, 240, Rgb([255, 255, 255]));
        let err = TranscriptDetector::default().process(&page).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::InsufficientLineDetection { stage: "skew", found: 0, .. }
        ));
        assert_eq!(failed_stage(&err), "skew");
    }

    #[test]
    fn batch_keeps_input_order() {
        let pages = vec![
            RgbImage::from_pixel(64, 64, Rgb([255, 255, 255])),
            RgbImage::from_pixel(80, 64, Rgb([255, 255, 255])),
        ];
        let results = TranscriptDetector::default().process_batch(&pages);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_err()));
    }
}
