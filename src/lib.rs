#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod carve;
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod line;
pub mod recognition;

// Stage internals – public for tools and tests.
pub mod angle;
pub mod cluster;
pub mod glyph;
pub mod segments;
pub mod skew;
pub mod table;

// --- High-level re-exports -------------------------------------------------

pub use crate::carve::{FormVariant, Subject, SubjectName};
pub use crate::detector::{DetectorParams, Transcript, TranscriptDetector};
pub use crate::error::{DetectionError, Result};
pub use crate::line::Line;
pub use crate::recognition::{DigitClassifier, GlyphTrainer, LabeledGlyph};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use transcript_grid::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let page = image::open("transcript.jpg")?.into_rgb8();
/// let detector = TranscriptDetector::new(DetectorParams::default());
/// let transcript = detector.process(&page)?;
/// println!(
///     "form={:?} subjects={} rotation_deg={:.2}",
///     transcript.form,
///     transcript.subjects.len(),
///     transcript.skew.rotation_deg
/// );
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::{DetectionError, DetectorParams, Transcript, TranscriptDetector};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::carve::{carve_subjects, detect_form, CarveParams, Carving};
    pub use crate::glyph::{binarize_cell, segment_glyphs, Glyph, GlyphParams};
    pub use crate::recognition::{fill_scores, read_score};
    pub use crate::skew::{correct_skew, estimate_skew, estimate_skew_gray, SkewCorrection, SkewEstimate, SkewParams};
    pub use crate::table::{locate_table, TableParams, TableRegion};
}
