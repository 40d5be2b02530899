//! Score reading on top of an injected digit classifier.
//!
//! The crate does not ship a classifier. Callers plug one in through
//! [`DigitClassifier`]; [`GlyphTrainer`] is the matching seam for building
//! one from labeled glyphs cut with [`labeled_glyphs`].

use crate::carve::Subject;
use crate::error::{DetectionError, Result};
use crate::glyph::{binarize_cell, glyph_pair, GlyphParams};

use image::GrayImage;
use log::debug;
use rayon::prelude::*;

/// Maps a canvas-sized binary glyph to a digit `0..=9`.
pub trait DigitClassifier: Sync {
    fn classify(&self, glyph: &GrayImage) -> std::result::Result<u8, String>;
}

/// Glyph with its ground-truth digit.
#[derive(Clone, Debug)]
pub struct LabeledGlyph {
    pub image: GrayImage,
    pub digit: u8,
}

/// Builds a classifier from labeled glyphs.
pub trait GlyphTrainer {
    type Model: DigitClassifier;

    fn train(&mut self, samples: &[LabeledGlyph]) -> std::result::Result<Self::Model, String>;
}

impl<F> DigitClassifier for F
where
    F: Fn(&GrayImage) -> std::result::Result<u8, String> + Sync,
{
    fn classify(&self, glyph: &GrayImage) -> std::result::Result<u8, String> {
        self(glyph)
    }
}

fn classify_digit<C: DigitClassifier + ?Sized>(classifier: &C, glyph: &GrayImage) -> Result<u8> {
    let digit = classifier.classify(glyph).map_err(DetectionError::Classifier)?;
    if digit > 9 {
        return Err(DetectionError::Classifier(format!("digit {digit} out of range")));
    }
    Ok(digit)
}

/// Read a raw grayscale cell as `tens + units / 10`. Blank cells read as
/// `None`.
pub fn read_score<C: DigitClassifier + ?Sized>(cell: &GrayImage, classifier: &C, params: &GlyphParams) -> Result<Option<f32>> {
    let binary = binarize_cell(cell, params);
    let [tens, units] = match glyph_pair(&binary, params) {
        Ok(pair) => pair,
        Err(DetectionError::EmptyGlyphRegion) => return Ok(None),
        Err(err) => return Err(err),
    };
    let tens = classify_digit(classifier, &tens.image)?;
    let units = classify_digit(classifier, &units.image)?;
    Ok(Some(tens as f32 + units as f32 / 10.0))
}

/// Fill every subject's score from its yearly cell, in parallel. Blank cells
/// keep the placeholder score.
pub fn fill_scores<C: DigitClassifier + ?Sized>(subjects: &mut [Subject], classifier: &C, params: &GlyphParams) -> Result<()> {
    subjects.par_iter_mut().try_for_each(|subject| {
        if let Some(score) = read_score(&subject.yearly, classifier, params)? {
            subject.score = score;
        }
        debug!("{}: score={}", subject.name, subject.score);
        Ok(())
    })
}

/// Cut the two glyphs of a raw cell and label them, for training data.
pub fn labeled_glyphs(cell: &GrayImage, digits: [u8; 2], params: &GlyphParams) -> Result<Vec<LabeledGlyph>> {
    let binary = binarize_cell(cell, params);
    let glyphs = glyph_pair(&binary, params)?;
    Ok(glyphs
        .into_iter()
        .zip(digits)
        .map(|(glyph, digit)| LabeledGlyph {
            image: glyph.image,
            digit,
        })
        .collect())
}
