//! Error type shared by every pipeline stage.

use thiserror::Error;

/// Failures surfaced by the detection pipeline.
///
/// Every stage reports its own failure explicitly; nothing falls back to a
/// default rectangle or a zero rotation silently.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// Hough extraction returned fewer lines than a stage needs.
    #[error("{stage}: found {found} lines, need at least {minimum}")]
    InsufficientLineDetection {
        stage: &'static str,
        found: usize,
        minimum: usize,
    },
    /// No trustworthy baseline could be picked for deskewing.
    #[error("ambiguous skew reference: {reason}")]
    AmbiguousSkewReference { reason: String },
    /// The table region could not be bounded.
    #[error("table boundary not found: {reason}")]
    TableBoundaryNotFound { reason: String },
    /// Two lines expected to cross are parallel.
    #[error("lines do not intersect")]
    DegenerateIntersection,
    /// A score cell carries no ink in its interior.
    #[error("glyph region is empty")]
    EmptyGlyphRegion,
    /// The injected digit classifier failed.
    #[error("digit classifier failed: {0}")]
    Classifier(String),
}

impl DetectionError {
    pub(crate) fn boundary(reason: impl Into<String>) -> Self {
        Self::TableBoundaryNotFound {
            reason: reason.into(),
        }
    }

    pub(crate) fn skew(reason: impl Into<String>) -> Self {
        Self::AmbiguousSkewReference {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_stage() {
        let err = DetectionError::InsufficientLineDetection {
            stage: "skew",
            found: 1,
            minimum: 2,
        };
        assert_eq!(err.to_string(), "skew: found 1 lines, need at least 2");
        let err = DetectionError::boundary("no content columns");
        assert!(err.to_string().contains("no content columns"));
    }
}
