//! Alignment errors.

use super::array::MIN_OVERLAP;

/// Errors produced by [`ProfileAligner::process`](super::ProfileAligner::process).
///
/// Alignment either succeeds completely or returns one of these; no partial
/// bundle is ever produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlignError {
    /// The shifted series share fewer than two reference positions.
    #[error(
        "insufficient overlap{}: {available} common samples, need at least {}",
        .series.as_ref().map(|s| format!(" for {s}")).unwrap_or_default(),
        MIN_OVERLAP
    )]
    InsufficientOverlap {
        /// The series that could not be placed, when a single one is at fault.
        series: Option<String>,
        /// Number of common reference positions found.
        available: usize,
    },

    /// Cropped series disagree in length. This indicates a defect in the
    /// cropping arithmetic, not bad input.
    #[error("length mismatch after crop: {series} has {actual} samples, expected {expected}")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    /// The alignment configuration cannot produce a valid bundle.
    #[error("invalid alignment config: {0}")]
    InvalidConfig(String),
}
