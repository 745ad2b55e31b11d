//! Per-series skew estimation by boundary matching.
//!
//! For every candidate shift in `[-max_skew, +max_skew]` the reference and
//! the translated auxiliary series are compared at the first and last
//! sample they share. This is a boundary heuristic, not a cross-correlation.

use std::ops::Range;

use super::array::{boundary_mismatch, shifted_range, MIN_OVERLAP};

/// Winning candidate of a shift search.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftEstimate {
    /// Translation applied to the auxiliary series.
    pub shift: isize,
    /// Boundary mismatch at this shift (lower is better).
    pub score: f64,
    /// Reference indices shared at this shift.
    pub overlap: Range<usize>,
}

/// Finds the shift in `[-max_skew, max_skew]` that best matches the
/// endpoints of `aux` to those of `reference`.
///
/// Candidates sharing fewer than two samples are skipped, and the search
/// window is clamped to shifts that can still overlap. Ties keep the
/// earliest candidate examined, which is the most negative shift. Returns
/// `None` when no candidate has enough overlap.
///
/// ```
/// use rfplan::profile::shift::estimate_shift;
///
/// let reference: Vec<f64> = (0..20).map(f64::from).collect();
/// // aux[j] == reference[j + 2]
/// let aux: Vec<f64> = (2..20).map(f64::from).collect();
/// assert_eq!(estimate_shift(&reference, &aux, 5).unwrap().shift, 2);
/// ```
pub fn estimate_shift(reference: &[f64], aux: &[f64], max_skew: usize) -> Option<ShiftEstimate> {
    // |shift| >= max(ref_len, aux_len) never leaves two shared samples.
    let reach = reference.len().max(aux.len());
    let bound = isize::try_from(max_skew.min(reach)).unwrap_or(isize::MAX);
    let mut best: Option<ShiftEstimate> = None;

    for shift in -bound..=bound {
        let overlap = shifted_range(reference.len(), aux.len(), shift);
        if overlap.len() < MIN_OVERLAP {
            continue;
        }

        let score = boundary_mismatch(reference, aux, &overlap, shift);
        let better = match &best {
            Some(current) => score < current.score,
            None => true,
        };
        if better {
            best = Some(ShiftEstimate {
                shift,
                score,
                overlap,
            });
        }
    }

    best
}
