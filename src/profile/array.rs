//! Index arithmetic over co-indexed `f64` series.
//!
//! Shifts follow one convention throughout the crate: auxiliary sample `j`
//! sits at reference index `j + shift`. A positive shift therefore moves the
//! auxiliary series to the right of the reference.

use std::ops::Range;

/// Minimum number of samples two series must share to be compared.
pub const MIN_OVERLAP: usize = 2;

/// Reference-index range covered by an auxiliary series of `aux_len`
/// samples translated by `shift`, clipped to `0..ref_len`.
///
/// The returned range is empty when the two series do not meet.
///
/// ```
/// use rfplan::profile::array::shifted_range;
///
/// assert_eq!(shifted_range(10, 10, 0), 0..10);
/// assert_eq!(shifted_range(10, 10, 3), 3..10);
/// assert_eq!(shifted_range(10, 10, -3), 0..7);
/// assert!(shifted_range(4, 4, 9).is_empty());
/// ```
pub fn shifted_range(ref_len: usize, aux_len: usize, shift: isize) -> Range<usize> {
    let lo = shift.max(0).unsigned_abs();
    let hi = (aux_len as isize)
        .saturating_add(shift)
        .clamp(0, ref_len as isize)
        .unsigned_abs();
    lo..hi.max(lo)
}

/// Intersection of two index ranges. Empty when they are disjoint.
pub fn intersect(a: &Range<usize>, b: &Range<usize>) -> Range<usize> {
    let lo = a.start.max(b.start);
    let hi = a.end.min(b.end);
    lo..hi.max(lo)
}

/// Translates a reference-index range into the auxiliary series' own
/// indices for the given shift.
///
/// The caller guarantees `range` lies inside [`shifted_range`] for the same
/// shift, so both bounds stay non-negative.
pub fn to_aux_range(range: &Range<usize>, shift: isize) -> Range<usize> {
    let start = (range.start as isize - shift).unsigned_abs();
    let end = (range.end as isize - shift).unsigned_abs();
    start..end
}

/// Sum of absolute differences at the first and last sample of `overlap`.
///
/// NaN differences score as `f64::INFINITY` so that they never beat a
/// finite candidate.
pub fn boundary_mismatch(reference: &[f64], aux: &[f64], overlap: &Range<usize>, shift: isize) -> f64 {
    let aux_range = to_aux_range(overlap, shift);
    let first = (reference[overlap.start] - aux[aux_range.start]).abs();
    let last = (reference[overlap.end - 1] - aux[aux_range.end - 1]).abs();
    let score = first + last;
    if score.is_nan() {
        f64::INFINITY
    } else {
        score
    }
}

/// Gathers `values[i]` for every index in `indices`, in order.
pub fn take(values: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| values[i]).collect()
}
