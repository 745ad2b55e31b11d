//! Uniform-stride decimation that always keeps both endpoints.

/// Indices to keep when reducing `n` samples to at most `max_points`.
///
/// Returns every index when `n <= max_points`. Otherwise the targets
/// `round(k * (n - 1) / (max_points - 1))` for `k in 0..max_points` are
/// collected without duplicates, `0` and `n - 1` are forced in, and the list
/// is cut back to `max_points` by dropping interior indices from the tail so
/// that `n - 1` survives.
///
/// ```
/// use rfplan::profile::decimate::decimation_indices;
///
/// assert_eq!(decimation_indices(5, 10), vec![0, 1, 2, 3, 4]);
/// assert_eq!(decimation_indices(9, 5), vec![0, 2, 4, 6, 8]);
/// ```
pub fn decimation_indices(n: usize, max_points: usize) -> Vec<usize> {
    if n <= max_points {
        return (0..n).collect();
    }
    let max_points = max_points.max(2);
    let last = n - 1;
    let stride = last as f64 / (max_points - 1) as f64;

    let mut indices: Vec<usize> = Vec::with_capacity(max_points + 2);
    for k in 0..max_points {
        let idx = ((k as f64 * stride).round() as usize).min(last);
        if indices.last() != Some(&idx) {
            indices.push(idx);
        }
    }

    if indices.first() != Some(&0) {
        indices.insert(0, 0);
    }
    if indices.last() != Some(&last) {
        indices.push(last);
    }
    if indices.len() > max_points {
        indices.truncate(max_points - 1);
        indices.push(last);
    }

    indices
}

/// Applies an index set produced by [`decimation_indices`] to one series.
pub fn decimate(values: &[f64], indices: &[usize]) -> Vec<f64> {
    super::array::take(values, indices)
}
