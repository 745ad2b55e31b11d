//! Shift estimation, common-overlap cropping and decimation in one pass.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::array::{intersect, shifted_range, to_aux_range, MIN_OVERLAP};
use super::decimate::{decimate, decimation_indices};
use super::shift::estimate_shift;
use super::{AlignError, ProfileSeries};
use crate::constants::{DEFAULT_MAX_POINTS, DEFAULT_MAX_SKEW};

/// Alignment parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Largest shift, in samples, searched in either direction.
    pub max_skew: usize,
    /// Upper bound on the length of every output series. At least 2.
    pub max_points: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            max_skew: DEFAULT_MAX_SKEW,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl AlignConfig {
    /// Sets the skew search bound.
    pub fn with_max_skew(mut self, max_skew: usize) -> Self {
        self.max_skew = max_skew;
        self
    }

    /// Sets the point budget.
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    /// Rejects a point budget below two, which could not hold both endpoints.
    pub fn validate(&self) -> Result<(), AlignError> {
        if self.max_points < MIN_OVERLAP {
            return Err(AlignError::InvalidConfig(format!(
                "max_points must be at least {MIN_OVERLAP}, got {}",
                self.max_points
            )));
        }
        Ok(())
    }
}

/// Output of alignment: every series has the same length and position `k`
/// of each series refers to the same point along the path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedBundle {
    reference: ProfileSeries,
    series: Vec<ProfileSeries>,
    overlap: Range<usize>,
}

impl AlignedBundle {
    /// Common length of every series in the bundle.
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    /// Returns `true` if the bundle holds no samples.
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// The cropped (and possibly decimated) reference axis.
    pub fn reference(&self) -> &ProfileSeries {
        &self.reference
    }

    /// Auxiliary series, in input order, each carrying its chosen shift.
    pub fn series(&self) -> &[ProfileSeries] {
        &self.series
    }

    /// Looks a series up by name, reference included.
    pub fn get(&self, name: &str) -> Option<&ProfileSeries> {
        std::iter::once(&self.reference)
            .chain(self.series.iter())
            .find(|s| s.name == name)
    }

    /// Reference indices of the common overlap, before decimation.
    pub fn overlap(&self) -> Range<usize> {
        self.overlap.clone()
    }

    /// Consumes the bundle, returning the reference and auxiliary series.
    pub fn into_parts(self) -> (ProfileSeries, Vec<ProfileSeries>) {
        (self.reference, self.series)
    }

    fn apply_indices(self, indices: &[usize]) -> Self {
        let keep = |s: ProfileSeries| ProfileSeries {
            values: decimate(&s.values, indices),
            ..s
        };
        Self {
            reference: keep(self.reference),
            series: self.series.into_iter().map(keep).collect(),
            overlap: self.overlap,
        }
    }
}

/// Aligns auxiliary profile series to a reference axis and bounds their length.
///
/// The aligner is stateless apart from its configuration and can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct ProfileAligner {
    config: AlignConfig,
}

impl ProfileAligner {
    /// Creates an aligner with the given configuration.
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Estimates a shift for every auxiliary series, crops all series to
    /// the common overlap and decimates the result to `max_points`.
    ///
    /// # Errors
    ///
    /// - [`AlignError::InvalidConfig`] if `max_points < 2`.
    /// - [`AlignError::InsufficientOverlap`] if the reference is shorter than
    ///   two samples, an auxiliary series admits no shift, or the shifted
    ///   ranges share fewer than two reference positions.
    /// - [`AlignError::LengthMismatch`] if cropping yields unequal lengths.
    pub fn process(
        &self,
        reference: ProfileSeries,
        auxiliary: Vec<ProfileSeries>,
    ) -> Result<AlignedBundle, AlignError> {
        self.config.validate()?;

        let ref_len = reference.len();
        if ref_len < MIN_OVERLAP {
            return Err(AlignError::InsufficientOverlap {
                series: Some(reference.name),
                available: ref_len,
            });
        }

        let mut shifts = Vec::with_capacity(auxiliary.len());
        let mut overlap = 0..ref_len;
        for aux in &auxiliary {
            let estimate = estimate_shift(&reference.values, &aux.values, self.config.max_skew)
                .ok_or_else(|| AlignError::InsufficientOverlap {
                    series: Some(aux.name.clone()),
                    available: aux.len().min(ref_len),
                })?;
            tracing::debug!(
                series = %aux.name,
                shift = estimate.shift,
                score = estimate.score,
                "estimated series shift"
            );
            overlap = intersect(&overlap, &shifted_range(ref_len, aux.len(), estimate.shift));
            shifts.push(estimate.shift);
        }

        if overlap.len() < MIN_OVERLAP {
            return Err(AlignError::InsufficientOverlap {
                series: None,
                available: overlap.len(),
            });
        }

        let bundle = crop(reference, auxiliary, &shifts, overlap)?;
        Ok(self.decimate(bundle))
    }

    /// Reduces a bundle to at most `max_points` samples per series.
    ///
    /// A bundle already within budget is returned unchanged.
    pub fn decimate(&self, bundle: AlignedBundle) -> AlignedBundle {
        let n = bundle.len();
        if n <= self.config.max_points {
            return bundle;
        }
        let indices = decimation_indices(n, self.config.max_points);
        tracing::debug!(from = n, to = indices.len(), "decimated profile bundle");
        bundle.apply_indices(&indices)
    }
}

fn crop(
    reference: ProfileSeries,
    auxiliary: Vec<ProfileSeries>,
    shifts: &[isize],
    overlap: Range<usize>,
) -> Result<AlignedBundle, AlignError> {
    let expected = overlap.len();
    let reference = ProfileSeries {
        values: reference.values[overlap.clone()].to_vec(),
        ..reference
    };

    let mut series = Vec::with_capacity(auxiliary.len());
    for (aux, &shift) in auxiliary.into_iter().zip(shifts) {
        let range = to_aux_range(&overlap, shift);
        let cropped = ProfileSeries {
            values: aux.values[range].to_vec(),
            shift,
            ..aux
        };
        let actual = cropped.len();
        if actual != expected {
            return Err(AlignError::LengthMismatch {
                series: cropped.name,
                expected,
                actual,
            });
        }
        series.push(cropped);
    }

    Ok(AlignedBundle {
        reference,
        series,
        overlap,
    })
}
