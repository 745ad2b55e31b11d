//! LOS profile alignment and decimation.
//!
//! The backend samples the terrain profile, earth curvature, Fresnel zone
//! boundaries and the obstruction reference line in independent passes, so
//! the series can disagree with the distance axis by a few samples.
//! [`ProfileAligner`] estimates one integer shift per series, crops every
//! series to the positions they all cover and decimates the result to a
//! point budget without losing either endpoint.
//!
//! - [`array`] - Index range arithmetic shared by the steps below
//! - [`shift`] - Boundary-matching shift search
//! - [`decimate`] - Uniform-stride index selection
//! - [`aligner`] - The full pipeline and its output bundle

pub mod aligner;
pub mod array;
pub mod decimate;
pub mod error;
pub mod shift;

use serde::{Deserialize, Serialize};

pub use aligner::{AlignConfig, AlignedBundle, ProfileAligner};
pub use error::AlignError;

/// A named numeric sequence sampled along the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSeries {
    /// Series name, e.g. `"profile"` or `"fresnel_pt_6"`.
    pub name: String,
    /// Samples in path order.
    pub values: Vec<f64>,
    /// Translation relative to the reference axis: sample `j` of this series
    /// sits at reference index `j + shift`. Zero until aligned.
    #[serde(default)]
    pub shift: isize,
}

impl ProfileSeries {
    /// Creates an unaligned series.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            shift: 0,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
