//! Raw LOS result returned by the backend's result endpoint.

use serde::{Deserialize, Serialize};

use crate::profile::ProfileSeries;

/// Name of the distance axis series.
pub const DISTANCE: &str = "distance";

/// Canonical order of the auxiliary series in an LOS response.
pub const AUXILIARY_SERIES: [&str; 5] = ["profile", "curvature", "fresnel", "fresnel_pt_6", "reference"];

/// Terrain obstruction summary for the direct path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathReport {
    pub obstructed: bool,
    #[serde(default)]
    pub message: String,
    /// Obstruction points as reported by SPLAT! (lat, lon, distance, height...).
    #[serde(default)]
    pub obstructions: Vec<Vec<f64>>,
}

/// Obstruction summary for a Fresnel zone boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneReport {
    pub obstructed: bool,
    #[serde(default)]
    pub message: String,
}

/// Obstruction and link-budget metadata that accompanies the profile arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LosReport {
    /// Path length in kilometres.
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub path: PathReport,
    #[serde(default)]
    pub first_fresnel: ZoneReport,
    #[serde(default)]
    pub fresnel_60: ZoneReport,
    #[serde(default)]
    pub rx_signal_power: Option<f64>,
    #[serde(default)]
    pub rx_signal_power_optimized: Option<f64>,
    #[serde(default)]
    pub path_loss: Option<f64>,
    #[serde(default)]
    pub path_loss_rssi: Option<f64>,
    #[serde(default)]
    pub lr_it_loss_line_type: Option<String>,
    #[serde(default)]
    pub lr_it_loss: Option<f64>,
    #[serde(default)]
    pub lr_it_loss_rssi: Option<f64>,
}

/// The full LOS response: parallel profile arrays plus metadata.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LosResponse {
    pub distance: Vec<f64>,
    #[serde(default)]
    pub profile: Vec<f64>,
    #[serde(default)]
    pub curvature: Vec<f64>,
    #[serde(default)]
    pub fresnel: Vec<f64>,
    #[serde(default)]
    pub fresnel_pt_6: Vec<f64>,
    #[serde(default)]
    pub reference: Vec<f64>,
    #[serde(flatten)]
    pub report: LosReport,
}

impl LosResponse {
    /// Splits the response into the distance reference, the auxiliary series
    /// in [`AUXILIARY_SERIES`] order, and the metadata.
    pub fn into_series(self) -> (ProfileSeries, Vec<ProfileSeries>, LosReport) {
        let reference = ProfileSeries::new(DISTANCE, self.distance);
        let auxiliary = vec![
            ProfileSeries::new("profile", self.profile),
            ProfileSeries::new("curvature", self.curvature),
            ProfileSeries::new("fresnel", self.fresnel),
            ProfileSeries::new("fresnel_pt_6", self.fresnel_pt_6),
            ProfileSeries::new("reference", self.reference),
        ];
        (reference, auxiliary, self.report)
    }
}
