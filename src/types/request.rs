//! Simulation request payloads.
//!
//! [`LosPredictionRequest`] mirrors the backend's point-to-point model,
//! including its defaults and accepted ranges. Anything else (coverage
//! runs, experimental parameters) can be submitted as a [`RawPayload`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{COVERAGE_SUBMIT_PATH, LOS_SUBMIT_PATH};

/// Errors reported by [`SimulationPayload::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// A numeric field is outside the range accepted by the backend.
    #[error("{field} = {value} is out of range ({expected})")]
    OutOfRange {
        /// The offending field name, as it appears on the wire.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// The payload could not be serialized to JSON.
    #[error("failed to serialize request: {0}")]
    Serialization(String),
}

/// Which backend job a payload starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationKind {
    /// Point-to-point line-of-sight profile.
    Los,
    /// Area coverage raster.
    Coverage,
}

impl SimulationKind {
    /// Default submit path for this kind of job.
    pub fn submit_path(&self) -> &'static str {
        match self {
            Self::Los => LOS_SUBMIT_PATH,
            Self::Coverage => COVERAGE_SUBMIT_PATH,
        }
    }
}

/// A request body the orchestrator can submit.
pub trait SimulationPayload: Serialize {
    /// The kind of job this payload starts.
    fn kind(&self) -> SimulationKind;

    /// Checks the payload before it is sent.
    fn validate(&self) -> Result<(), RequestError> {
        Ok(())
    }

    /// Serializes the payload into the immutable JSON body stored on the task.
    fn to_body(&self) -> Result<Value, RequestError> {
        serde_json::to_value(self).map_err(|e| RequestError::Serialization(e.to_string()))
    }
}

/// An arbitrary JSON body, submitted without client-side validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPayload {
    /// Target job kind.
    #[serde(skip)]
    pub kind: Option<SimulationKind>,
    /// The JSON body sent verbatim.
    #[serde(flatten)]
    pub body: serde_json::Map<String, Value>,
}

impl RawPayload {
    /// Wraps a JSON object body for the given job kind.
    pub fn new(kind: SimulationKind, body: serde_json::Map<String, Value>) -> Self {
        Self {
            kind: Some(kind),
            body,
        }
    }
}

impl SimulationPayload for RawPayload {
    fn kind(&self) -> SimulationKind {
        self.kind.unwrap_or(SimulationKind::Coverage)
    }
}

/// Radio climate used by the Longley-Rice / ITWOM model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioClimate {
    Equatorial,
    ContinentalSubtropical,
    MaritimeSubtropical,
    Desert,
    #[default]
    ContinentalTemperate,
    MaritimeTemperateLand,
    MaritimeTemperateSea,
}

/// Antenna polarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarization {
    Horizontal,
    #[default]
    Vertical,
}

/// Point-to-point LOS prediction request.
///
/// Coordinates and `tx_power` are required; every other field falls back to
/// the backend default when omitted from JSON.
///
/// # Examples
///
/// ```
/// use rfplan::{LosPredictionRequest, SimulationPayload};
///
/// let request: LosPredictionRequest = serde_json::from_str(
///     r#"{"tx_lat": 45.85, "tx_lon": 13.72, "tx_power": 0.1,
///         "rx_lat": 45.70, "rx_lon": 13.90}"#,
/// )
/// .unwrap();
/// assert_eq!(request.frequency_mhz, 868.5);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LosPredictionRequest {
    // Transmitter
    pub tx_lat: f64,
    pub tx_lon: f64,
    #[serde(default = "default_height")]
    pub tx_height: f64,
    pub tx_power: f64,
    #[serde(default = "default_gain")]
    pub tx_gain: f64,
    #[serde(default)]
    pub tx_loss: f64,
    #[serde(default = "default_frequency")]
    pub frequency_mhz: f64,

    // Receiver
    pub rx_lat: f64,
    pub rx_lon: f64,
    #[serde(default = "default_height")]
    pub rx_height: f64,
    #[serde(default = "default_gain")]
    pub rx_gain: f64,
    #[serde(default)]
    pub rx_loss: f64,

    // Environment
    #[serde(default = "default_dielectric")]
    pub ground_dielectric: f64,
    #[serde(default = "default_conductivity")]
    pub ground_conductivity: f64,
    #[serde(default = "default_bending")]
    pub atmosphere_bending: f64,
    #[serde(default)]
    pub radio_climate: RadioClimate,
    #[serde(default)]
    pub polarization: Polarization,
    #[serde(default)]
    pub clutter_height: f64,

    // Simulation options
    #[serde(default = "default_situation_fraction")]
    pub situation_fraction: f64,
    #[serde(default = "default_time_fraction")]
    pub time_fraction: f64,
    #[serde(default)]
    pub high_resolution: bool,
    #[serde(default = "default_itm_model")]
    pub itm_model: bool,
}

fn default_height() -> f64 {
    1.0
}

fn default_gain() -> f64 {
    1.0
}

fn default_frequency() -> f64 {
    868.5
}

fn default_dielectric() -> f64 {
    15.0
}

fn default_conductivity() -> f64 {
    0.005
}

fn default_bending() -> f64 {
    301.0
}

fn default_situation_fraction() -> f64 {
    50.0
}

fn default_time_fraction() -> f64 {
    90.0
}

fn default_itm_model() -> bool {
    true
}

impl LosPredictionRequest {
    /// A request between two points with every optional field at its default.
    pub fn between(tx: (f64, f64), rx: (f64, f64), tx_power: f64) -> Self {
        Self {
            tx_lat: tx.0,
            tx_lon: tx.1,
            tx_height: default_height(),
            tx_power,
            tx_gain: default_gain(),
            tx_loss: 0.0,
            frequency_mhz: default_frequency(),
            rx_lat: rx.0,
            rx_lon: rx.1,
            rx_height: default_height(),
            rx_gain: default_gain(),
            rx_loss: 0.0,
            ground_dielectric: default_dielectric(),
            ground_conductivity: default_conductivity(),
            atmosphere_bending: default_bending(),
            radio_climate: RadioClimate::default(),
            polarization: Polarization::default(),
            clutter_height: 0.0,
            situation_fraction: default_situation_fraction(),
            time_fraction: default_time_fraction(),
            high_resolution: false,
            itm_model: default_itm_model(),
        }
    }
}

enum Bound {
    Closed(f64, f64),
    AtLeast(f64),
    Positive,
    Fraction,
}

impl Bound {
    fn contains(&self, v: f64) -> bool {
        match *self {
            Self::Closed(lo, hi) => (lo..=hi).contains(&v),
            Self::AtLeast(lo) => v >= lo,
            Self::Positive => v > 0.0,
            Self::Fraction => v > 1.0 && v <= 100.0,
        }
    }
}

fn check(field: &'static str, value: f64, bound: Bound, expected: &'static str) -> Result<(), RequestError> {
    if value.is_finite() && bound.contains(value) {
        Ok(())
    } else {
        Err(RequestError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}

impl SimulationPayload for LosPredictionRequest {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Los
    }

    fn validate(&self) -> Result<(), RequestError> {
        check("tx_lat", self.tx_lat, Bound::Closed(-90.0, 90.0), "-90..=90")?;
        check("tx_lon", self.tx_lon, Bound::Closed(-180.0, 180.0), "-180..=180")?;
        check("tx_height", self.tx_height, Bound::AtLeast(1.0), ">= 1")?;
        check("tx_power", self.tx_power, Bound::Positive, "> 0")?;
        check("tx_gain", self.tx_gain, Bound::AtLeast(0.0), ">= 0")?;
        check("tx_loss", self.tx_loss, Bound::AtLeast(0.0), ">= 0")?;
        check(
            "frequency_mhz",
            self.frequency_mhz,
            Bound::Closed(20.0, 30_000.0),
            "20..=30000",
        )?;
        check("rx_lat", self.rx_lat, Bound::Closed(-90.0, 90.0), "-90..=90")?;
        check("rx_lon", self.rx_lon, Bound::Closed(-180.0, 180.0), "-180..=180")?;
        check("rx_height", self.rx_height, Bound::AtLeast(1.0), ">= 1")?;
        check("rx_gain", self.rx_gain, Bound::AtLeast(0.0), ">= 0")?;
        check("rx_loss", self.rx_loss, Bound::AtLeast(0.0), ">= 0")?;
        check(
            "ground_dielectric",
            self.ground_dielectric,
            Bound::AtLeast(1.0),
            ">= 1",
        )?;
        check(
            "ground_conductivity",
            self.ground_conductivity,
            Bound::AtLeast(0.0),
            ">= 0",
        )?;
        check(
            "atmosphere_bending",
            self.atmosphere_bending,
            Bound::AtLeast(0.0),
            ">= 0",
        )?;
        check("clutter_height", self.clutter_height, Bound::AtLeast(0.0), ">= 0")?;
        check(
            "situation_fraction",
            self.situation_fraction,
            Bound::Fraction,
            "> 1 and <= 100",
        )?;
        check(
            "time_fraction",
            self.time_fraction,
            Bound::Fraction,
            "> 1 and <= 100",
        )?;
        Ok(())
    }
}
