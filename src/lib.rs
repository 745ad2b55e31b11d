//! Job orchestration and LOS profile alignment for radio site planning.
//!
//! This crate is the non-UI core of the RF site planner. It drives
//! long-running line-of-sight and coverage simulations on a remote
//! SPLAT!-backed service and turns the raw LOS response into a bounded,
//! mutually aligned set of chart series.
//!
//! # Overview
//!
//! A simulation job progresses through a small state machine
//! (`pending` -> `running` -> `completed`/`failed`) driven entirely by poll
//! responses. [`TaskOrchestrator`] owns the submit/poll/fetch protocol and
//! cooperative cancellation; [`ProfileAligner`] estimates per-series sample
//! skew, crops every series to the common overlap and decimates the result
//! to a point budget while keeping both endpoints.
//!
//! # Module Organization
//!
//! - [`types`] - Wire types (task status, LOS request/response)
//! - [`orchestrator`] - Backend trait, HTTP backend and the poll loop
//! - [`profile`] - Shift estimation, cropping and decimation
//! - [`pipeline`] - End-to-end LOS run with explicit simulation state
//! - [`config`] - TOML/environment configuration
//! - `logging` - Subscriber setup (feature `logging`)
//! - [`error`] - Crate-level error type
//! - [`constants`] - Defaults and endpoint paths
//!
//! # Example
//!
//! ```
//! use rfplan::{AlignConfig, ProfileAligner, ProfileSeries};
//!
//! let distance: Vec<f64> = (0..2000).map(f64::from).collect();
//! let aux = (0..5)
//!     .map(|i| ProfileSeries::new(format!("series-{i}"), distance.clone()))
//!     .collect::<Vec<_>>();
//!
//! let aligner = ProfileAligner::new(AlignConfig::default().with_max_points(1000));
//! let bundle = aligner
//!     .process(ProfileSeries::new("distance", distance), aux)
//!     .unwrap();
//!
//! assert_eq!(bundle.len(), 1000);
//! assert_eq!(bundle.reference().values[0], 0.0);
//! assert_eq!(bundle.reference().values[999], 1999.0);
//! ```

pub mod config;
pub mod constants;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod orchestrator;
pub mod pipeline;
pub mod profile;
pub mod types;

pub use config::{ConfigError, PlannerConfig};
pub use constants::*;
pub use error::{Error, Result};
pub use orchestrator::{
    BackendError, OrchestratorError, SimulationBackend, TaskHandle, TaskOrchestrator,
};
#[cfg(feature = "http-client")]
pub use orchestrator::HttpBackend;
pub use pipeline::{LosChart, LosPipeline, SimulationState};
pub use profile::{AlignConfig, AlignError, AlignedBundle, ProfileAligner, ProfileSeries};
pub use types::*;
