//! Wire types exchanged with the simulation backend.
//!
//! - [`task`] - Job status, the task record and submit/status envelopes
//! - [`request`] - Request payloads and client-side validation
//! - [`los`] - The raw LOS result with obstruction metadata

pub mod los;
pub mod request;
pub mod task;

pub use los::*;
pub use request::*;
pub use task::*;
