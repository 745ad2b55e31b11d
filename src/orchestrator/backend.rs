//! The simulation backend contract.
//!
//! [`SimulationBackend`] exposes the three logical endpoints the
//! orchestrator talks to: submit, status and result. Implementations are
//! dumb transports; the poll loop, the state machine and cancellation live
//! in [`TaskOrchestrator`](super::TaskOrchestrator).

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{SimulationKind, StatusReport, SubmitReceipt};

/// Errors raised by a single backend call.
///
/// The orchestrator wraps these into the phase-specific
/// [`OrchestratorError`](super::OrchestratorError) variants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (DNS resolution, TCP connect, TLS handshake).
    #[error("connection error: {message}")]
    Connection { message: String },

    /// The response body did not match the expected shape.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// The backend client could not be constructed.
    #[error("backend configuration error: {message}")]
    Configuration { message: String },
}

impl BackendError {
    /// Returns the error category as a static string for log classification.
    ///
    /// Categories: `"http"`, `"timeout"`, `"connection"`, `"decode"`,
    /// `"configuration"`.
    pub fn error_category(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Timeout => "timeout",
            Self::Connection { .. } => "connection",
            Self::Decode { .. } => "decode",
            Self::Configuration { .. } => "configuration",
        }
    }

    /// Classify a [`reqwest::Error`] into the appropriate variant.
    #[cfg(feature = "http-client")]
    pub fn classify_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            Self::Connection {
                message: err.to_string(),
            }
        }
    }
}

/// Remote simulation service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one backend is shared by every
/// task lifecycle driven through the same orchestrator.
#[async_trait]
pub trait SimulationBackend: Send + Sync {
    /// Starts a job and returns its backend-assigned identifier.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Http`] when the backend rejects the request.
    /// - [`BackendError::Connection`] / [`BackendError::Timeout`] when the
    ///   request could not be delivered.
    async fn submit(&self, kind: SimulationKind, body: &Value) -> Result<SubmitReceipt, BackendError>;

    /// Queries the current status of a job.
    async fn status(&self, task_id: &str) -> Result<StatusReport, BackendError>;

    /// Fetches the result of a completed job.
    async fn result(&self, task_id: &str) -> Result<Value, BackendError>;
}
