//! Crate-level error type.

use crate::config::ConfigError;
use crate::orchestrator::{BackendError, OrchestratorError};
use crate::profile::AlignError;
use crate::types::RequestError;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Any error the planner core can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Submit, poll, result fetch or cancellation.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    /// Backend client construction or a bare backend call.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Profile alignment.
    #[error(transparent)]
    Align(#[from] AlignError),

    /// Configuration loading or validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Request validation.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// JSON (de)serialization outside the backend calls.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error category as a static string for log classification.
    pub fn error_category(&self) -> &'static str {
        match self {
            Self::Orchestrator(e) => e.error_category(),
            Self::Backend(e) => e.error_category(),
            Self::Align(_) => "alignment",
            Self::Config(_) => "config",
            Self::Request(_) => "request",
            Self::Json(_) => "json",
        }
    }

    /// Returns `true` if the run ended because the caller cancelled it.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Orchestrator(e) if e.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_delegate() {
        let err: Error = OrchestratorError::Cancelled {
            task_id: "t".to_string(),
        }
        .into();
        assert_eq!(err.error_category(), "cancelled");
        assert!(err.is_cancelled());

        let err: Error = AlignError::InvalidConfig("x".to_string()).into();
        assert_eq!(err.error_category(), "alignment");
        assert!(!err.is_cancelled());
    }

    #[test]
    fn transparent_display() {
        let err: Error = BackendError::Timeout.into();
        assert_eq!(err.to_string(), "request timed out");
    }
}
