//! Errors surfaced by [`TaskOrchestrator`](super::TaskOrchestrator).

use super::BackendError;
use crate::types::{RequestError, TaskStatus};

/// Errors that end a submit, poll or fetch phase.
///
/// None of these are retried by the orchestrator. A [`Poll`](Self::Poll)
/// error in particular leaves the task where it was; call
/// [`await_completion`](super::TaskOrchestrator::await_completion) again to
/// resume polling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrchestratorError {
    /// The backend refused the request, or it failed client-side validation.
    #[error("submission rejected{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Submission {
        /// HTTP status of the rejection, `None` for client-side failures.
        status: Option<u16>,
        /// Backend response body or validation message.
        message: String,
    },

    /// The submit request never reached the backend.
    #[error("transport error during submission: {source}")]
    Transport {
        #[source]
        source: BackendError,
    },

    /// The backend marked the job failed.
    #[error("task {task_id} failed{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    TaskFailed {
        task_id: String,
        /// Error text reported by the backend, if any.
        message: Option<String>,
    },

    /// A single status query failed. Polling has stopped.
    #[error("status poll failed for task {task_id}: {source}")]
    Poll {
        task_id: String,
        #[source]
        source: BackendError,
    },

    /// The job completed but its result could not be retrieved.
    #[error("result fetch failed for task {task_id}: {source}")]
    ResultFetch {
        task_id: String,
        #[source]
        source: BackendError,
    },

    /// The handle was cancelled before the job reached a terminal state.
    #[error("task {task_id} was cancelled")]
    Cancelled { task_id: String },

    /// The result was requested for a job that has not completed.
    #[error("task {task_id} has not completed (status: {status})")]
    NotCompleted { task_id: String, status: TaskStatus },

    /// A status report would move the task backwards or out of a terminal state.
    #[error("invalid transition from {from} to {to} for task {task_id}: {reason}")]
    InvalidTransition {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
        reason: String,
    },
}

impl OrchestratorError {
    /// Returns the error category as a static string for log classification.
    pub fn error_category(&self) -> &'static str {
        match self {
            Self::Submission { .. } => "submission",
            Self::Transport { .. } => "transport",
            Self::TaskFailed { .. } => "task_failed",
            Self::Poll { .. } => "poll",
            Self::ResultFetch { .. } => "result_fetch",
            Self::Cancelled { .. } => "cancelled",
            Self::NotCompleted { .. } => "not_completed",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }

    /// Returns `true` for [`Cancelled`](Self::Cancelled).
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl From<RequestError> for OrchestratorError {
    fn from(err: RequestError) -> Self {
        Self::Submission {
            status: None,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_display() {
        let err = OrchestratorError::Submission {
            status: Some(422),
            message: "tx_power must be > 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "submission rejected (HTTP 422): tx_power must be > 0"
        );

        let err = OrchestratorError::Submission {
            status: None,
            message: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "submission rejected: bad");
    }

    #[test]
    fn task_failed_display() {
        let err = OrchestratorError::TaskFailed {
            task_id: "t1".to_string(),
            message: Some("SPLAT! execution failed".to_string()),
        };
        assert_eq!(err.to_string(), "task t1 failed: SPLAT! execution failed");
        let err = OrchestratorError::TaskFailed {
            task_id: "t1".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "task t1 failed");
    }

    #[test]
    fn poll_error_keeps_source() {
        use std::error::Error as _;
        let err = OrchestratorError::Poll {
            task_id: "t2".to_string(),
            source: BackendError::Timeout,
        };
        assert_eq!(err.error_category(), "poll");
        assert_eq!(err.source().unwrap().to_string(), "request timed out");
    }

    #[test]
    fn request_error_becomes_submission() {
        let err: OrchestratorError = RequestError::OutOfRange {
            field: "tx_lat",
            value: 100.0,
            expected: "-90..=90",
        }
        .into();
        assert!(matches!(err, OrchestratorError::Submission { status: None, .. }));
    }
}
