//! Task lifecycle types for remote simulation jobs.
//!
//! This module defines [`TaskStatus`] and its state machine, the [`Task`]
//! record owned by a single orchestrator invocation, and the two small
//! wire envelopes exchanged with the backend: [`SubmitReceipt`] and
//! [`StatusReport`].
//!
//! # Serialization
//!
//! Status strings are `snake_case`. The planner backend reports
//! `processing` for jobs that are underway; it deserializes as
//! [`TaskStatus::Running`]. `queued` deserializes as
//! [`TaskStatus::Pending`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::orchestrator::OrchestratorError;

/// Lifecycle status of a remote simulation job.
///
/// # State Machine
///
/// ```text
/// Pending -> Running, Completed, Failed
/// Running -> Completed, Failed
/// Completed -> (terminal, no transitions)
/// Failed -> (terminal, no transitions)
/// ```
///
/// # Examples
///
/// ```
/// use rfplan::TaskStatus;
///
/// assert!(!TaskStatus::Running.is_terminal());
/// assert!(TaskStatus::Pending.can_transition_to(&TaskStatus::Running));
/// assert!(!TaskStatus::Running.can_transition_to(&TaskStatus::Pending));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Accepted by the backend, not yet started.
    #[serde(alias = "queued")]
    Pending,
    /// Being computed by the backend.
    #[serde(alias = "processing")]
    Running,
    /// Finished successfully; a result is available (terminal).
    Completed,
    /// Finished unsuccessfully (terminal).
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl TaskStatus {
    /// Returns `true` for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns `true` if moving from this status to `next` is a valid
    /// forward transition. Self-transitions are not transitions and return
    /// `false`.
    pub fn can_transition_to(&self, next: &Self) -> bool {
        if self == next {
            return false;
        }

        match self {
            Self::Pending => matches!(next, Self::Running | Self::Completed | Self::Failed),
            Self::Running => matches!(next, Self::Completed | Self::Failed),
            Self::Completed | Self::Failed => false,
        }
    }

    /// Validates a transition from this status to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rfplan::TaskStatus;
    ///
    /// assert!(TaskStatus::Running
    ///     .validate_transition("job-1", &TaskStatus::Completed)
    ///     .is_ok());
    /// assert!(TaskStatus::Completed
    ///     .validate_transition("job-1", &TaskStatus::Running)
    ///     .is_err());
    /// ```
    pub fn validate_transition(&self, task_id: &str, next: &Self) -> Result<(), OrchestratorError> {
        if self.can_transition_to(next) {
            return Ok(());
        }

        let reason = if self.is_terminal() {
            "task is in a terminal state".to_string()
        } else if self == next {
            format!("task is already {self}")
        } else {
            "status regression".to_string()
        };

        Err(OrchestratorError::InvalidTransition {
            task_id: task_id.to_string(),
            from: *self,
            to: *next,
            reason,
        })
    }
}

/// Body returned by the submit endpoint: `{"task_id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Backend-assigned job identifier.
    pub task_id: String,
}

/// Body returned by the status endpoint.
///
/// ```
/// use rfplan::{StatusReport, TaskStatus};
///
/// let report: StatusReport =
///     serde_json::from_str(r#"{"status": "failed", "error": "SPLAT! exited with 1"}"#).unwrap();
/// assert_eq!(report.status, TaskStatus::Failed);
/// assert_eq!(report.error.as_deref(), Some("SPLAT! exited with 1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Current job status.
    pub status: TaskStatus,

    /// Backend error text, present on failed jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    /// A report without error text.
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            error: None,
        }
    }

    /// A `failed` report carrying the backend's error text.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            error: Some(message.into()),
        }
    }
}

/// One remote simulation job as seen by the orchestrator.
///
/// The record is created at submission in [`TaskStatus::Pending`] and is
/// mutated only by poll responses. `result` is set only once the job has
/// completed and its result has been fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Backend-assigned job identifier.
    pub id: String,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// The submitted request parameters. Never modified after submission.
    pub payload: Value,

    /// The fetched result, present only when `status == Completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Backend-provided message (error text for failed jobs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    /// RFC 3339 timestamp of submission.
    pub created_at: String,

    /// RFC 3339 timestamp of the last applied status change.
    pub last_updated_at: String,

    /// Number of status responses applied to this record.
    pub polls: u32,

    /// Set once the owning handle has been cancelled.
    pub cancelled: bool,
}

impl Task {
    /// Creates a freshly submitted task in the `Pending` state.
    pub fn new(id: impl Into<String>, payload: Value) -> Self {
        let now = now_rfc3339();
        Self {
            id: id.into(),
            status: TaskStatus::Pending,
            payload,
            result: None,
            status_message: None,
            created_at: now.clone(),
            last_updated_at: now,
            polls: 0,
            cancelled: false,
        }
    }

    /// Returns `true` once the job has reached `Completed` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub(crate) fn touch(&mut self) {
        self.last_updated_at = now_rfc3339();
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
