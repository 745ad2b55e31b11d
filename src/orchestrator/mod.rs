//! Submit, poll and cancel remote simulation jobs.
//!
//! A [`TaskOrchestrator`] drives one job at a time per [`TaskHandle`]:
//!
//! 1. [`submit`](TaskOrchestrator::submit) validates and posts the payload,
//!    returning a handle whose task starts in [`TaskStatus::Pending`].
//! 2. [`await_completion`](TaskOrchestrator::await_completion) polls the
//!    status endpoint at a fixed interval. Each response is applied through
//!    the [`TaskStatus`] state machine. On `completed` the result is fetched
//!    exactly once; on `failed` the backend's message is surfaced.
//! 3. [`cancel`](TaskOrchestrator::cancel) stops polling. Responses that
//!    arrive after cancellation are discarded.
//!
//! Poll failures are not retried. The task is left untouched and the caller
//! decides whether to invoke `await_completion` again.
//!
//! Observers can follow a job through [`TaskHandle::subscribe`], which
//! yields a fresh [`Task`] snapshot after every applied change.

pub mod backend;
pub mod error;
#[cfg(feature = "http-client")]
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub use backend::{BackendError, SimulationBackend};
pub use error::OrchestratorError;
#[cfg(feature = "http-client")]
pub use http::HttpBackend;

use crate::constants::DEFAULT_POLL_INTERVAL_MS;
use crate::types::{SimulationPayload, StatusReport, Task, TaskStatus};

/// Shared handle to one submitted job.
///
/// Clones refer to the same task. Dropping every clone does not affect the
/// remote job; it simply stops being tracked.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: Arc<str>,
    state: Arc<watch::Sender<Task>>,
    cancel: CancellationToken,
}

impl TaskHandle {
    fn new(task: Task) -> Self {
        let id: Arc<str> = Arc::from(task.id.as_str());
        let (tx, _rx) = watch::channel(task);
        Self {
            id,
            state: Arc::new(tx),
            cancel: CancellationToken::new(),
        }
    }

    /// Backend-assigned job identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current status.
    pub fn status(&self) -> TaskStatus {
        self.state.borrow().status
    }

    /// A copy of the full task record.
    pub fn snapshot(&self) -> Task {
        self.state.borrow().clone()
    }

    /// Returns `true` once the handle has been cancelled before the job
    /// reached a terminal state.
    pub fn is_cancelled(&self) -> bool {
        self.state.borrow().cancelled
    }

    /// Subscribes to task updates.
    pub fn subscribe(&self) -> watch::Receiver<Task> {
        self.state.subscribe()
    }

    /// Stops tracking the job. Idempotent; a no-op on terminal tasks.
    pub fn cancel(&self) {
        let mut changed = false;
        self.state.send_if_modified(|task| {
            if task.is_terminal() || task.cancelled {
                return false;
            }
            task.cancelled = true;
            task.touch();
            changed = true;
            true
        });
        if changed {
            tracing::info!(task_id = %self.id, "task cancelled");
            self.cancel.cancel();
        }
    }

    /// Applies one status response.
    ///
    /// A repeated status only bumps the poll counter. A regression is logged
    /// and ignored so a stale response can never undo progress.
    fn apply(&self, report: StatusReport) {
        self.state.send_modify(|task| {
            task.polls += 1;
            if task.status == report.status {
                return;
            }
            match task.status.validate_transition(&task.id, &report.status) {
                Ok(()) => {
                    tracing::debug!(
                        task_id = %task.id,
                        from = %task.status,
                        to = %report.status,
                        "task status changed"
                    );
                    task.status = report.status;
                    if report.error.is_some() {
                        task.status_message = report.error;
                    }
                    task.touch();
                },
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring status update");
                },
            }
        });
    }

    fn store_result(&self, result: Value) {
        self.state.send_modify(|task| {
            task.result = Some(result);
            task.touch();
        });
    }

    fn cancelled_error(&self) -> OrchestratorError {
        OrchestratorError::Cancelled {
            task_id: self.id.to_string(),
        }
    }
}

/// Drives simulation jobs against a [`SimulationBackend`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rfplan::{HttpBackend, LosPredictionRequest, TaskOrchestrator};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = Arc::new(HttpBackend::new("http://localhost:8080")?);
/// let orchestrator = TaskOrchestrator::new(backend);
///
/// let request = LosPredictionRequest::between((45.85, 13.72), (45.70, 13.90), 0.1);
/// let handle = orchestrator.submit(&request).await?;
/// let result = orchestrator.wait(&handle).await?;
/// println!("{result}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TaskOrchestrator {
    backend: Arc<dyn SimulationBackend>,
    poll_interval: Duration,
}

impl std::fmt::Debug for TaskOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskOrchestrator")
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl TaskOrchestrator {
    /// Creates an orchestrator with the default poll interval.
    pub fn new(backend: Arc<dyn SimulationBackend>) -> Self {
        Self {
            backend,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Sets the interval used by [`wait`](Self::wait).
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The interval used by [`wait`](Self::wait).
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Validates and submits a payload.
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::Submission`] if validation fails (no request is
    ///   sent) or the backend rejects the job.
    /// - [`OrchestratorError::Transport`] if the backend is unreachable.
    pub async fn submit<P>(&self, payload: &P) -> Result<TaskHandle, OrchestratorError>
    where
        P: SimulationPayload,
    {
        payload.validate()?;
        let body = payload.to_body()?;
        let kind = payload.kind();

        let receipt = self
            .backend
            .submit(kind, &body)
            .await
            .map_err(|e| match e {
                BackendError::Http { status, body } => OrchestratorError::Submission {
                    status: Some(status),
                    message: body,
                },
                BackendError::Decode { message } => OrchestratorError::Submission {
                    status: None,
                    message,
                },
                source => OrchestratorError::Transport { source },
            })?;

        tracing::info!(task_id = %receipt.task_id, ?kind, "simulation submitted");
        Ok(TaskHandle::new(Task::new(receipt.task_id, body)))
    }

    /// Polls until the job finishes, using the configured interval.
    pub async fn wait(&self, handle: &TaskHandle) -> Result<Value, OrchestratorError> {
        self.await_completion(handle, self.poll_interval).await
    }

    /// Polls the job every `poll_interval` until it completes, fails or is
    /// cancelled.
    ///
    /// The first poll is issued immediately. Returns the fetched result of a
    /// completed job. Calling this again after a [`Poll`] or [`ResultFetch`]
    /// error resumes from the task's current state; a result that was
    /// already fetched is returned without another request.
    ///
    /// [`Poll`]: OrchestratorError::Poll
    /// [`ResultFetch`]: OrchestratorError::ResultFetch
    pub async fn await_completion(
        &self,
        handle: &TaskHandle,
        poll_interval: Duration,
    ) -> Result<Value, OrchestratorError> {
        loop {
            if handle.is_cancelled() {
                return Err(handle.cancelled_error());
            }
            if let Some(outcome) = self.settle(handle).await {
                return outcome;
            }

            tracing::debug!(task_id = %handle.id(), status = %handle.status(), "polling task status");
            let response = self.backend.status(handle.id()).await;
            if handle.is_cancelled() {
                tracing::warn!(task_id = %handle.id(), "discarding status response for cancelled task");
                return Err(handle.cancelled_error());
            }
            let report = response.map_err(|source| {
                tracing::warn!(task_id = %handle.id(), error = %source, "status poll failed");
                OrchestratorError::Poll {
                    task_id: handle.id().to_string(),
                    source,
                }
            })?;
            handle.apply(report);

            if let Some(outcome) = self.settle(handle).await {
                return outcome;
            }

            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {},
                _ = handle.cancel.cancelled() => {},
            }
        }
    }

    /// Resolves a terminal task, or `None` if it is still in progress.
    async fn settle(&self, handle: &TaskHandle) -> Option<Result<Value, OrchestratorError>> {
        let task = handle.snapshot();
        match task.status {
            TaskStatus::Completed => Some(match task.result {
                Some(result) => Ok(result),
                None => self.fetch_result(handle).await,
            }),
            TaskStatus::Failed => {
                tracing::info!(task_id = %task.id, message = ?task.status_message, "simulation failed");
                Some(Err(OrchestratorError::TaskFailed {
                    task_id: task.id,
                    message: task.status_message,
                }))
            },
            TaskStatus::Pending | TaskStatus::Running => None,
        }
    }

    /// Fetches and stores the result of a completed job.
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::NotCompleted`] if the task has not completed.
    /// - [`OrchestratorError::ResultFetch`] if the request fails. The task
    ///   stays completed and the fetch may be retried.
    pub async fn fetch_result(&self, handle: &TaskHandle) -> Result<Value, OrchestratorError> {
        let status = handle.status();
        if status != TaskStatus::Completed {
            return Err(OrchestratorError::NotCompleted {
                task_id: handle.id().to_string(),
                status,
            });
        }

        let result = self
            .backend
            .result(handle.id())
            .await
            .map_err(|source| OrchestratorError::ResultFetch {
                task_id: handle.id().to_string(),
                source,
            })?;
        tracing::info!(task_id = %handle.id(), "simulation completed");
        handle.store_result(result.clone());
        Ok(result)
    }

    /// Queries a job's status once without touching any handle.
    pub async fn status(&self, task_id: &str) -> Result<StatusReport, OrchestratorError> {
        self.backend
            .status(task_id)
            .await
            .map_err(|source| OrchestratorError::Poll {
                task_id: task_id.to_string(),
                source,
            })
    }

    /// Stops polling `handle`. See [`TaskHandle::cancel`].
    pub fn cancel(&self, handle: &TaskHandle) {
        handle.cancel();
    }

    /// Submits a payload and waits for its result.
    pub async fn run<P>(&self, payload: &P) -> Result<Value, OrchestratorError>
    where
        P: SimulationPayload,
    {
        let handle = self.submit(payload).await?;
        self.wait(&handle).await
    }
}
