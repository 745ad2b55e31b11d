//! Poll-loop lifecycle tests for `TaskOrchestrator`.
//!
//! Time is paused in every async test, so poll intervals elapse instantly
//! and deterministically.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::ScriptedBackend;
use pretty_assertions::assert_eq;
use rfplan::{
    BackendError, LosPredictionRequest, OrchestratorError, RawPayload, SimulationKind,
    StatusReport, SubmitReceipt, TaskHandle, TaskOrchestrator, TaskStatus,
};
use serde_json::json;

const INTERVAL: Duration = Duration::from_millis(1000);

fn request() -> LosPredictionRequest {
    LosPredictionRequest::between((45.854746, 13.726172), (45.70, 13.90), 0.1)
}

async fn submitted(backend: &Arc<ScriptedBackend>) -> (TaskOrchestrator, TaskHandle) {
    let orchestrator = TaskOrchestrator::new(backend.clone()).with_poll_interval(INTERVAL);
    let handle = orchestrator.submit(&request()).await.unwrap();
    (orchestrator, handle)
}

// ─── Submission ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_starts_pending_with_payload() {
    let backend = ScriptedBackend::new();
    backend.push_submit(Ok(SubmitReceipt {
        task_id: "abc-123".to_string(),
    }));
    let (_, handle) = submitted(&backend).await;

    assert_eq!(handle.id(), "abc-123");
    let task = handle.snapshot();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.payload["tx_power"], json!(0.1));
    assert!(task.result.is_none());

    let submitted = backend.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].0, SimulationKind::Los);
}

#[tokio::test]
async fn backend_rejection_is_submission_error() {
    let backend = ScriptedBackend::new();
    backend.push_submit(Err(BackendError::Http {
        status: 422,
        body: "tx_power must be > 0".to_string(),
    }));
    let orchestrator = TaskOrchestrator::new(backend.clone());

    let err = orchestrator.submit(&request()).await.unwrap_err();
    assert_eq!(
        err,
        OrchestratorError::Submission {
            status: Some(422),
            message: "tx_power must be > 0".to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let backend = ScriptedBackend::new();
    backend.push_submit(Err(BackendError::Connection {
        message: "connection refused".to_string(),
    }));
    let orchestrator = TaskOrchestrator::new(backend.clone());

    let err = orchestrator.submit(&request()).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Transport { .. }));
    assert_eq!(err.error_category(), "transport");
}

#[tokio::test]
async fn invalid_request_never_reaches_backend() {
    let backend = ScriptedBackend::new();
    let orchestrator = TaskOrchestrator::new(backend.clone());
    let mut bad = request();
    bad.tx_lat = 120.0;

    let err = orchestrator.submit(&bad).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Submission { status: None, .. }));
    assert_eq!(backend.submit_calls(), 0);
}

#[tokio::test]
async fn raw_coverage_payload_is_submitted_verbatim() {
    let backend = ScriptedBackend::new();
    let orchestrator = TaskOrchestrator::new(backend.clone());
    let body = json!({ "lat": 45.0, "lon": 13.0, "radius": 30000.0 });
    let payload = RawPayload::new(
        SimulationKind::Coverage,
        body.as_object().cloned().unwrap_or_default(),
    );

    orchestrator.submit(&payload).await.unwrap();
    let submitted = backend.submitted();
    assert_eq!(submitted[0], (SimulationKind::Coverage, body));
}

// ─── Polling ────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn completes_after_three_polls_and_one_fetch() {
    let backend = ScriptedBackend::with_statuses(&[
        TaskStatus::Pending,
        TaskStatus::Running,
        TaskStatus::Completed,
    ]);
    backend.push_result(Ok(json!({ "distance": [0.0, 1.0] })));
    let (orchestrator, handle) = submitted(&backend).await;

    let start = tokio::time::Instant::now();
    let result = orchestrator.await_completion(&handle, INTERVAL).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(result, json!({ "distance": [0.0, 1.0] }));
    assert_eq!(backend.status_calls(), 3);
    assert_eq!(backend.result_calls(), 1);
    assert!(elapsed >= 2 * INTERVAL && elapsed < 3 * INTERVAL, "elapsed {elapsed:?}");

    let task = handle.snapshot();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.polls, 3);
    assert_eq!(task.result, Some(result));
}

#[tokio::test(start_paused = true)]
async fn failed_task_surfaces_backend_message() {
    let backend = ScriptedBackend::new();
    backend.push_status(Ok(StatusReport::failed("SPLAT! execution failed")));
    let (orchestrator, handle) = submitted(&backend).await;

    let err = orchestrator.await_completion(&handle, INTERVAL).await.unwrap_err();

    assert_eq!(
        err,
        OrchestratorError::TaskFailed {
            task_id: "task-1".to_string(),
            message: Some("SPLAT! execution failed".to_string()),
        }
    );
    assert_eq!(backend.status_calls(), 1);
    assert_eq!(backend.result_calls(), 0);
    assert_eq!(handle.status(), TaskStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn pending_may_complete_directly() {
    let backend = ScriptedBackend::with_statuses(&[TaskStatus::Completed]);
    let (orchestrator, handle) = submitted(&backend).await;

    orchestrator.await_completion(&handle, INTERVAL).await.unwrap();
    assert_eq!(backend.status_calls(), 1);
    assert_eq!(backend.result_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn stale_regression_is_ignored() {
    let backend = ScriptedBackend::with_statuses(&[
        TaskStatus::Running,
        TaskStatus::Pending,
        TaskStatus::Running,
        TaskStatus::Completed,
    ]);
    let (orchestrator, handle) = submitted(&backend).await;
    let mut updates = handle.subscribe();

    orchestrator.await_completion(&handle, INTERVAL).await.unwrap();

    assert_eq!(backend.status_calls(), 4);
    assert_eq!(handle.snapshot().polls, 4);
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().status, TaskStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn poll_error_stops_polling_until_reinvoked() {
    let backend = ScriptedBackend::new();
    backend.push_status(Ok(StatusReport::new(TaskStatus::Running)));
    backend.push_status(Err(BackendError::Http {
        status: 502,
        body: "bad gateway".to_string(),
    }));
    backend.push_status(Ok(StatusReport::new(TaskStatus::Completed)));
    let (orchestrator, handle) = submitted(&backend).await;

    let err = orchestrator.await_completion(&handle, INTERVAL).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Poll { .. }));
    assert_eq!(backend.status_calls(), 2);
    assert_eq!(handle.status(), TaskStatus::Running);

    // Nothing polls in the background after the error.
    tokio::time::sleep(INTERVAL * 5).await;
    assert_eq!(backend.status_calls(), 2);

    orchestrator.await_completion(&handle, INTERVAL).await.unwrap();
    assert_eq!(backend.status_calls(), 3);
    assert_eq!(handle.status(), TaskStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn result_fetch_error_keeps_task_completed() {
    let backend = ScriptedBackend::with_statuses(&[TaskStatus::Completed]);
    backend.push_result(Err(BackendError::Timeout));
    backend.push_result(Ok(json!({ "ok": true })));
    let (orchestrator, handle) = submitted(&backend).await;

    let err = orchestrator.await_completion(&handle, INTERVAL).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::ResultFetch { .. }));
    assert_eq!(handle.status(), TaskStatus::Completed);
    assert!(handle.snapshot().result.is_none());

    let result = orchestrator.fetch_result(&handle).await.unwrap();
    assert_eq!(result, json!({ "ok": true }));
    assert_eq!(backend.result_calls(), 2);

    // A stored result is returned without another request.
    let again = orchestrator.await_completion(&handle, INTERVAL).await.unwrap();
    assert_eq!(again, result);
    assert_eq!(backend.result_calls(), 2);
    assert_eq!(backend.status_calls(), 1);
}

#[tokio::test]
async fn fetch_result_requires_completion() {
    let backend = ScriptedBackend::new();
    let (orchestrator, handle) = submitted(&backend).await;

    let err = orchestrator.fetch_result(&handle).await.unwrap_err();
    assert_eq!(
        err,
        OrchestratorError::NotCompleted {
            task_id: "task-1".to_string(),
            status: TaskStatus::Pending,
        }
    );
    assert_eq!(backend.result_calls(), 0);
}

#[tokio::test]
async fn one_shot_status_query() {
    let backend = ScriptedBackend::new();
    backend.push_status(Ok(StatusReport::new(TaskStatus::Pending)));
    backend.push_status(Err(BackendError::Http {
        status: 404,
        body: "Task not found".to_string(),
    }));
    let orchestrator = TaskOrchestrator::new(backend.clone());

    let report = orchestrator.status("abc").await.unwrap();
    assert_eq!(report.status, TaskStatus::Pending);

    let err = orchestrator.status("missing").await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Poll { ref task_id, .. } if task_id == "missing"));
}

// ─── Cancellation ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn cancel_during_wait_stops_polling() {
    let backend = ScriptedBackend::with_statuses(&[TaskStatus::Running]);
    let (orchestrator, handle) = submitted(&backend).await;

    let waiter = {
        let orchestrator = orchestrator.clone();
        let handle = handle.clone();
        tokio::spawn(async move { orchestrator.await_completion(&handle, INTERVAL).await })
    };

    // Let the first poll land, then cancel before the next one is due.
    tokio::time::sleep(INTERVAL / 10).await;
    assert_eq!(backend.status_calls(), 1);
    orchestrator.cancel(&handle);

    let err = waiter.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(backend.status_calls(), 1);

    let task = handle.snapshot();
    assert!(task.cancelled);
    assert_eq!(task.status, TaskStatus::Running);
}

#[tokio::test(start_paused = true)]
async fn in_flight_response_is_discarded_after_cancel() {
    let backend = ScriptedBackend::with_statuses(&[TaskStatus::Completed]);
    let (orchestrator, handle) = submitted(&backend).await;
    let in_flight = handle.clone();
    backend.on_status(move || in_flight.cancel());

    let err = orchestrator.await_completion(&handle, INTERVAL).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(handle.status(), TaskStatus::Pending);
    assert_eq!(handle.snapshot().polls, 0);
    assert_eq!(backend.result_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_handle_does_not_poll() {
    let backend = ScriptedBackend::new();
    let (orchestrator, handle) = submitted(&backend).await;
    orchestrator.cancel(&handle);

    let err = orchestrator.await_completion(&handle, INTERVAL).await.unwrap_err();
    assert_eq!(
        err,
        OrchestratorError::Cancelled {
            task_id: "task-1".to_string()
        }
    );
    assert_eq!(backend.status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_after_completion_is_a_no_op() {
    let backend = ScriptedBackend::with_statuses(&[TaskStatus::Completed]);
    backend.push_result(Ok(json!({ "done": true })));
    let (orchestrator, handle) = submitted(&backend).await;
    orchestrator.await_completion(&handle, INTERVAL).await.unwrap();
    let before = handle.snapshot();

    orchestrator.cancel(&handle);
    orchestrator.cancel(&handle);

    let after = handle.snapshot();
    assert!(!after.cancelled);
    assert_eq!(after.status, TaskStatus::Completed);
    assert_eq!(after.result, before.result);
    assert_eq!(after.last_updated_at, before.last_updated_at);
}

#[tokio::test(start_paused = true)]
async fn run_submits_and_waits() {
    let backend = ScriptedBackend::with_statuses(&[TaskStatus::Running, TaskStatus::Completed]);
    backend.push_result(Ok(json!([1, 2, 3])));
    let orchestrator = TaskOrchestrator::new(backend.clone()).with_poll_interval(INTERVAL);

    let result = orchestrator.run(&request()).await.unwrap();
    assert_eq!(result, json!([1, 2, 3]));
    assert_eq!(backend.submit_calls(), 1);
    assert_eq!(backend.status_calls(), 2);
}
