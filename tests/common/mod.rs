//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rfplan::{
    BackendError, SimulationBackend, SimulationKind, StatusReport, SubmitReceipt, TaskStatus,
};
use serde_json::{json, Value};

type Hook = Box<dyn Fn() + Send + Sync>;

/// In-memory backend that replays scripted responses.
///
/// Once a script runs dry the backend keeps answering with a default:
/// `task-1` for submissions, `running` for status queries and `{}` for
/// results.
#[derive(Default)]
pub struct ScriptedBackend {
    submits: Mutex<VecDeque<Result<SubmitReceipt, BackendError>>>,
    statuses: Mutex<VecDeque<Result<StatusReport, BackendError>>>,
    results: Mutex<VecDeque<Result<Value, BackendError>>>,
    submitted: Mutex<Vec<(SimulationKind, Value)>>,
    on_status: Mutex<Option<Hook>>,
    submit_calls: AtomicUsize,
    status_calls: AtomicUsize,
    result_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A backend that reports each status in turn.
    pub fn with_statuses(statuses: &[TaskStatus]) -> Arc<Self> {
        let backend = Self::new();
        for status in statuses {
            backend.push_status(Ok(StatusReport::new(*status)));
        }
        backend
    }

    pub fn push_submit(&self, response: Result<SubmitReceipt, BackendError>) {
        self.submits.lock().push_back(response);
    }

    pub fn push_status(&self, response: Result<StatusReport, BackendError>) {
        self.statuses.lock().push_back(response);
    }

    pub fn push_result(&self, response: Result<Value, BackendError>) {
        self.results.lock().push_back(response);
    }

    /// Runs `hook` while a status request is in flight, before it answers.
    pub fn on_status(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_status.lock() = Some(Box::new(hook));
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn result_calls(&self) -> usize {
        self.result_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<(SimulationKind, Value)> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl SimulationBackend for ScriptedBackend {
    async fn submit(&self, kind: SimulationKind, body: &Value) -> Result<SubmitReceipt, BackendError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().push((kind, body.clone()));
        self.submits.lock().pop_front().unwrap_or_else(|| {
            Ok(SubmitReceipt {
                task_id: "task-1".to_string(),
            })
        })
    }

    async fn status(&self, _task_id: &str) -> Result<StatusReport, BackendError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.on_status.lock().as_ref() {
            hook();
        }
        self.statuses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(StatusReport::new(TaskStatus::Running)))
    }

    async fn result(&self, _task_id: &str) -> Result<Value, BackendError> {
        self.result_calls.fetch_add(1, Ordering::SeqCst);
        self.results.lock().pop_front().unwrap_or_else(|| Ok(json!({})))
    }
}

/// A LOS result body with `n` samples where every auxiliary series is
/// displaced from the distance axis by the given shift.
pub fn los_result(n: usize, shifts: [isize; 5]) -> Value {
    let distance: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let shifted = |shift: isize| -> Vec<f64> {
        (0..n).map(|j| (j as isize + shift) as f64).collect()
    };
    json!({
        "distance": distance,
        "length": 12.5,
        "profile": shifted(shifts[0]),
        "curvature": shifted(shifts[1]),
        "fresnel": shifted(shifts[2]),
        "fresnel_pt_6": shifted(shifts[3]),
        "reference": shifted(shifts[4]),
        "path": { "obstructed": false, "message": "clear", "obstructions": [] },
        "first_fresnel": { "obstructed": false, "message": "clear" },
        "fresnel_60": { "obstructed": false, "message": "clear" },
        "rx_signal_power": -87.2,
        "path_loss": 118.4
    })
}
