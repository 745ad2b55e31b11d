//! End-to-end LOS run: submit, wait, decode and align.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::orchestrator::{BackendError, OrchestratorError, TaskHandle, TaskOrchestrator};
use crate::profile::{AlignError, AlignedBundle, ProfileAligner};
use crate::types::{LosPredictionRequest, LosReport, LosResponse};

/// Coarse progress of the pipeline's current run, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationState {
    /// No run started, or the last one was cancelled.
    #[default]
    Idle,
    /// A job is submitted and not yet resolved.
    Running,
    /// The last run produced a chart.
    Completed,
    /// The last run ended in an error.
    Failed,
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Aligned LOS profile plus the obstruction and link-budget report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LosChart {
    /// Job that produced the chart, absent for offline alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Aligned, decimated profile series.
    pub bundle: AlignedBundle,
    /// Metadata returned alongside the profile arrays.
    pub report: LosReport,
}

impl LosChart {
    /// Aligns a decoded LOS response.
    pub fn from_response(
        aligner: &ProfileAligner,
        task_id: Option<String>,
        response: LosResponse,
    ) -> std::result::Result<Self, AlignError> {
        let (reference, auxiliary, report) = response.into_series();
        let bundle = aligner.process(reference, auxiliary)?;
        Ok(Self {
            task_id,
            bundle,
            report,
        })
    }
}

/// Runs LOS predictions and tracks a [`SimulationState`].
///
/// Each pipeline owns its state. Run one prediction at a time per instance;
/// concurrent predictions use separate pipelines sharing a cloned
/// [`TaskOrchestrator`].
#[derive(Debug, Clone)]
pub struct LosPipeline {
    orchestrator: TaskOrchestrator,
    aligner: ProfileAligner,
    state: SimulationState,
}

impl LosPipeline {
    /// Creates an idle pipeline.
    pub fn new(orchestrator: TaskOrchestrator, aligner: ProfileAligner) -> Self {
        Self {
            orchestrator,
            aligner,
            state: SimulationState::Idle,
        }
    }

    /// Builds an HTTP-backed pipeline from a configuration.
    #[cfg(feature = "http-client")]
    pub fn from_config(config: &crate::PlannerConfig) -> Result<Self> {
        config.validate()?;
        let backend = crate::orchestrator::HttpBackend::from_config(config)?;
        let orchestrator = TaskOrchestrator::new(std::sync::Arc::new(backend))
            .with_poll_interval(config.poll_interval());
        Ok(Self::new(
            orchestrator,
            ProfileAligner::new(config.align_config()),
        ))
    }

    /// Current state.
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// The orchestrator used for submissions.
    pub fn orchestrator(&self) -> &TaskOrchestrator {
        &self.orchestrator
    }

    /// The aligner applied to results.
    pub fn aligner(&self) -> &ProfileAligner {
        &self.aligner
    }

    /// Returns to [`SimulationState::Idle`].
    pub fn reset(&mut self) {
        self.state = SimulationState::Idle;
    }

    /// Submits a prediction and returns its handle, which can be used to
    /// cancel the run from another task.
    pub async fn submit(&mut self, request: &LosPredictionRequest) -> Result<TaskHandle> {
        match self.orchestrator.submit(request).await {
            Ok(handle) => {
                self.state = SimulationState::Running;
                Ok(handle)
            },
            Err(e) => {
                self.state = SimulationState::Failed;
                Err(e.into())
            },
        }
    }

    /// Waits for a submitted prediction and aligns its result.
    ///
    /// A cancelled run returns the pipeline to `Idle`; every other error
    /// leaves it `Failed`.
    pub async fn complete(&mut self, handle: &TaskHandle) -> Result<LosChart> {
        self.state = SimulationState::Running;
        let outcome = self.resolve(handle).await;
        self.state = match &outcome {
            Ok(_) => SimulationState::Completed,
            Err(e) if e.is_cancelled() => SimulationState::Idle,
            Err(e) => {
                tracing::warn!(
                    task_id = %handle.id(),
                    category = e.error_category(),
                    error = %e,
                    "LOS run failed"
                );
                SimulationState::Failed
            },
        };
        outcome
    }

    /// Submits a prediction, waits for it and aligns the result.
    pub async fn run(&mut self, request: &LosPredictionRequest) -> Result<LosChart> {
        let handle = self.submit(request).await?;
        self.complete(&handle).await
    }

    async fn resolve(&self, handle: &TaskHandle) -> Result<LosChart> {
        let result = self.orchestrator.wait(handle).await?;
        let response = decode(handle.id(), result)?;
        let chart = LosChart::from_response(&self.aligner, Some(handle.id().to_string()), response)?;
        tracing::info!(
            task_id = %handle.id(),
            points = chart.bundle.len(),
            obstructed = chart.report.path.obstructed,
            "LOS chart ready"
        );
        Ok(chart)
    }
}

fn decode(task_id: &str, result: Value) -> std::result::Result<LosResponse, OrchestratorError> {
    serde_json::from_value(result).map_err(|e| OrchestratorError::ResultFetch {
        task_id: task_id.to_string(),
        source: BackendError::Decode {
            message: e.to_string(),
        },
    })
}
