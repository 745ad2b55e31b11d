//! HTTP implementation of [`SimulationBackend`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{BackendError, SimulationBackend};
use crate::config::{EndpointConfig, PlannerConfig};
use crate::constants::{DEFAULT_REQUEST_TIMEOUT_MS, TASK_ID_PLACEHOLDER};
use crate::types::{SimulationKind, StatusReport, SubmitReceipt};

/// Talks to the planner API over HTTP with JSON bodies.
///
/// ```text
/// POST {api_url}/los            -> {"task_id": "..."}
/// POST {api_url}/predict        -> {"task_id": "..."}
/// GET  {api_url}/status/{id}    -> {"status": "...", "error": "..."}
/// GET  {api_url}/result/{id}    -> result body
/// ```
///
/// Every request carries the configured timeout. Non-2xx responses map to
/// [`BackendError::Http`] with the response body as text.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
    base_url: String,
    endpoints: EndpointConfig,
}

impl HttpBackend {
    /// Creates a backend for `api_url` with default endpoints and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Configuration`] if `api_url` is not an
    /// absolute URL or the HTTP client cannot be built.
    pub fn new(api_url: &str) -> Result<Self, BackendError> {
        Self::build(
            api_url,
            EndpointConfig::default(),
            Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        )
    }

    /// Creates a backend from a validated [`PlannerConfig`].
    pub fn from_config(config: &PlannerConfig) -> Result<Self, BackendError> {
        Self::build(
            &config.api_url,
            config.endpoints.clone(),
            config.request_timeout(),
        )
    }

    fn build(api_url: &str, endpoints: EndpointConfig, timeout: Duration) -> Result<Self, BackendError> {
        let url = Url::parse(api_url).map_err(|e| BackendError::Configuration {
            message: format!("invalid api url '{api_url}': {e}"),
        })?;
        if url.cannot_be_a_base() {
            return Err(BackendError::Configuration {
                message: format!("api url '{api_url}' cannot carry a path"),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Configuration {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: url.as_str().trim_end_matches('/').to_string(),
            base: url,
            endpoints,
        })
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Expands `template` under the base URL with the task id
    /// percent-encoded as path segment content.
    fn task_url(&self, template: &str, task_id: &str) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(
                template
                    .split('/')
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| segment.replace(TASK_ID_PLACEHOLDER, task_id)),
            );
        }
        url.into()
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::classify_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::classify_reqwest(&e))?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SimulationBackend for HttpBackend {
    async fn submit(&self, kind: SimulationKind, body: &Value) -> Result<SubmitReceipt, BackendError> {
        let url = self.url(self.endpoints.submit_path(kind));
        tracing::debug!(%url, ?kind, "submitting simulation");
        self.send_json(self.client.post(&url).json(body)).await
    }

    async fn status(&self, task_id: &str) -> Result<StatusReport, BackendError> {
        let url = self.task_url(&self.endpoints.status, task_id);
        self.send_json(self.client.get(&url)).await
    }

    async fn result(&self, task_id: &str) -> Result<Value, BackendError> {
        let url = self.task_url(&self.endpoints.result, task_id);
        tracing::debug!(%url, "fetching simulation result");
        self.send_json(self.client.get(&url)).await
    }
}
