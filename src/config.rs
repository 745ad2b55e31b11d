//! Planner configuration.
//!
//! Settings are read from a TOML file, overridden by `RFPLAN_*` environment
//! variables, and finally by command-line flags in the `rfplan` binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_MAX_POINTS, DEFAULT_MAX_SKEW, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_REQUEST_TIMEOUT_MS, ENV_API_URL, ENV_MAX_POINTS, ENV_MAX_SKEW, ENV_POLL_INTERVAL_MS,
    ENV_REQUEST_TIMEOUT_MS, RESULT_PATH, STATUS_PATH, TASK_ID_PLACEHOLDER,
};
use crate::profile::AlignConfig;
use crate::types::SimulationKind;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialization(String),

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    /// A setting is outside its accepted range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Backend endpoint paths, relative to `api_url`.
///
/// Status and result paths must contain the `{task_id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub los_submit: String,
    pub coverage_submit: String,
    pub status: String,
    pub result: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            los_submit: SimulationKind::Los.submit_path().to_string(),
            coverage_submit: SimulationKind::Coverage.submit_path().to_string(),
            status: STATUS_PATH.to_string(),
            result: RESULT_PATH.to_string(),
        }
    }
}

impl EndpointConfig {
    /// Configured submit path for a kind of job.
    pub fn submit_path(&self, kind: SimulationKind) -> &str {
        match kind {
            SimulationKind::Los => &self.los_submit,
            SimulationKind::Coverage => &self.coverage_submit,
        }
    }
}

/// Top-level planner configuration.
///
/// # Example Configuration File
///
/// ```toml
/// api_url = "http://localhost:8080"
/// poll_interval_ms = 1000
/// request_timeout_ms = 30000
/// max_skew = 5
/// max_points = 1000
///
/// [endpoints]
/// los_submit = "/los"
/// status = "/status/{task_id}"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Base URL of the planner API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Delay between status polls, in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Per-request timeout, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Largest profile shift searched, in samples.
    #[serde(default = "default_max_skew")]
    pub max_skew: usize,

    /// Point budget for aligned profile series.
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// Endpoint paths.
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_max_skew() -> usize {
    DEFAULT_MAX_SKEW
}

fn default_max_points() -> usize {
    DEFAULT_MAX_POINTS
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            poll_interval_ms: default_poll_interval(),
            request_timeout_ms: default_request_timeout(),
            max_skew: default_max_skew(),
            max_points: default_max_points(),
            endpoints: EndpointConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(Into::into)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// Defaults overridden by environment variables.
    ///
    /// - `RFPLAN_API_URL`
    /// - `RFPLAN_POLL_INTERVAL_MS`
    /// - `RFPLAN_REQUEST_TIMEOUT_MS`
    /// - `RFPLAN_MAX_SKEW`
    /// - `RFPLAN_MAX_POINTS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overrides fields from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|var| std::env::var(var).ok())
    }

    /// Overrides fields using `lookup` in place of the process environment.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(ms) = parse_var(&lookup, ENV_POLL_INTERVAL_MS)? {
            self.poll_interval_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, ENV_REQUEST_TIMEOUT_MS)? {
            self.request_timeout_ms = ms;
        }
        if let Some(skew) = parse_var(&lookup, ENV_MAX_SKEW)? {
            self.max_skew = skew;
        }
        if let Some(points) = parse_var(&lookup, ENV_MAX_POINTS)? {
            self.max_points = points;
        }
        Ok(())
    }

    /// Checks every setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.api_url)
            .map_err(|e| ConfigError::Invalid(format!("api_url '{}': {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "api_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be positive".into()));
        }
        self.align_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        for (name, path) in [
            ("endpoints.status", &self.endpoints.status),
            ("endpoints.result", &self.endpoints.result),
        ] {
            if !path.contains(TASK_ID_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must contain {TASK_ID_PLACEHOLDER}"
                )));
            }
        }
        Ok(())
    }

    /// Alignment parameters derived from this configuration.
    pub fn align_config(&self) -> AlignConfig {
        AlignConfig {
            max_skew: self.max_skew,
            max_points: self.max_points,
        }
    }

    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
    }
}
