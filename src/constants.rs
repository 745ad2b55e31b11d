//! Defaults, environment variable names and endpoint paths.

/// Default status poll cadence in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Default bound on the per-series sample skew searched during alignment.
pub const DEFAULT_MAX_SKEW: usize = 5;

/// Default point budget for a decimated profile bundle.
pub const DEFAULT_MAX_POINTS: usize = 1_000;

/// Default HTTP request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Submit path for coverage predictions.
pub const COVERAGE_SUBMIT_PATH: &str = "/predict";

/// Submit path for point-to-point LOS predictions.
pub const LOS_SUBMIT_PATH: &str = "/los";

/// Status path template. `{task_id}` is substituted per request.
pub const STATUS_PATH: &str = "/status/{task_id}";

/// Result path template. `{task_id}` is substituted per request.
pub const RESULT_PATH: &str = "/result/{task_id}";

/// Placeholder substituted in the path templates above.
pub const TASK_ID_PLACEHOLDER: &str = "{task_id}";

/// Environment variable overriding [`PlannerConfig::api_url`](crate::PlannerConfig).
pub const ENV_API_URL: &str = "RFPLAN_API_URL";

/// Environment variable overriding the poll interval.
pub const ENV_POLL_INTERVAL_MS: &str = "RFPLAN_POLL_INTERVAL_MS";

/// Environment variable overriding the alignment skew bound.
pub const ENV_MAX_SKEW: &str = "RFPLAN_MAX_SKEW";

/// Environment variable overriding the decimation point budget.
pub const ENV_MAX_POINTS: &str = "RFPLAN_MAX_POINTS";

/// Environment variable overriding the HTTP request timeout.
pub const ENV_REQUEST_TIMEOUT_MS: &str = "RFPLAN_REQUEST_TIMEOUT_MS";
