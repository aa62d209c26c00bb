//! Client configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use academia_observability::LogFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:8081";

const ENV_API_URL: &str = "ACADEMIA_API_URL";
const ENV_SESSION_DIR: &str = "ACADEMIA_SESSION_DIR";
const ENV_LOG_FORMAT: &str = "ACADEMIA_LOG_FORMAT";
const ENV_HTTP_TIMEOUT: &str = "ACADEMIA_HTTP_TIMEOUT_SECS";

/// Runtime settings for an [`AcademiaClient`](crate::AcademiaClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin. API paths (`/api/...`) and `/logout` are resolved against it.
    pub api_base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    /// Directory holding the persisted session. `None` keeps the session in memory only.
    pub session_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout: None,
            session_dir: None,
            log_format: LogFormat::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = Some(dir.into());
        self
    }

    /// Read `ACADEMIA_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup(ENV_API_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!(var = ENV_API_URL, default = DEFAULT_API_URL, "API URL not set; using default");
                DEFAULT_API_URL.to_string()
            });

        let session_dir = lookup(ENV_SESSION_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|d| d.join("academia")));
        if session_dir.is_none() {
            tracing::warn!("no data directory available; session will not survive restarts");
        }

        let log_format = match lookup(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "invalid log format; using json");
                LogFormat::Json
            }),
            None => LogFormat::Json,
        };

        let request_timeout = lookup(ENV_HTTP_TIMEOUT).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                tracing::warn!(var = ENV_HTTP_TIMEOUT, value = %raw, "ignoring non-numeric timeout");
                None
            }
        });

        Self {
            api_base_url,
            request_timeout,
            session_dir,
            log_format,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
