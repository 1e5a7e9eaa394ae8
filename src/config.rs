//! Client configuration.
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `HEALTHREPORT_API_BASE_URL` | Base URL of the scoring service |
//! | `HEALTHREPORT_REQUEST_TIMEOUT_SECS` | Deadline for a single report request |
//! | `HEALTHREPORT_LOG_MODE` | `auto`, `file` or `stdout` |
//! | `HEALTHREPORT_LOG_FILE` | Log path when logging to a file |
//!
//! Values may also come from a `.env` file in the working directory.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::ReportError;

/// Default scoring service location (the service's development port).
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request deadline in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default log path in file mode.
pub const DEFAULT_LOG_FILE: &str = "healthreport.log";

/// Load `.env` from the working directory. Existing variables win.
fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
}

/// Configuration fixed at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:5000`.
    pub base_url: String,

    /// Deadline applied to each report request.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Create config from the process environment (after loading `.env`).
    ///
    /// # Errors
    /// Returns `ReportError::Config` if a variable holds an invalid value.
    pub fn from_env() -> crate::Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `ReportError::Config` if a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("HEALTHREPORT_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout = match lookup("HEALTHREPORT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    ReportError::Config(format!(
                        "HEALTHREPORT_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                    ))
                })?;
                if secs == 0 {
                    return Err(ReportError::Config(
                        "HEALTHREPORT_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self::default()
            .with_base_url(base_url)?
            .with_request_timeout(request_timeout))
    }

    /// Replace the base URL.
    ///
    /// # Errors
    /// Returns `ReportError::Config` if the URL does not parse or is not http(s).
    pub fn with_base_url(mut self, url: impl Into<String>) -> crate::Result<Self> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| ReportError::Config(format!("Invalid base URL {trimmed:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ReportError::Config(format!(
                "Base URL must use http or https, got {:?}",
                parsed.scheme()
            )));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Replace the request deadline.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when attached to a terminal, stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Whether to log to a file. Logging to an interactive terminal would
    /// corrupt the TUI's alternate screen.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Logging settings, read before the subscriber is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub mode: LogMode,
    pub file: PathBuf,
}

impl LogConfig {
    /// Create from the process environment (after loading `.env`).
    #[must_use]
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            mode: lookup("HEALTHREPORT_LOG_MODE")
                .map(|raw| LogMode::parse(&raw))
                .unwrap_or_default(),
            file: lookup("HEALTHREPORT_LOG_FILE")
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
        }
    }
}
