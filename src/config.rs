//! Runtime configuration.
//!
//! Values are resolved in this order: command-line flags, then environment
//! variables (a `.env` file is honoured), then built-in defaults.

use std::time::Duration;

use crate::data::loader::DataSource;
use crate::error::ConfigError;

/// Dataset path or URL to load at startup.
pub const SOURCE_ENV: &str = "BIKE_DASH_SOURCE";
/// Timeout in whole seconds for fetching remote datasets.
pub const HTTP_TIMEOUT_ENV: &str = "BIKE_DASH_HTTP_TIMEOUT_SECS";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Loaded once at startup when present.
    pub source: Option<DataSource>,
    pub http_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl DashboardConfig {
    /// Read configuration from the process environment (and `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = lookup(SOURCE_ENV)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| DataSource::parse(&s));

        let http_timeout = match lookup(HTTP_TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw).ok_or(ConfigError::InvalidEnvVar {
                name: HTTP_TIMEOUT_ENV,
                value: raw,
            })?,
            None => DEFAULT_HTTP_TIMEOUT,
        };

        Ok(Self {
            source,
            http_timeout,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, source: Option<&str>, timeout_secs: Option<u64>) -> Self {
        if let Some(s) = source {
            self.source = Some(DataSource::parse(s));
        }
        if let Some(secs) = timeout_secs {
            self.http_timeout = Duration::from_secs(secs);
        }
        self
    }
}

fn parse_timeout(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
}
