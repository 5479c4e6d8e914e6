//! Engagement configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const MAX_DEBOUNCE_MS: u64 = 5000;
pub const DEFAULT_API_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_API_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value}")]
    Invalid { var: &'static str, value: String },
    #[error("debounce of {0}ms exceeds the 5000ms maximum")]
    DebounceTooLong(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementConfig {
    pub api_url: String,
    pub debounce: Duration,
    pub timeouts: ApiTimeouts,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            timeouts: ApiTimeouts {
                request_secs: DEFAULT_API_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_API_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

impl EngagementConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `API_URL`: backend base URL, default `http://localhost:5000/api`
    /// - `ENGAGEMENT_DEBOUNCE_MS`: default 300, at most 5000
    /// - `API_REQUEST_TIMEOUT_SECS`: default 10
    /// - `API_CONNECT_TIMEOUT_SECS`: default 5
    ///
    /// # Errors
    ///
    /// Returns an error if the debounce delay is not a number or is too long.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let debounce_ms = match std::env::var("ENGAGEMENT_DEBOUNCE_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { var: "ENGAGEMENT_DEBOUNCE_MS", value: raw.clone() })?,
            Err(_) => DEFAULT_DEBOUNCE_MS,
        };

        let config = Self {
            api_url: normalize_api_url(&api_url),
            debounce: Duration::from_millis(debounce_ms),
            timeouts: ApiTimeouts {
                request_secs: env_parse("API_REQUEST_TIMEOUT_SECS", DEFAULT_API_REQUEST_TIMEOUT_SECS),
                connect_secs: env_parse("API_CONNECT_TIMEOUT_SECS", DEFAULT_API_CONNECT_TIMEOUT_SECS),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the debounce delay, keeping the same bound as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if `millis` exceeds the maximum.
    pub fn with_debounce_ms(mut self, millis: u64) -> Result<Self, ConfigError> {
        self.debounce = Duration::from_millis(millis);
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_api_url(api_url);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let millis = u64::try_from(self.debounce.as_millis()).unwrap_or(u64::MAX);
        if millis > MAX_DEBOUNCE_MS {
            return Err(ConfigError::DebounceTooLong(millis));
        }
        Ok(())
    }
}

fn normalize_api_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
