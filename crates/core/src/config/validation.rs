//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `endpoint` is not an absolute http(s) URL
    /// - `warning_ttl_ms` is less than 100ms or exceeds 1 minute
    /// - `timeout_ms` is set and below 100ms or above 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        match Url::parse(&self.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::Invalid {
                    field: "endpoint".into(),
                    reason: format!("unsupported scheme: {}", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "endpoint".into(), reason: e.to_string() });
            }
        }

        if self.warning_ttl_ms < 100 {
            return Err(ConfigError::Invalid { field: "warning_ttl_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.warning_ttl_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "warning_ttl_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms < 100 {
                return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
            }
            if timeout_ms > 300_000 {
                return Err(ConfigError::Invalid {
                    field: "timeout_ms".into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.log_file.is_some() && self.log_level.eq_ignore_ascii_case("off") {
            tracing::warn!("log_file is set but log_level is off; nothing will be written");
        }

        Ok(())
    }
}
