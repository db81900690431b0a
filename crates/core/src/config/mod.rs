//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SIFT_*)
//! 2. TOML config file (if SIFT_CONFIG_FILE set, or passed explicitly)
//! 3. Built-in defaults
//!
//! Command-line flags are applied on top by the binary, which validates the
//! merged result.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::layout::{ColumnCount, LayoutState};
use crate::model::SearchType;

mod validation;

pub use validation::ConfigError;

/// Default search endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/search";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SIFT_*)
/// 2. TOML config file
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search endpoint queried with `query` and `type` parameters.
    ///
    /// Set via SIFT_ENDPOINT environment variable.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// HTTP request timeout in milliseconds. Unset uses the transport default.
    ///
    /// Set via SIFT_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SIFT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How long a warning stays visible, in milliseconds.
    #[serde(default = "default_warning_ttl_ms")]
    pub warning_ttl_ms: u64,

    /// Initial column count (clamped to 1-5).
    #[serde(default)]
    pub columns: ColumnCount,

    /// Initial search type.
    #[serde(default)]
    pub search_type: SearchType,

    /// Whether web and news thumbnails are shown initially.
    #[serde(default = "default_true")]
    pub show_images: bool,

    /// Whether the sidebar starts collapsed.
    #[serde(default)]
    pub menu_collapsed: bool,

    /// Default tracing filter directive; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// File receiving logs while the terminal UI is running.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_user_agent() -> String {
    "sift/0.1".into()
}

fn default_warning_ttl_ms() -> u64 {
    3_000
}

fn default_log_level() -> String {
    "info".into()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: None,
            user_agent: default_user_agent(),
            warning_ttl_ms: default_warning_ttl_ms(),
            columns: ColumnCount::default(),
            search_type: SearchType::Web,
            show_images: true,
            menu_collapsed: false,
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn warning_ttl(&self) -> Duration {
        Duration::from_millis(self.warning_ttl_ms)
    }

    /// Initial layout state.
    pub fn layout(&self) -> LayoutState {
        LayoutState {
            columns: self.columns,
            search_type: self.search_type,
            show_images: self.show_images,
            menu_collapsed: self.menu_collapsed,
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SIFT_`
    /// 2. TOML file `config_file`, else `SIFT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// The result is not validated: callers layer their overrides first and
    /// then call [`AppConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(config_file)
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))
    }

    fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("SIFT_CONFIG_FILE").map(PathBuf::from));
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(
            Env::prefixed("SIFT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }
}
