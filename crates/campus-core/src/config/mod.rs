//! Client configuration, loadable from TOML.

pub mod defaults;
pub mod observability_config;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use observability_config::ObservabilityConfig;

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the school-management API, without a trailing slash.
    pub base_url: String,
    pub login_path: String,
    pub register_path: String,
    pub refresh_path: String,
    pub logout_path: String,
    /// Per-request timeout applied by the HTTP transport.
    pub request_timeout_ms: u64,
    /// Bound on waiting for (and performing) a shared token refresh.
    pub refresh_timeout_ms: u64,
    /// How long a transient notice stays visible.
    pub notice_ttl_ms: u64,
    /// Locale used when none has been persisted.
    pub default_locale: String,
    /// Page size for list views.
    pub items_per_page: u32,
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_BASE_URL.to_string(),
            login_path: defaults::DEFAULT_LOGIN_PATH.to_string(),
            register_path: defaults::DEFAULT_REGISTER_PATH.to_string(),
            refresh_path: defaults::DEFAULT_REFRESH_PATH.to_string(),
            logout_path: defaults::DEFAULT_LOGOUT_PATH.to_string(),
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
            refresh_timeout_ms: defaults::DEFAULT_REFRESH_TIMEOUT_MS,
            notice_ttl_ms: defaults::DEFAULT_NOTICE_TTL_MS,
            default_locale: defaults::DEFAULT_LOCALE.to_string(),
            items_per_page: defaults::DEFAULT_ITEMS_PER_PAGE,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at a specific API base URL, everything else default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        for (field, path) in [
            ("login_path", &self.login_path),
            ("register_path", &self.register_path),
            ("refresh_path", &self.refresh_path),
            ("logout_path", &self.logout_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: format!("'{path}' must start with '/'"),
                });
            }
        }
        if self.items_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "items_per_page".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Absolute URL for an API path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}
