//! Tool catalog (registry service) configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::is_http_url;

/// Tool registry service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the tool service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the tool manual
    #[serde(default = "default_manual_path")]
    pub manual_path: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl CatalogConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate catalog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("catalog.base_url"));
        }
        if !self.manual_path.starts_with('/') {
            return Err(ValidationError::InvalidManualPath);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            manual_path: default_manual_path(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_manual_path() -> String {
    "/utcp".to_string()
}

fn default_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.manual_path, "/utcp");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_relative_manual_path() {
        let config = CatalogConfig {
            manual_path: "utcp".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidManualPath));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = CatalogConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
