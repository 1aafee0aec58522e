//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TOOL_RELAY` prefix and nested values use double underscores as separators.
//! The conventional `OPENAI_API_KEY`, `OPENAI_MODEL` and `OPENAI_BASE_URL`
//! variables act as defaults for the `ai` section.
//!
//! # Example
//!
//! ```no_run
//! use tool_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod ai;
mod catalog;
mod error;
mod logging;
mod orchestrator;

pub use ai::AiConfig;
pub use catalog::CatalogConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use orchestrator::OrchestratorConfig;

use serde::Deserialize;

/// Environment variable prefix for all settings.
pub const ENV_PREFIX: &str = "TOOL_RELAY";

/// Conventional variables mapped onto config keys when present.
const CONVENTIONAL_VARS: [(&str, &str); 3] = [
    ("OPENAI_API_KEY", "ai.api_key"),
    ("OPENAI_MODEL", "ai.model"),
    ("OPENAI_BASE_URL", "ai.base_url"),
];

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Completion service configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Tool registry service configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Discovery settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Applies `OPENAI_*` variables as defaults
    /// 3. Reads environment variables with `TOOL_RELAY` prefix
    /// 4. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `TOOL_RELAY__AI__MODEL=gpt-4o` -> `ai.model = gpt-4o`
    /// - `TOOL_RELAY__CATALOG__BASE_URL=...` -> `catalog.base_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        for (var, key) in CONVENTIONAL_VARS {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_default(key, value)?;
            }
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.catalog.validate()?;
        self.orchestrator.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 9] = [
        "OPENAI_API_KEY",
        "OPENAI_MODEL",
        "OPENAI_BASE_URL",
        "TOOL_RELAY__AI__API_KEY",
        "TOOL_RELAY__AI__MODEL",
        "TOOL_RELAY__AI__TEMPERATURE",
        "TOOL_RELAY__CATALOG__BASE_URL",
        "TOOL_RELAY__ORCHESTRATOR__DISCOVERY_LIMIT",
        "TOOL_RELAY__ORCHESTRATOR__DISCOVERY_QUERY",
    ];

    /// Helper to clear environment variables before and after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.catalog.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.orchestrator.discovery_limit, 50);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_conventional_openai_variables() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("OPENAI_API_KEY", "sk-from-openai-var");
        env::set_var("OPENAI_MODEL", "gpt-4o");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.ai.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("sk-from-openai-var")
        );
        assert_eq!(config.ai.model, "gpt-4o");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prefixed_variables_take_precedence() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("OPENAI_MODEL", "gpt-4o");
        env::set_var("TOOL_RELAY__AI__MODEL", "gpt-4.1-mini");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().ai.model, "gpt-4.1-mini");
    }

    #[test]
    fn test_nested_values_are_parsed() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("TOOL_RELAY__AI__API_KEY", "sk-xxx");
        env::set_var("TOOL_RELAY__AI__TEMPERATURE", "0.5");
        env::set_var("TOOL_RELAY__CATALOG__BASE_URL", "http://tools.lab:9000");
        env::set_var("TOOL_RELAY__ORCHESTRATOR__DISCOVERY_LIMIT", "10");
        env::set_var("TOOL_RELAY__ORCHESTRATOR__DISCOVERY_QUERY", "netconf");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!((config.ai.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.catalog.base_url, "http://tools.lab:9000");
        assert_eq!(config.orchestrator.discovery_limit, 10);
        assert_eq!(
            config.orchestrator.settings().discovery_query.as_deref(),
            Some("netconf")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let config = AppConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        );
    }
}
