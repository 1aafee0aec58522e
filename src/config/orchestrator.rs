//! Orchestrator configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::{OrchestratorSettings, DEFAULT_DISCOVERY_LIMIT};

/// Discovery settings for each request
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    /// Fixed discovery query; unset searches with the user's text
    pub discovery_query: Option<String>,

    /// Maximum number of tools offered to the model
    #[serde(default = "default_discovery_limit")]
    pub discovery_limit: usize,
}

impl OrchestratorConfig {
    /// Converts to runtime settings. A blank query counts as unset.
    pub fn settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            discovery_query: self
                .discovery_query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string),
            discovery_limit: self.discovery_limit,
        }
    }

    /// Validate orchestrator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.discovery_limit == 0 {
            return Err(ValidationError::InvalidDiscoveryLimit);
        }
        Ok(())
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            discovery_query: None,
            discovery_limit: default_discovery_limit(),
        }
    }
}

fn default_discovery_limit() -> usize {
    DEFAULT_DISCOVERY_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_runtime_defaults() {
        assert_eq!(OrchestratorConfig::default().settings(), OrchestratorSettings::default());
    }

    #[test]
    fn test_blank_query_is_unset() {
        let config = OrchestratorConfig {
            discovery_query: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.settings().discovery_query, None);

        let config = OrchestratorConfig {
            discovery_query: Some("netconf".to_string()),
            ..Default::default()
        };
        assert_eq!(config.settings().discovery_query.as_deref(), Some("netconf"));
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let config = OrchestratorConfig {
            discovery_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidDiscoveryLimit));
    }
}
