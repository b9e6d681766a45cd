//! Configuration module for SafeView Core.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::Thresholds;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub moderation: ModerationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Analysis Provider configuration.
///
/// Injected into whatever constructs the provider client; the evaluator and
/// its tests never read credentials from the environment directly.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Endpoint of the check API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API user identifier.
    #[serde(default)]
    pub api_user: String,
    /// API secret.
    #[serde(default)]
    pub api_secret: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Analysis models requested per image.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
}

fn default_endpoint() -> String {
    "https://api.sightengine.com/1.0/check.json".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_models() -> Vec<String> {
    vec![
        "nudity-2.0".to_string(),
        "wad".to_string(),
        "text".to_string(),
        "face-attributes".to_string(),
    ]
}

/// Moderation policy configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Default calibrated thresholds, applied when a request carries none.
    pub thresholds: Thresholds,
    /// Capacity of the evaluation cache; 0 disables caching.
    pub cache_capacity: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds {
                adult: 0.80,
                weapon: 0.50,
                alcohol: 0.90,
                drugs: 0.90,
                emotion: 0.75,
            },
            cache_capacity: 256,
        }
    }
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SAFEVIEW_*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with SAFEVIEW prefix
            .add_source(
                Environment::with_prefix("SAFEVIEW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_moderation_config() {
        let config = ModerationConfig::default();
        assert_eq!(config.thresholds.adult, 0.80);
        assert_eq!(config.thresholds.weapon, 0.50);
        assert_eq!(config.thresholds.alcohol, 0.90);
        assert_eq!(config.thresholds.drugs, 0.90);
        assert_eq!(config.thresholds.emotion, 0.75);
        assert_eq!(config.cache_capacity, 256);
        assert!(config.thresholds.validate().is_ok());
    }

    #[test]
    fn test_provider_defaults() {
        let provider: ProviderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(provider.endpoint, default_endpoint());
        assert_eq!(provider.timeout_secs, 10);
        assert_eq!(
            provider.models,
            vec!["nudity-2.0", "wad", "text", "face-attributes"]
        );
        assert!(provider.api_user.is_empty());
    }
}
