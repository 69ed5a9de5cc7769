//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PAYBRIDGE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use paybridge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod features;
mod providers;
mod rates;
mod server;

pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use providers::{FlutterwaveSettings, ProvidersConfig, WiseSettings};
pub use rates::RatesConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment provider credentials and endpoints
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Exchange-rate cache maintenance
    #[serde(default)]
    pub rates: RatesConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PAYBRIDGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PAYBRIDGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PAYBRIDGE__PROVIDERS__WISE__API_TOKEN=...` -> `providers.wise.api_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYBRIDGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Bind address, port and timeouts
    /// - Provider URL formats (HTTPS in production)
    /// - At least one configured provider
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.providers.validate(self.is_production())?;
        self.rates.validate()?;

        if self.providers.wise.is_configured() && !self.providers.wise.has_webhook_key() {
            tracing::warn!(
                "PAYBRIDGE__PROVIDERS__WISE__WEBHOOK_PUBLIC_KEY is not set; \
                 every Wise webhook will be rejected"
            );
        }

        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("PAYBRIDGE__PROVIDERS__WISE__API_TOKEN", "wise-token");
        env::set_var("PAYBRIDGE__PROVIDERS__FLUTTERWAVE__SECRET_KEY", "FLWSECK_TEST-xxx");
        env::set_var("PAYBRIDGE__PROVIDERS__FLUTTERWAVE__WEBHOOK_SECRET_HASH", "hash");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("PAYBRIDGE__PROVIDERS__WISE__API_TOKEN");
        env::remove_var("PAYBRIDGE__PROVIDERS__FLUTTERWAVE__SECRET_KEY");
        env::remove_var("PAYBRIDGE__PROVIDERS__FLUTTERWAVE__WEBHOOK_SECRET_HASH");
        env::remove_var("PAYBRIDGE__PROVIDERS__WISE__TIMEOUT_SECS");
        env::remove_var("PAYBRIDGE__FEATURES__ENABLE_FLUTTERWAVE");
        env::remove_var("PAYBRIDGE__SERVER__PORT");
        env::remove_var("PAYBRIDGE__SERVER__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.providers.wise.api_token.as_deref(), Some("wise-token"));
        assert_eq!(
            config.providers.flutterwave.webhook_secret_hash.as_deref(),
            Some("hash")
        );
        assert_eq!(config.providers.wise.base_url, "https://api.transferwise.com");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_no_provider_fails_validation() {
        let config = AppConfig::default();
        assert_eq!(config.validate(), Err(ValidationError::NoProviderConfigured));
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.rates.sweep_interval_secs, 60);
        assert!(!config.features.enable_flutterwave);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PAYBRIDGE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PAYBRIDGE__SERVER__PORT", "3000");
        env::set_var("PAYBRIDGE__FEATURES__ENABLE_FLUTTERWAVE", "true");
        env::set_var("PAYBRIDGE__PROVIDERS__WISE__TIMEOUT_SECS", "5");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.features.enable_flutterwave);
        assert_eq!(config.providers.wise.timeout_secs, 5);
    }
}
