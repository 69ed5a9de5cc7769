//! Payment provider configuration (Wise, Flutterwave)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// All provider sections
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub wise: WiseSettings,

    #[serde(default)]
    pub flutterwave: FlutterwaveSettings,
}

/// Wise configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WiseSettings {
    /// API base URL
    #[serde(default = "default_wise_base_url")]
    pub base_url: String,

    /// API bearer token
    pub api_token: Option<String>,

    /// Webhook public key, PEM or base64 DER
    pub webhook_public_key: Option<String>,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Flutterwave configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveSettings {
    /// API base URL
    #[serde(default = "default_flutterwave_base_url")]
    pub base_url: String,

    /// Secret API key
    pub secret_key: Option<String>,

    /// Webhook secret hash from the dashboard
    pub webhook_secret_hash: Option<String>,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ProvidersConfig {
    /// Check if any provider can be registered
    pub fn any_configured(&self) -> bool {
        self.wise.is_configured() || self.flutterwave.is_configured()
    }

    /// Validate provider configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if !self.any_configured() {
            return Err(ValidationError::NoProviderConfigured);
        }
        validate_endpoint("wise", &self.wise.base_url, self.wise.timeout_secs, production)?;
        validate_endpoint(
            "flutterwave",
            &self.flutterwave.base_url,
            self.flutterwave.timeout_secs,
            production,
        )?;
        Ok(())
    }
}

impl WiseSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the API token is present
    pub fn is_configured(&self) -> bool {
        non_empty(&self.api_token)
    }

    /// Check if webhook signatures can be verified
    pub fn has_webhook_key(&self) -> bool {
        non_empty(&self.webhook_public_key)
    }
}

impl FlutterwaveSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the secret key is present
    pub fn is_configured(&self) -> bool {
        non_empty(&self.secret_key)
    }

    /// Check if webhook signatures are verified (otherwise accepted unverified)
    pub fn has_webhook_secret(&self) -> bool {
        non_empty(&self.webhook_secret_hash)
    }
}

impl Default for WiseSettings {
    fn default() -> Self {
        Self {
            base_url: default_wise_base_url(),
            api_token: None,
            webhook_public_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for FlutterwaveSettings {
    fn default() -> Self {
        Self {
            base_url: default_flutterwave_base_url(),
            secret_key: None,
            webhook_secret_hash: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| !v.trim().is_empty())
}

fn validate_endpoint(
    provider: &'static str,
    base_url: &str,
    timeout_secs: u64,
    production: bool,
) -> Result<(), ValidationError> {
    let is_https = base_url.starts_with("https://");
    if !is_https && !base_url.starts_with("http://") {
        return Err(ValidationError::InvalidBaseUrl {
            provider,
            url: base_url.to_string(),
        });
    }
    if production && !is_https {
        return Err(ValidationError::BaseUrlMustBeHttps { provider });
    }
    if timeout_secs == 0 || timeout_secs > 60 {
        return Err(ValidationError::InvalidProviderTimeout { provider });
    }
    Ok(())
}

fn default_wise_base_url() -> String {
    "https://api.transferwise.com".to_string()
}

fn default_flutterwave_base_url() -> String {
    "https://api.flutterwave.com".to_string()
}

fn default_timeout() -> u64 {
    10
}
