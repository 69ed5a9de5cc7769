//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid {provider} base URL: {url}")]
    InvalidBaseUrl { provider: &'static str, url: String },

    #[error("Invalid {provider} timeout (must be 1-60 seconds)")]
    InvalidProviderTimeout { provider: &'static str },

    #[error("{provider} base URL must use HTTPS in production")]
    BaseUrlMustBeHttps { provider: &'static str },

    #[error("No payment provider configured")]
    NoProviderConfigured,

    #[error("Invalid rate cache sweep interval")]
    InvalidSweepInterval,
}
