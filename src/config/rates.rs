//! Exchange-rate cache configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Rate cache maintenance settings
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Seconds between sweeps of expired cache entries
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl RatesConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep_interval() {
        let config = RatesConfig::default();
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = RatesConfig {
            sweep_interval_secs: 0,
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSweepInterval));
    }
}
