//! Provider registry and selection policy.
//!
//! Built once at startup from an explicit, ordered list. Unconfigured
//! providers are skipped with a warning so a missing credential never stops
//! the process. Lookups are by lower-case name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::ports::{PaymentProvider, ProviderError, RateCache};

use super::flutterwave::{FlutterwaveConfig, FlutterwaveProvider, FLUTTERWAVE};
use super::wise::{WiseConfig, WiseProvider, WISE};

/// Registered providers plus the priority used when no hint applies.
pub struct ProviderRegistry {
    /// Registration order.
    providers: Vec<Arc<dyn PaymentProvider>>,
    by_name: HashMap<String, Arc<dyn PaymentProvider>>,
    enable_flutterwave: bool,
}

impl ProviderRegistry {
    /// Empty registry. `enable_flutterwave` puts Flutterwave ahead of Wise.
    pub fn new(enable_flutterwave: bool) -> Self {
        Self {
            providers: Vec::new(),
            by_name: HashMap::new(),
            enable_flutterwave,
        }
    }

    /// Builds Wise then Flutterwave from configuration.
    ///
    /// # Errors
    ///
    /// `ProviderError::HttpClient` if an HTTP client cannot be constructed.
    pub fn from_config(
        config: &AppConfig,
        cache: Arc<dyn RateCache>,
    ) -> Result<Self, ProviderError> {
        let mut registry = Self::new(config.features.enable_flutterwave);

        let wise = &config.providers.wise;
        let mut wise_config = WiseConfig::new()
            .with_base_url(wise.base_url.clone())
            .with_timeout(wise.timeout());
        if let Some(token) = &wise.api_token {
            wise_config = wise_config.with_api_token(token.clone());
        }
        if let Some(key) = &wise.webhook_public_key {
            wise_config = wise_config.with_webhook_public_key(key.clone());
        }
        registry.register(Arc::new(WiseProvider::new(wise_config, cache.clone())?));

        let flutterwave = &config.providers.flutterwave;
        let mut flutterwave_config = FlutterwaveConfig::new()
            .with_base_url(flutterwave.base_url.clone())
            .with_timeout(flutterwave.timeout());
        if let Some(key) = &flutterwave.secret_key {
            flutterwave_config = flutterwave_config.with_secret_key(key.clone());
        }
        if let Some(hash) = &flutterwave.webhook_secret_hash {
            flutterwave_config = flutterwave_config.with_webhook_secret_hash(hash.clone());
        }
        let flutterwave_provider = FlutterwaveProvider::new(flutterwave_config, cache)?;
        if flutterwave_provider.is_configured()
            && !flutterwave_provider.verifies_webhooks()
            && config.is_production()
        {
            tracing::warn!(
                provider = FLUTTERWAVE,
                "No webhook secret hash in production; Flutterwave webhooks are accepted unverified"
            );
        }
        registry.register(Arc::new(flutterwave_provider));

        tracing::info!(providers = ?registry.names(), "Payment providers registered");
        Ok(registry)
    }

    /// Adds a provider. Returns false (and logs) if it is not configured.
    ///
    /// Registering a name twice replaces the earlier provider in place.
    pub fn register(&mut self, provider: Arc<dyn PaymentProvider>) -> bool {
        let name = provider.name().to_ascii_lowercase();

        if !provider.is_configured() {
            tracing::warn!(provider = %name, "Provider not configured; skipping registration");
            return false;
        }

        match self.providers.iter().position(|p| p.name().eq_ignore_ascii_case(&name)) {
            Some(index) => {
                tracing::warn!(provider = %name, "Provider registered twice; replacing");
                self.providers[index] = provider.clone();
            }
            None => self.providers.push(provider.clone()),
        }
        self.by_name.insert(name, provider);
        true
    }

    /// Picks a provider for an inbound event.
    ///
    /// A hint naming a registered provider wins. Otherwise the priority list
    /// applies, then registration order.
    ///
    /// # Errors
    ///
    /// `ProviderError::NoProviderAvailable` when nothing is registered.
    pub fn resolve(&self, hint: Option<&str>) -> Result<Arc<dyn PaymentProvider>, ProviderError> {
        if let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) {
            match self.by_name.get(&hint.to_ascii_lowercase()) {
                Some(provider) => return Ok(provider.clone()),
                None => tracing::debug!(hint, "Provider hint not registered; using priority"),
            }
        }

        self.priority()
            .iter()
            .find_map(|name| self.by_name.get(*name))
            .or_else(|| self.providers.first())
            .cloned()
            .ok_or(ProviderError::NoProviderAvailable)
    }

    /// Exact lookup, case-insensitive.
    ///
    /// # Errors
    ///
    /// `ProviderError::UnknownProvider` if no provider has that name.
    pub fn resolve_by_name(&self, name: &str) -> Result<Arc<dyn PaymentProvider>, ProviderError> {
        self.by_name
            .get(&name.trim().to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(name.to_string()))
    }

    /// Registered providers in registration order.
    pub fn all_providers(&self) -> impl Iterator<Item = &Arc<dyn PaymentProvider>> {
        self.providers.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn priority(&self) -> [&'static str; 2] {
        if self.enable_flutterwave {
            [FLUTTERWAVE, WISE]
        } else {
            [WISE, FLUTTERWAVE]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::providers::MockPaymentProvider;

    fn registry_with(enable_flutterwave: bool, names: &[&'static str]) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new(enable_flutterwave);
        for &name in names {
            registry.register(Arc::new(MockPaymentProvider::new(name)));
        }
        registry
    }

    #[test]
    fn primary_is_default_choice() {
        let registry = registry_with(false, &["flutterwave", "wise"]);
        assert_eq!(registry.resolve(None).unwrap().name(), "wise");
    }

    #[test]
    fn flag_prefers_secondary() {
        let registry = registry_with(true, &["wise", "flutterwave"]);
        assert_eq!(registry.resolve(None).unwrap().name(), "flutterwave");
    }

    #[test]
    fn flag_falls_back_when_secondary_missing() {
        let registry = registry_with(true, &["wise"]);
        assert_eq!(registry.resolve(None).unwrap().name(), "wise");
    }

    #[test]
    fn hint_overrides_priority() {
        let registry = registry_with(false, &["wise", "flutterwave"]);
        assert_eq!(registry.resolve(Some("Flutterwave")).unwrap().name(), "flutterwave");

        let registry = registry_with(true, &["wise", "flutterwave"]);
        assert_eq!(registry.resolve(Some("WISE")).unwrap().name(), "wise");
    }

    #[test]
    fn unknown_hint_uses_priority() {
        let registry = registry_with(false, &["wise", "flutterwave"]);
        assert_eq!(registry.resolve(Some("paystack")).unwrap().name(), "wise");
        assert_eq!(registry.resolve(Some("   ")).unwrap().name(), "wise");
    }

    #[test]
    fn other_providers_used_in_registration_order() {
        let registry = registry_with(false, &["mpesa", "paystack"]);
        assert_eq!(registry.resolve(None).unwrap().name(), "mpesa");
    }

    #[test]
    fn empty_registry_has_no_provider() {
        let registry = ProviderRegistry::new(false);
        assert!(matches!(
            registry.resolve(None),
            Err(ProviderError::NoProviderAvailable)
        ));
        assert!(matches!(
            registry.resolve(Some("wise")),
            Err(ProviderError::NoProviderAvailable)
        ));
    }

    #[test]
    fn unconfigured_providers_are_skipped() {
        let mut registry = ProviderRegistry::new(false);
        assert!(!registry.register(Arc::new(MockPaymentProvider::unconfigured("wise"))));
        assert!(registry.register(Arc::new(MockPaymentProvider::new("flutterwave"))));

        assert_eq!(registry.names(), vec!["flutterwave"]);
        assert_eq!(registry.resolve(None).unwrap().name(), "flutterwave");
    }

    #[test]
    fn resolve_by_name_is_exact() {
        let registry = registry_with(false, &["wise"]);
        assert_eq!(registry.resolve_by_name("Wise").unwrap().name(), "wise");

        let err = registry.resolve_by_name("stripe").err().unwrap();
        assert_eq!(err, ProviderError::UnknownProvider("stripe".to_string()));
    }

    #[test]
    fn duplicate_registration_replaces_in_place() {
        let mut registry = registry_with(false, &["wise", "flutterwave"]);
        registry.register(Arc::new(MockPaymentProvider::rejecting_signatures("wise")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["wise", "flutterwave"]);
        assert!(!registry.resolve_by_name("wise").unwrap().verify_signature(b"{}", "x"));
    }

    #[test]
    fn from_config_registers_configured_providers() {
        use crate::adapters::cache::InMemoryRateCache;

        let mut config = AppConfig::default();
        config.providers.flutterwave.secret_key = Some("FLWSECK_TEST-xxx".to_string());
        config.features.enable_flutterwave = true;

        let registry =
            ProviderRegistry::from_config(&config, Arc::new(InMemoryRateCache::new())).unwrap();

        assert_eq!(registry.names(), vec!["flutterwave"]);
        assert_eq!(registry.resolve(Some("wise")).unwrap().name(), "flutterwave");
    }

    #[test]
    fn all_providers_in_registration_order() {
        let registry = registry_with(true, &["flutterwave", "wise", "mpesa"]);
        let names: Vec<_> = registry.all_providers().map(|p| p.name()).collect();
        assert_eq!(names, vec!["flutterwave", "wise", "mpesa"]);
    }
}
