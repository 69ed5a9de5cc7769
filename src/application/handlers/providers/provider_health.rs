//! GetProviderHealthHandler - Query handler listing registered providers.

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::providers::ProviderRegistry;

/// Query for the provider listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetProviderHealthQuery;

/// One registered provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderHealth {
    pub name: &'static str,
    pub configured: bool,
    pub signature_header: &'static str,
    /// Chosen when a webhook arrives without route or hint.
    pub default: bool,
}

/// Handler for the provider listing.
pub struct GetProviderHealthHandler {
    registry: Arc<ProviderRegistry>,
}

impl GetProviderHealthHandler {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self, _query: GetProviderHealthQuery) -> Vec<ProviderHealth> {
        let default = self.registry.resolve(None).ok().map(|p| p.name());

        self.registry
            .all_providers()
            .map(|provider| ProviderHealth {
                name: provider.name(),
                configured: provider.is_configured(),
                signature_header: provider.signature_header(),
                default: default == Some(provider.name()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::providers::MockPaymentProvider;

    #[test]
    fn lists_providers_and_marks_default() {
        let mut registry = ProviderRegistry::new(true);
        registry.register(Arc::new(MockPaymentProvider::new("wise")));
        registry.register(Arc::new(MockPaymentProvider::new("flutterwave")));
        registry.register(Arc::new(MockPaymentProvider::unconfigured("mpesa")));

        let health = GetProviderHealthHandler::new(Arc::new(registry)).handle(GetProviderHealthQuery);

        assert_eq!(health.len(), 2);
        assert_eq!(health[0].name, "wise");
        assert!(!health[0].default);
        assert_eq!(health[1].name, "flutterwave");
        assert!(health[1].default);
        assert!(health.iter().all(|h| h.configured));
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let health = GetProviderHealthHandler::new(Arc::new(ProviderRegistry::new(false)))
            .handle(GetProviderHealthQuery);
        assert!(health.is_empty());
    }
}
