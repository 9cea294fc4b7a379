//! # Financial Data Provider
//!
//! Port through which the pipeline fetches company data.
//!
//! This module defines the [`FinancialDataProvider`] trait implemented by
//! every filing source, and the [`ProviderRegistry`] that selects one per
//! market.
//!
//! # Examples
//!
//! ```ignore
//! use equity_valuation::infrastructure::providers::traits::FinancialDataProvider;
//!
//! struct MyProvider { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl FinancialDataProvider for MyProvider {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::{CompanyProfile, RawStatement};
use crate::domain::value_objects::{Country, Ticker};
use crate::infrastructure::providers::error::{IngestionError, IngestionResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Source of company profiles and financial statements.
#[async_trait]
pub trait FinancialDataProvider: Send + Sync + fmt::Debug {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Fetches identity and sector information.
    ///
    /// # Errors
    ///
    /// Returns an [`IngestionError`] if the company cannot be found or the
    /// payload is unusable.
    async fn fetch_company_profile(&self, ticker: &Ticker) -> IngestionResult<CompanyProfile>;

    /// Fetches the most recent statement as raw fields.
    ///
    /// # Errors
    ///
    /// Returns an [`IngestionError`] if the statement cannot be retrieved.
    async fn fetch_latest_statement(&self, ticker: &Ticker) -> IngestionResult<RawStatement>;

    /// Fetches annual revenues, oldest first.
    ///
    /// The default implementation reports no history.
    ///
    /// # Errors
    ///
    /// Returns an [`IngestionError`] if the history cannot be retrieved.
    async fn fetch_revenue_history(&self, _ticker: &Ticker) -> IngestionResult<Vec<f64>> {
        Ok(Vec::new())
    }
}

/// Providers keyed by market.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<Country, Arc<dyn FinancialDataProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider` for `country`, replacing any previous one.
    #[must_use]
    pub fn with_provider(mut self, country: Country, provider: Arc<dyn FinancialDataProvider>) -> Self {
        self.register(country, provider);
        self
    }

    /// Registers `provider` for `country`, replacing any previous one.
    pub fn register(&mut self, country: Country, provider: Arc<dyn FinancialDataProvider>) {
        self.providers.insert(country, provider);
    }

    /// Returns the provider for `country`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::UnsupportedMarket`] if none is registered.
    pub fn provider_for(&self, country: Country) -> IngestionResult<Arc<dyn FinancialDataProvider>> {
        self.providers
            .get(&country)
            .cloned()
            .ok_or_else(|| IngestionError::unsupported_market(country.code()))
    }

    /// Returns the number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::providers::in_memory::InMemoryProvider;

    #[test]
    fn lookup_by_country() {
        let registry =
            ProviderRegistry::new().with_provider(Country::Us, Arc::new(InMemoryProvider::new()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.provider_for(Country::Us).unwrap().name(), "in-memory");
    }

    #[test]
    fn missing_country_is_unsupported_market() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.provider_for(Country::Jp).unwrap_err(),
            IngestionError::unsupported_market("JP")
        );
    }

    #[tokio::test]
    async fn default_history_is_empty() {
        #[derive(Debug)]
        struct Minimal;

        #[async_trait]
        impl FinancialDataProvider for Minimal {
            fn name(&self) -> &str {
                "minimal"
            }
            async fn fetch_company_profile(&self, t: &Ticker) -> IngestionResult<CompanyProfile> {
                Ok(CompanyProfile::new(t.clone(), "Software"))
            }
            async fn fetch_latest_statement(&self, _: &Ticker) -> IngestionResult<RawStatement> {
                Ok(RawStatement::new())
            }
        }

        let history = Minimal
            .fetch_revenue_history(&Ticker::new("X").unwrap())
            .await
            .unwrap();
        assert!(history.is_empty());
    }
}
