//! # Financial Data Providers
//!
//! Adapters that fetch company profiles and statements.
//!
//! - [`edgar::EdgarProvider`]: US filings via SEC EDGAR
//! - [`edinet::EdinetProvider`]: JP filings from a local EDINET/TDnet mirror
//! - [`in_memory::InMemoryProvider`]: test double

pub mod edgar;
pub mod edinet;
pub mod error;
pub mod http_client;
pub mod in_memory;
pub mod traits;

pub use edgar::{EdgarConfig, EdgarFixtures, EdgarProvider};
pub use edinet::{EdinetConfig, EdinetProvider};
pub use error::{IngestionError, IngestionResult};
pub use in_memory::{CompanyData, InMemoryProvider, ProviderOperation};
pub use traits::{FinancialDataProvider, ProviderRegistry};

use crate::domain::value_objects::Country;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Settings for every provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// US provider.
    pub edgar: EdgarConfig,
    /// JP provider.
    pub edinet: EdinetConfig,
}

/// Builds the default registry: EDGAR for the US, EDINET for Japan.
///
/// # Errors
///
/// Returns [`IngestionError::Configuration`] if a provider cannot be built.
pub fn build_registry(config: &ProvidersConfig) -> IngestionResult<ProviderRegistry> {
    Ok(ProviderRegistry::new()
        .with_provider(Country::Us, Arc::new(EdgarProvider::new(config.edgar.clone())?))
        .with_provider(Country::Jp, Arc::new(EdinetProvider::new(config.edinet.clone())?)))
}
