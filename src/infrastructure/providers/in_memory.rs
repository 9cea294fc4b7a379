//! # In-Memory Provider
//!
//! In-memory implementation of [`FinancialDataProvider`] for tests and demos.
//!
//! Companies are stored in a thread-safe `HashMap`. Individual operations
//! can be made to fail for a ticker to exercise error paths.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::entities::{CompanyProfile, RawStatement};
//! use equity_valuation::domain::value_objects::Ticker;
//! use equity_valuation::infrastructure::providers::in_memory::{CompanyData, InMemoryProvider};
//!
//! let ticker = Ticker::new("ACME").unwrap();
//! let provider = InMemoryProvider::builder()
//!     .with_company(CompanyData::new(
//!         CompanyProfile::new(ticker.clone(), "Industrial Machinery"),
//!         RawStatement::new(),
//!     ))
//!     .build();
//! assert_eq!(provider.len(), 1);
//! ```

use crate::domain::entities::{CompanyProfile, RawStatement};
use crate::domain::value_objects::Ticker;
use crate::infrastructure::providers::error::{IngestionError, IngestionResult};
use crate::infrastructure::providers::traits::FinancialDataProvider;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Provider operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOperation {
    /// [`FinancialDataProvider::fetch_company_profile`].
    Profile,
    /// [`FinancialDataProvider::fetch_latest_statement`].
    Statement,
    /// [`FinancialDataProvider::fetch_revenue_history`].
    RevenueHistory,
}

/// Everything the provider knows about one company.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyData {
    profile: CompanyProfile,
    statement: RawStatement,
    revenue_history: Vec<f64>,
}

impl CompanyData {
    /// Creates company data without revenue history.
    #[must_use]
    pub fn new(profile: CompanyProfile, statement: RawStatement) -> Self {
        Self {
            profile,
            statement,
            revenue_history: Vec::new(),
        }
    }

    /// Sets the annual revenue history, oldest first.
    #[must_use]
    pub fn with_revenue_history(mut self, history: Vec<f64>) -> Self {
        self.revenue_history = history;
        self
    }

    /// Returns the ticker.
    #[inline]
    #[must_use]
    pub fn ticker(&self) -> &Ticker {
        self.profile.ticker()
    }
}

type Failures = HashMap<(Ticker, ProviderOperation), IngestionError>;

/// In-memory [`FinancialDataProvider`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    companies: Arc<RwLock<HashMap<Ticker, CompanyData>>>,
    failures: Arc<RwLock<Failures>>,
    calls: Arc<AtomicUsize>,
}

/// Builder for [`InMemoryProvider`].
#[derive(Debug, Default)]
pub struct InMemoryProviderBuilder {
    companies: HashMap<Ticker, CompanyData>,
    failures: Failures,
}

impl InMemoryProviderBuilder {
    /// Adds a company.
    #[must_use]
    pub fn with_company(mut self, data: CompanyData) -> Self {
        self.companies.insert(data.ticker().clone(), data);
        self
    }

    /// Makes `operation` fail with `error` for `ticker`.
    #[must_use]
    pub fn with_failure(
        mut self,
        ticker: Ticker,
        operation: ProviderOperation,
        error: IngestionError,
    ) -> Self {
        self.failures.insert((ticker, operation), error);
        self
    }

    /// Builds the provider.
    #[must_use]
    pub fn build(self) -> InMemoryProvider {
        InMemoryProvider {
            companies: Arc::new(RwLock::new(self.companies)),
            failures: Arc::new(RwLock::new(self.failures)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl InMemoryProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> InMemoryProviderBuilder {
        InMemoryProviderBuilder::default()
    }

    /// Adds or replaces a company.
    pub async fn insert(&self, data: CompanyData) {
        let mut companies = self.companies.write().await;
        companies.insert(data.ticker().clone(), data);
    }

    /// Makes `operation` fail with `error` for `ticker`.
    pub async fn fail(&self, ticker: Ticker, operation: ProviderOperation, error: IngestionError) {
        let mut failures = self.failures.write().await;
        failures.insert((ticker, operation), error);
    }

    /// Removes every injected failure.
    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
    }

    /// Returns the number of companies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.companies
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if no company is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of fetch calls served, failed ones included.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    async fn lookup<T>(
        &self,
        ticker: &Ticker,
        operation: ProviderOperation,
        select: impl FnOnce(&CompanyData) -> T,
    ) -> IngestionResult<T> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(error) = self
            .failures
            .read()
            .await
            .get(&(ticker.clone(), operation))
        {
            return Err(error.clone());
        }
        self.companies
            .read()
            .await
            .get(ticker)
            .map(select)
            .ok_or_else(|| IngestionError::not_found("company", ticker.as_str()))
    }
}

#[async_trait]
impl FinancialDataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn fetch_company_profile(&self, ticker: &Ticker) -> IngestionResult<CompanyProfile> {
        self.lookup(ticker, ProviderOperation::Profile, |c| c.profile.clone())
            .await
    }

    async fn fetch_latest_statement(&self, ticker: &Ticker) -> IngestionResult<RawStatement> {
        self.lookup(ticker, ProviderOperation::Statement, |c| c.statement.clone())
            .await
    }

    async fn fetch_revenue_history(&self, ticker: &Ticker) -> IngestionResult<Vec<f64>> {
        self.lookup(ticker, ProviderOperation::RevenueHistory, |c| {
            c.revenue_history.clone()
        })
        .await
    }
}
