//! # Valuation Pipeline
//!
//! Orchestrates a single valuation run.
//!
//! The pipeline walks a fixed sequence of [`Stage`]s. Provider fetches are
//! the only suspension points; every other stage is synchronous domain
//! logic. The first failure short-circuits the run and is returned as an
//! [`ApplicationError`] tagged with the stage and ticker it happened at.
//!
//! ```text
//! ResolveMarket → FetchProfile → ValidateEligibility → FetchStatement
//!   → Normalize → EstimateAssumptions → ComputeDcf → SimulateQuantiles
//!   → Score → AssembleReport
//! ```
//!
//! # Examples
//!
//! ```
//! use equity_valuation::application::services::valuation_pipeline::{
//!     PipelineConfig, ValuationPipeline, ValuationRequest,
//! };
//! use equity_valuation::domain::entities::statement::fields;
//! use equity_valuation::domain::entities::{CompanyProfile, RawStatement};
//! use equity_valuation::domain::value_objects::{Country, Ticker};
//! use equity_valuation::infrastructure::providers::{
//!     CompanyData, InMemoryProvider, ProviderRegistry,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let ticker = Ticker::new("ACME").unwrap();
//! let provider = InMemoryProvider::builder()
//!     .with_company(CompanyData::new(
//!         CompanyProfile::new(ticker, "Industrial Machinery"),
//!         RawStatement::new()
//!             .with(fields::REVENUE, json!(1000))
//!             .with(fields::EBIT, json!(200))
//!             .with(fields::CAPEX, json!(40))
//!             .with(fields::SHARES_OUTSTANDING, json!(100)),
//!     ))
//!     .build();
//! let registry = ProviderRegistry::new().with_provider(Country::Us, Arc::new(provider));
//! let pipeline = ValuationPipeline::new(registry, PipelineConfig::default());
//!
//! let report = pipeline
//!     .run(&ValuationRequest::new("acme").with_iterations(200))
//!     .await
//!     .unwrap();
//! assert_eq!(report.ticker().as_str(), "ACME");
//! assert!(report.quantiles().is_ordered());
//! assert_eq!(report.hybrid_score(), 0.75);
//! # });
//! ```

use crate::application::error::{ApplicationError, ApplicationResult, Stage};
use crate::application::services::signal_source::{FixedSignalSource, SignalSource};
use crate::domain::entities::assumptions::{AssumptionDefaults, AssumptionOverrides};
use crate::domain::entities::company_profile::CompanyProfile;
use crate::domain::entities::report::{Scores, ValuationReport};
use crate::domain::entities::statement::NormalizedStatement;
use crate::domain::entities::valuation::{DEFAULT_PROJECTION_YEARS, DcfInput};
use crate::domain::errors::DomainError;
use crate::domain::services::assumption_estimator::AssumptionEstimator;
use crate::domain::services::dcf_engine::DcfEngine;
use crate::domain::services::hybrid_scorer::{self, HybridWeights};
use crate::domain::services::market_resolver::{
    DefaultMarketResolver, MarketResolver, market_from_override,
};
use crate::domain::services::monte_carlo::{MonteCarloConfig, MonteCarloSimulator};
use crate::domain::services::{eligibility, statement_normalizer};
use crate::domain::value_objects::Ticker;
use crate::infrastructure::providers::traits::ProviderRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default number of Monte Carlo iterations.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Default simulation seed.
pub const DEFAULT_SEED: u64 = 1;

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Monte Carlo iterations when the request does not set them.
    pub iterations: usize,
    /// Simulation seed when the request does not set one.
    pub seed: u64,
    /// DCF horizon in years.
    pub projection_years: u32,
    /// Assumption defaults.
    pub assumptions: AssumptionDefaults,
    /// Simulation shocks and execution mode.
    pub monte_carlo: MonteCarloConfig,
    /// Hybrid score weights.
    pub weights: HybridWeights,
    /// Signals used by the default signal source.
    pub signals: FixedSignalSource,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
            projection_years: DEFAULT_PROJECTION_YEARS,
            assumptions: AssumptionDefaults::default(),
            monte_carlo: MonteCarloConfig::default(),
            weights: HybridWeights::default(),
            signals: FixedSignalSource::default(),
        }
    }
}

impl PipelineConfig {
    /// Sets the default iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the default seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel simulation.
    #[must_use]
    pub fn with_parallel_simulation(mut self, parallel: bool) -> Self {
        self.monte_carlo.parallel = parallel;
        self
    }
}

/// A request to value one company.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuationRequest {
    /// Ticker as supplied by the caller.
    pub ticker: String,
    /// Country override, bypassing market resolution.
    pub country: Option<String>,
    /// Assumption overrides.
    pub overrides: AssumptionOverrides,
    /// Iteration override.
    pub iterations: Option<usize>,
    /// Seed override.
    pub seed: Option<u64>,
}

impl ValuationRequest {
    /// Creates a request for `ticker`.
    #[must_use]
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    /// Forces the market country.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets assumption overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: AssumptionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sets the iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Sets the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl fmt::Display for ValuationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValuationRequest({}", self.ticker)?;
        if let Some(country) = &self.country {
            write!(f, " country={country}")?;
        }
        write!(f, ")")
    }
}

fn tag<E>(stage: Stage, ticker: &Ticker) -> impl FnOnce(E) -> ApplicationError + use<E>
where
    ApplicationError: From<E>,
{
    let ticker = ticker.to_string();
    move |error| ApplicationError::from(error).with_context(stage, ticker)
}

/// Picks the share count: statement first, then profile.
fn shares_outstanding(statement: &NormalizedStatement, profile: &CompanyProfile) -> Option<f64> {
    [Some(statement.shares_outstanding), profile.shares_outstanding()]
        .into_iter()
        .flatten()
        .find(|shares| shares.is_finite() && *shares > 0.0)
}

/// Runs the valuation stages for one request at a time.
#[derive(Debug, Clone)]
pub struct ValuationPipeline {
    registry: ProviderRegistry,
    resolver: Arc<dyn MarketResolver>,
    signals: Arc<dyn SignalSource>,
    estimator: AssumptionEstimator,
    simulator: MonteCarloSimulator,
    engine: DcfEngine,
    config: PipelineConfig,
}

impl ValuationPipeline {
    /// Creates a pipeline with the default resolver and fixed signals.
    ///
    /// # Arguments
    ///
    /// * `registry` - Providers keyed by country.
    /// * `config` - Simulation, assumption and scoring settings.
    #[must_use]
    pub fn new(registry: ProviderRegistry, config: PipelineConfig) -> Self {
        Self {
            registry,
            resolver: Arc::new(DefaultMarketResolver),
            signals: Arc::new(config.signals),
            estimator: AssumptionEstimator::new(config.assumptions),
            simulator: MonteCarloSimulator::new(config.monte_carlo),
            engine: DcfEngine,
            config,
        }
    }

    /// Replaces the market resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn MarketResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replaces the signal source.
    #[must_use]
    pub fn with_signal_source(mut self, signals: Arc<dyn SignalSource>) -> Self {
        self.signals = signals;
        self
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Values one company.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure, tagged with its stage and, once the
    /// ticker is known, the ticker.
    #[tracing::instrument(skip(self, request), fields(ticker = %request.ticker))]
    pub async fn run(&self, request: &ValuationRequest) -> ApplicationResult<ValuationReport> {
        let result = self.run_stages(request).await;
        match &result {
            Ok(report) => info!(
                value_per_share = report.value_per_share(),
                hybrid_score = report.hybrid_score(),
                "valuation completed"
            ),
            Err(error) => warn!(
                code = %error.code(),
                stage = ?error.stage(),
                error = %error,
                "valuation failed"
            ),
        }
        result
    }

    async fn run_stages(&self, request: &ValuationRequest) -> ApplicationResult<ValuationReport> {
        let ticker = Ticker::new(&request.ticker)
            .map_err(|e| ApplicationError::from(e).at_stage(Stage::ResolveMarket))?;

        let market = match request.country.as_deref() {
            Some(country) => market_from_override(&ticker, country),
            None => self.resolver.resolve(&ticker),
        }
        .map_err(tag(Stage::ResolveMarket, &ticker))?;
        let country = market.country();
        debug!(%market, "market resolved");

        let provider = self
            .registry
            .provider_for(country)
            .map_err(tag(Stage::FetchProfile, &ticker))?;
        let profile = provider
            .fetch_company_profile(&ticker)
            .await
            .map_err(tag(Stage::FetchProfile, &ticker))?;
        debug!(provider = provider.name(), sector = profile.sector(), "profile fetched");

        eligibility::validate(&profile).map_err(tag(Stage::ValidateEligibility, &ticker))?;

        let raw = provider
            .fetch_latest_statement(&ticker)
            .await
            .map_err(tag(Stage::FetchStatement, &ticker))?;
        let mut history = provider
            .fetch_revenue_history(&ticker)
            .await
            .map_err(tag(Stage::FetchStatement, &ticker))?;
        debug!(fields = raw.len(), history = history.len(), "statement fetched");

        let statement =
            statement_normalizer::normalize(&raw).map_err(tag(Stage::Normalize, &ticker))?;

        if history.len() < 2 {
            history = vec![statement.revenue];
        }
        let assumptions = self
            .estimator
            .estimate(&history, &request.overrides)
            .map_err(tag(Stage::EstimateAssumptions, &ticker))?;
        debug!(
            rev_growth = assumptions.rev_growth,
            wacc = assumptions.wacc,
            terminal_growth = assumptions.terminal_growth,
            "assumptions estimated"
        );

        let shares = shares_outstanding(&statement, &profile)
            .ok_or_else(|| DomainError::invalid_dcf_inputs("sharesOutstanding must be positive"))
            .map_err(tag(Stage::ComputeDcf, &ticker))?;
        let input = DcfInput::new(statement.fcff(assumptions.tax_rate), assumptions, shares)
            .with_debt(statement.debt)
            .with_cash(statement.cash)
            .with_projection_years(self.config.projection_years);
        let dcf = self
            .engine
            .run(&input)
            .map_err(tag(Stage::ComputeDcf, &ticker))?;
        debug!(value_per_share = dcf.value_per_share, "dcf computed");

        let iterations = request.iterations.unwrap_or(self.config.iterations);
        let seed = request.seed.unwrap_or(self.config.seed);
        let quantiles = self
            .simulator
            .run(&input, iterations, seed)
            .map_err(tag(Stage::SimulateQuantiles, &ticker))?;
        debug!(iterations, seed, p10 = quantiles.p10, p90 = quantiles.p90, "quantiles simulated");

        let signals = self
            .signals
            .signals(&ticker, &dcf)
            .map_err(tag(Stage::Score, &ticker))?;
        let hybrid_score = hybrid_scorer::score(&signals, Some(&self.config.weights))
            .map_err(tag(Stage::Score, &ticker))?;

        Ok(ValuationReport::new(
            ticker,
            country,
            dcf,
            quantiles,
            Scores {
                tracking_score: signals.tracking_score,
                fundamental_score: signals.fundamental_score,
                hybrid_score,
            },
            assumptions,
        ))
    }
}
