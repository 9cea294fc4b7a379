//! # Domain Services
//!
//! The valuation core. Everything here is synchronous and free of I/O.
//!
//! ## Services
//!
//! - [`market_resolver`]: ticker to jurisdiction
//! - [`statement_normalizer`]: raw statement to finite numbers
//! - [`eligibility`]: sector exclusion rules
//! - [`assumption_estimator`]: growth estimate, defaults and overrides
//! - [`dcf_engine`]: point valuation
//! - [`monte_carlo`]: seeded sensitivity quantiles
//! - [`hybrid_scorer`]: weighted signal blend

pub mod assumption_estimator;
pub mod dcf_engine;
pub mod eligibility;
pub mod hybrid_scorer;
pub mod market_resolver;
pub mod monte_carlo;
pub mod statement_normalizer;

pub use assumption_estimator::AssumptionEstimator;
pub use dcf_engine::DcfEngine;
pub use hybrid_scorer::{HybridWeights, ScoreInput};
pub use market_resolver::{DefaultMarketResolver, MarketResolver};
pub use monte_carlo::{MonteCarloConfig, MonteCarloSimulator};
