//! # Equity Valuation
//!
//! Intrinsic per-share valuation of listed companies from regulatory
//! filings: a discounted-cash-flow point estimate, a seeded Monte Carlo
//! sensitivity range and a hybrid quality score.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ api          command line (feature `cli`)                │
//! ├──────────────────────────────────────────────────────────┤
//! │ application  valuation pipeline, error records           │
//! ├──────────────────────────────────────────────────────────┤
//! │ domain       resolver, normalizer, estimator, DCF,       │
//! │              Monte Carlo, scorer (pure, synchronous)     │
//! ├──────────────────────────────────────────────────────────┤
//! │ infrastructure  EDGAR / EDINET providers, report writer  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Flow
//!
//! ```text
//! ticker → market → profile → eligibility → statement → normalize
//!        → assumptions → DCF → quantiles → score → report
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use equity_valuation::domain::entities::{Assumptions, DcfInput};
//! use equity_valuation::domain::services::{DcfEngine, MonteCarloSimulator};
//!
//! let input = DcfInput::new(100.0, Assumptions::default(), 10.0);
//! let point = DcfEngine.run(&input).unwrap();
//! let range = MonteCarloSimulator::default().run(&input, 500, 42).unwrap();
//!
//! assert!(point.value_per_share > 0.0);
//! assert!(range.is_ordered());
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

#[cfg(feature = "cli")]
pub mod api;

pub use application::{ApplicationError, ApplicationResult, ErrorRecord, Stage};
pub use config::AppConfig;
pub use domain::{DomainError, DomainResult, ErrorCode};
