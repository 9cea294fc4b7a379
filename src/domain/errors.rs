//! # Domain Errors
//!
//! Error codes and business-rule errors raised by the valuation core.
//!
//! Every failure the system can report carries a stable, snake_case
//! [`ErrorCode`]. Domain components raise [`DomainError`], which always maps
//! to the most specific code available.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::errors::{DomainError, ErrorCode};
//!
//! let err = DomainError::unsupported_sector("Banks");
//! assert_eq!(err.code(), ErrorCode::UnsupportedSector);
//! assert_eq!(err.code().as_str(), "unsupported_sector");
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable machine-readable error code.
///
/// Serialized in snake_case; the string form is part of the error record
/// contract consumed by downstream tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No ticker was supplied.
    MissingTicker,
    /// Required command-line arguments were missing or incomplete.
    MissingRequiredArgs,
    /// A provider fetch failed or returned an unusable payload.
    IngestionFailed,
    /// The ticker format is not recognized by any market.
    MarketResolutionFailed,
    /// The company operates in a disallowed sector.
    UnsupportedSector,
    /// A required statement field is missing or non-numeric.
    MissingRequiredFields,
    /// `wacc` is not strictly greater than `terminalGrowth`.
    InvalidDiscountConstraints,
    /// DCF inputs are non-finite or the share count is not positive.
    InvalidDcfInputs,
    /// The simulation iteration count is not a positive integer.
    InvalidSimulationIterations,
    /// A simulated value was not finite.
    InvalidSimulationValue,
    /// Hybrid score weights do not sum to a positive finite number.
    InvalidHybridWeights,
    /// A hybrid score input is not numeric.
    InvalidScoreInput,
    /// Any other failure.
    ValuationFailed,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingTicker => "missing_ticker",
            Self::MissingRequiredArgs => "missing_required_args",
            Self::IngestionFailed => "ingestion_failed",
            Self::MarketResolutionFailed => "market_resolution_failed",
            Self::UnsupportedSector => "unsupported_sector",
            Self::MissingRequiredFields => "missing_required_fields",
            Self::InvalidDiscountConstraints => "invalid_discount_constraints",
            Self::InvalidDcfInputs => "invalid_dcf_inputs",
            Self::InvalidSimulationIterations => "invalid_simulation_iterations",
            Self::InvalidSimulationValue => "invalid_simulation_value",
            Self::InvalidHybridWeights => "invalid_hybrid_weights",
            Self::InvalidScoreInput => "invalid_score_input",
            Self::ValuationFailed => "valuation_failed",
        }
    }

    /// Returns true for known business-rule rejections.
    ///
    /// Unexpected failures (ingestion problems and the catch-all code) return
    /// false, so callers can tell "the company was rejected" apart from "the
    /// run broke".
    #[must_use]
    pub const fn is_business_rule(self) -> bool {
        matches!(
            self,
            Self::MarketResolutionFailed
                | Self::UnsupportedSector
                | Self::MissingRequiredFields
                | Self::InvalidDiscountConstraints
                | Self::InvalidDcfInputs
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business-rule and numeric-validation failures of the valuation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// The ticker was empty after trimming.
    #[error("ticker is empty")]
    MissingTicker,

    /// The ticker is not recognized by any market.
    #[error("cannot resolve market for ticker '{ticker}'")]
    MarketResolutionFailed {
        /// The offending ticker.
        ticker: String,
    },

    /// The sector is on the disallowed list.
    #[error("sector '{sector}' is not supported")]
    UnsupportedSector {
        /// The rejected sector string.
        sector: String,
    },

    /// A required statement field is missing or not a finite number.
    #[error("required statement field '{field}' is missing or not numeric")]
    MissingRequiredFields {
        /// First missing field.
        field: &'static str,
    },

    /// Discount rate does not exceed terminal growth.
    #[error("wacc ({wacc}) must be greater than terminal growth ({terminal_growth})")]
    InvalidDiscountConstraints {
        /// Weighted average cost of capital.
        wacc: f64,
        /// Terminal growth rate.
        terminal_growth: f64,
    },

    /// DCF input validation failed.
    #[error("invalid dcf inputs: {0}")]
    InvalidDcfInputs(String),

    /// Iteration count is not positive.
    #[error("simulation iterations must be positive, got {0}")]
    InvalidSimulationIterations(usize),

    /// A simulation draw produced a non-finite value.
    #[error("simulation iteration {iteration} produced a non-finite value")]
    InvalidSimulationValue {
        /// Zero-based iteration index.
        iteration: usize,
    },

    /// Weight configuration is unusable.
    #[error("hybrid weights must sum to a positive finite number: {0}")]
    InvalidHybridWeights(String),

    /// Score input is not numeric.
    #[error("invalid score input: {0}")]
    InvalidScoreInput(String),
}

impl DomainError {
    /// Creates a market resolution error.
    #[must_use]
    pub fn market_resolution_failed(ticker: impl Into<String>) -> Self {
        Self::MarketResolutionFailed {
            ticker: ticker.into(),
        }
    }

    /// Creates an unsupported sector error.
    #[must_use]
    pub fn unsupported_sector(sector: impl Into<String>) -> Self {
        Self::UnsupportedSector {
            sector: sector.into(),
        }
    }

    /// Creates a discount constraint error.
    #[must_use]
    pub fn invalid_discount_constraints(wacc: f64, terminal_growth: f64) -> Self {
        Self::InvalidDiscountConstraints {
            wacc,
            terminal_growth,
        }
    }

    /// Creates a DCF input error.
    #[must_use]
    pub fn invalid_dcf_inputs(message: impl Into<String>) -> Self {
        Self::InvalidDcfInputs(message.into())
    }

    /// Creates a hybrid weight error.
    #[must_use]
    pub fn invalid_hybrid_weights(message: impl Into<String>) -> Self {
        Self::InvalidHybridWeights(message.into())
    }

    /// Creates a score input error.
    #[must_use]
    pub fn invalid_score_input(message: impl Into<String>) -> Self {
        Self::InvalidScoreInput(message.into())
    }

    /// Returns the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingTicker => ErrorCode::MissingTicker,
            Self::MarketResolutionFailed { .. } => ErrorCode::MarketResolutionFailed,
            Self::UnsupportedSector { .. } => ErrorCode::UnsupportedSector,
            Self::MissingRequiredFields { .. } => ErrorCode::MissingRequiredFields,
            Self::InvalidDiscountConstraints { .. } => ErrorCode::InvalidDiscountConstraints,
            Self::InvalidDcfInputs(_) => ErrorCode::InvalidDcfInputs,
            Self::InvalidSimulationIterations(_) => ErrorCode::InvalidSimulationIterations,
            Self::InvalidSimulationValue { .. } => ErrorCode::InvalidSimulationValue,
            Self::InvalidHybridWeights(_) => ErrorCode::InvalidHybridWeights,
            Self::InvalidScoreInput(_) => ErrorCode::InvalidScoreInput,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod error_code {
        use super::*;

        #[test]
        fn display_matches_wire_format() {
            assert_eq!(ErrorCode::UnsupportedSector.to_string(), "unsupported_sector");
            assert_eq!(
                ErrorCode::InvalidDiscountConstraints.to_string(),
                "invalid_discount_constraints"
            );
            assert_eq!(ErrorCode::ValuationFailed.to_string(), "valuation_failed");
        }

        #[test]
        fn serde_uses_snake_case() {
            let json = serde_json::to_string(&ErrorCode::MissingRequiredFields).unwrap();
            assert_eq!(json, "\"missing_required_fields\"");
            let back: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, ErrorCode::MissingRequiredFields);
        }

        #[test]
        fn business_rules_are_distinguished_from_failures() {
            assert!(ErrorCode::UnsupportedSector.is_business_rule());
            assert!(ErrorCode::InvalidDiscountConstraints.is_business_rule());
            assert!(!ErrorCode::IngestionFailed.is_business_rule());
            assert!(!ErrorCode::ValuationFailed.is_business_rule());
        }
    }

    mod domain_error {
        use super::*;

        #[test]
        fn codes_are_specific() {
            assert_eq!(DomainError::MissingTicker.code(), ErrorCode::MissingTicker);
            assert_eq!(
                DomainError::market_resolution_failed("12AB34").code(),
                ErrorCode::MarketResolutionFailed
            );
            assert_eq!(
                DomainError::MissingRequiredFields { field: "ebit" }.code(),
                ErrorCode::MissingRequiredFields
            );
            assert_eq!(
                DomainError::InvalidSimulationIterations(0).code(),
                ErrorCode::InvalidSimulationIterations
            );
            assert_eq!(
                DomainError::invalid_score_input("a").code(),
                ErrorCode::InvalidScoreInput
            );
        }

        #[test]
        fn messages_carry_context() {
            let err = DomainError::invalid_discount_constraints(0.02, 0.03);
            assert!(err.to_string().contains("0.02"));
            assert!(err.to_string().contains("0.03"));

            let err = DomainError::unsupported_sector("Financial Services");
            assert!(err.to_string().contains("Financial Services"));
        }
    }
}
