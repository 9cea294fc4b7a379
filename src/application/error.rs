//! # Application Errors
//!
//! Tagged failures of a valuation run.
//!
//! Every failure that leaves the pipeline is an [`ApplicationError`]: an
//! error kind (which fixes the reported [`ErrorCode`]) plus the pipeline
//! [`Stage`] and ticker it happened at. Context is attached once, at the
//! innermost point that knows it, and never overwritten afterwards.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError { kind, stage, ticker }
//! └── ApplicationErrorKind
//!     ├── Domain(DomainError)       - business rules and numeric validation
//!     ├── Ingestion(IngestionError) - provider failures
//!     ├── Input { code, message }   - command-line input problems
//!     ├── Output(OutputError)       - report writing failures
//!     └── Unexpected(String)        - anything else
//! ```
//!
//! # Examples
//!
//! ```
//! use equity_valuation::application::error::{ApplicationError, Stage};
//! use equity_valuation::domain::errors::{DomainError, ErrorCode};
//!
//! let err = ApplicationError::from(DomainError::unsupported_sector("Banks"))
//!     .with_context(Stage::ValidateEligibility, "JPM")
//!     .with_context(Stage::AssembleReport, "OTHER");
//!
//! assert_eq!(err.code(), ErrorCode::UnsupportedSector);
//! assert_eq!(err.stage(), Some(Stage::ValidateEligibility));
//! assert_eq!(err.ticker(), Some("JPM"));
//! ```

use crate::domain::errors::{DomainError, ErrorCode};
use crate::infrastructure::output::error::OutputError;
use crate::infrastructure::providers::error::IngestionError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Step of a valuation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Command-line parsing.
    Cli,
    /// Ticker to market.
    ResolveMarket,
    /// Company profile fetch.
    FetchProfile,
    /// Sector check.
    ValidateEligibility,
    /// Statement and revenue history fetch.
    FetchStatement,
    /// Statement normalization.
    Normalize,
    /// Assumption estimation.
    EstimateAssumptions,
    /// Point valuation.
    ComputeDcf,
    /// Monte Carlo quantiles.
    SimulateQuantiles,
    /// Hybrid scoring.
    Score,
    /// Report assembly.
    AssembleReport,
    /// Writing output files.
    WriteReport,
}

impl Stage {
    /// Returns the wire representation of the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::ResolveMarket => "resolve_market",
            Self::FetchProfile => "fetch_profile",
            Self::ValidateEligibility => "validate_eligibility",
            Self::FetchStatement => "fetch_statement",
            Self::Normalize => "normalize",
            Self::EstimateAssumptions => "estimate_assumptions",
            Self::ComputeDcf => "compute_dcf",
            Self::SimulateQuantiles => "simulate_quantiles",
            Self::Score => "score",
            Self::AssembleReport => "assemble_report",
            Self::WriteReport => "write_report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong.
#[derive(Debug, Error)]
pub enum ApplicationErrorKind {
    /// Domain rule or validation failure.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Provider failure.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    /// Invalid command-line input.
    #[error("{message}")]
    Input {
        /// Reported code.
        code: ErrorCode,
        /// Error message.
        message: String,
    },

    /// Output failure.
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Unclassified failure.
    #[error("{0}")]
    Unexpected(String),
}

impl ApplicationErrorKind {
    /// Returns the reported code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Domain(e) => e.code(),
            Self::Ingestion(e) => e.code(),
            Self::Input { code, .. } => *code,
            Self::Output(_) | Self::Unexpected(_) => ErrorCode::ValuationFailed,
        }
    }
}

/// A failure tagged with where it happened.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct ApplicationError {
    kind: ApplicationErrorKind,
    stage: Option<Stage>,
    ticker: Option<String>,
}

impl ApplicationError {
    /// Creates an error without context.
    #[must_use]
    pub fn new(kind: ApplicationErrorKind) -> Self {
        Self {
            kind,
            stage: None,
            ticker: None,
        }
    }

    /// No ticker was supplied.
    #[must_use]
    pub fn missing_ticker() -> Self {
        Self::from(DomainError::MissingTicker)
    }

    /// Command-line arguments are incomplete.
    #[must_use]
    pub fn missing_required_args(message: impl Into<String>) -> Self {
        Self::new(ApplicationErrorKind::Input {
            code: ErrorCode::MissingRequiredArgs,
            message: message.into(),
        })
    }

    /// An unclassified failure.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ApplicationErrorKind::Unexpected(message.into()))
    }

    /// Sets the stage if none is set yet.
    #[must_use]
    pub fn at_stage(mut self, stage: Stage) -> Self {
        self.stage.get_or_insert(stage);
        self
    }

    /// Sets the ticker if none is set yet.
    #[must_use]
    pub fn for_ticker(mut self, ticker: impl Into<String>) -> Self {
        if self.ticker.is_none() {
            self.ticker = Some(ticker.into());
        }
        self
    }

    /// Sets stage and ticker where absent.
    #[must_use]
    pub fn with_context(self, stage: Stage, ticker: impl Into<String>) -> Self {
        self.at_stage(stage).for_ticker(ticker)
    }

    /// Returns the error kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ApplicationErrorKind {
        &self.kind
    }

    /// Returns the reported code.
    #[inline]
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Returns the stage, if known.
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// Returns the ticker, if known.
    #[inline]
    #[must_use]
    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    /// Returns true for known business-rule rejections.
    #[must_use]
    pub fn is_business_rule(&self) -> bool {
        self.code().is_business_rule()
    }
}

impl From<DomainError> for ApplicationError {
    fn from(error: DomainError) -> Self {
        Self::new(ApplicationErrorKind::Domain(error))
    }
}

impl From<IngestionError> for ApplicationError {
    fn from(error: IngestionError) -> Self {
        Self::new(ApplicationErrorKind::Ingestion(error))
    }
}

impl From<OutputError> for ApplicationError {
    fn from(error: OutputError) -> Self {
        Self::new(ApplicationErrorKind::Output(error))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Serialized form of a failure, written as `error.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Stage the failure happened at.
    pub stage: Option<Stage>,
    /// Ticker being valued.
    pub ticker: Option<String>,
    /// Correlation id.
    pub trace_id: String,
}

/// Generates a fresh trace id.
#[must_use]
pub fn new_trace_id() -> String {
    format!("trace-{}", Uuid::new_v4())
}

impl ErrorRecord {
    /// Builds a record with a fresh trace id.
    #[must_use]
    pub fn from_error(error: &ApplicationError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
            stage: error.stage(),
            ticker: error.ticker().map(str::to_string),
            trace_id: new_trace_id(),
        }
    }

    /// Replaces the trace id.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }
}

impl From<&ApplicationError> for ErrorRecord {
    fn from(error: &ApplicationError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod context {
        use super::*;

        #[test]
        fn first_context_wins() {
            let err = ApplicationError::from(IngestionError::timeout("slow"))
                .at_stage(Stage::FetchProfile)
                .for_ticker("AAPL")
                .with_context(Stage::AssembleReport, "MSFT");
            assert_eq!(err.stage(), Some(Stage::FetchProfile));
            assert_eq!(err.ticker(), Some("AAPL"));
            assert_eq!(err.code(), ErrorCode::IngestionFailed);
        }

        #[test]
        fn unexpected_maps_to_valuation_failed() {
            let err = ApplicationError::unexpected("boom");
            assert_eq!(err.code(), ErrorCode::ValuationFailed);
            assert!(!err.is_business_rule());
            assert_eq!(err.to_string(), "boom");
        }

        #[test]
        fn output_maps_to_valuation_failed() {
            let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
            let err = ApplicationError::from(OutputError::io("/out/result.json", io));
            assert_eq!(err.code(), ErrorCode::ValuationFailed);
        }

        #[test]
        fn input_errors_keep_their_code() {
            assert_eq!(
                ApplicationError::missing_required_args("--country needs --ticker").code(),
                ErrorCode::MissingRequiredArgs
            );
            assert_eq!(ApplicationError::missing_ticker().code(), ErrorCode::MissingTicker);
        }

        #[test]
        fn domain_messages_pass_through() {
            let err = ApplicationError::from(DomainError::unsupported_sector("Banks"));
            assert_eq!(err.to_string(), "sector 'Banks' is not supported");
            assert!(err.is_business_rule());
        }
    }

    mod record {
        use super::*;

        #[test]
        fn record_is_complete() {
            let err = ApplicationError::from(DomainError::unsupported_sector("Banks"))
                .with_context(Stage::ValidateEligibility, "JPM");
            let record = ErrorRecord::from(&err);
            assert_eq!(record.code, ErrorCode::UnsupportedSector);
            assert_eq!(record.stage, Some(Stage::ValidateEligibility));
            assert_eq!(record.ticker.as_deref(), Some("JPM"));
            assert!(record.trace_id.starts_with("trace-"));
        }

        #[test]
        fn json_shape() {
            let record = ErrorRecord::from_error(&ApplicationError::missing_ticker().at_stage(Stage::Cli))
                .with_trace_id("trace-fixed");
            let json = serde_json::to_value(&record).unwrap();
            assert_eq!(json["code"], "missing_ticker");
            assert_eq!(json["stage"], "cli");
            assert!(json["ticker"].is_null());
            assert_eq!(json["traceId"], "trace-fixed");
        }

        #[test]
        fn trace_ids_are_unique() {
            assert_ne!(new_trace_id(), new_trace_id());
        }
    }
}
