//! # Ingestion Errors
//!
//! Error types for financial data providers.
//!
//! Every ingestion failure is reported to callers with the
//! `ingestion_failed` code; the variants exist for logging and for external
//! retry policies.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::infrastructure::providers::error::IngestionError;
//!
//! let error = IngestionError::timeout("companyfacts request timed out");
//! assert!(error.is_retryable());
//!
//! let error = IngestionError::not_found("cik", "ZZZZ");
//! assert!(!error.is_retryable());
//! ```

use crate::domain::errors::ErrorCode;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    /// Request timed out.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error.
    #[error("provider network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// Non-success HTTP status.
    #[error("provider returned HTTP {status}: {message}")]
    HttpStatus {
        /// Status code.
        status: u16,
        /// Response body excerpt.
        message: String,
    },

    /// The requested resource does not exist at the provider.
    #[error("{resource} not found for '{id}'")]
    NotFound {
        /// Kind of resource.
        resource: String,
        /// Lookup key.
        id: String,
    },

    /// The payload could not be parsed or has an unexpected shape.
    #[error("malformed provider payload: {message}")]
    MalformedPayload {
        /// Error message.
        message: String,
    },

    /// No provider is registered for the market.
    #[error("no provider registered for market '{market}'")]
    UnsupportedMarket {
        /// Market code.
        market: String,
    },

    /// Local fixture or filing could not be read.
    #[error("cannot read '{}': {message}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Provider is misconfigured.
    #[error("provider configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },
}

impl IngestionError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Creates a malformed payload error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Creates an unsupported market error.
    #[must_use]
    pub fn unsupported_market(market: impl Into<String>) -> Self {
        Self::UnsupportedMarket {
            market: market.into(),
        }
    }

    /// Creates an I/O error for `path`.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, error: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: error.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns true if the failure is transient and may succeed on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns the reported error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::IngestionFailed
    }
}

/// Result type for provider operations.
pub type IngestionResult<T> = Result<T, IngestionError>;
