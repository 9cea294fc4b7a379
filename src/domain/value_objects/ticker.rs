//! # Ticker
//!
//! Normalized exchange symbol.
//!
//! Tickers are trimmed and upper-cased on construction, so `" aapl "` and
//! `"AAPL"` identify the same company everywhere downstream.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::value_objects::ticker::Ticker;
//!
//! let ticker = Ticker::new(" brk.b ").unwrap();
//! assert_eq!(ticker.as_str(), "BRK.B");
//! assert!(Ticker::new("   ").is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trimmed, upper-cased, non-empty ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Normalizes and validates a raw ticker.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingTicker`] if the input is empty after
    /// trimming.
    pub fn new(raw: impl AsRef<str>) -> DomainResult<Self> {
        let normalized = raw.as_ref().trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::MissingTicker);
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized symbol.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(Ticker::new("  msft\t").unwrap().as_str(), "MSFT");
        assert_eq!(Ticker::new("7203").unwrap().as_str(), "7203");
    }

    #[test]
    fn empty_is_missing_ticker() {
        assert_eq!(Ticker::new(""), Err(DomainError::MissingTicker));
        assert_eq!(Ticker::new(" \n "), Err(DomainError::MissingTicker));
    }

    #[test]
    fn serde_normalizes_on_the_way_in() {
        let ticker: Ticker = serde_json::from_str("\"aapl\"").unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"AAPL\"");
        assert!(serde_json::from_str::<Ticker>("\"  \"").is_err());
    }
}
