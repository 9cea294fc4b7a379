//! # Market
//!
//! Jurisdictions the engine can value and how a ticker was mapped to one.
//!
//! - [`Country`] - closed set of supported jurisdictions
//! - [`Market`] - a resolved jurisdiction plus where the decision came from
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::value_objects::market::Country;
//!
//! let jp: Country = "jp".parse().unwrap();
//! assert_eq!(jp, Country::Jp);
//! assert_eq!(jp.to_string(), "JP");
//! assert!("DE".parse::<Country>().is_err());
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Country {
    /// United States, filings from SEC EDGAR.
    Us = 0,
    /// Japan, filings from EDINET/TDnet.
    Jp = 1,
}

impl Country {
    /// All supported countries.
    pub const ALL: [Self; 2] = [Self::Us, Self::Jp];

    /// Returns the ISO 3166-1 alpha-2 code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Jp => "JP",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error parsing a [`Country`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown country '{0}'")]
pub struct ParseCountryError(pub String);

impl FromStr for Country {
    type Err = ParseCountryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "US" | "USA" => Ok(Self::Us),
            "JP" | "JPN" => Ok(Self::Jp),
            _ => Err(ParseCountryError(s.to_string())),
        }
    }
}

/// How a market was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSource {
    /// Inferred from the ticker format.
    Resolved,
    /// Supplied explicitly by the caller.
    Override,
}

/// Resolved market for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    country: Country,
    source: MarketSource,
}

impl Market {
    /// A market inferred by a resolver.
    #[must_use]
    pub const fn resolved(country: Country) -> Self {
        Self {
            country,
            source: MarketSource::Resolved,
        }
    }

    /// A market supplied by the caller.
    #[must_use]
    pub const fn overridden(country: Country) -> Self {
        Self {
            country,
            source: MarketSource::Override,
        }
    }

    /// Returns the jurisdiction.
    #[inline]
    #[must_use]
    pub const fn country(&self) -> Country {
        self.country
    }

    /// Returns how the market was decided.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> MarketSource {
        self.source
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.country)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod country {
        use super::*;

        #[test]
        fn parses_case_insensitively() {
            assert_eq!("us".parse::<Country>().unwrap(), Country::Us);
            assert_eq!(" JP ".parse::<Country>().unwrap(), Country::Jp);
            assert_eq!("usa".parse::<Country>().unwrap(), Country::Us);
        }

        #[test]
        fn rejects_unknown() {
            let err = "GB".parse::<Country>().unwrap_err();
            assert_eq!(err, ParseCountryError("GB".to_string()));
        }

        #[test]
        fn serde_is_uppercase() {
            assert_eq!(serde_json::to_string(&Country::Jp).unwrap(), "\"JP\"");
            let c: Country = serde_json::from_str("\"US\"").unwrap();
            assert_eq!(c, Country::Us);
        }
    }

    mod market {
        use super::*;

        #[test]
        fn records_source() {
            assert_eq!(Market::resolved(Country::Us).source(), MarketSource::Resolved);
            assert_eq!(Market::overridden(Country::Jp).source(), MarketSource::Override);
            assert_eq!(Market::overridden(Country::Jp).country(), Country::Jp);
            assert_eq!(Market::resolved(Country::Us).to_string(), "US");
        }
    }
}
