//! # Company Profile
//!
//! Identity and sector classification of a listed company.

use crate::domain::value_objects::Ticker;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sector reported when a provider has no classification.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Identity and sector of a company as reported by its provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    ticker: Ticker,
    sector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shares_outstanding: Option<f64>,
}

impl CompanyProfile {
    /// Creates a profile with a sector and no optional attributes.
    #[must_use]
    pub fn new(ticker: Ticker, sector: impl Into<String>) -> Self {
        Self {
            ticker,
            sector: sector.into(),
            name: None,
            shares_outstanding: None,
        }
    }

    /// Sets the company name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the share count reported alongside the profile.
    #[must_use]
    pub fn with_shares_outstanding(mut self, shares: f64) -> Self {
        self.shares_outstanding = Some(shares);
        self
    }

    /// Returns the ticker.
    #[inline]
    #[must_use]
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Returns the sector description.
    #[inline]
    #[must_use]
    pub fn sector(&self) -> &str {
        &self.sector
    }

    /// Returns the company name, if known.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the share count, if the provider reported one.
    #[inline]
    #[must_use]
    pub fn shares_outstanding(&self) -> Option<f64> {
        self.shares_outstanding
    }
}

impl fmt::Display for CompanyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({}, {})", self.ticker, name, self.sector),
            None => write!(f, "{} ({})", self.ticker, self.sector),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ticker(s: &str) -> Ticker {
        Ticker::new(s).unwrap()
    }

    #[test]
    fn builder_sets_optional_fields() {
        let profile = CompanyProfile::new(ticker("AAPL"), "Electronic Computers")
            .with_name("Apple Inc.")
            .with_shares_outstanding(15_550_061_000.0);

        assert_eq!(profile.ticker().as_str(), "AAPL");
        assert_eq!(profile.sector(), "Electronic Computers");
        assert_eq!(profile.name(), Some("Apple Inc."));
        assert_eq!(profile.shares_outstanding(), Some(15_550_061_000.0));
    }

    #[test]
    fn display_includes_name_when_known() {
        let bare = CompanyProfile::new(ticker("7203"), "Transportation Equipment");
        assert_eq!(bare.to_string(), "7203 (Transportation Equipment)");
        let named = bare.with_name("Toyota");
        assert_eq!(named.to_string(), "7203 (Toyota, Transportation Equipment)");
    }

    #[test]
    fn serializes_camel_case_and_omits_none() {
        let profile = CompanyProfile::new(ticker("msft"), "Software").with_shares_outstanding(10.0);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["ticker"], "MSFT");
        assert_eq!(json["sharesOutstanding"], 10.0);
        assert!(json.get("name").is_none());
    }
}
