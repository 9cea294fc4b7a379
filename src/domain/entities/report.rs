//! # Valuation Report
//!
//! Immutable result of a successful pipeline run.
//!
//! The report flattens the DCF result and simulated quantiles into a single
//! camelCase JSON object; it is constructed once by the pipeline and only
//! exposes getters afterwards.

use crate::domain::entities::assumptions::Assumptions;
use crate::domain::entities::valuation::{DcfResult, SimulationQuantiles};
use crate::domain::value_objects::{Country, Ticker};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three scores reported for a company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    /// Quality/tracking signal.
    pub tracking_score: f64,
    /// DCF signal.
    pub fundamental_score: f64,
    /// Weighted blend, rounded to four decimals.
    pub hybrid_score: f64,
}

/// Final valuation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValuationReport {
    ticker: Ticker,
    country: Country,
    #[serde(flatten)]
    dcf: DcfResult,
    #[serde(flatten)]
    quantiles: SimulationQuantiles,
    #[serde(flatten)]
    scores: Scores,
    assumptions: Assumptions,
}

impl ValuationReport {
    /// Assembles a report.
    #[must_use]
    pub fn new(
        ticker: Ticker,
        country: Country,
        dcf: DcfResult,
        quantiles: SimulationQuantiles,
        scores: Scores,
        assumptions: Assumptions,
    ) -> Self {
        Self {
            ticker,
            country,
            dcf,
            quantiles,
            scores,
            assumptions,
        }
    }

    /// Returns the ticker.
    #[inline]
    #[must_use]
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Returns the country.
    #[inline]
    #[must_use]
    pub fn country(&self) -> Country {
        self.country
    }

    /// Returns the DCF point valuation.
    #[inline]
    #[must_use]
    pub fn dcf(&self) -> &DcfResult {
        &self.dcf
    }

    /// Returns the simulated quantiles.
    #[inline]
    #[must_use]
    pub fn quantiles(&self) -> &SimulationQuantiles {
        &self.quantiles
    }

    /// Returns the scores.
    #[inline]
    #[must_use]
    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    /// Returns the assumptions the valuation used.
    #[inline]
    #[must_use]
    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Returns the per-share point value.
    #[inline]
    #[must_use]
    pub fn value_per_share(&self) -> f64 {
        self.dcf.value_per_share
    }

    /// Returns the hybrid score.
    #[inline]
    #[must_use]
    pub fn hybrid_score(&self) -> f64 {
        self.scores.hybrid_score
    }
}

impl fmt::Display for ValuationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] value/share {:.2} (p10 {:.2}, p50 {:.2}, p90 {:.2}) hybrid {:.4}",
            self.ticker,
            self.country,
            self.dcf.value_per_share,
            self.quantiles.p10,
            self.quantiles.p50,
            self.quantiles.p90,
            self.scores.hybrid_score
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> ValuationReport {
        ValuationReport::new(
            Ticker::new("AAPL").unwrap(),
            Country::Us,
            DcfResult {
                discounted_fcff: vec![10.0],
                terminal_value: 40.0,
                enterprise_value: 36.0,
                equity_value: 30.0,
                value_per_share: 3.0,
            },
            SimulationQuantiles {
                p10: 2.5,
                p50: 3.0,
                p90: 3.5,
            },
            Scores {
                tracking_score: 0.7,
                fundamental_score: 0.8,
                hybrid_score: 0.75,
            },
            Assumptions::default(),
        )
    }

    #[test]
    fn json_is_flat_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["ticker"], "AAPL");
        assert_eq!(json["country"], "US");
        assert_eq!(json["enterpriseValue"], 36.0);
        assert_eq!(json["valuePerShare"], 3.0);
        assert_eq!(json["p50"], 3.0);
        assert_eq!(json["hybridScore"], 0.75);
        assert_eq!(json["assumptions"]["wacc"], 0.09);
        assert!(json.get("dcf").is_none());
        assert_eq!(json["discountedFcff"], serde_json::json!([10.0]));
    }

    #[test]
    fn json_round_trip() {
        let report = sample();
        let text = serde_json::to_string(&report).unwrap();
        let back: ValuationReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn display_summarizes() {
        let text = sample().to_string();
        assert!(text.starts_with("AAPL [US] value/share 3.00"));
        assert!(text.ends_with("hybrid 0.7500"));
    }
}
