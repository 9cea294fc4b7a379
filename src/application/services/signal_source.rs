//! # Signal Source
//!
//! Supplies the two signals blended by the hybrid scorer.

use crate::domain::entities::valuation::DcfResult;
use crate::domain::errors::DomainResult;
use crate::domain::services::hybrid_scorer::ScoreInput;
use crate::domain::value_objects::Ticker;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default tracking signal.
pub const DEFAULT_TRACKING_SCORE: f64 = 0.7;

/// Default fundamental signal.
pub const DEFAULT_FUNDAMENTAL_SCORE: f64 = 0.8;

/// Produces the tracking and fundamental signals for a company.
///
/// The tracking score measures quality of the price/value tracking; the
/// fundamental score measures the DCF signal. Implementations may use the
/// point valuation already computed for the run.
pub trait SignalSource: Send + Sync + fmt::Debug {
    /// Returns the signals for `ticker`.
    ///
    /// # Errors
    ///
    /// Returns `invalid_score_input` when a signal cannot be produced.
    fn signals(&self, ticker: &Ticker, dcf: &DcfResult) -> DomainResult<ScoreInput>;

    /// Returns the name of this source.
    fn name(&self) -> &'static str;
}

/// Returns the same configured signals for every company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedSignalSource {
    /// Tracking signal.
    pub tracking_score: f64,
    /// Fundamental signal.
    pub fundamental_score: f64,
}

impl Default for FixedSignalSource {
    fn default() -> Self {
        Self {
            tracking_score: DEFAULT_TRACKING_SCORE,
            fundamental_score: DEFAULT_FUNDAMENTAL_SCORE,
        }
    }
}

impl FixedSignalSource {
    /// Creates a source returning the given signals.
    #[must_use]
    pub const fn new(tracking_score: f64, fundamental_score: f64) -> Self {
        Self {
            tracking_score,
            fundamental_score,
        }
    }
}

impl SignalSource for FixedSignalSource {
    fn signals(&self, _ticker: &Ticker, _dcf: &DcfResult) -> DomainResult<ScoreInput> {
        Ok(ScoreInput::new(self.tracking_score, self.fundamental_score))
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dcf() -> DcfResult {
        DcfResult {
            discounted_fcff: vec![1.0],
            terminal_value: 1.0,
            enterprise_value: 2.0,
            equity_value: 2.0,
            value_per_share: 0.2,
        }
    }

    #[test]
    fn defaults() {
        let source = FixedSignalSource::default();
        let input = source.signals(&Ticker::new("AAPL").unwrap(), &dcf()).unwrap();
        assert_eq!(input, ScoreInput::new(0.7, 0.8));
        assert_eq!(source.name(), "fixed");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let source: FixedSignalSource =
            serde_json::from_str(r#"{"tracking_score": 0.4}"#).unwrap();
        assert_eq!(source, FixedSignalSource::new(0.4, 0.8));
    }
}
