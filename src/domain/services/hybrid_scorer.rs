//! # Hybrid Scorer
//!
//! Blends the tracking (quality) signal and the fundamental (DCF) signal
//! into one score, rounded to four decimal places.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::services::hybrid_scorer::{score, ScoreInput};
//!
//! let s = score(&ScoreInput::new(0.7, 0.8), None).unwrap();
//! assert_eq!(s, 0.75);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::numeric::coerce_finite;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decimal places kept in the hybrid score.
pub const SCORE_DECIMALS: u32 = 4;

/// The two signals being blended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    /// Quality/tracking signal.
    pub tracking_score: f64,
    /// DCF signal.
    pub fundamental_score: f64,
}

impl ScoreInput {
    /// Creates an input from two numbers.
    #[must_use]
    pub const fn new(tracking_score: f64, fundamental_score: f64) -> Self {
        Self {
            tracking_score,
            fundamental_score,
        }
    }

    /// Creates an input from loosely typed values.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidScoreInput`] when either value does not
    /// coerce to a finite number.
    pub fn from_values(tracking: &Value, fundamental: &Value) -> DomainResult<Self> {
        let tracking_score = coerce_finite(tracking).ok_or_else(|| {
            DomainError::invalid_score_input(format!("trackingScore is not numeric: {tracking}"))
        })?;
        let fundamental_score = coerce_finite(fundamental).ok_or_else(|| {
            DomainError::invalid_score_input(format!(
                "fundamentalScore is not numeric: {fundamental}"
            ))
        })?;
        Ok(Self::new(tracking_score, fundamental_score))
    }
}

/// Relative weights of the two signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridWeights {
    /// Weight of the tracking signal.
    pub tracking: f64,
    /// Weight of the fundamental signal.
    pub fundamental: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            tracking: 0.5,
            fundamental: 0.5,
        }
    }
}

impl HybridWeights {
    /// Creates weights.
    #[must_use]
    pub const fn new(tracking: f64, fundamental: f64) -> Self {
        Self {
            tracking,
            fundamental,
        }
    }

    fn total(&self) -> DomainResult<f64> {
        let total = self.tracking + self.fundamental;
        if !self.tracking.is_finite()
            || !self.fundamental.is_finite()
            || !total.is_finite()
            || total <= 0.0
        {
            return Err(DomainError::invalid_hybrid_weights(format!(
                "tracking={}, fundamental={}",
                self.tracking, self.fundamental
            )));
        }
        Ok(total)
    }
}

/// Rounds to [`SCORE_DECIMALS`] places, midpoint away from zero.
///
/// Values outside the decimal range are returned unchanged.
#[must_use]
pub fn round_score(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(SCORE_DECIMALS, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Weighted blend of the two signals.
///
/// `None` weights mean a simple average.
///
/// # Arguments
///
/// * `input` - Tracking and fundamental scores.
/// * `weights` - Relative weights, or `None` for equal weights.
///
/// # Errors
///
/// - `invalid_hybrid_weights` when the weights do not sum to a positive
///   finite number
/// - `invalid_score_input` when either score is not finite
pub fn score(input: &ScoreInput, weights: Option<&HybridWeights>) -> DomainResult<f64> {
    let weights = weights.copied().unwrap_or_default();
    let total = weights.total()?;

    if !input.tracking_score.is_finite() {
        return Err(DomainError::invalid_score_input("trackingScore is not finite"));
    }
    if !input.fundamental_score.is_finite() {
        return Err(DomainError::invalid_score_input(
            "fundamentalScore is not finite",
        ));
    }

    let blended = (input.tracking_score * weights.tracking
        + input.fundamental_score * weights.fundamental)
        / total;
    Ok(round_score(blended))
}
