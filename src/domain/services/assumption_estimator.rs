//! # Assumption Estimator
//!
//! Derives [`Assumptions`] from revenue history and caller overrides.
//!
//! Revenue growth is the compound annual growth rate between the first and
//! last observation, clamped to `[-20%, +20%]`. Short or degenerate histories
//! fall back to 3%. The remaining parameters come from
//! [`AssumptionDefaults`]. Overrides are merged field by field and the merged
//! result is validated.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::entities::assumptions::AssumptionOverrides;
//! use equity_valuation::domain::services::assumption_estimator::AssumptionEstimator;
//!
//! let estimator = AssumptionEstimator::default();
//! let a = estimator.estimate(&[100.0, 121.0], &AssumptionOverrides::new()).unwrap();
//! assert_eq!(a.rev_growth, 0.2);
//! ```

use crate::domain::entities::assumptions::{
    AssumptionDefaults, AssumptionOverrides, Assumptions, DEFAULT_REV_GROWTH,
};
use crate::domain::errors::DomainResult;

/// Lower bound of the estimated growth rate.
pub const MIN_REV_GROWTH: f64 = -0.20;

/// Upper bound of the estimated growth rate.
pub const MAX_REV_GROWTH: f64 = 0.20;

/// Compound annual growth rate of `history`, clamped to the growth bounds.
///
/// Returns the default growth when fewer than two points are given or when
/// either endpoint is non-finite or non-positive.
#[must_use]
pub fn estimate_growth(history: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (history.first(), history.last()) else {
        return DEFAULT_REV_GROWTH;
    };
    if history.len() < 2
        || !first.is_finite()
        || !last.is_finite()
        || first <= 0.0
        || last <= 0.0
    {
        return DEFAULT_REV_GROWTH;
    }

    #[allow(clippy::cast_precision_loss)]
    let periods = (history.len() - 1) as f64;
    let cagr = (last / first).powf(1.0 / periods) - 1.0;
    if cagr.is_finite() {
        cagr.clamp(MIN_REV_GROWTH, MAX_REV_GROWTH)
    } else {
        DEFAULT_REV_GROWTH
    }
}

/// Produces validated assumptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumptionEstimator {
    defaults: AssumptionDefaults,
}

impl AssumptionEstimator {
    /// Creates an estimator with custom defaults.
    #[must_use]
    pub fn new(defaults: AssumptionDefaults) -> Self {
        Self { defaults }
    }

    /// Returns the defaults in use.
    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &AssumptionDefaults {
        &self.defaults
    }

    /// Estimates assumptions from `history` and applies `overrides`.
    ///
    /// # Errors
    ///
    /// Returns `invalid_discount_constraints` when the merged `wacc` does not
    /// exceed `terminal_growth`.
    pub fn estimate(
        &self,
        history: &[f64],
        overrides: &AssumptionOverrides,
    ) -> DomainResult<Assumptions> {
        let base = self.defaults.with_growth(estimate_growth(history));
        let merged = overrides.apply(&base);
        merged.validate()?;
        Ok(merged)
    }
}
