//! # Valuation Values
//!
//! Inputs and outputs of the DCF engine and the Monte Carlo simulator.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::entities::assumptions::Assumptions;
//! use equity_valuation::domain::entities::valuation::DcfInput;
//!
//! let input = DcfInput::new(100.0, Assumptions::default(), 10.0)
//!     .with_debt(50.0)
//!     .with_cash(20.0);
//!
//! assert_eq!(input.projection_years, 5);
//! assert_eq!(input.debt, 50.0);
//! ```

use crate::domain::entities::assumptions::Assumptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default number of explicitly projected years.
pub const DEFAULT_PROJECTION_YEARS: u32 = 5;

/// Request for a single DCF valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfInput {
    /// Free cash flow to the firm for the base year.
    pub fcff_base: f64,
    /// Modeling parameters.
    pub assumptions: Assumptions,
    /// Debt subtracted from enterprise value.
    pub debt: f64,
    /// Cash added to enterprise value.
    pub cash: f64,
    /// Share count; must be positive.
    pub shares_outstanding: f64,
    /// Explicit projection horizon in years; at least one.
    pub projection_years: u32,
}

impl DcfInput {
    /// Creates an input with zero debt and cash over the default horizon.
    #[must_use]
    pub fn new(fcff_base: f64, assumptions: Assumptions, shares_outstanding: f64) -> Self {
        Self {
            fcff_base,
            assumptions,
            debt: 0.0,
            cash: 0.0,
            shares_outstanding,
            projection_years: DEFAULT_PROJECTION_YEARS,
        }
    }

    /// Sets the debt.
    #[must_use]
    pub fn with_debt(mut self, debt: f64) -> Self {
        self.debt = debt;
        self
    }

    /// Sets the cash.
    #[must_use]
    pub fn with_cash(mut self, cash: f64) -> Self {
        self.cash = cash;
        self
    }

    /// Sets the projection horizon.
    #[must_use]
    pub fn with_projection_years(mut self, years: u32) -> Self {
        self.projection_years = years;
        self
    }

    /// Returns a copy with different assumptions.
    #[must_use]
    pub fn with_assumptions(mut self, assumptions: Assumptions) -> Self {
        self.assumptions = assumptions;
        self
    }
}

/// Point valuation produced by the DCF engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DcfResult {
    /// Present value of each projected year's cash flow, year 1 first.
    pub discounted_fcff: Vec<f64>,
    /// Undiscounted terminal value at the end of the horizon.
    pub terminal_value: f64,
    /// Discounted cash flows plus discounted terminal value.
    pub enterprise_value: f64,
    /// Enterprise value less debt plus cash.
    pub equity_value: f64,
    /// Equity value per share.
    pub value_per_share: f64,
}

impl DcfResult {
    /// Sum of the discounted projected cash flows.
    #[must_use]
    pub fn discounted_fcff_total(&self) -> f64 {
        self.discounted_fcff.iter().sum()
    }
}

/// Percentiles of the simulated per-share value distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimulationQuantiles {
    /// 10th percentile.
    pub p10: f64,
    /// Median.
    pub p50: f64,
    /// 90th percentile.
    pub p90: f64,
}

impl SimulationQuantiles {
    /// Returns true if `p10 <= p50 <= p90`.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.p10 <= self.p50 && self.p50 <= self.p90
    }

    /// Width of the 80% band.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.p90 - self.p10
    }
}
