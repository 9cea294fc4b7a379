//! # Assumptions
//!
//! Modeling parameters for a DCF run and the caller overrides applied to them.
//!
//! [`Assumptions`] is validated whenever it is produced or consumed:
//! the discount rate must exceed the terminal growth rate, otherwise the
//! terminal value formula divides by a non-positive number.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::entities::assumptions::{AssumptionOverrides, Assumptions};
//!
//! let base = Assumptions::default();
//! let merged = AssumptionOverrides::new().with_wacc(0.08).apply(&base);
//! assert_eq!(merged.wacc, 0.08);
//! assert!(merged.validate().is_ok());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::numeric::{coerce_finite, finite_or};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Growth rate used when revenue history cannot support a CAGR.
pub const DEFAULT_REV_GROWTH: f64 = 0.03;

/// DCF modeling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    /// Annual revenue (and cash flow) growth over the projection horizon.
    pub rev_growth: f64,
    /// Operating margin.
    pub ebit_margin: f64,
    /// Effective tax rate.
    pub tax_rate: f64,
    /// Capital expenditure as a share of revenue.
    pub capex_ratio: f64,
    /// Working capital change as a share of revenue.
    pub working_capital_ratio: f64,
    /// Weighted average cost of capital.
    pub wacc: f64,
    /// Perpetual growth rate after the projection horizon.
    pub terminal_growth: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        AssumptionDefaults::default().with_growth(DEFAULT_REV_GROWTH)
    }
}

impl Assumptions {
    /// Checks that every parameter is finite and `wacc > terminal_growth`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDcfInputs`] for a non-finite parameter
    /// and [`DomainError::InvalidDiscountConstraints`] when the discount rate
    /// does not exceed terminal growth.
    pub fn validate(&self) -> DomainResult<()> {
        let named = [
            ("revGrowth", self.rev_growth),
            ("ebitMargin", self.ebit_margin),
            ("taxRate", self.tax_rate),
            ("capexRatio", self.capex_ratio),
            ("workingCapitalRatio", self.working_capital_ratio),
            ("wacc", self.wacc),
            ("terminalGrowth", self.terminal_growth),
        ];
        if let Some((name, _)) = named.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DomainError::invalid_dcf_inputs(format!(
                "assumption '{name}' is not finite"
            )));
        }
        if self.wacc <= self.terminal_growth {
            return Err(DomainError::invalid_discount_constraints(
                self.wacc,
                self.terminal_growth,
            ));
        }
        Ok(())
    }
}

/// Defaults for every assumption except revenue growth, which is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AssumptionDefaults {
    /// Operating margin.
    pub ebit_margin: f64,
    /// Effective tax rate.
    pub tax_rate: f64,
    /// Capex share of revenue.
    pub capex_ratio: f64,
    /// Working capital share of revenue.
    pub working_capital_ratio: f64,
    /// Discount rate.
    pub wacc: f64,
    /// Terminal growth rate.
    pub terminal_growth: f64,
}

impl Default for AssumptionDefaults {
    fn default() -> Self {
        Self {
            ebit_margin: 0.15,
            tax_rate: 0.30,
            capex_ratio: 0.04,
            working_capital_ratio: 0.01,
            wacc: 0.09,
            terminal_growth: 0.02,
        }
    }
}

impl AssumptionDefaults {
    /// Completes the defaults with an estimated growth rate.
    #[must_use]
    pub fn with_growth(&self, rev_growth: f64) -> Assumptions {
        Assumptions {
            rev_growth,
            ebit_margin: self.ebit_margin,
            tax_rate: self.tax_rate,
            capex_ratio: self.capex_ratio,
            working_capital_ratio: self.working_capital_ratio,
            wacc: self.wacc,
            terminal_growth: self.terminal_growth,
        }
    }
}

/// Caller-supplied assumption overrides.
///
/// A field that is `None` or non-finite leaves the estimated value in place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssumptionOverrides {
    /// Revenue growth override.
    pub rev_growth: Option<f64>,
    /// Operating margin override.
    pub ebit_margin: Option<f64>,
    /// Tax rate override.
    pub tax_rate: Option<f64>,
    /// Capex ratio override.
    pub capex_ratio: Option<f64>,
    /// Working capital ratio override.
    pub working_capital_ratio: Option<f64>,
    /// Discount rate override.
    pub wacc: Option<f64>,
    /// Terminal growth override.
    pub terminal_growth: Option<f64>,
}

impl AssumptionOverrides {
    /// Creates an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds overrides from a loosely typed map keyed by camelCase field name.
    ///
    /// Values go through the shared numeric coercion; unknown keys are ignored.
    #[must_use]
    pub fn from_raw(raw: &Map<String, Value>) -> Self {
        let pick = |key: &str| raw.get(key).and_then(coerce_finite);
        Self {
            rev_growth: pick("revGrowth"),
            ebit_margin: pick("ebitMargin"),
            tax_rate: pick("taxRate"),
            capex_ratio: pick("capexRatio"),
            working_capital_ratio: pick("workingCapitalRatio"),
            wacc: pick("wacc"),
            terminal_growth: pick("terminalGrowth"),
        }
    }

    /// Sets the revenue growth override.
    #[must_use]
    pub fn with_rev_growth(mut self, value: f64) -> Self {
        self.rev_growth = Some(value);
        self
    }

    /// Sets the discount rate override.
    #[must_use]
    pub fn with_wacc(mut self, value: f64) -> Self {
        self.wacc = Some(value);
        self
    }

    /// Sets the terminal growth override.
    #[must_use]
    pub fn with_terminal_growth(mut self, value: f64) -> Self {
        self.terminal_growth = Some(value);
        self
    }

    /// Sets the tax rate override.
    #[must_use]
    pub fn with_tax_rate(mut self, value: f64) -> Self {
        self.tax_rate = Some(value);
        self
    }

    /// Returns true if no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the overrides onto `base`, field by field.
    ///
    /// The result is not validated; callers check it afterwards.
    #[must_use]
    pub fn apply(&self, base: &Assumptions) -> Assumptions {
        Assumptions {
            rev_growth: finite_or(self.rev_growth, base.rev_growth),
            ebit_margin: finite_or(self.ebit_margin, base.ebit_margin),
            tax_rate: finite_or(self.tax_rate, base.tax_rate),
            capex_ratio: finite_or(self.capex_ratio, base.capex_ratio),
            working_capital_ratio: finite_or(
                self.working_capital_ratio,
                base.working_capital_ratio,
            ),
            wacc: finite_or(self.wacc, base.wacc),
            terminal_growth: finite_or(self.terminal_growth, base.terminal_growth),
        }
    }
}
