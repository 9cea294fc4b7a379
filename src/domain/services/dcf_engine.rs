//! # DCF Engine
//!
//! Discounted free cash flow to the firm.
//!
//! ```text
//! fcff_t  = fcff_base · (1 + g)^t                      t = 1..=N
//! pv_t    = fcff_t / (1 + wacc)^t                    (discounted_fcff[t-1])
//! TV      = fcff_N · (1 + tg) / (wacc − tg)
//! EV      = Σ pv_t + TV / (1 + wacc)^N
//! equity  = EV − debt + cash
//! value/share = equity / shares
//! ```
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::entities::{Assumptions, DcfInput};
//! use equity_valuation::domain::services::dcf_engine::DcfEngine;
//!
//! let input = DcfInput::new(100.0, Assumptions::default(), 10.0);
//! let result = DcfEngine.run(&input).unwrap();
//! assert!(result.value_per_share > 0.0);
//! ```

use crate::domain::entities::{DcfInput, DcfResult};
use crate::domain::errors::{DomainError, DomainResult};

/// Stateless DCF calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DcfEngine;

impl DcfEngine {
    /// Checks an input before valuation.
    ///
    /// # Errors
    ///
    /// - `invalid_dcf_inputs` for non-finite numbers, a non-positive share
    ///   count or a zero horizon
    /// - `invalid_discount_constraints` when `wacc <= terminal_growth`
    pub fn validate(input: &DcfInput) -> DomainResult<()> {
        let named = [
            ("fcffBase", input.fcff_base),
            ("debt", input.debt),
            ("cash", input.cash),
            ("sharesOutstanding", input.shares_outstanding),
        ];
        if let Some((name, _)) = named.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DomainError::invalid_dcf_inputs(format!(
                "'{name}' is not finite"
            )));
        }
        if input.shares_outstanding <= 0.0 {
            return Err(DomainError::invalid_dcf_inputs(format!(
                "sharesOutstanding must be positive, got {}",
                input.shares_outstanding
            )));
        }
        if input.projection_years == 0 {
            return Err(DomainError::invalid_dcf_inputs(
                "projectionYears must be at least 1",
            ));
        }
        input.assumptions.validate()
    }

    /// Values `input`.
    ///
    /// # Errors
    ///
    /// See [`DcfEngine::validate`].
    pub fn run(&self, input: &DcfInput) -> DomainResult<DcfResult> {
        Self::validate(input)?;

        let a = &input.assumptions;
        let growth = 1.0 + a.rev_growth;
        let discount = 1.0 + a.wacc;

        let mut fcff = input.fcff_base;
        let mut factor = 1.0;
        let mut discounted_fcff = Vec::with_capacity(input.projection_years as usize);
        for _ in 0..input.projection_years {
            fcff *= growth;
            factor *= discount;
            discounted_fcff.push(fcff / factor);
        }

        let terminal_value = fcff * (1.0 + a.terminal_growth) / (a.wacc - a.terminal_growth);
        let enterprise_value = discounted_fcff.iter().sum::<f64>() + terminal_value / factor;
        let equity_value = enterprise_value - input.debt + input.cash;

        Ok(DcfResult {
            discounted_fcff,
            terminal_value,
            enterprise_value,
            equity_value,
            value_per_share: equity_value / input.shares_outstanding,
        })
    }
}
