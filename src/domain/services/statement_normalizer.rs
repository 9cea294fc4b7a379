//! # Statement Normalizer
//!
//! Converts a provider's [`RawStatement`] into a [`NormalizedStatement`].
//!
//! `revenue`, `ebit` and `capex` are required and must coerce to finite
//! numbers; validation stops at the first missing one. Every other field is
//! optional and defaults to zero. Signs are not checked.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::entities::statement::{fields, RawStatement};
//! use equity_valuation::domain::services::statement_normalizer::normalize;
//! use serde_json::json;
//!
//! let raw = RawStatement::new()
//!     .with(fields::REVENUE, json!("1000"))
//!     .with(fields::EBIT, json!(150))
//!     .with(fields::CAPEX, json!(40));
//!
//! let statement = normalize(&raw).unwrap();
//! assert_eq!(statement.revenue, 1000.0);
//! assert_eq!(statement.debt, 0.0);
//! ```

use crate::domain::entities::statement::{fields, NormalizedStatement, RawStatement};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::numeric::{coerce_finite, coerce_or};

fn required(raw: &RawStatement, field: &'static str) -> DomainResult<f64> {
    raw.get(field)
        .and_then(coerce_finite)
        .ok_or(DomainError::MissingRequiredFields { field })
}

fn optional(raw: &RawStatement, field: &str) -> f64 {
    coerce_or(raw.get(field), 0.0)
}

/// Validates and coerces a raw statement.
///
/// # Errors
///
/// Returns [`DomainError::MissingRequiredFields`] naming the first required
/// field that is absent or not a finite number.
pub fn normalize(raw: &RawStatement) -> DomainResult<NormalizedStatement> {
    Ok(NormalizedStatement {
        revenue: required(raw, fields::REVENUE)?,
        ebit: required(raw, fields::EBIT)?,
        capex: required(raw, fields::CAPEX)?,
        tax_expense: optional(raw, fields::TAX_EXPENSE),
        depreciation: optional(raw, fields::DEPRECIATION),
        working_capital_delta: optional(raw, fields::WORKING_CAPITAL_DELTA),
        debt: optional(raw, fields::DEBT),
        cash: optional(raw, fields::CASH),
        shares_outstanding: optional(raw, fields::SHARES_OUTSTANDING),
    })
}
