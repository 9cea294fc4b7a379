//! # Financial Statements
//!
//! Raw provider statements and their canonical numeric form.
//!
//! A [`RawStatement`] is whatever a provider handed back: a map of field name
//! to loosely typed JSON value. A [`NormalizedStatement`] is the validated,
//! finite-valued view the valuation core works with.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::entities::statement::{fields, RawStatement};
//! use serde_json::json;
//!
//! let raw = RawStatement::new()
//!     .with(fields::REVENUE, json!(1000))
//!     .with(fields::EBIT, json!("150"));
//!
//! assert_eq!(raw.get(fields::EBIT), Some(&json!("150")));
//! assert!(raw.get(fields::CAPEX).is_none());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Canonical statement field names.
pub mod fields {
    /// Total revenue.
    pub const REVENUE: &str = "revenue";
    /// Operating income.
    pub const EBIT: &str = "ebit";
    /// Capital expenditure.
    pub const CAPEX: &str = "capex";
    /// Income tax expense.
    pub const TAX_EXPENSE: &str = "taxExpense";
    /// Depreciation and amortization.
    pub const DEPRECIATION: &str = "depreciation";
    /// Change in working capital.
    pub const WORKING_CAPITAL_DELTA: &str = "workingCapitalDelta";
    /// Interest-bearing debt.
    pub const DEBT: &str = "debt";
    /// Cash and equivalents.
    pub const CASH: &str = "cash";
    /// Shares outstanding.
    pub const SHARES_OUTSTANDING: &str = "sharesOutstanding";

    /// Fields that must be present and numeric, in validation order.
    pub const REQUIRED: [&str; 3] = [REVENUE, EBIT, CAPEX];
}

/// Unvalidated statement as fetched from a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawStatement(BTreeMap<String, Value>);

impl RawStatement {
    /// Creates an empty statement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any previous value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Returns a field's raw value.
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns the number of fields.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no fields are present.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawStatement {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Statement with every field coerced to a finite number.
///
/// Optional fields are zero when the provider did not report them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStatement {
    /// Total revenue.
    pub revenue: f64,
    /// Operating income.
    pub ebit: f64,
    /// Capital expenditure.
    pub capex: f64,
    /// Income tax expense.
    pub tax_expense: f64,
    /// Depreciation and amortization.
    pub depreciation: f64,
    /// Change in working capital.
    pub working_capital_delta: f64,
    /// Interest-bearing debt.
    pub debt: f64,
    /// Cash and equivalents.
    pub cash: f64,
    /// Shares outstanding; zero when unreported.
    pub shares_outstanding: f64,
}

impl NormalizedStatement {
    /// Converts back to a raw statement carrying every field.
    #[must_use]
    pub fn to_raw(&self) -> RawStatement {
        [
            (fields::REVENUE, self.revenue),
            (fields::EBIT, self.ebit),
            (fields::CAPEX, self.capex),
            (fields::TAX_EXPENSE, self.tax_expense),
            (fields::DEPRECIATION, self.depreciation),
            (fields::WORKING_CAPITAL_DELTA, self.working_capital_delta),
            (fields::DEBT, self.debt),
            (fields::CASH, self.cash),
            (fields::SHARES_OUTSTANDING, self.shares_outstanding),
        ]
        .into_iter()
        .map(|(field, value)| (field, Value::from(value)))
        .collect()
    }

    /// Unlevered free cash flow for the reported period.
    ///
    /// `ebit * (1 - tax_rate) + depreciation - capex - working_capital_delta`
    #[must_use]
    pub fn fcff(&self, tax_rate: f64) -> f64 {
        self.ebit * (1.0 - tax_rate) + self.depreciation - self.capex - self.working_capital_delta
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_statement_round_trips_through_json() {
        let raw = RawStatement::new()
            .with(fields::REVENUE, json!(100))
            .with("extra", json!("x"));
        let text = serde_json::to_string(&raw).unwrap();
        assert_eq!(text, r#"{"extra":"x","revenue":100}"#);
        let back: RawStatement = serde_json::from_str(&text).unwrap();
        assert_eq!(back, raw);
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn to_raw_carries_every_field() {
        let statement = NormalizedStatement {
            revenue: 1.0,
            shares_outstanding: 9.0,
            ..NormalizedStatement::default()
        };
        let raw = statement.to_raw();
        assert_eq!(raw.len(), 9);
        assert_eq!(raw.get(fields::REVENUE), Some(&json!(1.0)));
        assert_eq!(raw.get(fields::SHARES_OUTSTANDING), Some(&json!(9.0)));
        assert_eq!(raw.get(fields::DEBT), Some(&json!(0.0)));
    }

    #[test]
    fn fcff_combines_components() {
        let statement = NormalizedStatement {
            ebit: 200.0,
            depreciation: 30.0,
            capex: 50.0,
            working_capital_delta: 10.0,
            ..NormalizedStatement::default()
        };
        assert!((statement.fcff(0.25) - 120.0).abs() < 1e-12);
    }
}
