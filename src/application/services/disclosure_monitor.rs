//! # Disclosure Monitor
//!
//! Finds companies with filings newer than the last ones processed.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::application::services::disclosure_monitor::{changed_tickers, FilingRef};
//! use std::collections::HashMap;
//!
//! let latest = [FilingRef::new("7203", "S100A"), FilingRef::new("6758", "S100X")];
//! let last_seen = HashMap::from([("7203".to_string(), "S1009".to_string())]);
//!
//! assert_eq!(changed_tickers(&latest, &last_seen), vec!["7203", "6758"]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Latest filing id reported for a ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingRef {
    /// Ticker symbol.
    pub ticker: String,
    /// Filing identifier.
    pub filing_id: String,
}

impl FilingRef {
    /// Creates a filing reference.
    #[must_use]
    pub fn new(ticker: impl Into<String>, filing_id: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            filing_id: filing_id.into(),
        }
    }
}

impl fmt::Display for FilingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ticker, self.filing_id)
    }
}

/// Returns tickers whose filing id differs from the last one seen.
///
/// Tickers never seen before count as changed. Each ticker appears once,
/// in order of first change.
#[must_use]
pub fn changed_tickers(latest: &[FilingRef], last_seen: &HashMap<String, String>) -> Vec<String> {
    let mut seen = HashSet::new();
    latest
        .iter()
        .filter(|filing| last_seen.get(&filing.ticker) != Some(&filing.filing_id))
        .filter(|filing| seen.insert(filing.ticker.as_str()))
        .map(|filing| filing.ticker.clone())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn seen(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(t, f)| ((*t).to_string(), (*f).to_string()))
            .collect()
    }

    #[test]
    fn reports_changed_ticker_once() {
        let latest = [
            FilingRef::new("7203", "A"),
            FilingRef::new("7203", "B"),
            FilingRef::new("6758", "X"),
        ];
        let changed = changed_tickers(&latest, &seen(&[("7203", "A"), ("6758", "X")]));
        assert_eq!(changed, vec!["7203"]);
    }

    #[test]
    fn nothing_changed() {
        let latest = [FilingRef::new("7203", "A")];
        assert!(changed_tickers(&latest, &seen(&[("7203", "A")])).is_empty());
    }

    #[test]
    fn unseen_tickers_are_changed_in_order() {
        let latest = [
            FilingRef::new("MSFT", "1"),
            FilingRef::new("AAPL", "2"),
            FilingRef::new("MSFT", "3"),
        ];
        assert_eq!(changed_tickers(&latest, &HashMap::new()), vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn empty_input() {
        assert!(changed_tickers(&[], &seen(&[("7203", "A")])).is_empty());
    }

    #[test]
    fn serde_uses_camel_case() {
        let filing: FilingRef =
            serde_json::from_str(r#"{"ticker":"7203","filingId":"S100A"}"#).unwrap();
        assert_eq!(filing, FilingRef::new("7203", "S100A"));
        assert_eq!(filing.to_string(), "7203@S100A");
    }
}
