//! # EDINET Provider
//!
//! Japanese filings read from a local filings directory.
//!
//! Layout, one directory per ticker:
//!
//! ```text
//! <filings_dir>/
//! └── 7203/
//!     ├── company.json     {"sector": "...", "name": "...", "sharesOutstanding": ...}
//!     ├── documents.json   EDINET document list; "results" must be non-empty
//!     └── xbrl.xml         XBRL instance of the latest annual report
//! ```
//!
//! Values are pulled out of the XBRL instance with a namespace-agnostic,
//! case-insensitive tag match; thousands separators are ignored.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::infrastructure::providers::edinet::XbrlExtractor;
//!
//! let xml = r#"<jppfs_cor:NetSales contextRef="CurrentYear">45,095,325</jppfs_cor:NetSales>"#;
//! let extractor = XbrlExtractor::new().unwrap();
//! assert_eq!(extractor.value(xml, &["NetSales"]), Some(45_095_325.0));
//! ```

use crate::domain::entities::statement::fields;
use crate::domain::entities::{CompanyProfile, RawStatement, company_profile::UNKNOWN_SECTOR};
use crate::domain::value_objects::Ticker;
use crate::domain::value_objects::numeric::coerce_finite;
use crate::infrastructure::providers::error::{IngestionError, IngestionResult};
use crate::infrastructure::providers::http_client::parse_json;
use crate::infrastructure::providers::traits::FinancialDataProvider;
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Revenue elements, in priority order.
pub const REVENUE_TAGS: &[&str] = &["NetSales", "Revenue", "OperatingRevenues"];

/// Operating income elements, in priority order.
pub const EBIT_TAGS: &[&str] = &["OperatingIncome", "OperatingIncomeLoss"];

/// Capital expenditure elements, in priority order.
pub const CAPEX_TAGS: &[&str] = &[
    "PurchaseOfPropertyPlantAndEquipment",
    "PaymentsToAcquirePropertyPlantAndEquipment",
    "CapitalExpenditures",
];

const TAX_TAGS: &[&str] = &["IncomeTaxes"];
const DEPRECIATION_TAGS: &[&str] = &["DepreciationAndAmortizationOpeCF", "DepreciationAndAmortization"];
const DEBT_TAGS: &[&str] = &["LongTermLoansPayable", "BondsPayable"];
const CASH_TAGS: &[&str] = &["CashAndDeposits", "CashAndCashEquivalents"];
const SHARES_TAGS: &[&str] = &[
    "TotalNumberOfIssuedSharesSummaryOfBusinessResults",
    "IssuedSharesTotalNumberOfSharesEtc",
];

const COMPANY_FILE: &str = "company.json";
const DOCUMENTS_FILE: &str = "documents.json";
const XBRL_FILE: &str = "xbrl.xml";

/// EDINET provider settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdinetConfig {
    /// Root of the per-ticker filings directories.
    pub filings_dir: Option<PathBuf>,
}

/// Compiled XBRL element matchers.
#[derive(Debug, Clone)]
pub struct XbrlExtractor {
    patterns: HashMap<&'static str, Regex>,
}

impl XbrlExtractor {
    /// Compiles matchers for every known element.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::Configuration`] if a pattern fails to compile.
    pub fn new() -> IngestionResult<Self> {
        let all = [
            REVENUE_TAGS,
            EBIT_TAGS,
            CAPEX_TAGS,
            TAX_TAGS,
            DEPRECIATION_TAGS,
            DEBT_TAGS,
            CASH_TAGS,
            SHARES_TAGS,
        ];
        let mut patterns = HashMap::new();
        for tag in all.into_iter().flatten() {
            let tag = *tag;
            let escaped = regex::escape(tag);
            let pattern = format!(
                r"<(?:[A-Za-z0-9_]+:)?{escaped}[^>]*>([^<]+)</(?:[A-Za-z0-9_]+:)?{escaped}>"
            );
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| IngestionError::configuration(format!("bad XBRL pattern: {e}")))?;
            patterns.insert(tag, regex);
        }
        Ok(Self { patterns })
    }

    /// First finite value among `tags`, trying each tag's first occurrence.
    #[must_use]
    pub fn value(&self, xml: &str, tags: &[&str]) -> Option<f64> {
        tags.iter().find_map(|tag| {
            let captures = self.patterns.get(tag)?.captures(xml)?;
            let text = captures.get(1)?.as_str().replace(',', "");
            coerce_finite(&Value::String(text))
        })
    }

    /// Extracts a statement from an XBRL instance.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::MalformedPayload`] when revenue, operating
    /// income or capex cannot be found.
    pub fn statement(&self, xml: &str) -> IngestionResult<RawStatement> {
        let required = |tags: &[&str], field: &str| {
            self.value(xml, tags)
                .ok_or_else(|| IngestionError::malformed(format!("no '{field}' element in XBRL")))
        };

        let mut statement = RawStatement::new()
            .with(fields::REVENUE, Value::from(required(REVENUE_TAGS, fields::REVENUE)?))
            .with(fields::EBIT, Value::from(required(EBIT_TAGS, fields::EBIT)?))
            .with(fields::CAPEX, Value::from(required(CAPEX_TAGS, fields::CAPEX)?.abs()));

        let optional = [
            (fields::TAX_EXPENSE, TAX_TAGS),
            (fields::DEPRECIATION, DEPRECIATION_TAGS),
            (fields::DEBT, DEBT_TAGS),
            (fields::CASH, CASH_TAGS),
            (fields::SHARES_OUTSTANDING, SHARES_TAGS),
        ];
        for (field, tags) in optional {
            if let Some(value) = self.value(xml, tags) {
                statement.insert(field, Value::from(value));
            }
        }
        Ok(statement)
    }
}

/// [`FinancialDataProvider`] reading EDINET/TDnet filings from disk.
#[derive(Debug, Clone)]
pub struct EdinetProvider {
    config: EdinetConfig,
    extractor: XbrlExtractor,
}

impl EdinetProvider {
    /// Creates a provider.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::Configuration`] if the XBRL matchers fail to
    /// compile.
    pub fn new(config: EdinetConfig) -> IngestionResult<Self> {
        Ok(Self {
            config,
            extractor: XbrlExtractor::new()?,
        })
    }

    fn company_dir(&self, ticker: &Ticker) -> IngestionResult<PathBuf> {
        self.config
            .filings_dir
            .as_ref()
            .map(|dir| dir.join(ticker.as_str()))
            .ok_or_else(|| IngestionError::configuration("EDINET filings directory is not set"))
    }

    async fn read(path: &Path) -> IngestionResult<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| IngestionError::io(path, &e))
    }

    async fn read_json(path: &Path) -> IngestionResult<Value> {
        parse_json(&Self::read(path).await?, &path.display().to_string())
    }
}

#[async_trait]
impl FinancialDataProvider for EdinetProvider {
    fn name(&self) -> &str {
        "edinet"
    }

    async fn fetch_company_profile(&self, ticker: &Ticker) -> IngestionResult<CompanyProfile> {
        let path = self.company_dir(ticker)?.join(COMPANY_FILE);
        let payload = Self::read_json(&path).await?;

        let sector = payload
            .get("sector")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SECTOR);
        let mut profile = CompanyProfile::new(ticker.clone(), sector);
        if let Some(name) = payload.get("name").and_then(Value::as_str) {
            profile = profile.with_name(name);
        }
        if let Some(shares) = payload.get("sharesOutstanding").and_then(coerce_finite) {
            profile = profile.with_shares_outstanding(shares);
        }
        Ok(profile)
    }

    async fn fetch_latest_statement(&self, ticker: &Ticker) -> IngestionResult<RawStatement> {
        let dir = self.company_dir(ticker)?;

        let documents = Self::read_json(&dir.join(DOCUMENTS_FILE)).await?;
        let has_documents = documents
            .get("results")
            .and_then(Value::as_array)
            .is_some_and(|results| !results.is_empty());
        if !has_documents {
            return Err(IngestionError::not_found("EDINET document", ticker.as_str()));
        }

        let bytes = Self::read(&dir.join(XBRL_FILE)).await?;
        let xml = String::from_utf8_lossy(&bytes);
        self.extractor.statement(&xml)
    }
}
