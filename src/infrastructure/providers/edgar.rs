//! # SEC EDGAR Provider
//!
//! US filings from the SEC's public JSON endpoints.
//!
//! ```text
//! ticker ──company_tickers.json──▶ CIK (10 digits)
//!        ├──submissions/CIK##########.json──▶ sector, name
//!        └──api/xbrl/companyfacts/CIK##########.json──▶ statement, revenue history
//! ```
//!
//! Each of the three sources can be replaced by a local fixture file, which
//! is how the regression suite runs offline. Resolved CIKs and company facts
//! are cached per provider instance so a pipeline run hits each endpoint at
//! most once.
//!
//! # Fact selection
//!
//! For every statement field a list of us-gaap tags is tried in order. The
//! first tag with any finite value wins, and its most recent row (by period
//! end, else filing date) is used.

use crate::domain::entities::statement::fields;
use crate::domain::entities::{CompanyProfile, RawStatement, company_profile::UNKNOWN_SECTOR};
use crate::domain::value_objects::Ticker;
use crate::domain::value_objects::numeric::coerce_finite;
use crate::infrastructure::providers::error::{IngestionError, IngestionResult};
use crate::infrastructure::providers::http_client::{HttpClient, parse_json};
use crate::infrastructure::providers::traits::FinancialDataProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Revenue tags, in priority order.
pub const REVENUE_TAGS: &[&str] = &[
    "Revenues",
    "RevenueFromContractWithCustomerExcludingAssessedTax",
    "SalesRevenueNet",
];

/// Operating income tags, in priority order.
pub const EBIT_TAGS: &[&str] = &["OperatingIncomeLoss", "IncomeLossFromOperations"];

/// Capital expenditure tags, in priority order.
pub const CAPEX_TAGS: &[&str] = &[
    "PaymentsToAcquirePropertyPlantAndEquipment",
    "CapitalExpendituresIncurredButNotYetPaid",
    "CapitalExpenditures",
];

const TAX_TAGS: &[&str] = &["IncomeTaxExpenseBenefit"];
const DEPRECIATION_TAGS: &[&str] = &[
    "DepreciationDepletionAndAmortization",
    "DepreciationAndAmortization",
];
const DEBT_TAGS: &[&str] = &["LongTermDebt", "LongTermDebtNoncurrent"];
const CASH_TAGS: &[&str] = &["CashAndCashEquivalentsAtCarryingValue"];
const SHARES_TAGS: &[&str] = &["EntityCommonStockSharesOutstanding"];

const US_GAAP: &str = "us-gaap";
const DEI: &str = "dei";
const CIK_WIDTH: usize = 10;

/// Number of annual revenues returned as history.
pub const REVENUE_HISTORY_YEARS: usize = 5;

/// Local replacements for the remote sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgarFixtures {
    /// Replaces `company_tickers.json`.
    pub company_tickers: Option<PathBuf>,
    /// Replaces the submissions document.
    pub submissions: Option<PathBuf>,
    /// Replaces the company facts document.
    pub company_facts: Option<PathBuf>,
}

/// EDGAR endpoints and client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgarConfig {
    /// Ticker to CIK dataset.
    pub tickers_url: String,
    /// Base URL of submissions documents.
    pub submissions_base_url: String,
    /// Base URL of company facts documents.
    pub facts_base_url: String,
    /// `user-agent` header; the SEC asks for contact details.
    pub user_agent: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Local fixture overrides.
    pub fixtures: EdgarFixtures,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            tickers_url: "https://www.sec.gov/files/company_tickers.json".to_string(),
            submissions_base_url: "https://data.sec.gov/submissions".to_string(),
            facts_base_url: "https://data.sec.gov/api/xbrl/companyfacts".to_string(),
            user_agent: "equity-valuation/0.1".to_string(),
            timeout_ms: 10_000,
            fixtures: EdgarFixtures::default(),
        }
    }
}

impl EdgarConfig {
    /// Points every endpoint at `base_url`, keeping the EDGAR path layout.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.tickers_url = format!("{base}/files/company_tickers.json");
        self.submissions_base_url = format!("{base}/submissions");
        self.facts_base_url = format!("{base}/api/xbrl/companyfacts");
        self
    }

    /// Sets the fixture overrides.
    #[must_use]
    pub fn with_fixtures(mut self, fixtures: EdgarFixtures) -> Self {
        self.fixtures = fixtures;
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct CompanyFacts {
    #[serde(default)]
    facts: BTreeMap<String, BTreeMap<String, FactNode>>,
}

#[derive(Debug, Default, Deserialize)]
struct FactNode {
    #[serde(default)]
    units: BTreeMap<String, Vec<FactRow>>,
}

#[derive(Debug, Deserialize)]
struct FactRow {
    #[serde(default)]
    val: Value,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    filed: Option<String>,
    #[serde(default)]
    fp: Option<String>,
    #[serde(default)]
    form: Option<String>,
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

impl FactRow {
    fn value(&self) -> Option<f64> {
        coerce_finite(&self.val)
    }

    fn stamp(&self) -> Option<NaiveDate> {
        parse_date(self.end.as_deref()).or_else(|| parse_date(self.filed.as_deref()))
    }

    fn is_annual(&self) -> bool {
        self.fp.as_deref() == Some("FY")
            && self.form.as_deref().is_some_and(|f| f.starts_with("10-K"))
    }
}

impl CompanyFacts {
    fn rows<'a>(&'a self, taxonomy: &str, tag: &str) -> impl Iterator<Item = &'a FactRow> + 'a {
        self.facts
            .get(taxonomy)
            .and_then(|t| t.get(tag))
            .into_iter()
            .flat_map(|node| node.units.values())
            .flatten()
            .filter(|row| row.value().is_some())
    }

    /// Most recent value of the first tag with data.
    fn latest(&self, taxonomy: &str, tags: &[&str]) -> Option<f64> {
        tags.iter().find_map(|tag| {
            let mut rows: Vec<&FactRow> = self.rows(taxonomy, tag).collect();
            rows.sort_by(|a, b| b.stamp().cmp(&a.stamp()));
            rows.first().and_then(|row| row.value())
        })
    }

    /// Annual values of the first tag with annual data, oldest first.
    fn annual_series(&self, taxonomy: &str, tags: &[&str], limit: usize) -> Vec<f64> {
        tags.iter()
            .map(|tag| {
                let mut by_end: BTreeMap<NaiveDate, (Option<NaiveDate>, f64)> = BTreeMap::new();
                for row in self.rows(taxonomy, tag).filter(|r| r.is_annual()) {
                    let (Some(end), Some(value)) = (parse_date(row.end.as_deref()), row.value())
                    else {
                        continue;
                    };
                    let filed = parse_date(row.filed.as_deref());
                    let newer = by_end.get(&end).is_none_or(|(seen, _)| filed >= *seen);
                    if newer {
                        by_end.insert(end, (filed, value));
                    }
                }
                let values: Vec<f64> = by_end.into_values().map(|(_, v)| v).collect();
                let skip = values.len().saturating_sub(limit);
                values.into_iter().skip(skip).collect::<Vec<f64>>()
            })
            .find(|series| !series.is_empty())
            .unwrap_or_default()
    }
}

/// Extracts a statement from a company facts document.
///
/// # Errors
///
/// Returns [`IngestionError::MalformedPayload`] when revenue, operating
/// income or capex has no usable fact.
fn statement_from_facts(facts: &CompanyFacts) -> IngestionResult<RawStatement> {
    let required = |tags: &[&str], field: &str| {
        facts
            .latest(US_GAAP, tags)
            .ok_or_else(|| IngestionError::malformed(format!("no '{field}' facts in us-gaap")))
    };

    let mut statement = RawStatement::new()
        .with(fields::REVENUE, Value::from(required(REVENUE_TAGS, fields::REVENUE)?))
        .with(fields::EBIT, Value::from(required(EBIT_TAGS, fields::EBIT)?))
        .with(fields::CAPEX, Value::from(required(CAPEX_TAGS, fields::CAPEX)?.abs()));

    let optional = [
        (fields::TAX_EXPENSE, facts.latest(US_GAAP, TAX_TAGS)),
        (fields::DEPRECIATION, facts.latest(US_GAAP, DEPRECIATION_TAGS)),
        (fields::DEBT, facts.latest(US_GAAP, DEBT_TAGS)),
        (fields::CASH, facts.latest(US_GAAP, CASH_TAGS)),
        (fields::SHARES_OUTSTANDING, facts.latest(DEI, SHARES_TAGS)),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            statement.insert(field, Value::from(value));
        }
    }
    Ok(statement)
}

fn cik_from_value(value: &Value) -> Option<String> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("{digits:0>width$}", width = CIK_WIDTH))
    }
}

/// Finds the zero-padded CIK for `ticker` in a company tickers dataset.
///
/// Both the object form (`{"0": {...}, "1": {...}}`) and a plain array of
/// entries are accepted.
#[must_use]
pub fn find_cik(dataset: &Value, ticker: &Ticker) -> Option<String> {
    let entries: Vec<&Value> = match dataset {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    };
    entries
        .into_iter()
        .find(|entry| {
            entry
                .get("ticker")
                .and_then(Value::as_str)
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(ticker.as_str()))
        })
        .and_then(|entry| entry.get("cik_str").and_then(cik_from_value))
}

fn sector_from_submissions(payload: &Value) -> String {
    let non_empty = |key: &str| match payload.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    non_empty("sicDescription")
        .or_else(|| non_empty("sic"))
        .unwrap_or_else(|| UNKNOWN_SECTOR.to_string())
}

/// [`FinancialDataProvider`] backed by SEC EDGAR.
#[derive(Debug, Clone)]
pub struct EdgarProvider {
    config: EdgarConfig,
    client: HttpClient,
    ciks: Arc<RwLock<HashMap<Ticker, String>>>,
    facts: Arc<RwLock<HashMap<String, Arc<CompanyFacts>>>>,
}

impl EdgarProvider {
    /// Creates a provider.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::Configuration`] if the HTTP client cannot be
    /// built from the configuration.
    pub fn new(config: EdgarConfig) -> IngestionResult<Self> {
        let client = HttpClient::new(config.timeout_ms, &config.user_agent)?;
        Ok(Self {
            config,
            client,
            ciks: Arc::new(RwLock::new(HashMap::new())),
            facts: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EdgarConfig {
        &self.config
    }

    async fn load<T: DeserializeOwned>(&self, fixture: Option<&Path>, url: &str) -> IngestionResult<T> {
        match fixture {
            Some(path) => {
                tracing::debug!(path = %path.display(), "reading EDGAR fixture");
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| IngestionError::io(path, &e))?;
                parse_json(&bytes, &path.display().to_string())
            }
            None => self.client.get_json(url).await,
        }
    }

    /// Resolves the zero-padded CIK of `ticker`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::NotFound`] if the ticker is not in the
    /// dataset, or any error from loading the dataset.
    pub async fn resolve_cik(&self, ticker: &Ticker) -> IngestionResult<String> {
        if let Some(cik) = self.ciks.read().await.get(ticker) {
            return Ok(cik.clone());
        }
        let dataset: Value = self
            .load(
                self.config.fixtures.company_tickers.as_deref(),
                &self.config.tickers_url,
            )
            .await?;
        let cik = find_cik(&dataset, ticker)
            .ok_or_else(|| IngestionError::not_found("cik", ticker.as_str()))?;
        tracing::debug!(%ticker, %cik, "resolved CIK");
        self.ciks.write().await.insert(ticker.clone(), cik.clone());
        Ok(cik)
    }

    async fn company_facts(&self, ticker: &Ticker) -> IngestionResult<Arc<CompanyFacts>> {
        let fixture = self.config.fixtures.company_facts.as_deref();
        let key = match fixture {
            Some(path) => path.display().to_string(),
            None => self.resolve_cik(ticker).await?,
        };
        if let Some(facts) = self.facts.read().await.get(&key) {
            return Ok(Arc::clone(facts));
        }
        let url = format!("{}/CIK{}.json", self.config.facts_base_url, key);
        let facts: Arc<CompanyFacts> = Arc::new(self.load(fixture, &url).await?);
        self.facts.write().await.insert(key, Arc::clone(&facts));
        Ok(facts)
    }
}

#[async_trait]
impl FinancialDataProvider for EdgarProvider {
    fn name(&self) -> &str {
        "sec-edgar"
    }

    async fn fetch_company_profile(&self, ticker: &Ticker) -> IngestionResult<CompanyProfile> {
        let payload: Value = match self.config.fixtures.submissions.as_deref() {
            Some(path) => self.load(Some(path), "").await?,
            None => {
                let cik = self.resolve_cik(ticker).await?;
                let url = format!("{}/CIK{}.json", self.config.submissions_base_url, cik);
                self.load(None, &url).await?
            }
        };

        let mut profile = CompanyProfile::new(ticker.clone(), sector_from_submissions(&payload));
        if let Some(name) = payload.get("name").and_then(Value::as_str) {
            profile = profile.with_name(name.trim());
        }
        Ok(profile)
    }

    async fn fetch_latest_statement(&self, ticker: &Ticker) -> IngestionResult<RawStatement> {
        let facts = self.company_facts(ticker).await?;
        statement_from_facts(&facts)
    }

    async fn fetch_revenue_history(&self, ticker: &Ticker) -> IngestionResult<Vec<f64>> {
        let facts = self.company_facts(ticker).await?;
        Ok(facts.annual_series(US_GAAP, REVENUE_TAGS, REVENUE_HISTORY_YEARS))
    }
}
