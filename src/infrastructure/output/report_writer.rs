//! # Report Writer
//!
//! Persists valuation reports and error records to an output directory.
//!
//! | File | Content |
//! |------|---------|
//! | `result.json` | pretty-printed camelCase report |
//! | `result.csv` | header plus one fully quoted row |
//! | `error.json` | error record with trace id |
//!
//! Every payload is serialized before any file is touched, so a
//! serialization failure never leaves a partial report behind.

use crate::application::error::ErrorRecord;
use crate::domain::entities::report::ValuationReport;
use crate::infrastructure::output::error::{OutputError, OutputResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Report JSON file name.
pub const REPORT_JSON: &str = "result.json";

/// Report CSV file name.
pub const REPORT_CSV: &str = "result.csv";

/// Error record file name.
pub const ERROR_JSON: &str = "error.json";

/// CSV columns, in order.
pub const CSV_COLUMNS: [&str; 11] = [
    "ticker",
    "country",
    "enterpriseValue",
    "equityValue",
    "valuePerShare",
    "p10",
    "p50",
    "p90",
    "trackingScore",
    "fundamentalScore",
    "hybridScore",
];

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output/equity-valuation";

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the files are written to.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Paths of a written report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// JSON report.
    pub json: PathBuf,
    /// CSV report.
    pub csv: PathBuf,
}

fn csv_row(report: &ValuationReport) -> [String; 11] {
    let dcf = report.dcf();
    let quantiles = report.quantiles();
    let scores = report.scores();
    [
        report.ticker().to_string(),
        report.country().to_string(),
        dcf.enterprise_value.to_string(),
        dcf.equity_value.to_string(),
        dcf.value_per_share.to_string(),
        quantiles.p10.to_string(),
        quantiles.p50.to_string(),
        quantiles.p90.to_string(),
        scores.tracking_score.to_string(),
        scores.fundamental_score.to_string(),
        scores.hybrid_score.to_string(),
    ]
}

/// Renders the CSV body: a plain header and one row with every cell quoted.
///
/// # Errors
///
/// Returns [`OutputError::Serialization`] if the CSV writer fails.
pub fn render_csv(report: &ValuationReport) -> OutputResult<Vec<u8>> {
    let to_error = |e: csv::Error| OutputError::serialization("csv report", e.to_string());

    let mut header = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    header.write_record(CSV_COLUMNS).map_err(to_error)?;
    let mut body = header
        .into_inner()
        .map_err(|e| OutputError::serialization("csv report", e.to_string()))?;

    let mut row = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    row.write_record(csv_row(report)).map_err(to_error)?;
    body.extend(
        row.into_inner()
            .map_err(|e| OutputError::serialization("csv report", e.to_string()))?,
    );
    Ok(body)
}

/// Writes reports and error records into one directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Creates a writer targeting `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Creates a writer from configuration.
    #[must_use]
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.dir.clone())
    }

    /// Returns the output directory.
    #[inline]
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn write(&self, name: &str, bytes: &[u8]) -> OutputResult<PathBuf> {
        let path = self.output_dir.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| OutputError::io(&path, e))?;
        Ok(path)
    }

    async fn ensure_dir(&self) -> OutputResult<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| OutputError::io(&self.output_dir, e))
    }

    /// Writes `result.json` and `result.csv`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if serialization or a filesystem write fails.
    pub async fn write_report(&self, report: &ValuationReport) -> OutputResult<ReportPaths> {
        let json = serde_json::to_vec_pretty(report)
            .map_err(|e| OutputError::serialization("report", e.to_string()))?;
        let csv = render_csv(report)?;

        self.ensure_dir().await?;
        let paths = ReportPaths {
            json: self.write(REPORT_JSON, &json).await?,
            csv: self.write(REPORT_CSV, &csv).await?,
        };
        info!(ticker = %report.ticker(), dir = %self.output_dir.display(), "report written");
        Ok(paths)
    }

    /// Writes `error.json`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if serialization or the filesystem write fails.
    pub async fn write_error(&self, record: &ErrorRecord) -> OutputResult<PathBuf> {
        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| OutputError::serialization("error record", e.to_string()))?;

        self.ensure_dir().await?;
        let path = self.write(ERROR_JSON, &json).await?;
        info!(code = %record.code, trace_id = %record.trace_id, "error record written");
        Ok(path)
    }
}
