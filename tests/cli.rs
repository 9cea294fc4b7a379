//! Command line end to end with in-memory providers.

#![cfg(feature = "cli")]
#![allow(clippy::unwrap_used)]

use equity_valuation::api::cli::{CliOptions, EXIT_FAILURE, EXIT_SUCCESS, run_cli};
use equity_valuation::domain::entities::statement::fields;
use equity_valuation::domain::entities::{CompanyProfile, RawStatement};
use equity_valuation::domain::value_objects::{Country, Ticker};
use equity_valuation::infrastructure::providers::{CompanyData, InMemoryProvider, ProviderRegistry};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;

fn company(symbol: &str, sector: &str) -> CompanyData {
    CompanyData::new(
        CompanyProfile::new(Ticker::new(symbol).unwrap(), sector),
        RawStatement::new()
            .with(fields::REVENUE, json!(5000))
            .with(fields::EBIT, json!(900))
            .with(fields::CAPEX, json!(200))
            .with(fields::DEPRECIATION, json!(150))
            .with(fields::SHARES_OUTSTANDING, json!(250)),
    )
    .with_revenue_history(vec![4000.0, 4500.0, 5000.0])
}

fn options(dir: &Path) -> CliOptions {
    let provider = Arc::new(
        InMemoryProvider::builder()
            .with_company(company("ACME", "Industrial Machinery"))
            .with_company(company("BNK", "State Commercial Banks"))
            .with_company(company("7203", "Transportation Equipment"))
            .build(),
    );
    let registry = ProviderRegistry::new()
        .with_provider(Country::Us, provider.clone())
        .with_provider(Country::Jp, provider);
    CliOptions::default()
        .with_registry(registry)
        .with_output_dir(dir)
}

async fn run(dir: &Path, args: &[&str]) -> i32 {
    let argv = std::iter::once("equity-valuation").chain(args.iter().copied());
    run_cli(argv, options(dir)).await
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn success_writes_report_files() {
    let dir = tempfile::tempdir().unwrap();
    let code = run(dir.path(), &["acme", "--iterations", "150", "--seed", "42"]).await;

    assert_eq!(code, EXIT_SUCCESS);
    let report = read_json(&dir.path().join("result.json"));
    assert_eq!(report["ticker"], "ACME");
    assert_eq!(report["country"], "US");
    assert_eq!(report["hybridScore"], 0.75);
    assert!(report["valuePerShare"].as_f64().unwrap() > 0.0);
    assert!(report["p10"].as_f64().unwrap() <= report["p90"].as_f64().unwrap());

    let csv = std::fs::read_to_string(dir.path().join("result.csv")).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("ticker,country,enterpriseValue"));
    assert!(lines.next().unwrap().starts_with(r#""ACME","US","#));
    assert!(!dir.path().join("error.json").exists());
}

#[tokio::test]
async fn explicit_ticker_and_country() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("explicit");
    let code = run(
        dir.path(),
        &[
            "--ticker",
            "7203",
            "--country",
            "JP",
            "--iterations",
            "100",
            "--output-dir",
            out.to_str().unwrap(),
        ],
    )
    .await;

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(read_json(&out.join("result.json"))["country"], "JP");
    assert!(!dir.path().join("result.json").exists());
}

#[tokio::test]
async fn overrides_reach_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let code = run(
        dir.path(),
        &["ACME", "--iterations", "100", "--wacc", "0.11", "--terminal-growth", "0.01"],
    )
    .await;

    assert_eq!(code, EXIT_SUCCESS);
    let report = read_json(&dir.path().join("result.json"));
    assert_eq!(report["assumptions"]["wacc"], 0.11);
    assert_eq!(report["assumptions"]["terminalGrowth"], 0.01);
}

#[tokio::test]
async fn rejected_sector_writes_error_record() {
    let dir = tempfile::tempdir().unwrap();
    let code = run(dir.path(), &["BNK"]).await;

    assert_eq!(code, EXIT_FAILURE);
    let error = read_json(&dir.path().join("error.json"));
    assert_eq!(error["code"], "unsupported_sector");
    assert_eq!(error["stage"], "validate_eligibility");
    assert_eq!(error["ticker"], "BNK");
    assert!(error["traceId"].as_str().unwrap().starts_with("trace-"));
    assert!(!dir.path().join("result.json").exists());
    assert!(!dir.path().join("result.csv").exists());
}

#[tokio::test]
async fn missing_ticker() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run(dir.path(), &[]).await, EXIT_FAILURE);

    let error = read_json(&dir.path().join("error.json"));
    assert_eq!(error["code"], "missing_ticker");
    assert_eq!(error["stage"], "cli");
    assert!(error["ticker"].is_null());
}

#[tokio::test]
async fn ticker_without_country() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run(dir.path(), &["--ticker", "ACME"]).await, EXIT_FAILURE);

    let error = read_json(&dir.path().join("error.json"));
    assert_eq!(error["code"], "missing_required_args");
    assert_eq!(error["ticker"], "ACME");
}

#[tokio::test]
async fn flag_without_value() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run(dir.path(), &["--ticker"]).await, EXIT_FAILURE);

    let error = read_json(&dir.path().join("error.json"));
    assert_eq!(error["code"], "missing_required_args");
    assert_eq!(error["stage"], "cli");
}

#[tokio::test]
async fn unresolvable_ticker() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run(dir.path(), &["12AB34"]).await, EXIT_FAILURE);

    let error = read_json(&dir.path().join("error.json"));
    assert_eq!(error["code"], "market_resolution_failed");
    assert_eq!(error["stage"], "resolve_market");
    assert_eq!(error["ticker"], "12AB34");
}

#[tokio::test]
async fn help_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run(dir.path(), &["--help"]).await, EXIT_SUCCESS);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
