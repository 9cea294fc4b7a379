//! EDGAR provider against a mock HTTP server.

#![allow(clippy::unwrap_used)]

use equity_valuation::domain::entities::statement::fields;
use equity_valuation::domain::value_objects::Ticker;
use equity_valuation::infrastructure::providers::{
    EdgarConfig, EdgarProvider, FinancialDataProvider, IngestionError,
};
use serde_json::json;
use std::path::PathBuf;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "equity-valuation-tests admin@example.com";
const AAPL_CIK: &str = "0000320193";

fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/edgar")
        .join(name);
    std::fs::read(path).unwrap()
}

fn json_response(body: Vec<u8>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

fn ticker(s: &str) -> Ticker {
    Ticker::new(s).unwrap()
}

async fn server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/company_tickers.json"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(json_response(fixture("company_tickers.json")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/submissions/CIK{AAPL_CIK}.json")))
        .respond_with(json_response(fixture("aapl_submissions.json")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/xbrl/companyfacts/CIK{AAPL_CIK}.json")))
        .respond_with(json_response(fixture("aapl_facts.json")))
        .mount(&server)
        .await;
    server
}

async fn hits(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}

fn provider(server: &MockServer) -> EdgarProvider {
    let mut config = EdgarConfig::default().with_base_url(&server.uri());
    config.user_agent = USER_AGENT.to_string();
    config.timeout_ms = 2_000;
    EdgarProvider::new(config).unwrap()
}

#[tokio::test]
async fn fetches_profile_statement_and_history() {
    let server = server().await;
    let provider = provider(&server);
    let aapl = ticker("aapl");

    let profile = provider.fetch_company_profile(&aapl).await.unwrap();
    assert_eq!(profile.sector(), "Electronic Computers");
    assert_eq!(profile.name(), Some("Apple Inc."));

    let statement = provider.fetch_latest_statement(&aapl).await.unwrap();
    assert_eq!(statement.get(fields::REVENUE), Some(&json!(383_285_000_000.0)));
    assert_eq!(statement.get(fields::EBIT), Some(&json!(114_301_000_000.0)));
    assert_eq!(statement.get(fields::CAPEX), Some(&json!(10_959_000_000.0)));
    assert_eq!(statement.get(fields::CASH), Some(&json!(29_965_000_000.0)));
    assert_eq!(
        statement.get(fields::SHARES_OUTSTANDING),
        Some(&json!(15_552_752_000.0))
    );
    assert!(statement.get(fields::WORKING_CAPITAL_DELTA).is_none());

    let history = provider.fetch_revenue_history(&aapl).await.unwrap();
    assert_eq!(
        history,
        vec![260_174e6, 274_515e6, 365_817e6, 394_328e6, 383_285e6]
    );

    assert_eq!(hits(&server, "/files/company_tickers.json").await, 1);
    assert_eq!(
        hits(&server, &format!("/api/xbrl/companyfacts/CIK{AAPL_CIK}.json")).await,
        1
    );
}

#[tokio::test]
async fn cik_is_zero_padded_and_cached() {
    let server = server().await;
    let provider = provider(&server);

    assert_eq!(provider.resolve_cik(&ticker("AAPL")).await.unwrap(), AAPL_CIK);
    assert_eq!(provider.resolve_cik(&ticker("AAPL")).await.unwrap(), AAPL_CIK);
    assert_eq!(hits(&server, "/files/company_tickers.json").await, 1);
}

#[tokio::test]
async fn unknown_ticker_is_not_found() {
    let server = server().await;
    let err = provider(&server)
        .fetch_company_profile(&ticker("ZZZZ"))
        .await
        .unwrap_err();
    assert!(matches!(err, IngestionError::NotFound { .. }), "{err:?}");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn server_errors_are_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/company_tickers.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_company_profile(&ticker("AAPL"))
        .await
        .unwrap_err();
    assert!(matches!(err, IngestionError::HttpStatus { status: 503, .. }), "{err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn byte_order_mark_is_tolerated() {
    let server = MockServer::start().await;
    let mut body = vec![0xEF, 0xBB, 0xBF];
    body.extend(fixture("company_tickers.json"));
    Mock::given(method("GET"))
        .and(path("/files/company_tickers.json"))
        .respond_with(json_response(body))
        .mount(&server)
        .await;

    let cik = provider(&server).resolve_cik(&ticker("MSFT")).await.unwrap();
    assert_eq!(cik, "0000789019");
}

#[tokio::test]
async fn facts_without_required_tags_are_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/company_tickers.json"))
        .respond_with(json_response(fixture("company_tickers.json")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/xbrl/companyfacts/CIK{AAPL_CIK}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "facts": {"us-gaap": {"Revenues": {"units": {"USD": [
                {"end": "2023-09-30", "val": 1000, "fp": "FY", "form": "10-K"}
            ]}}}}
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_latest_statement(&ticker("AAPL"))
        .await
        .unwrap_err();
    assert!(matches!(err, IngestionError::MalformedPayload { .. }), "{err:?}");
}
