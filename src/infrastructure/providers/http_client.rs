//! # HTTP Client
//!
//! Shared JSON-over-HTTP client for provider adapters.
//!
//! Wraps `reqwest` with a request timeout, default headers and mapping of
//! transport and status failures to [`IngestionError`]. Response bodies are
//! decoded by hand so a leading UTF-8 byte order mark is tolerated.
//!
//! # Examples
//!
//! ```ignore
//! use equity_valuation::infrastructure::providers::http_client::HttpClient;
//!
//! let client = HttpClient::new(10_000, "acme-research admin@acme.test")?;
//! let facts: serde_json::Value = client.get_json("https://data.sec.gov/...").await?;
//! ```

use crate::infrastructure::providers::error::{IngestionError, IngestionResult};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const MAX_ERROR_BODY: usize = 256;

/// Removes a leading UTF-8 byte order mark.
#[must_use]
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Parses JSON, tolerating a leading byte order mark.
///
/// # Errors
///
/// Returns [`IngestionError::MalformedPayload`] if the body is not valid JSON
/// of the expected shape.
pub fn parse_json<T: DeserializeOwned>(bytes: &[u8], source: &str) -> IngestionResult<T> {
    serde_json::from_slice(strip_bom(bytes))
        .map_err(|e| IngestionError::malformed(format!("{source}: {e}")))
}

/// HTTP client wrapper for provider adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a client that sends `accept: application/json` and the given
    /// `user-agent` on every request.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms` - Request timeout in milliseconds.
    /// * `user_agent` - Value of the `user-agent` header.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::Configuration`] if the user agent is not a
    /// valid header value or the client cannot be built.
    pub fn new(timeout_ms: u64, user_agent: &str) -> IngestionResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| {
                IngestionError::configuration(format!("invalid user agent '{user_agent}': {e}"))
            })?,
        );
        Self::with_headers(timeout_ms, headers)
    }

    /// Creates a client with custom default headers.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::Configuration`] if the client cannot be built.
    pub fn with_headers(timeout_ms: u64, default_headers: HeaderMap) -> IngestionResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                IngestionError::configuration(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// - [`IngestionError::Timeout`] / [`IngestionError::Network`] on transport failure
    /// - [`IngestionError::HttpStatus`] / [`IngestionError::NotFound`] on a non-2xx status
    /// - [`IngestionError::MalformedPayload`] if the body cannot be parsed
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> IngestionResult<T> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(url, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        url: &str,
        response: Response,
    ) -> IngestionResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| self.map_reqwest_error(e))?;
            parse_json(&body, url)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(url, status, &body))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> IngestionError {
        if error.is_timeout() {
            IngestionError::timeout(format!("request timed out after {}ms", self.timeout_ms))
        } else if error.is_connect() {
            IngestionError::network(format!("connection failed: {error}"))
        } else {
            IngestionError::network(format!("HTTP request failed: {error}"))
        }
    }

    fn map_status_error(&self, url: &str, status: StatusCode, body: &str) -> IngestionError {
        match status {
            StatusCode::NOT_FOUND => IngestionError::not_found("resource", url),
            _ => {
                let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
                IngestionError::http_status(status.as_u16(), excerpt)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000, "equity-valuation test@example.com").unwrap();
        assert_eq!(client.timeout_ms(), 5000);
    }

    #[test]
    fn invalid_user_agent_is_configuration_error() {
        let err = HttpClient::new(5000, "bad\nagent").unwrap_err();
        assert!(matches!(err, IngestionError::Configuration { .. }));
    }

    #[test]
    fn bom_is_stripped() {
        let mut body = UTF8_BOM.to_vec();
        body.extend_from_slice(br#"{"a":1}"#);
        let value: Value = parse_json(&body, "test").unwrap();
        assert_eq!(value["a"], 1);
        assert_eq!(strip_bom(b"plain"), b"plain");
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse_json::<Value>(b"{not json", "fixture.json").unwrap_err();
        assert!(matches!(err, IngestionError::MalformedPayload { .. }));
        assert!(err.to_string().contains("fixture.json"));
    }
}
