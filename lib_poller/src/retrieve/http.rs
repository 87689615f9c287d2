//! # HTTP Poll Transport
//!
//! A thin asynchronous transport wrapper around `reqwest`. It owns the
//! configured client (timeout, default headers) and captures raw
//! status/body pairs; interpreting them is the cycle driver's job.

use crate::poller::config::TransportOptions;
use crate::poller::error::{ConfigError, PollError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// A raw response captured by the transport.
///
/// The body is kept as text so that the caller can decide how to interpret
/// it: parse it as the expected payload shape on success, or mine it for a
/// server-provided `detail` message on failure. `body` is `None` only for a
/// 204 No Content response.
#[derive(Debug)]
pub struct PollResponse {
    /// The numeric HTTP status code.
    pub status: u16,
    /// Indicates if the status code was in the 2xx range.
    pub success: bool,
    /// The raw response body, `None` for 204 No Content.
    pub body: Option<String>,
}

/// The HTTP transport for one poller instance.
///
/// Built once per poller from the base URL and the caller-supplied
/// `TransportOptions`; the underlying `reqwest::Client` is reused across all
/// cycles to leverage connection pooling.
pub struct PollTransport {
    /// The underlying configured client.
    inner: reqwest::Client,
    /// The base URL to which resource identities are joined.
    base_url: Url,
}

impl PollTransport {
    /// Creates a new transport.
    ///
    /// Every configuration problem (unparseable base URL, malformed header
    /// names or values) fails fast here rather than surfacing as a runtime
    /// snapshot error.
    pub fn new(base_url: &str, options: &TransportOptions) -> Result<Self, ConfigError> {
        let url =
            Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;

        // Default headers: Accept json, then caller-supplied extras on top
        // (the caller may override Accept).
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent("PollStream/1.0");
        if let Some(timeout_ms) = options.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;

        Ok(Self {
            inner: client,
            base_url: url,
        })
    }

    /// Derives the request target for a resource identity by joining it onto
    /// the base URL. The identity may already carry its own query string
    /// (e.g. `/api/orders?skip=0&limit=10`).
    pub fn target(&self, identity: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(identity)
            .map_err(|e| ConfigError::InvalidIdentity(e.to_string()))
    }

    /// Executes one GET request and captures the raw result.
    ///
    /// Transport-level failures (connect errors, timeouts, aborted reads) map
    /// to `PollError::Network`; non-2xx statuses are *not* errors at this
    /// layer.
    pub async fn fetch(&self, url: Url) -> Result<PollResponse, PollError> {
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| PollError::Network(e.to_string()))?;

        let status = response.status();
        let success = status.is_success();
        let text = response
            .text()
            .await
            .map_err(|e| PollError::Network(e.to_string()))?;

        let body = if status == StatusCode::NO_CONTENT {
            None
        } else {
            Some(text)
        };

        Ok(PollResponse {
            status: status.as_u16(),
            success,
            body,
        })
    }
}
