use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors produced by a single poll cycle.
///
/// `Cancelled` is internal bookkeeping: it marks a cycle that was superseded
/// or torn down and is never surfaced to a consumer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Error {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request cancelled")]
    Cancelled,
}

/// Fail-fast errors raised when a poller is created with malformed
/// parameters. These never surface at runtime as a snapshot error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Resource identity must not be empty")]
    EmptyIdentity,

    #[error("Invalid resource identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Transport build failed: {0}")]
    Transport(String),
}

impl PollError {
    /// Builds an `Http` error from a non-2xx response.
    ///
    /// The body is opportunistically parsed for a server-provided `detail`
    /// field; if that fails, the message falls back to the canonical status
    /// reason (e.g. "Error 500: Internal Server Error").
    pub fn http(status: u16, body: Option<&str>) -> Self {
        let detail = body
            .and_then(|text| serde_json::from_str::<Value>(text).ok())
            .and_then(|parsed| {
                parsed
                    .get("detail")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                StatusCode::from_u16(status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .unwrap_or("Unknown Error")
                    .to_string()
            });

        PollError::Http { status, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_uses_server_detail() {
        let err = PollError::http(503, Some(r#"{"detail":"upstream database is down"}"#));
        assert_eq!(err.to_string(), "Error 503: upstream database is down");
    }

    #[test]
    fn test_http_error_falls_back_to_status_text() {
        // Body is not JSON at all
        let err = PollError::http(500, Some("<html>oops</html>"));
        assert_eq!(err.to_string(), "Error 500: Internal Server Error");

        // Body is JSON but carries no `detail` field
        let err = PollError::http(404, Some(r#"{"message":"nope"}"#));
        assert_eq!(err.to_string(), "Error 404: Not Found");

        // No body at all
        let err = PollError::http(502, None);
        assert_eq!(err.to_string(), "Error 502: Bad Gateway");
    }

    #[test]
    fn test_http_error_unknown_status() {
        let err = PollError::http(599, None);
        assert_eq!(err.to_string(), "Error 599: Unknown Error");
    }
}
