//! Error type shared by every client-side operation
//!
//! Network failures, HTTP status classes, decoding, session problems and form
//! validation are kept apart so callers can show the user something useful
//! instead of leaving stale state behind.

use reqwest::StatusCode;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Crag client error
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (DNS, connection refused, TLS...)
    #[error("Network error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// 401 - missing, invalid or revoked credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 404 - the requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other 4xx response
    #[error("Request rejected ({status}): {detail}")]
    Client { status: StatusCode, detail: String },

    /// 5xx response
    #[error("Server error ({status}): {detail}")]
    Server { status: StatusCode, detail: String },

    /// The response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// No session is stored; the user has to log in
    #[error("Not logged in")]
    NotAuthenticated,

    /// The stored session is past its expiry
    #[error("Session expired at {0}")]
    SessionExpired(chrono::DateTime<chrono::Utc>),

    /// Form input rejected before anything was sent
    #[error("Invalid input: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Malformed WKT geometry
    #[error("Invalid geometry: {0}")]
    Geometry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    /// Build the error for a non-success HTTP status.
    ///
    /// `body` is the raw response text; FastAPI style `{"detail": "..."}`
    /// bodies are unwrapped to their message.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = extract_detail(body).unwrap_or_else(|| {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthorized(detail),
            StatusCode::NOT_FOUND => Error::NotFound(detail),
            s if s.is_server_error() => Error::Server { status: s, detail },
            s => Error::Client { status: s, detail },
        }
    }

    /// Whether an idempotent request failing with this error may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_) | Error::Server { .. })
    }

    /// Whether the user has to (re-)authenticate to proceed
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::Unauthorized(_) | Error::NotAuthenticated | Error::SessionExpired(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else if err.is_decode() {
            Error::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Error::from_status(status, "")
        } else {
            Error::Transport(err.to_string())
        }
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            // FastAPI validation errors carry a list of {loc, msg, type}
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(|m| m.as_str()).map(str::to_string))
                    .collect();
                if msgs.is_empty() {
                    Some(serde_json::Value::Array(items.clone()).to_string())
                } else {
                    Some(msgs.join("; "))
                }
            }
            Some(other) => Some(other.to_string()),
            None => Some(trimmed.to_string()),
        },
        _ => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            Error::from_status(StatusCode::UNAUTHORIZED, ""),
            Error::Unauthorized(_)
        ));
        assert!(matches!(Error::from_status(StatusCode::NOT_FOUND, ""), Error::NotFound(_)));
        assert!(matches!(
            Error::from_status(StatusCode::BAD_REQUEST, ""),
            Error::Client { status: StatusCode::BAD_REQUEST, .. }
        ));
        assert!(matches!(
            Error::from_status(StatusCode::BAD_GATEWAY, ""),
            Error::Server { status: StatusCode::BAD_GATEWAY, .. }
        ));
    }

    #[test]
    fn test_detail_extraction() {
        let err = Error::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Error inserting climb: duplicate"}"#,
        );
        assert_eq!(
            err.to_string(),
            "Request rejected (400 Bad Request): Error inserting climb: duplicate"
        );

        let err = Error::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","name"],"msg":"field required","type":"missing"}]}"#,
        );
        assert!(err.to_string().contains("field required"));

        let err = Error::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(err.to_string().contains("boom"));

        let err = Error::from_status(StatusCode::NOT_FOUND, "");
        assert_eq!(err.to_string(), "Not found: Not Found");
    }

    #[test]
    fn test_retry_and_login_classes() {
        assert!(Error::Transport("refused".into()).is_retryable());
        assert!(Error::from_status(StatusCode::SERVICE_UNAVAILABLE, "").is_retryable());
        assert!(!Error::from_status(StatusCode::BAD_REQUEST, "").is_retryable());
        assert!(Error::NotAuthenticated.requires_login());
        assert!(Error::from_status(StatusCode::UNAUTHORIZED, "").requires_login());
        assert!(!Error::Validation(vec!["x".into()]).requires_login());
    }
}
