use std::fmt;

use serde_json::Value;

/// Error categories returned by [`super::ApiClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection failure, DNS, TLS, or the request was cut off.
    Transport,
    /// Non-2xx HTTP status.
    HttpStatus,
    /// 2xx body that does not match the response schema.
    Malformed,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Malformed => write!(f, "malformed"),
        }
    }
}

/// Failed API call.
///
/// `message` is always human-readable and suitable for display; `details`
/// carries the raw cause for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Builds an error for a non-2xx response.
    ///
    /// The message is taken from the body's `message` field, then `msg`,
    /// falling back to `fallback` when the body has neither.
    pub fn http_status(status: u16, body: &str, fallback: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| fallback.to_string());
        let details = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {body}")
        };
        Self::new(ApiErrorKind::HttpStatus, message).with_details(details)
    }

    pub fn transport(fallback: &str, err: &reqwest::Error) -> Self {
        Self::new(ApiErrorKind::Transport, fallback).with_details(err.to_string())
    }

    pub fn malformed(fallback: &str, cause: impl fmt::Display) -> Self {
        Self::new(ApiErrorKind::Malformed, fallback).with_details(cause.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

fn extract_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    ["message", "msg"].iter().find_map(|field| {
        json.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_prefers_message_field() {
        let err = ApiError::http_status(
            401,
            r#"{"message":"Session expired","msg":"ignored"}"#,
            "Failed to load dashboard",
        );
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        assert_eq!(err.message, "Session expired");
        assert!(err.details.as_deref().unwrap().starts_with("HTTP 401"));
    }

    #[test]
    fn test_http_status_uses_msg_field() {
        let err = ApiError::http_status(400, r#"{"status":false,"msg":"Bad id"}"#, "Login failed");
        assert_eq!(err.message, "Bad id");
    }

    #[test]
    fn test_http_status_falls_back_on_plain_body() {
        let err = ApiError::http_status(500, "<html>oops</html>", "Login failed");
        assert_eq!(err.message, "Login failed");
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn test_http_status_ignores_blank_message() {
        let err = ApiError::http_status(502, r#"{"message":"   "}"#, "OTP verification failed");
        assert_eq!(err.message, "OTP verification failed");
    }
}
