//! Classification of failed backend calls.

use reqwest::StatusCode;
use serde_json::Value;

/// A failed call to one of the backends.
///
/// HTTP failures carry the backend's `detail` message when the body had one,
/// so callers can show it and fall back to their own wording otherwise.
#[derive(Debug)]
pub enum ApiError {
    /// Rejected locally before anything was sent
    Invalid(String),
    /// The request could not be built or prepared (e.g. a bad header value)
    Prepare(String),
    /// The request never got a response (no base URL, connection refused, ...)
    Transport(String),
    /// HTTP 401
    Unauthorized(Option<String>),
    /// HTTP 403
    Forbidden(Option<String>),
    /// HTTP 404
    NotFound(Option<String>),
    /// HTTP 409
    Conflict(Option<String>),
    /// Other 4xx
    Client { status: u16, detail: Option<String> },
    /// 5xx
    Server { status: u16, detail: Option<String> },
    /// 2xx with a body that did not match the expected shape
    Decode(String),
}

impl ApiError {
    /// Builds the error for a non-2xx response from its status and raw body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = extract_detail(body);
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(detail),
            StatusCode::FORBIDDEN => ApiError::Forbidden(detail),
            StatusCode::NOT_FOUND => ApiError::NotFound(detail),
            StatusCode::CONFLICT => ApiError::Conflict(detail),
            s if s.is_server_error() => ApiError::Server {
                status: s.as_u16(),
                detail,
            },
            s => ApiError::Client {
                status: s.as_u16(),
                detail,
            },
        }
    }

    /// The backend's own message, when it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(detail)
            | ApiError::Forbidden(detail)
            | ApiError::NotFound(detail)
            | ApiError::Conflict(detail)
            | ApiError::Client { detail, .. }
            | ApiError::Server { detail, .. } => detail.as_deref(),
            ApiError::Invalid(msg) => Some(msg),
            ApiError::Prepare(_) | ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }

    /// Backend detail if present, else the caller's generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Invalid(msg) => f.write_str(msg),
            ApiError::Prepare(msg) => write!(f, "Failed to prepare request: {}", msg),
            ApiError::Transport(msg) => write!(f, "Request failed: {}", msg),
            ApiError::Unauthorized(detail) => write!(
                f,
                "Authentication failed: {}. Try logging in again.",
                detail.as_deref().unwrap_or("invalid or missing token")
            ),
            ApiError::Forbidden(detail) => write!(
                f,
                "Access forbidden: {}",
                detail.as_deref().unwrap_or("insufficient permissions")
            ),
            ApiError::NotFound(detail) => {
                write!(f, "Not found: {}", detail.as_deref().unwrap_or("no such resource"))
            }
            ApiError::Conflict(detail) => {
                write!(f, "Conflict: {}", detail.as_deref().unwrap_or("resource already exists"))
            }
            ApiError::Client { status, detail } => match detail {
                Some(d) => write!(f, "Request error (HTTP {}): {}", status, d),
                None => write!(f, "Request error: HTTP {}", status),
            },
            ApiError::Server { status, detail } => match detail {
                Some(d) => write!(f, "Server error (HTTP {}): {}", status, d),
                None => write!(f, "Server error: HTTP {}", status),
            },
            ApiError::Decode(msg) => write!(f, "Unexpected response body: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Pulls a string `detail` out of a JSON error body.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(map) => match map.get("detail") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        },
        _ => None,
    }
}
