//! Error types for HTTP calls and classification of faults for diagnostics.

use std::fmt;

use reqwest::StatusCode;

/// Errors raised by [`HttpClient`](super::HttpClient) on top of transport errors.
#[derive(Debug)]
pub enum CallError {
    /// The endpoint path could not be resolved against the base address
    InvalidUrl(String),
    /// The server answered with a non-success HTTP status
    Status(StatusCode),
    /// The response body was not the expected JSON
    Decode(serde_json::Error),
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            CallError::Status(status) => write!(f, "HTTP {} error", status.as_u16()),
            CallError::Decode(e) => write!(f, "Failed to parse JSON response: {}", e),
        }
    }
}

impl std::error::Error for CallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// Coarse category of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Timeout,
    Connect,
    Status(u16),
    Decode,
    InvalidUrl,
    Other,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Timeout => write!(f, "timeout"),
            FaultKind::Connect => write!(f, "connect"),
            FaultKind::Status(code) => write!(f, "status {}", code),
            FaultKind::Decode => write!(f, "decode"),
            FaultKind::InvalidUrl => write!(f, "invalid url"),
            FaultKind::Other => write!(f, "other"),
        }
    }
}

/// Classifies a failed call by walking its error chain.
pub fn classify(error: &anyhow::Error) -> FaultKind {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<CallError>() {
            return match e {
                CallError::InvalidUrl(_) => FaultKind::InvalidUrl,
                CallError::Status(status) => FaultKind::Status(status.as_u16()),
                CallError::Decode(_) => FaultKind::Decode,
            };
        }

        if let Some(e) = cause.downcast_ref::<reqwest::Error>() {
            if e.is_timeout() {
                return FaultKind::Timeout;
            }
            if e.is_connect() {
                return FaultKind::Connect;
            }
            if e.is_decode() {
                return FaultKind::Decode;
            }
            if let Some(status) = e.status() {
                return FaultKind::Status(status.as_u16());
            }
            if e.is_builder() {
                return FaultKind::InvalidUrl;
            }
        }

        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return FaultKind::Decode;
        }

        if cause.downcast_ref::<tokio::time::error::Elapsed>().is_some() {
            return FaultKind::Timeout;
        }

        if let Some(e) = cause.downcast_ref::<std::io::Error>() {
            if e.kind() == std::io::ErrorKind::TimedOut {
                return FaultKind::Timeout;
            }
        }
    }

    FaultKind::Other
}
