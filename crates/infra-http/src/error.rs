//! HTTP adapter error types

use reqwest::StatusCode;
use thiserror::Error;
use yargen_core::port::TransportError;

/// Errors building the transport (request-time failures use `TransportError`)
#[derive(Debug, Error)]
pub enum HttpTransportError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Anything reqwest reports while sending or reading counts as network-level
pub(crate) fn network(err: reqwest::Error) -> TransportError {
    TransportError::Network(err.to_string())
}

/// `"500 Internal Server Error"`, or just the code when it has no reason phrase
pub(crate) fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

pub(crate) fn bad_status(status: StatusCode) -> TransportError {
    TransportError::Status {
        code: status.as_u16(),
        status_line: status_line(status),
    }
}

pub(crate) fn decode(err: serde_json::Error) -> TransportError {
    TransportError::Decode(err.to_string())
}
