//! HTTP client for the Uniteller results endpoint.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod results;

pub use results::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT, ResultsClient, retry_delay};

use reqwest::StatusCode;

use crate::objects::StatusParseError;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// The status report could not be parsed.
    #[error("status report error: {0}")]
    Report(#[from] StatusParseError),
}

impl ClientError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ClientError::Api { status, .. } => status.is_server_error(),
            ClientError::Report(_) => false,
        }
    }
}
