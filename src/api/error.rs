//! Error types for the products API client.
//!
//! Every variant means the same thing to the caller — "this page failed" —
//! and is eligible for the same retry budget. The split exists so the
//! terminal output can say what actually went wrong.

use thiserror::Error;

/// Ways a single page request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with something other than 200.
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// The request did not complete within the per-request timeout.
    #[error("request timed out")]
    Timeout,

    /// The body arrived but was not valid JSON for a product page.
    #[error("invalid JSON in response: {0}")]
    InvalidJson(String),

    /// Transport-level failure (DNS, connection refused, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
