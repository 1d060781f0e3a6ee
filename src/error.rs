//! Error types.
//!
//! Three kinds of failure exist and they never mix:
//! - [`ConfigError`]: the configuration is rejected before the engine starts.
//! - [`RequestError`]: one request failed at the transport level. It is
//!   recorded in that request's result and counted, never propagated.
//! - [`EngineError`]: the engine itself broke an internal invariant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected load-test configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("URL is required. Use --url flag")]
    EmptyUrl,

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("requests must be greater than 0. Use --requests flag")]
    ZeroRequests,

    #[error("concurrency must be greater than 0. Use --concurrency flag")]
    ZeroConcurrency,

    #[error("timeout must be greater than 0. Use LOAD_TIMEOUT_SECS")]
    ZeroTimeout,

    #[error("concurrency ({concurrency}) cannot be greater than total requests ({requests})")]
    ConcurrencyExceedsRequests { concurrency: usize, requests: usize },
}

/// Transport-level failure of a single request.
///
/// Receiving any HTTP status, 4xx and 5xx included, is never a `RequestError`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        let msg = e.to_string();
        if e.is_timeout() {
            RequestError::Timeout(msg)
        } else if e.is_connect() {
            RequestError::Connect(msg)
        } else if e.is_body() || e.is_decode() {
            RequestError::Body(msg)
        } else {
            RequestError::Other(msg)
        }
    }
}

/// Internal failure of the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to build async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(RequestError),

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error("result stream closed after {received} of {expected} results")]
    ResultShortfall { expected: usize, received: usize },

    #[error("received more results than the {expected} requests dispatched")]
    ResultOverflow { expected: usize },
}
