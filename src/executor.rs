//! Single-request execution.

use crate::error::RequestError;
use crate::report::RequestResult;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Performs one request against a URL and classifies the outcome.
///
/// Implementations must never panic on request failure: every call yields
/// exactly one [`RequestResult`].
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, url: &str) -> RequestResult;
}

/// HTTP GET executor over a shared client.
///
/// The client is built once and cloned cheaply; its connection pool is shared
/// by every worker.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
}

impl HttpExecutor {
    /// Build an executor whose client enforces `timeout` on each request.
    pub fn new(timeout: Duration) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn exchange(&self, url: &str) -> Result<u16, RequestError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        // Drain the body so the connection goes back to the pool.
        response.bytes().await?;
        Ok(status)
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    async fn execute(&self, url: &str) -> RequestResult {
        let start = Instant::now();
        let outcome = self.exchange(url).await;
        let duration = start.elapsed();

        match outcome {
            Ok(status) => RequestResult::success(status, duration),
            Err(e) => {
                tracing::debug!(url, error = %e, "request failed");
                RequestResult::failure(e, duration)
            }
        }
    }
}
