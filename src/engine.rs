//! The load-test engine.

use crate::aggregator::Aggregator;
use crate::config::LoadConfig;
use crate::dispatcher::Dispatcher;
use crate::error::EngineError;
use crate::executor::{Executor, HttpExecutor};
use crate::report::Report;
use crate::worker::WorkerPool;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Runs a fixed-count load test against one URL.
///
/// # Example
///
/// ```rust,no_run
/// use cntryl_load::{Engine, LoadConfig};
///
/// let config = LoadConfig::new("http://localhost:8080/")
///     .requests(100)
///     .concurrency(10);
/// config.validate().expect("invalid config");
///
/// let report = Engine::new(config).and_then(|e| e.run()).expect("run failed");
/// println!("{} of {} succeeded", report.success_count, report.total_requests);
/// ```
pub struct Engine {
    config: LoadConfig,
    executor: Arc<dyn Executor>,
}

impl Engine {
    /// Create an engine issuing real HTTP GETs with the config timeout.
    ///
    /// The config is assumed to be validated already.
    pub fn new(config: LoadConfig) -> Result<Self, EngineError> {
        let executor = HttpExecutor::new(config.timeout).map_err(EngineError::Client)?;
        Ok(Self::with_executor(config, Arc::new(executor)))
    }

    /// Create an engine with a custom executor.
    pub fn with_executor(config: LoadConfig, executor: Arc<dyn Executor>) -> Self {
        Self { config, executor }
    }

    /// Run to completion on a dedicated multi-thread runtime.
    ///
    /// Blocks the calling thread. Must not be called from within an async
    /// runtime; use [`Engine::run_async`] there.
    pub fn run(&self) -> Result<Report, EngineError> {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(self.config.concurrency.max(1));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(threads)
            .enable_all()
            .build()?;

        runtime.block_on(self.run_async())
    }

    /// Run to completion on the current runtime.
    ///
    /// Returns once every dispatched request has been aggregated and every
    /// worker has exited. Individual request failures are counted in the
    /// report and never returned as errors.
    pub async fn run_async(&self) -> Result<Report, EngineError> {
        let requests = self.config.requests;
        let concurrency = self.config.concurrency;

        tracing::info!(
            url = %self.config.url,
            requests,
            concurrency,
            "starting load test"
        );

        let start = Instant::now();

        let queue = Dispatcher::new(requests).dispatch();
        let (results_tx, results_rx) = mpsc::channel(requests.max(1));

        let pool = WorkerPool::spawn(
            concurrency,
            Arc::clone(&self.executor),
            Arc::from(self.config.url.as_str()),
            queue,
            results_tx,
        );

        let aggregated = Aggregator::new(requests).run(results_rx).await;
        let processed = pool.join().await?;
        let mut report = aggregated?;

        report.finalize(start.elapsed());

        tracing::info!(
            total_requests = report.total_requests,
            processed,
            success = report.success_count,
            errors = report.error_count,
            elapsed_ms = report.total_time.as_millis() as u64,
            "load test finished"
        );

        Ok(report)
    }
}

/// Run a load test with the HTTP executor. Blocks until complete.
pub fn run(config: LoadConfig) -> Result<Report, EngineError> {
    Engine::new(config)?.run()
}
