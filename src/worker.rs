//! Fixed-size pool of request workers.

use crate::dispatcher::WorkQueue;
use crate::error::EngineError;
use crate::executor::Executor;
use crate::report::RequestResult;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handles to the spawned workers of one run.
pub struct WorkerPool {
    handles: Vec<JoinHandle<usize>>,
}

impl WorkerPool {
    /// Spawn exactly `concurrency` workers onto the current runtime.
    ///
    /// Each worker claims tokens from `queue` until it is exhausted and sends
    /// one result per token on `results`. The sender passed in is consumed,
    /// so the results channel closes once the last worker exits.
    pub fn spawn(
        concurrency: usize,
        executor: Arc<dyn Executor>,
        url: Arc<str>,
        queue: WorkQueue,
        results: mpsc::Sender<RequestResult>,
    ) -> Self {
        let handles = (0..concurrency)
            .map(|id| {
                let worker = Worker {
                    id,
                    executor: Arc::clone(&executor),
                    url: Arc::clone(&url),
                    queue: queue.clone(),
                    results: results.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        Self { handles }
    }

    /// Number of workers in the pool.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker and return the total number of tokens processed.
    pub async fn join(self) -> Result<usize, EngineError> {
        let mut processed = 0;
        for handle in self.handles {
            processed += handle
                .await
                .map_err(|e| EngineError::Worker(e.to_string()))?;
        }
        Ok(processed)
    }
}

struct Worker {
    id: usize,
    executor: Arc<dyn Executor>,
    url: Arc<str>,
    queue: WorkQueue,
    results: mpsc::Sender<RequestResult>,
}

impl Worker {
    async fn run(self) -> usize {
        tracing::debug!(worker = self.id, "worker started");
        let mut processed = 0;

        while let Some(token) = self.queue.claim().await {
            let result = self.executor.execute(&self.url).await;
            processed += 1;
            if self.results.send(result).await.is_err() {
                tracing::warn!(
                    worker = self.id,
                    seq = token.seq,
                    "result channel closed, stopping worker"
                );
                break;
            }
        }

        tracing::debug!(worker = self.id, processed, "worker finished");
        processed
    }
}
