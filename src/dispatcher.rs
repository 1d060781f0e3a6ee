//! Work distribution.
//!
//! The dispatcher fills a channel with exactly one token per request and
//! drops the sending half, so the queue reports exhaustion as soon as the
//! last token is claimed.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// One request obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkToken {
    /// Dispatch sequence number, unique within a run.
    pub seq: usize,
}

/// Produces the work tokens for a run.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    requests: usize,
}

impl Dispatcher {
    pub fn new(requests: usize) -> Self {
        Self { requests }
    }

    /// Enqueue every token and close the queue.
    ///
    /// Never blocks, including for zero requests.
    pub fn dispatch(self) -> WorkQueue {
        let (tx, rx) = mpsc::channel(self.requests.max(1));
        for seq in 0..self.requests {
            // Capacity equals the token count and the receiver is held here,
            // so this only fails if that stops being true.
            if let Err(e) = tx.try_send(WorkToken { seq }) {
                tracing::error!(seq, error = %e, "failed to enqueue work token");
                break;
            }
        }
        drop(tx);

        WorkQueue {
            rx: Arc::new(Mutex::new(rx)),
        }
    }
}

/// Shared, closed queue of work tokens.
///
/// Clones share the same underlying queue; each token is handed to exactly
/// one caller of [`WorkQueue::claim`].
#[derive(Debug, Clone)]
pub struct WorkQueue {
    rx: Arc<Mutex<mpsc::Receiver<WorkToken>>>,
}

impl WorkQueue {
    /// Claim the next token, or `None` once the queue is exhausted.
    pub async fn claim(&self) -> Option<WorkToken> {
        self.rx.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn should_emit_exactly_requested_tokens() {
        let queue = Dispatcher::new(25).dispatch();

        let mut seen = HashSet::new();
        while let Some(token) = queue.claim().await {
            assert!(seen.insert(token.seq), "token {} delivered twice", token.seq);
        }
        assert_eq!(seen.len(), 25);
        assert_eq!(queue.claim().await, None);
    }

    #[tokio::test]
    async fn should_be_exhausted_immediately_when_zero_requests() {
        let queue = Dispatcher::new(0).dispatch();
        assert_eq!(queue.claim().await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn should_deliver_each_token_once_across_consumers() {
        let queue = Dispatcher::new(1000).dispatch();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = queue.clone();
                tokio::spawn(async move {
                    let mut claimed = Vec::new();
                    while let Some(token) = queue.claim().await {
                        claimed.push(token.seq);
                    }
                    claimed
                })
            })
            .collect();

        let mut all = Vec::new();
        for h in handles {
            all.extend(h.await.unwrap());
        }
        all.sort_unstable();
        assert_eq!(all, (0..1000).collect::<Vec<_>>());
    }
}
