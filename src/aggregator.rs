//! Result aggregation.
//!
//! The aggregator is the only writer of the [`Report`]. Workers reach it
//! through the results channel and never touch the counters themselves.

use crate::error::EngineError;
use crate::report::{Report, RequestResult};
use tokio::sync::mpsc;

/// Folds the results of one run into a [`Report`].
#[derive(Debug)]
pub struct Aggregator {
    expected: usize,
    report: Report,
}

impl Aggregator {
    /// Create an aggregator expecting exactly `expected` results.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            report: Report::new(),
        }
    }

    /// Fold an in-memory sequence of results into a fresh report.
    pub fn fold<'a>(results: impl IntoIterator<Item = &'a RequestResult>) -> Report {
        let mut report = Report::new();
        for result in results {
            report.record(result);
        }
        report
    }

    /// Consume results in arrival order until the channel closes.
    ///
    /// The channel closing and the expected count being reached must
    /// coincide; either mismatch is reported as an [`EngineError`].
    pub async fn run(
        mut self,
        mut results: mpsc::Receiver<RequestResult>,
    ) -> Result<Report, EngineError> {
        while let Some(result) = results.recv().await {
            if self.report.total_requests == self.expected {
                return Err(EngineError::ResultOverflow {
                    expected: self.expected,
                });
            }
            self.report.record(&result);
        }

        if self.report.total_requests < self.expected {
            return Err(EngineError::ResultShortfall {
                expected: self.expected,
                received: self.report.total_requests,
            });
        }

        Ok(self.report)
    }
}
