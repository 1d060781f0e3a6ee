//! Per-request results and the aggregate run report.

use crate::error::RequestError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// HTTP status counted as a success.
pub const SUCCESS_STATUS: u16 = 200;

/// Outcome of one request attempt.
///
/// Either a status code or a transport error is present, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    status_code: Option<u16>,
    duration: Duration,
    error: Option<RequestError>,
}

impl RequestResult {
    /// A completed HTTP exchange with any status code.
    pub fn success(status_code: u16, duration: Duration) -> Self {
        Self {
            status_code: Some(status_code),
            duration,
            error: None,
        }
    }

    /// A transport-level failure.
    pub fn failure(error: RequestError, duration: Duration) -> Self {
        Self {
            status_code: None,
            duration,
            error: Some(error),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Wall-clock time spent on the exchange.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregate statistics for a run.
///
/// Created empty, updated once per result with [`Report::record`] by the
/// single aggregator, then stamped with [`Report::finalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Wall-clock time of the whole run, aggregation included.
    #[serde(with = "duration_serde")]
    pub total_time: Duration,
    /// Number of results consumed.
    pub total_requests: usize,
    /// Occurrences of each HTTP status code.
    pub status_codes: BTreeMap<u16, usize>,
    /// Requests answered with HTTP 200.
    pub success_count: usize,
    /// Requests that failed before any status was received.
    pub error_count: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one result into the counters.
    pub fn record(&mut self, result: &RequestResult) {
        self.total_requests += 1;

        match result.status_code {
            Some(code) if result.error.is_none() => {
                *self.status_codes.entry(code).or_insert(0) += 1;
                if code == SUCCESS_STATUS {
                    self.success_count += 1;
                }
            }
            _ => self.error_count += 1,
        }
    }

    /// Stamp the total run time.
    pub fn finalize(&mut self, total_time: Duration) {
        self.total_time = total_time;
    }

    /// Mean wall-clock time per request (`total_time / total_requests`).
    pub fn average_request_time(&self) -> Option<Duration> {
        if self.total_requests == 0 {
            return None;
        }
        let nanos = self.total_time.as_nanos() / self.total_requests as u128;
        Some(Duration::from_nanos(nanos as u64))
    }

    /// Throughput over the whole run.
    pub fn requests_per_second(&self) -> Option<f64> {
        let secs = self.total_time.as_secs_f64();
        if self.total_requests == 0 || secs <= 0.0 {
            return None;
        }
        Some(self.total_requests as f64 / secs)
    }

    /// Share of all requests that returned `code`, as a percentage.
    pub fn status_percentage(&self, code: u16) -> Option<f64> {
        if self.total_requests == 0 {
            return None;
        }
        let count = self.status_codes.get(&code).copied().unwrap_or(0);
        Some(count as f64 / self.total_requests as f64 * 100.0)
    }

    /// `(code, count, percentage)` for every observed status, ordered by code.
    ///
    /// Empty when no requests were recorded.
    pub fn status_breakdown(&self) -> Vec<(u16, usize, f64)> {
        if self.total_requests == 0 {
            return Vec::new();
        }
        let total = self.total_requests as f64;
        self.status_codes
            .iter()
            .map(|(code, count)| (*code, *count, *count as f64 / total * 100.0))
            .collect()
    }

    /// Requests that received a status other than 200.
    pub fn non_success_status_count(&self) -> usize {
        self.status_codes
            .iter()
            .filter(|(code, _)| **code != SUCCESS_STATUS)
            .map(|(_, count)| count)
            .sum()
    }

    /// Load a report from a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_nanos().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let nanos = u128::deserialize(d)?;
        Ok(Duration::from_nanos(nanos as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(code: u16) -> RequestResult {
        RequestResult::success(code, Duration::from_millis(5))
    }

    fn failed() -> RequestResult {
        RequestResult::failure(
            RequestError::Connect("connection refused".into()),
            Duration::from_millis(1),
        )
    }

    #[test]
    fn should_never_carry_status_when_failed() {
        let r = failed();
        assert!(r.is_error());
        assert_eq!(r.status_code(), None);
    }

    #[test]
    fn should_count_success_only_for_200() {
        let mut report = Report::new();
        report.record(&ok(200));
        report.record(&ok(201));
        report.record(&ok(404));

        assert_eq!(report.total_requests, 3);
        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 0);
        assert_eq!(report.status_codes.get(&201), Some(&1));
        assert_eq!(report.non_success_status_count(), 2);
    }

    #[test]
    fn should_keep_errors_out_of_status_histogram() {
        let mut report = Report::new();
        report.record(&failed());
        report.record(&failed());

        assert_eq!(report.error_count, 2);
        assert!(report.status_codes.is_empty());
        assert_eq!(report.success_count, 0);
    }

    #[test]
    fn should_compute_average_and_throughput_when_finalized() {
        let mut report = Report::new();
        for _ in 0..4 {
            report.record(&ok(200));
        }
        report.finalize(Duration::from_secs(2));

        assert_eq!(report.average_request_time(), Some(Duration::from_millis(500)));
        assert_eq!(report.requests_per_second(), Some(2.0));
    }

    #[test]
    fn should_compute_average_when_count_exceeds_u32() {
        let mut report = Report::new();
        report.total_requests = u32::MAX as usize + 1;
        report.finalize(Duration::from_secs(u32::MAX as u64 + 1));

        assert_eq!(report.average_request_time(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn should_skip_derived_metrics_when_empty() {
        let mut report = Report::new();
        report.finalize(Duration::from_secs(1));

        assert_eq!(report.average_request_time(), None);
        assert_eq!(report.requests_per_second(), None);
        assert_eq!(report.status_percentage(200), None);
        assert!(report.status_breakdown().is_empty());
    }

    #[test]
    fn should_order_breakdown_by_status_code() {
        let mut report = Report::new();
        report.record(&ok(500));
        report.record(&ok(200));
        report.record(&ok(200));

        let breakdown = report.status_breakdown();
        let codes: Vec<u16> = breakdown.iter().map(|(c, _, _)| *c).collect();
        assert_eq!(codes, vec![200, 500]);
        assert_eq!(format!("{:.1}", breakdown[0].2), "66.7");
        assert_eq!(format!("{:.1}", breakdown[1].2), "33.3");
    }

    #[test]
    fn should_load_report_written_as_json() {
        let mut report = Report::new();
        report.record(&ok(200));
        report.record(&failed());
        report.finalize(Duration::from_millis(1500));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, serde_json::to_string(&report).unwrap()).unwrap();

        let loaded = Report::load(&path).unwrap();
        assert_eq!(loaded, report);
    }
}
