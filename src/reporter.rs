//! Pluggable reporters for load-test output.
//!
//! All reporters implement the `Reporter` trait and are designed to be:
//! - Non-panicking: errors are logged but never propagate
//! - Atomic: each block of output is written in one piece

use crate::config::LoadConfig;
use crate::report::Report;
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Trait for load-test reporters.
pub trait Reporter: Send + Sync {
    /// Called before the engine starts.
    fn run_start(&self, _config: &LoadConfig) {}

    /// Called with the finalized report.
    fn run_end(&self, _report: &Report) {}
}

/// Console reporter that prints to stdout.
pub struct ConsoleReporter {
    /// Mutex ensures atomic writes across threads.
    output_lock: Mutex<()>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            output_lock: Mutex::new(()),
        }
    }

    /// Render the run header.
    pub fn render_header(config: &LoadConfig) -> String {
        format!(
            "Starting load test...\n\
             URL: {}\n\
             Total Requests: {}\n\
             Concurrency: {}\n",
            config.url, config.requests, config.concurrency
        )
    }

    /// Render the final report.
    ///
    /// The status distribution and performance blocks are skipped when no
    /// requests were recorded.
    pub fn render_report(report: &Report) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== LOAD TEST REPORT ===");
        let _ = writeln!(out, "Total execution time: {}", format_duration(report.total_time));
        let _ = writeln!(out, "Total requests made: {}", report.total_requests);
        let _ = writeln!(out, "Successful requests (HTTP 200): {}", report.success_count);

        if report.error_count > 0 {
            let _ = writeln!(out, "Failed requests (errors): {}", report.error_count);
        }

        let breakdown = report.status_breakdown();
        if !breakdown.is_empty() {
            let _ = writeln!(out, "\nHTTP Status Code Distribution:");
            for (code, count, pct) in breakdown {
                let _ = writeln!(out, "  {}: {} requests ({:.1}%)", code, count, pct);
            }
        }

        if let (Some(avg), Some(rps)) = (report.average_request_time(), report.requests_per_second())
        {
            let _ = writeln!(out, "\nPerformance Metrics:");
            let _ = writeln!(out, "  Average request time: {}", format_duration(avg));
            let _ = writeln!(out, "  Requests per second: {:.2}", rps);
        }

        out
    }

    /// Atomically write a complete message to stdout.
    /// Never panics; logs a warning on error.
    fn write_stdout(&self, message: &str) {
        // Ignore poison: the guard only serializes writes.
        let _guard = self.output_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", message) {
            tracing::warn!(error = %e, "failed to write to stdout");
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn run_start(&self, config: &LoadConfig) {
        self.write_stdout(&Self::render_header(config));
    }

    fn run_end(&self, report: &Report) {
        self.write_stdout(&Self::render_report(report));
    }
}

/// Format a duration with consistent units: ns, us, ms, or s.
/// Always uses 2 decimal places.
pub fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs_f64();
    if secs >= 1.0 {
        format!("{:.2}s", secs)
    } else if secs >= 0.001 {
        format!("{:.2}ms", secs * 1_000.0)
    } else if secs >= 0.000_001 {
        format!("{:.2}us", secs * 1_000_000.0)
    } else {
        format!("{:.2}ns", secs * 1_000_000_000.0)
    }
}

/// JSON reporter that writes the finished report to a directory.
///
/// Writes:
/// - `{timestamp}.json` - the report of this run
/// - `latest.json` - copy of the most recent report
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Never panics; logs a warning on failure.
    fn write_report(&self, report: &Report) {
        if let Err(e) = self.write_report_inner(report) {
            tracing::warn!(
                dir = %self.output_dir.display(),
                error = %e,
                "failed to write JSON report"
            );
        }
    }

    fn write_report_inner(&self, report: &Report) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;

        let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;

        let timestamped = self.output_dir.join(format!("{}.json", unix_millis()));
        std::fs::write(&timestamped, &json)?;

        let latest = self.output_dir.join("latest.json");
        std::fs::write(&latest, &json)?;
        tracing::info!(path = %latest.display(), "report written");

        Ok(())
    }
}

impl Reporter for JsonReporter {
    fn run_end(&self, report: &Report) {
        self.write_report(report);
    }
}

fn unix_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Combines multiple reporters.
///
/// A panic in one reporter does not prevent the others from running.
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new(reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self { reporters }
    }
}

impl Reporter for MultiReporter {
    fn run_start(&self, config: &LoadConfig) {
        for r in &self.reporters {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                r.run_start(config);
            }));
        }
    }

    fn run_end(&self, report: &Report) {
        for r in &self.reporters {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                r.run_end(report);
            }));
        }
    }
}
