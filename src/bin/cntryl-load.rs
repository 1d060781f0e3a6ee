//! cntryl-load: fixed-count HTTP load generator.
//!
//! ```text
//! cntryl-load --url http://localhost:8080/ --requests 1000 --concurrency 50
//! ```
//!
//! Flags override the `LOAD_*` environment variables. The configuration is
//! validated before any request is sent; an invalid one exits non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use cntryl_load::{ConsoleReporter, Engine, JsonReporter, LoadConfig, MultiReporter, Reporter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "cntryl-load",
    about = "Send a fixed number of HTTP GET requests and report the results",
    long_about = "
cntryl-load issues exactly --requests HTTP GET requests against --url using
--concurrency parallel workers, then prints the status code distribution,
average request time and throughput.

Example:
    cntryl-load --url http://localhost:8080/ --requests 1000 --concurrency 50
    cntryl-load --url https://example.com --requests 10 --concurrency 1 --json
"
)]
struct Cli {
    // ========================================================================
    // Target
    // ========================================================================
    /// URL of the service to test [env: LOAD_URL]
    #[arg(long)]
    url: Option<String>,

    /// Total number of requests to make [env: LOAD_REQUESTS]
    #[arg(long)]
    requests: Option<usize>,

    /// Number of concurrent requests [env: LOAD_CONCURRENCY]
    #[arg(long)]
    concurrency: Option<usize>,

    // ========================================================================
    // Output Control
    // ========================================================================
    /// Also write the report as JSON
    #[arg(long)]
    json: bool,

    /// Output directory for JSON reports
    #[arg(long, default_value = "target/load")]
    output_dir: PathBuf,

    /// Quiet mode (no console report)
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl Cli {
    /// Overlay the flags onto `base`.
    fn apply(&self, mut base: LoadConfig) -> LoadConfig {
        if let Some(url) = &self.url {
            base.url = url.clone();
        }
        if let Some(n) = self.requests {
            base.requests = n;
        }
        if let Some(n) = self.concurrency {
            base.concurrency = n;
        }
        base
    }

    fn reporter(&self) -> MultiReporter {
        let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();
        if !self.quiet {
            reporters.push(Box::new(ConsoleReporter::new()));
        }
        if self.json {
            reporters.push(Box::new(JsonReporter::new(self.output_dir.clone())));
        }
        MultiReporter::new(reporters)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.apply(LoadConfig::from_env());
    config.validate().context("invalid configuration")?;

    let reporter = cli.reporter();
    reporter.run_start(&config);

    let engine = Engine::new(config).context("failed to set up load test")?;
    let report = engine.run().context("load test aborted")?;

    reporter.run_end(&report);
    Ok(())
}
