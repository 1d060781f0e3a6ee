//! # cntryl-load
//!
//! A fixed-count HTTP load generator.
//!
//! Issues exactly `requests` HTTP GETs against one URL from a pool of
//! `concurrency` parallel workers, then returns a [`Report`] with the total
//! run time, a status-code histogram, and success/error counts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cntryl_load::{ConsoleReporter, Engine, LoadConfig, Reporter};
//!
//! let config = LoadConfig::new("http://localhost:8080/health")
//!     .requests(1_000)
//!     .concurrency(50);
//! config.validate()?;
//!
//! let reporter = ConsoleReporter::new();
//! reporter.run_start(&config);
//!
//! let report = Engine::new(config)?.run()?;
//! reporter.run_end(&report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Pipeline
//!
//! Dispatcher (N tokens) -> worker pool (C workers) -> aggregator (single
//! writer of the report). Transport failures are counted, never fatal; an
//! HTTP error status is an ordinary entry in the histogram.

mod aggregator;
mod config;
mod dispatcher;
mod engine;
mod error;
mod executor;
mod report;
mod reporter;
mod worker;

pub use aggregator::Aggregator;
pub use config::{LoadConfig, DEFAULT_TIMEOUT};
pub use dispatcher::{Dispatcher, WorkQueue, WorkToken};
pub use engine::{run, Engine};
pub use error::{ConfigError, EngineError, RequestError};
pub use executor::{Executor, HttpExecutor};
pub use report::{Report, RequestResult, SUCCESS_STATUS};
pub use reporter::{format_duration, ConsoleReporter, JsonReporter, MultiReporter, Reporter};
pub use worker::WorkerPool;
