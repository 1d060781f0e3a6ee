//! Configuration for a load-test run.

use crate::error::ConfigError;
use std::time::Duration;

/// Per-request timeout applied by the HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a load-test run.
///
/// Build with [`LoadConfig::new`] and the builder methods, or start from
/// [`LoadConfig::from_env`]. Call [`LoadConfig::validate`] before handing the
/// config to the engine; the engine assumes it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Target URL, used verbatim for every request.
    pub url: String,
    /// Total number of requests to issue.
    pub requests: usize,
    /// Number of concurrent workers.
    pub concurrency: usize,
    /// Client-level timeout for each request.
    pub timeout: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            requests: 0,
            concurrency: 0,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LoadConfig {
    /// Create a config targeting `url` with zero requests and zero workers.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Parse config from environment variables.
    ///
    /// Supported variables:
    /// - `LOAD_URL`: target URL
    /// - `LOAD_REQUESTS`: total request count
    /// - `LOAD_CONCURRENCY`: worker count
    /// - `LOAD_TIMEOUT_SECS`: per-request timeout in seconds (default: 30)
    ///
    /// Unparseable numbers are ignored and leave the default in place.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("LOAD_URL") {
            cfg.url = v;
        }
        if let Some(v) = lookup("LOAD_REQUESTS") {
            if let Ok(n) = v.trim().parse() {
                cfg.requests = n;
            }
        }
        if let Some(v) = lookup("LOAD_CONCURRENCY") {
            if let Ok(n) = v.trim().parse() {
                cfg.concurrency = n;
            }
        }
        if let Some(v) = lookup("LOAD_TIMEOUT_SECS") {
            if let Ok(secs) = v.trim().parse::<u64>() {
                cfg.timeout = Duration::from_secs(secs);
            }
        }

        cfg
    }

    /// Set the target URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the total number of requests.
    pub fn requests(mut self, n: usize) -> Self {
        self.requests = n;
        self
    }

    /// Set the number of concurrent workers.
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Check the run invariants: non-empty http(s) URL, `requests > 0`,
    /// `0 < concurrency <= requests`, non-zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        let parsed = url::Url::parse(&self.url).map_err(|e| ConfigError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
        if self.requests == 0 {
            return Err(ConfigError::ZeroRequests);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.concurrency > self.requests {
            return Err(ConfigError::ConcurrencyExceedsRequests {
                concurrency: self.concurrency,
                requests: self.requests,
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_use_defaults_when_env_not_set() {
        let cfg = LoadConfig::from_lookup(|_| None);
        assert!(cfg.url.is_empty());
        assert_eq!(cfg.requests, 0);
        assert_eq!(cfg.concurrency, 0);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn should_read_values_when_env_set() {
        let cfg = LoadConfig::from_lookup(lookup_from(&[
            ("LOAD_URL", "http://localhost:8080/health"),
            ("LOAD_REQUESTS", "100"),
            ("LOAD_CONCURRENCY", " 8 "),
            ("LOAD_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(cfg.url, "http://localhost:8080/health");
        assert_eq!(cfg.requests, 100);
        assert_eq!(cfg.concurrency, 8);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn should_keep_defaults_when_env_values_unparseable() {
        let cfg = LoadConfig::from_lookup(lookup_from(&[
            ("LOAD_REQUESTS", "lots"),
            ("LOAD_TIMEOUT_SECS", "-1"),
        ]));
        assert_eq!(cfg.requests, 0);
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn should_build_config_with_builder() {
        let cfg = LoadConfig::new("http://example.com")
            .requests(10)
            .concurrency(2)
            .timeout(Duration::from_secs(1));

        assert_eq!(cfg.url, "http://example.com");
        assert_eq!(cfg.requests, 10);
        assert_eq!(cfg.concurrency, 2);
        assert_eq!(cfg.timeout, Duration::from_secs(1));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn should_accept_concurrency_equal_to_requests() {
        let cfg = LoadConfig::new("https://example.com").requests(5).concurrency(5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn should_reject_empty_url() {
        let cfg = LoadConfig::new("  ").requests(1).concurrency(1);
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyUrl));
    }

    #[test]
    fn should_reject_unparseable_url() {
        let cfg = LoadConfig::new("not a url").requests(1).concurrency(1);
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn should_reject_non_http_scheme() {
        let cfg = LoadConfig::new("ftp://example.com").requests(1).concurrency(1);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn should_reject_zero_requests() {
        let cfg = LoadConfig::new("http://example.com").concurrency(1);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroRequests));
    }

    #[test]
    fn should_reject_zero_concurrency() {
        let cfg = LoadConfig::new("http://example.com").requests(1);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroConcurrency));
    }

    #[test]
    fn should_reject_zero_timeout() {
        let cfg = LoadConfig::new("http://example.com")
            .requests(1)
            .concurrency(1)
            .timeout(Duration::ZERO);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn should_reject_zero_timeout_when_read_from_env() {
        let cfg = LoadConfig::from_lookup(lookup_from(&[
            ("LOAD_URL", "http://localhost/"),
            ("LOAD_REQUESTS", "3"),
            ("LOAD_CONCURRENCY", "1"),
            ("LOAD_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(cfg.timeout, Duration::ZERO);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn should_reject_when_concurrency_exceeds_requests() {
        let cfg = LoadConfig::new("http://example.com").requests(3).concurrency(5);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ConcurrencyExceedsRequests {
                concurrency: 5,
                requests: 3
            })
        );
    }
}
