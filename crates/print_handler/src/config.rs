//! Configuration settings for a print run.
//!
//! This module defines how long the orchestrator lets a loaded page settle,
//! whether `@page` rules are consulted, and the optional readiness probe run
//! after the settle delay. Configuration can be loaded from environment
//! variables or constructed programmatically.

use core::time::Duration;
use std::env;

/// Default settle delay after a successful load, in milliseconds.
const DEFAULT_SETTLE_MS: u64 = 100;
/// Default upper bound for the readiness probe, in milliseconds.
const DEFAULT_READY_TIMEOUT_MS: u64 = 10_000;
/// Default interval between readiness probes, in milliseconds.
const DEFAULT_READY_POLL_MS: u64 = 50;

/// Runtime configuration for one print request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintConfig {
    /// Fixed delay between load success and layout resolution
    pub settle_delay_ms: u64,
    /// Whether to derive margins from the document's `@page` rules
    pub resolve_css_layout: bool,
    /// Script expression that turns truthy once the page is ready
    pub ready_expression: Option<String>,
    /// Upper bound for waiting on `ready_expression`
    pub ready_timeout_ms: u64,
    /// Interval between evaluations of `ready_expression` (minimum 1ms)
    pub ready_poll_ms: u64,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_MS,
            resolve_css_layout: true,
            ready_expression: None,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
            ready_poll_ms: DEFAULT_READY_POLL_MS,
        }
    }
}

impl PrintConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `WEBPRINT_SETTLE_MS`: Settle delay in milliseconds (default: 100)
    /// - `WEBPRINT_CSS_LAYOUT`: Set to "0" to ignore `@page` rules (default: enabled)
    /// - `WEBPRINT_WAIT_FOR`: Readiness expression evaluated after the settle delay
    /// - `WEBPRINT_WAIT_TIMEOUT_MS`: Readiness timeout in milliseconds (default: 10000)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let settle_delay_ms = env::var("WEBPRINT_SETTLE_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(defaults.settle_delay_ms);
        let resolve_css_layout = env::var("WEBPRINT_CSS_LAYOUT").ok().as_deref() != Some("0");
        let ready_expression = env::var("WEBPRINT_WAIT_FOR")
            .ok()
            .filter(|expression| !expression.trim().is_empty());
        let ready_timeout_ms = env::var("WEBPRINT_WAIT_TIMEOUT_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(defaults.ready_timeout_ms);
        Self {
            settle_delay_ms,
            resolve_css_layout,
            ready_expression,
            ready_timeout_ms,
            ready_poll_ms: defaults.ready_poll_ms,
        }
    }

    /// Get the settle delay as a `Duration`.
    #[inline]
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Get the readiness timeout as a `Duration`.
    #[inline]
    #[must_use]
    pub const fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    /// Get the readiness poll interval as a `Duration`.
    #[inline]
    #[must_use]
    pub const fn ready_poll(&self) -> Duration {
        let millis = if self.ready_poll_ms < 1 {
            1
        } else {
            self.ready_poll_ms
        };
        Duration::from_millis(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_settle_heuristic() {
        let config = PrintConfig::default();
        assert_eq!(config.settle_delay(), Duration::from_millis(100));
        assert!(config.resolve_css_layout);
        assert!(config.ready_expression.is_none());
    }

    #[test]
    fn zero_poll_interval_is_raised_to_one_millisecond() {
        let config = PrintConfig {
            ready_poll_ms: 0,
            ..PrintConfig::default()
        };
        assert_eq!(config.ready_poll(), Duration::from_millis(1));
    }
}
