//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the router.
//!
//! ## Environment Variables
//!
//! ### `ROUTEWEAVE_STRATEGY`
//!
//! Selects the matching algorithm used by [`Router::dispatch`](crate::Router::dispatch):
//! - `trie` (default): segment trie built once, overlaps rejected at build time
//! - `specificity`: flat per-method template list ranked per request; ties surface
//!   as an ambiguity error at dispatch time
//!
//! ### `ROUTEWEAVE_SLOW_MATCH_US`
//!
//! Matches taking longer than this many microseconds are logged at WARN instead
//! of INFO. Default: `1000`.
//!
//! Unrecognized or unparsable values fall back to the defaults.
//!
//! ## Usage
//!
//! ```rust
//! use routeweave::runtime_config::{RouterConfig, RoutingStrategy};
//!
//! let config = RouterConfig::from_env();
//! println!("strategy: {}", config.strategy);
//!
//! let explicit = RouterConfig {
//!     strategy: RoutingStrategy::Specificity,
//!     ..RouterConfig::default()
//! };
//! assert_eq!(explicit.slow_match_us, 1000);
//! ```

use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Matching algorithm used at dispatch time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingStrategy {
    #[default]
    Trie,
    Specificity,
}

impl RoutingStrategy {
    /// Parse a strategy name, falling back to [`RoutingStrategy::Trie`]
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "specificity" => RoutingStrategy::Specificity,
            _ => RoutingStrategy::Trie,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RoutingStrategy::Trie => "trie",
            RoutingStrategy::Specificity => "specificity",
        }
    }
}

impl fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Router configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    pub strategy: RoutingStrategy,
    /// Threshold above which a match is logged as slow (default: 1000us)
    pub slow_match_us: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            strategy: RoutingStrategy::Trie,
            slow_match_us: DEFAULT_SLOW_MATCH_US,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let strategy = lookup("ROUTEWEAVE_STRATEGY")
            .map(|s| RoutingStrategy::parse(&s))
            .unwrap_or_default();
        let slow_match_us = lookup("ROUTEWEAVE_SLOW_MATCH_US")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_SLOW_MATCH_US);
        RouterConfig {
            strategy,
            slow_match_us,
        }
    }

    #[must_use]
    pub fn slow_match_threshold(&self) -> Duration {
        Duration::from_micros(self.slow_match_us)
    }
}
