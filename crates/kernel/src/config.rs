//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Navigation kernel configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Menu name used when a caller does not specify one (default: "main").
    pub default_menu: String,

    /// How often the visit log worker flushes its buffer (default: 10s).
    pub visit_flush_interval: Duration,

    /// Buffered visit count that triggers an immediate flush (default: 100).
    pub visit_flush_threshold: usize,

    /// Capacity of the bounded channel feeding the visit log worker
    /// (default: 1024). Records past this are dropped, not blocked on.
    pub visit_queue_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let default_menu = env::var("DEFAULT_MENU").unwrap_or_else(|_| "main".to_string());

        let visit_flush_interval_secs: u64 = env::var("VISIT_FLUSH_INTERVAL_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("VISIT_FLUSH_INTERVAL_SECS must be a valid u64")?;

        let visit_flush_threshold = env::var("VISIT_FLUSH_THRESHOLD")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .context("VISIT_FLUSH_THRESHOLD must be a valid usize")?;

        let visit_queue_capacity = env::var("VISIT_QUEUE_CAPACITY")
            .unwrap_or_else(|_| "1024".to_string())
            .parse()
            .context("VISIT_QUEUE_CAPACITY must be a valid usize")?;

        Ok(Self {
            default_menu,
            visit_flush_interval: Duration::from_secs(visit_flush_interval_secs),
            visit_flush_threshold,
            visit_queue_capacity,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_menu: "main".to_string(),
            visit_flush_interval: Duration::from_secs(10),
            visit_flush_threshold: 100,
            visit_queue_capacity: 1024,
        }
    }
}
