//! Common test utilities: tracing setup and a flat reference model.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//!
//! #[test]
//! fn my_test() {
//!     common::init_tracing();
//!     // ... test code; build with `--features tracing` to see tree events
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Filter directives (e.g., `lazy_range_tree=debug,lazy_range_tree::node=trace`)
//! - `RANGETREE_LOG_DIR`: Log directory (default: `logs/`)
//! - `RANGETREE_LOG_CONSOLE`: Set to "0" to disable console output
//!
//! # Log Files
//!
//! Logs are written to `logs/lazy_range_tree.jsonl` as newline-delimited
//! JSON (NDJSON):
//!
//! ```bash
//! # Pretty-print all logs
//! cat logs/lazy_range_tree.jsonl | jq .
//!
//! # Every range mutation touching key 16
//! cat logs/lazy_range_tree.jsonl | jq 'select(.fields.begin <= 16 and .fields.end > 16)'
//!
//! # Only materialization events
//! cat logs/lazy_range_tree.jsonl | jq 'select(.target == "lazy_range_tree::node")'
//! ```

#![allow(dead_code)]

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

// ============================================================================
//  Tracing
// ============================================================================

/// Ensures tracing is only initialized once across all tests.
static INIT: Once = Once::new();

/// Initialize the tracing subscriber with file and console logging.
///
/// Safe to call multiple times; only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        setup_tracing();
    });
}

/// Configuration for tracing setup.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Directory for log files.
    pub log_dir: PathBuf,
    /// Log file name.
    pub log_file: String,
    /// Enable console output.
    pub console_enabled: bool,
    /// Default log level if RUST_LOG is not set.
    pub default_level: Level,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_file: "lazy_range_tree.jsonl".to_string(),
            console_enabled: true,
            default_level: Level::INFO,
        }
    }
}

impl TracingConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("RANGETREE_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        if env::var("RANGETREE_LOG_CONSOLE").is_ok_and(|v| v == "0") {
            config.console_enabled = false;
        }

        config
    }
}

/// Create an EnvFilter from RUST_LOG or use default level.
fn make_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("{default_level}")))
}

#[expect(clippy::expect_used)]
fn setup_tracing() {
    let config = TracingConfig::from_env();

    std::fs::create_dir_all(&config.log_dir).expect("Failed to create log directory");

    let log_path = config.log_dir.join(&config.log_file);

    // Append: nextest runs every test in its own process
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let console_layer = config.console_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_ansi(true)
            .compact()
            .with_filter(make_filter(config.default_level))
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(make_filter(config.default_level));

    // try_init: another harness may already have installed a subscriber
    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

// ============================================================================
//  Reference model
// ============================================================================

/// One value per key of `[begin, begin + len)`, mutated pointwise.
///
/// Ranges are clipped the same way the tree clips them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flat<V> {
    pub begin: i64,
    pub values: Vec<V>,
}

impl<V: Clone> Flat<V> {
    pub fn new(begin: i64, len: usize, fill: V) -> Self {
        Self {
            begin,
            values: vec![fill; len],
        }
    }

    pub fn end(&self) -> i64 {
        self.begin + self.values.len() as i64
    }

    fn span(&self, begin: i64, end: i64) -> std::ops::Range<usize> {
        let lo = begin.clamp(self.begin, self.end());
        let hi = end.clamp(lo, self.end());
        (lo - self.begin) as usize..(hi - self.begin) as usize
    }

    pub fn get(&self, key: i64) -> Option<&V> {
        usize::try_from(key - self.begin)
            .ok()
            .and_then(|i| self.values.get(i))
    }

    pub fn set(&mut self, begin: i64, end: i64, value: &V) {
        let span = self.span(begin, end);
        self.values[span].fill(value.clone());
    }

    pub fn update(&mut self, begin: i64, end: i64, op: impl Fn(&V) -> V) {
        let span = self.span(begin, end);
        for value in &mut self.values[span] {
            *value = op(value);
        }
    }

    pub fn slice(&self, begin: i64, end: i64) -> &[V] {
        &self.values[self.span(begin, end)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_init() {
        init_tracing();
        tracing::info!("Tracing initialized successfully");
        tracing::debug!(begin = 0, end = 42, "Debug event");
    }

    #[test]
    fn test_flat_clips() {
        let mut flat = Flat::new(10, 10, 0u8);
        flat.set(0, 12, &1);
        flat.set(25, 30, &9);
        flat.update(18, 40, |v| v + 2);

        assert_eq!(flat.values, [1, 1, 0, 0, 0, 0, 0, 0, 2, 2]);
        assert_eq!(flat.get(9), None);
        assert_eq!(flat.get(19), Some(&2));
        assert_eq!(flat.slice(17, 100), [0, 2, 2]);
    }
}
