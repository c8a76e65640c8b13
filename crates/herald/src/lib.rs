//! ## Features
//!
//! - Leveled logging (info, warn, error, success, verbose)
//! - Multi-line message support with a prefix on every line
//! - Verbose output gated behind a runtime switch
//! - `tracing` subscriber setup shared by the workspace binaries
//! - All output to stderr, so stdout stays clean for reports
//!
//! ## Usage
//!
//! Logging functions: `info()`, `warn()`, `error()`, `success()`, `verbose()`
//!
//! Macros with the same names are exported for call sites that prefer them.

use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Core logging function that handles the actual output
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Format a colored prefix for log messages
fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7 - prefix.len() - 2)
}

/// Prefix every line of `message` and log it
fn log_prefixed(color: Color, prefix: &str, message: &str) {
  let prefix = format_prefix(color, prefix);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Turn verbose output on or off
pub fn set_verbose(enabled: bool) {
  VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
  VERBOSE.load(Ordering::Relaxed)
}

/// Verbose logging - only emitted after `set_verbose(true)`
pub fn verbose(message: &str) {
  if is_verbose() {
    log_prefixed(Color::Cyan, "verb", message);
  }
}

/// Info level logging - general information
pub fn info(message: &str) {
  log_prefixed(Color::Blue, "info", message);
}

/// Warning level logging - something needs attention
pub fn warn(message: &str) {
  log_prefixed(Color::Yellow, "warn", message);
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  log_prefixed(Color::Red, "error", message);
}

/// Success level logging - something completed successfully
pub fn success(message: &str) {
  log_prefixed(Color::Green, "sccs", message);
}

/// Install a stderr `tracing` subscriber.
///
/// `env_var` names an environment variable holding an `EnvFilter` directive
/// string; when it is unset or invalid, `default_directives` is used.
pub fn init_tracing(default_directives: &str, env_var: &str) -> Result<(), TryInitError> {
  let filter =
    EnvFilter::try_from_env(env_var).unwrap_or_else(|_| EnvFilter::new(default_directives));

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(filter)
    .try_init()
}

/// Macros for coverage-excluded logging - these expand with LCOV_EXCL_LINE at call sites
#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($msg:expr) => {
    $crate::warn($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($msg:expr) => {
    $crate::error($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! verbose {
  ($msg:expr) => {
    $crate::verbose($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($msg:expr) => {
    $crate::success($msg); // LCOV_EXCL_LINE
  };
}
