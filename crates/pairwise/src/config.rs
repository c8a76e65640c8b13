//! Configuration management for pairwise
//!
//! Handles loading and validating report defaults and comparison filters.
//! Command-line flags override whatever is loaded here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::engine::CompareOptions;
use crate::error::{PairwiseError, Result};
use crate::report::ReportFormat;

/// Largest supported number of decimals in percentage output
pub const MAX_PERCENT_DECIMALS: u32 = 6;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// Output format used when `--format` is not given
  #[serde(default)]
  pub format: ReportFormat,
  /// Whether delimited inputs start with a header row
  #[serde(default = "default_has_header")]
  pub has_header: bool,
  /// Minimum similarity (0.0 - 1.0) for a pair to be reported
  #[serde(default)]
  pub min_similarity: f64,
  /// Maximum number of pairs to report
  #[serde(default)]
  pub limit: Option<usize>,
  /// Decimal places in the similarity percentage
  #[serde(default = "default_percent_decimals")]
  pub percent_decimals: u32,
}

fn default_has_header() -> bool {
  true
}
fn default_percent_decimals() -> u32 {
  2
}

impl Default for Config {
  fn default() -> Self {
    Self {
      format: ReportFormat::default(),
      has_header: default_has_header(),
      min_similarity: 0.0,
      limit: None,
      percent_decimals: default_percent_decimals(),
    }
  }
}

impl Config {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| PairwiseError::io(path, e))?;
    let config: Config =
      serde_json::from_str(&content).map_err(|e| PairwiseError::parse(path, e))?;
    config.validate()?;

    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
  }

  /// Load configuration from the working directory, the user config
  /// directory, or defaults
  pub fn load() -> Result<Self> {
    for path in Self::search_paths() {
      if path.exists() {
        return Self::load_from_file(path);
      }
    }

    // No config file found, use defaults
    Ok(Config::default())
  }

  /// Candidate config locations, in priority order
  pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".pairwise.json"), PathBuf::from("pairwise.json")];
    if let Some(config_dir) = dirs::config_dir() {
      paths.push(config_dir.join("pairwise").join("config.json"));
    }
    paths
  }

  /// Save configuration to a file
  pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(self).map_err(|e| PairwiseError::parse(path, e))?;
    std::fs::write(path, content).map_err(|e| PairwiseError::io(path, e))?;
    Ok(())
  }

  pub fn validate(&self) -> Result<()> {
    if !(0.0..=1.0).contains(&self.min_similarity) {
      return Err(PairwiseError::InvalidConfig(format!(
        "min_similarity must be between 0.0 and 1.0, got {}",
        self.min_similarity
      )));
    }

    if self.percent_decimals > MAX_PERCENT_DECIMALS {
      return Err(PairwiseError::InvalidConfig(format!(
        "percent_decimals must be at most {MAX_PERCENT_DECIMALS}, got {}",
        self.percent_decimals
      )));
    }

    Ok(())
  }

  pub fn compare_options(&self) -> CompareOptions {
    CompareOptions { min_similarity: self.min_similarity, limit: self.limit }
  }
}
