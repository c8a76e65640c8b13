use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PairwiseError {
  #[error("Failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse {path}: {message}")]
  Parse { path: PathBuf, message: String },

  #[error("Unsupported input format for {path} (expected .tsv, .csv, .txt, .json, .yaml or .yml)")]
  UnsupportedFormat { path: PathBuf },

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Failed to write report: {0}")]
  Report(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PairwiseError>;

impl PairwiseError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }

  pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
    Self::Parse { path: path.into(), message: message.to_string() }
  }
}
