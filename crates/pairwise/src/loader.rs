//! Record sources
//!
//! Reads `(id, text)` records from delimited text, JSON or YAML files. Every
//! loader trims both fields and drops records where either one is blank.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PairwiseError, Result};
use crate::record::Record;

/// Anything that can hand the engine a list of records
#[cfg_attr(test, mockall::automock)]
pub trait RecordSource {
  fn load(&self) -> Result<Vec<Record>>;

  /// Human-readable name for log messages
  fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
  /// One record per line: id, then a tab or comma, then the text
  Delimited,
  Json,
  Yaml,
}

impl InputFormat {
  pub fn from_path(path: &Path) -> Option<Self> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
      "tsv" | "csv" | "txt" => Some(InputFormat::Delimited),
      "json" => Some(InputFormat::Json),
      "yaml" | "yml" => Some(InputFormat::Yaml),
      _ => None,
    }
  }
}

/// A record list stored in a file
#[derive(Debug, Clone)]
pub struct FileSource {
  pub path: PathBuf,
  pub format: InputFormat,
  /// Skip the first non-empty line of delimited input
  pub has_header: bool,
}

impl FileSource {
  pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
    let path = path.into();
    let format = InputFormat::from_path(&path)
      .ok_or_else(|| PairwiseError::UnsupportedFormat { path: path.clone() })?;

    Ok(Self { path, format, has_header: true })
  }

  pub fn with_header(mut self, has_header: bool) -> Self {
    self.has_header = has_header;
    self
  }
}

impl RecordSource for FileSource {
  fn load(&self) -> Result<Vec<Record>> {
    let content =
      fs::read_to_string(&self.path).map_err(|e| PairwiseError::io(&self.path, e))?;

    let records = match self.format {
      InputFormat::Delimited => parse_delimited(&content, self.has_header),
      InputFormat::Json => parse_json(&content).map_err(|e| PairwiseError::parse(&self.path, e))?,
      InputFormat::Yaml => parse_yaml(&content).map_err(|e| PairwiseError::parse(&self.path, e))?,
    };

    debug!(path = %self.path.display(), records = records.len(), "loaded records");
    Ok(records)
  }

  fn describe(&self) -> String {
    self.path.display().to_string()
  }
}

/// Parse delimited lines into records.
///
/// Each line splits on its first tab, or on its first comma when there is no
/// tab, so the text column may itself contain commas.
pub fn parse_delimited(content: &str, has_header: bool) -> Vec<Record> {
  let mut lines = content.lines().filter(|line| !line.trim().is_empty()).peekable();

  // one separator per file, taken from the first row
  let separator = match lines.peek() {
    Some(first) if has_unquoted_tab(first) => '\t',
    _ => ',',
  };

  if has_header {
    lines.next();
  }

  lines.filter_map(|line| split_line(line, separator)).collect()
}

fn has_unquoted_tab(line: &str) -> bool {
  let mut quoted = false;
  line.chars().any(|c| {
    if c == '"' {
      quoted = !quoted;
    }
    c == '\t' && !quoted
  })
}

fn split_line(line: &str, separator: char) -> Option<Record> {
  let at = find_separator(line, separator)?;
  let (id, text) = (&line[..at], &line[at + separator.len_utf8()..]);
  Record::parse(&unquote(id), &unquote(text))
}

/// Byte offset of the first separator that is not inside a quoted id
fn find_separator(line: &str, separator: char) -> Option<usize> {
  let mut chars = line.char_indices().peekable();
  let mut quoted = false;
  let mut at_field_start = true;

  while let Some((i, c)) = chars.next() {
    if quoted {
      if c == '"' {
        if chars.peek().map(|&(_, next)| next) == Some('"') {
          chars.next();
        } else {
          quoted = false;
        }
      }
    } else if c == separator {
      return Some(i);
    } else if c == '"' && at_field_start {
      quoted = true;
    }

    if !c.is_whitespace() {
      at_field_start = false;
    }
  }

  None
}

fn unquote(field: &str) -> String {
  let trimmed = field.trim();
  match trimmed.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
    Some(inner) => inner.replace("\"\"", "\""),
    None => trimmed.to_string(),
  }
}

/// Scalar cell that may be written as a string or a number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Field {
  Text(String),
  Integer(i64),
  Float(f64),
}

impl Field {
  fn into_text(self) -> String {
    match self {
      Field::Text(text) => text,
      Field::Integer(value) => value.to_string(),
      Field::Float(value) => value.to_string(),
    }
  }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
  #[serde(default)]
  id: Option<Field>,
  #[serde(default, alias = "description")]
  text: Option<Field>,
}

impl RawRecord {
  fn into_record(self) -> Option<Record> {
    let id = self.id?.into_text();
    let text = self.text?.into_text();
    Record::parse(&id, &text)
  }
}

fn collect_raw(raw: Vec<RawRecord>) -> Vec<Record> {
  raw.into_iter().filter_map(RawRecord::into_record).collect()
}

pub fn parse_json(content: &str) -> std::result::Result<Vec<Record>, serde_json::Error> {
  let raw: Vec<RawRecord> = serde_json::from_str(content)?;
  Ok(collect_raw(raw))
}

pub fn parse_yaml(content: &str) -> std::result::Result<Vec<Record>, serde_yaml::Error> {
  if content.trim().is_empty() {
    return Ok(Vec::new());
  }
  let raw: Vec<RawRecord> = serde_yaml::from_str(content)?;
  Ok(collect_raw(raw))
}
