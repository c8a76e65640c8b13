//! Result sinks and report rendering
//!
//! Reports use the column layout of the comparison sheet: both ids, both
//! descriptions, and the similarity as a percentage.

use clap::ValueEnum;
use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::Result;
use crate::record::ComparisonResult;

pub const HEADERS: [&str; 5] = ["ID 1", "Description 1", "ID 2", "Description 2", "Similarity (%)"];

const FALLBACK_WIDTH: usize = 100;
const MIN_DESCRIPTION_WIDTH: usize = 12;
const COLUMN_GAP: &str = "  ";

/// Anything that accepts ranked comparison rows
#[cfg_attr(test, mockall::automock)]
pub trait ResultSink {
  fn write(&mut self, results: &[ComparisonResult]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
  #[default]
  Pretty,
  Tsv,
  Json,
  Compact,
}

/// How the pretty table is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
  pub colorize: bool,
  /// Total table width; `None` asks the terminal
  pub width: Option<usize>,
}

impl Style {
  pub fn terminal() -> Self {
    Self { colorize: true, width: None }
  }

  /// No escape codes and a fixed width, for reports saved to files
  pub fn plain() -> Self {
    Self { colorize: false, width: Some(FALLBACK_WIDTH) }
  }
}

impl Default for Style {
  fn default() -> Self {
    Self::terminal()
  }
}

/// Writes rendered reports to any `Write` target
pub struct ReportWriter<W: Write> {
  writer: W,
  format: ReportFormat,
  decimals: u32,
  style: Style,
}

impl<W: Write> ReportWriter<W> {
  pub fn new(writer: W, format: ReportFormat, decimals: u32) -> Self {
    Self { writer, format, decimals, style: Style::terminal() }
  }

  pub fn plain(mut self) -> Self {
    self.style = Style::plain();
    self
  }

  pub fn into_inner(self) -> W {
    self.writer
  }
}

impl<W: Write> ResultSink for ReportWriter<W> {
  fn write(&mut self, results: &[ComparisonResult]) -> Result<()> {
    let mut output = render_styled(results, self.format, self.decimals, self.style);
    if !output.is_empty() && !output.ends_with('\n') {
      output.push('\n');
    }

    self.writer.write_all(output.as_bytes())?;
    self.writer.flush()?;
    Ok(())
  }
}

pub fn render(results: &[ComparisonResult], format: ReportFormat, decimals: u32) -> String {
  render_styled(results, format, decimals, Style::terminal())
}

pub fn render_styled(
  results: &[ComparisonResult],
  format: ReportFormat,
  decimals: u32,
  style: Style,
) -> String {
  match format {
    ReportFormat::Pretty => {
      let width = style.width.unwrap_or_else(terminal_width);
      render_pretty(results, decimals, width, style.colorize)
    }
    ReportFormat::Tsv => render_tsv(results, decimals),
    ReportFormat::Json => render_json(results, decimals),
    ReportFormat::Compact => render_compact(results, decimals),
  }
}

fn terminal_width() -> usize {
  console::Term::stdout().size_checked().map(|(_, cols)| cols as usize).unwrap_or(FALLBACK_WIDTH)
}

fn format_percent(result: &ComparisonResult, decimals: u32) -> String {
  format!("{:.prec$}", result.percent(decimals), prec = decimals as usize)
}

/// Collapse tabs and line breaks so a field stays on one line
fn single_line(text: &str) -> String {
  text.replace(['\t', '\n', '\r'], " ")
}

/// Truncate to `width` characters, marking the cut with "..."
fn fit(text: &str, width: usize) -> String {
  let text = single_line(text);
  if text.chars().count() <= width {
    return text;
  }
  if width <= 3 {
    return text.chars().take(width).collect();
  }
  let kept: String = text.chars().take(width - 3).collect();
  format!("{kept}...")
}

fn pad(text: &str, width: usize) -> String {
  let len = text.chars().count();
  format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
  values.map(|v| v.chars().count()).max().unwrap_or(0).max(header.len())
}

fn colored_percent(result: &ComparisonResult, text: &str, colorize: bool) -> String {
  if !colorize {
    return text.to_string();
  }
  let painted = if result.similarity >= 0.75 {
    text.bright_green().bold()
  } else if result.similarity >= 0.4 {
    text.yellow()
  } else {
    text.dimmed()
  };
  painted.to_string()
}

fn bold(text: &str, colorize: bool) -> String {
  if colorize {
    text.bold().to_string()
  } else {
    text.to_string()
  }
}

fn render_pretty(
  results: &[ComparisonResult],
  decimals: u32,
  total_width: usize,
  colorize: bool,
) -> String {
  if results.is_empty() {
    let message = "No comparisons to report";
    return if colorize { format!("{}\n", message.yellow()) } else { format!("{message}\n") };
  }

  let id1_width = column_width(results.iter().map(|r| r.id1.as_str()), HEADERS[0]);
  let id2_width = column_width(results.iter().map(|r| r.id2.as_str()), HEADERS[2]);
  let score_width = HEADERS[4].len();

  let fixed = id1_width + id2_width + score_width + COLUMN_GAP.len() * 4;
  let description_width =
    (total_width.saturating_sub(fixed) / 2).max(MIN_DESCRIPTION_WIDTH);

  let widths = [id1_width, description_width, id2_width, description_width, score_width];

  let mut output = String::new();
  let header: Vec<String> =
    HEADERS.iter().zip(widths.iter()).map(|(h, w)| pad(h, *w)).collect();
  output.push_str(&format!("{}\n", bold(header.join(COLUMN_GAP).trim_end(), colorize)));
  output.push_str(&format!("{}\n", "=".repeat(widths.iter().sum::<usize>() + COLUMN_GAP.len() * 4)));

  for result in results {
    let percent = format_percent(result, decimals);
    let cells = [
      pad(&fit(&result.id1, id1_width), id1_width),
      pad(&fit(&result.text1, description_width), description_width),
      pad(&fit(&result.id2, id2_width), id2_width),
      pad(&fit(&result.text2, description_width), description_width),
    ];

    let score = format!("{:>width$}", percent, width = score_width);
    output.push_str(&format!(
      "{}{}{}\n",
      cells.join(COLUMN_GAP),
      COLUMN_GAP,
      colored_percent(result, &score, colorize)
    ));
  }

  output.push_str(&format!("\n{} comparisons\n", bold(&results.len().to_string(), colorize)));
  output
}

fn render_tsv(results: &[ComparisonResult], decimals: u32) -> String {
  let mut lines = vec![HEADERS.join("\t")];

  lines.extend(results.iter().map(|r| {
    [
      single_line(&r.id1),
      single_line(&r.text1),
      single_line(&r.id2),
      single_line(&r.text2),
      format_percent(r, decimals),
    ]
    .join("\t")
  }));

  lines.join("\n")
}

#[derive(Serialize)]
struct JsonRow<'a> {
  id1: &'a str,
  text1: &'a str,
  id2: &'a str,
  text2: &'a str,
  similarity: f64,
  percent: f64,
}

fn render_json(results: &[ComparisonResult], decimals: u32) -> String {
  let rows: Vec<JsonRow> = results
    .iter()
    .map(|r| JsonRow {
      id1: &r.id1,
      text1: &r.text1,
      id2: &r.id2,
      text2: &r.text2,
      similarity: r.similarity,
      percent: r.percent(decimals),
    })
    .collect();

  let output = serde_json::json!({
    "generated_at": chrono::Utc::now().to_rfc3339(),
    "total": results.len(),
    "results": rows,
  });

  serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

fn render_compact(results: &[ComparisonResult], decimals: u32) -> String {
  results
    .iter()
    .map(|r| format!("{} -> {} ({}%)", r.id1, r.id2, format_percent(r, decimals)))
    .collect::<Vec<_>>()
    .join("\n")
}
