// CLI functionality lives in the library so it can be tested without the binary
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::engine::{self, CompareOptions};
use crate::loader::{FileSource, RecordSource};
use crate::record::{ComparisonResult, Record};
use crate::report::{ReportFormat, ReportWriter, ResultSink};
use crate::similarity;

/// Pairwise - rank every pairing of two record lists by textual similarity
#[derive(Parser)]
#[command(name = "pairwise")]
#[command(
  about = "Pairwise - Record Similarity Ranking\nCompare two lists of (id, text) records and rank every cross-pair"
)]
#[command(version)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Show debug diagnostics on stderr
  #[arg(short, long, global = true)]
  pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
  /// Compare every record of LIST1 with every record of LIST2
  Compare(CompareArgs),
  /// Print the similarity of two texts
  Score {
    /// First text
    text1: String,
    /// Second text
    text2: String,
    /// Print as a percentage instead of a 0-1 value
    #[arg(short, long)]
    percent: bool,
  },
}

#[derive(Args, Debug)]
pub struct CompareArgs {
  /// First record list (.tsv, .csv, .txt, .json, .yaml)
  pub list1: PathBuf,
  /// Second record list
  pub list2: PathBuf,

  /// Output format
  #[arg(short, long, value_enum)]
  pub format: Option<ReportFormat>,

  /// Write the report to this file instead of stdout
  #[arg(short, long)]
  pub output: Option<PathBuf>,

  /// Only report pairs with at least this similarity (0.0 - 1.0)
  #[arg(short, long)]
  pub threshold: Option<f64>,

  /// Only report the N most similar pairs
  #[arg(short = 'n', long)]
  pub top: Option<usize>,

  /// Delimited inputs have no header row
  #[arg(long)]
  pub no_header: bool,

  /// Configuration file path
  #[arg(short, long, env = "PAIRWISE_CONFIG")]
  pub config: Option<PathBuf>,
}

pub fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Compare(args) => compare(&args),
    Commands::Score { text1, text2, percent } => {
      println!("{}", format_score(&text1, &text2, percent));
      Ok(())
    }
  }
}

/// Load the config file (explicit or discovered) and apply flag overrides
pub fn resolve_config(args: &CompareArgs) -> Result<Config> {
  let mut config = match &args.config {
    Some(path) => Config::load_from_file(path)?,
    None => Config::load()?,
  };

  if let Some(format) = args.format {
    config.format = format;
  }
  if let Some(threshold) = args.threshold {
    config.min_similarity = threshold;
  }
  if let Some(top) = args.top {
    config.limit = Some(top);
  }
  if args.no_header {
    config.has_header = false;
  }

  config.validate()?;
  Ok(config)
}

pub fn compare(args: &CompareArgs) -> Result<()> {
  let config = resolve_config(args)?;

  if let Some(output) = &args.output {
    ensure_distinct_output(output, &[&args.list1, &args.list2])?;
  }

  let source1 = FileSource::new(&args.list1)?.with_header(config.has_header);
  let source2 = FileSource::new(&args.list2)?.with_header(config.has_header);

  // ranked before the output is touched, so a failed load leaves it intact
  let results = rank_sources(&source1, &source2, &config.compare_options())?;

  match &args.output {
    Some(path) => {
      let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
      let mut sink =
        ReportWriter::new(BufWriter::new(file), config.format, config.percent_decimals).plain();
      sink.write(&results)?;
      herald::success!(&format!(
        "Comparison complete: {} results written to {}",
        results.len(),
        path.display()
      ));
    }
    None => {
      let mut sink = ReportWriter::new(io::stdout().lock(), config.format, config.percent_decimals);
      sink.write(&results)?;
      herald::success!(&format!("Comparison complete: {} results", results.len()));
    }
  }

  Ok(())
}

/// Refuse an output path that resolves to one of the inputs
pub fn ensure_distinct_output(output: &Path, inputs: &[&PathBuf]) -> Result<()> {
  let Ok(resolved) = fs::canonicalize(output) else {
    // nothing exists there yet, so it cannot be an input
    return Ok(());
  };

  for input in inputs {
    if fs::canonicalize(input).map(|path| path == resolved).unwrap_or(false) {
      bail!("Refusing to overwrite input file {} with the report", input.display());
    }
  }

  Ok(())
}

/// Load both sources and rank their cross product
pub fn rank_sources(
  source1: &impl RecordSource,
  source2: &impl RecordSource,
  options: &CompareOptions,
) -> Result<Vec<ComparisonResult>> {
  let list1 = load_source(source1)?;
  let list2 = load_source(source2)?;

  let results = engine::compare_with(&list1, &list2, options);
  info!(pairs = list1.len() * list2.len(), reported = results.len(), "comparison finished");

  Ok(results)
}

/// Load both sources, rank the cross product and hand it to the sink.
///
/// Returns the number of rows written.
pub fn run_comparison(
  source1: &impl RecordSource,
  source2: &impl RecordSource,
  options: &CompareOptions,
  sink: &mut impl ResultSink,
) -> Result<usize> {
  let results = rank_sources(source1, source2, options)?;
  sink.write(&results)?;
  Ok(results.len())
}

fn load_source(source: &impl RecordSource) -> Result<Vec<Record>> {
  let records =
    source.load().with_context(|| format!("Failed to load records from {}", source.describe()))?;

  if records.is_empty() {
    herald::warn!(&format!("No records found in {}", source.describe()));
  } else {
    herald::verbose!(&format!("Loaded {} records from {}", records.len(), source.describe()));
  }

  Ok(records)
}

pub fn format_score(text1: &str, text2: &str, percent: bool) -> String {
  let score = similarity::score(text1, text2);
  if percent {
    format!("{:.2}", score * 100.0)
  } else {
    format!("{score:.4}")
  }
}

#[cfg(test)]
mod cli_tests {
  use super::*;
  use crate::error::PairwiseError;
  use crate::loader::MockRecordSource;
  use crate::report::MockResultSink;

  fn source_of(records: Vec<Record>) -> MockRecordSource {
    let mut source = MockRecordSource::new();
    source.expect_load().times(1).return_once(move || Ok(records));
    source.expect_describe().return_const("mock source".to_string());
    source
  }

  #[test]
  fn test_cli_parsing_compare() {
    let cli = Cli::try_parse_from(["pairwise", "compare", "a.tsv", "b.json"]).unwrap();
    match cli.command {
      Commands::Compare(args) => {
        assert_eq!(args.list1, PathBuf::from("a.tsv"));
        assert_eq!(args.list2, PathBuf::from("b.json"));
        assert_eq!(args.format, None);
        assert!(!args.no_header);
      }
      _ => panic!("expected compare"),
    }
    assert!(!cli.verbose);
  }

  #[test]
  fn test_cli_requires_exactly_two_lists() {
    assert!(Cli::try_parse_from(["pairwise", "compare", "a.tsv"]).is_err());
    assert!(Cli::try_parse_from(["pairwise", "compare", "a.tsv", "b.tsv", "c.tsv"]).is_err());
  }

  #[test]
  fn test_cli_parsing_flags() {
    let cli = Cli::try_parse_from([
      "pairwise", "compare", "a.tsv", "b.tsv", "-f", "json", "-t", "0.5", "-n", "3", "--no-header",
      "-v",
    ])
    .unwrap();

    assert!(cli.verbose);
    let Commands::Compare(args) = cli.command else { panic!("expected compare") };
    assert_eq!(args.format, Some(ReportFormat::Json));
    assert_eq!(args.threshold, Some(0.5));
    assert_eq!(args.top, Some(3));
    assert!(args.no_header);
  }

  #[test]
  fn test_resolve_config_applies_overrides() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config_path = temp_dir.path().join("pairwise.json");
    std::fs::write(&config_path, r#"{ "format": "tsv", "min_similarity": 0.1 }"#).unwrap();

    let args = CompareArgs {
      list1: "a.tsv".into(),
      list2: "b.tsv".into(),
      format: Some(ReportFormat::Compact),
      output: None,
      threshold: None,
      top: Some(4),
      no_header: true,
      config: Some(config_path),
    };

    let config = resolve_config(&args).unwrap();
    assert_eq!(config.format, ReportFormat::Compact);
    assert_eq!(config.min_similarity, 0.1);
    assert_eq!(config.limit, Some(4));
    assert!(!config.has_header);
  }

  #[test]
  fn test_resolve_config_rejects_bad_threshold() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config_path = temp_dir.path().join("pairwise.json");
    std::fs::write(&config_path, "{}").unwrap();

    let args = CompareArgs {
      list1: "a.tsv".into(),
      list2: "b.tsv".into(),
      format: None,
      output: None,
      threshold: Some(2.0),
      top: None,
      no_header: false,
      config: Some(config_path),
    };

    assert!(resolve_config(&args).is_err());
  }

  #[test]
  fn test_run_comparison_hands_ranked_rows_to_sink() {
    let source1 = source_of(vec![Record::new("A1", "the user can log in")]);
    let source2 = source_of(vec![
      Record::new("B2", "completely unrelated text here"),
      Record::new("B1", "the user can log in"),
    ]);

    let mut sink = MockResultSink::new();
    sink
      .expect_write()
      .withf(|results| {
        results.len() == 2 && results[0].id2 == "B1" && results[0].similarity == 1.0
      })
      .times(1)
      .returning(|_| Ok(()));

    let count = run_comparison(&source1, &source2, &CompareOptions::default(), &mut sink).unwrap();
    assert_eq!(count, 2);
  }

  #[test]
  fn test_run_comparison_with_empty_source() {
    let source1 = source_of(Vec::new());
    let source2 = source_of(vec![Record::new("B1", "text")]);

    let mut sink = MockResultSink::new();
    sink.expect_write().withf(|results| results.is_empty()).times(1).returning(|_| Ok(()));

    let count = run_comparison(&source1, &source2, &CompareOptions::default(), &mut sink).unwrap();
    assert_eq!(count, 0);
  }

  #[test]
  fn test_run_comparison_propagates_load_failure() {
    let mut source1 = MockRecordSource::new();
    source1.expect_load().times(1).returning(|| {
      Err(PairwiseError::io("missing.tsv", std::io::Error::from(std::io::ErrorKind::NotFound)))
    });
    source1.expect_describe().return_const("missing.tsv".to_string());
    let source2 = MockRecordSource::new();

    let mut sink = MockResultSink::new();
    sink.expect_write().times(0);

    let err = run_comparison(&source1, &source2, &CompareOptions::default(), &mut sink).unwrap_err();
    assert!(err.to_string().contains("missing.tsv"));
  }

  #[test]
  fn test_ensure_distinct_output_rejects_input_path() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let input = temp_dir.path().join("a.tsv");
    let other = temp_dir.path().join("b.tsv");
    std::fs::write(&input, "ID\tText\n").unwrap();
    std::fs::write(&other, "ID\tText\n").unwrap();

    let aliased = temp_dir.path().join(".").join("a.tsv");
    assert!(ensure_distinct_output(&aliased, &[&input, &other]).is_err());

    let fresh = temp_dir.path().join("report.tsv");
    assert!(ensure_distinct_output(&fresh, &[&input, &other]).is_ok());
  }

  #[test]
  fn test_format_score() {
    assert_eq!(format_score("cat cat dog", "cat dog dog", false), "0.8000");
    assert_eq!(format_score("cat cat dog", "cat dog dog", true), "80.00");
    assert_eq!(format_score("", "", false), "0.0000");
  }
}
