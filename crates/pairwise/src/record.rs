use serde::{Deserialize, Serialize};

/// An identified piece of text, e.g. one user story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  pub id: String,
  pub text: String,
}

impl Record {
  pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
    Self { id: id.into(), text: text.into() }
  }

  /// Trim both fields, returning `None` when either ends up blank
  pub fn parse(id: &str, text: &str) -> Option<Self> {
    let id = id.trim();
    let text = text.trim();

    if id.is_empty() || text.is_empty() {
      None
    } else {
      Some(Self::new(id, text))
    }
  }
}

/// One scored pair: a record from the first list against one from the second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
  pub id1: String,
  pub text1: String,
  pub id2: String,
  pub text2: String,
  pub similarity: f64,
}

impl ComparisonResult {
  pub fn new(left: &Record, right: &Record, similarity: f64) -> Self {
    Self {
      id1: left.id.clone(),
      text1: left.text.clone(),
      id2: right.id.clone(),
      text2: right.text.clone(),
      similarity,
    }
  }

  /// Similarity as a percentage rounded to `decimals` places
  pub fn percent(&self, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (self.similarity * 100.0 * factor).round() / factor
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_trims_fields() {
    let record = Record::parse("  US-1 ", "\tAs a user I can log in \n").unwrap();
    assert_eq!(record.id, "US-1");
    assert_eq!(record.text, "As a user I can log in");
  }

  #[test]
  fn test_parse_rejects_blank_fields() {
    assert!(Record::parse("", "text").is_none());
    assert!(Record::parse("id", "   ").is_none());
    assert!(Record::parse(" \t", "\n").is_none());
  }

  #[test]
  fn test_percent_rounds_to_requested_places() {
    let left = Record::new("A", "a");
    let right = Record::new("B", "b");

    let result = ComparisonResult::new(&left, &right, 2.0 / 3.0);
    assert_eq!(result.percent(2), 66.67);
    assert_eq!(result.percent(0), 67.0);

    let result = ComparisonResult::new(&left, &right, 0.8);
    assert_eq!(result.percent(2), 80.0);
  }

  #[test]
  fn test_result_copies_both_records() {
    let left = Record::new("A1", "first");
    let right = Record::new("B7", "second");
    let result = ComparisonResult::new(&left, &right, 0.5);

    assert_eq!(result.id1, "A1");
    assert_eq!(result.text1, "first");
    assert_eq!(result.id2, "B7");
    assert_eq!(result.text2, "second");
    assert_eq!(result.similarity, 0.5);
  }
}
