//! Cross-product comparison and ranking of two record lists

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::record::{ComparisonResult, Record};
use crate::similarity;

/// Post-ranking filters applied by [`compare_with`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
  /// Drop results scoring below this value
  pub min_similarity: f64,
  /// Keep at most this many results
  pub limit: Option<usize>,
}

impl Default for CompareOptions {
  fn default() -> Self {
    Self { min_similarity: 0.0, limit: None }
  }
}

/// Score every `(left, right)` pair and rank by descending similarity.
///
/// `list1` is the outer loop and `list2` the inner one. Equal scores keep
/// that enumeration order.
pub fn compare_all(list1: &[Record], list2: &[Record]) -> Vec<ComparisonResult> {
  debug!(left = list1.len(), right = list2.len(), "comparing record lists");

  let mut results = score_cross_product(list1, list2);
  rank(&mut results);
  results
}

/// [`compare_all`] followed by the threshold and limit in `options`
pub fn compare_with(
  list1: &[Record],
  list2: &[Record],
  options: &CompareOptions,
) -> Vec<ComparisonResult> {
  let mut results = compare_all(list1, list2);
  let total = results.len();

  // ranked, so everything below the threshold sits at the tail
  if options.min_similarity > 0.0 {
    let keep = results.partition_point(|r| r.similarity >= options.min_similarity);
    results.truncate(keep);
  }

  if let Some(limit) = options.limit {
    results.truncate(limit);
  }

  debug!(total, kept = results.len(), "applied comparison filters");
  results
}

/// Stable sort by similarity, highest first
pub fn rank(results: &mut [ComparisonResult]) {
  results.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
}

fn score_row(left: &Record, list2: &[Record]) -> Vec<ComparisonResult> {
  list2
    .iter()
    .map(|right| ComparisonResult::new(left, right, similarity::score(&left.text, &right.text)))
    .collect()
}

#[cfg(not(feature = "parallel"))]
fn score_cross_product(list1: &[Record], list2: &[Record]) -> Vec<ComparisonResult> {
  let mut results = Vec::with_capacity(list1.len() * list2.len());
  for left in list1 {
    results.extend(score_row(left, list2));
  }
  results
}

#[cfg(feature = "parallel")]
fn score_cross_product(list1: &[Record], list2: &[Record]) -> Vec<ComparisonResult> {
  use rayon::prelude::*;

  // rows come back in list1 order, so the stable sort sees the same input
  let rows: Vec<Vec<ComparisonResult>> =
    list1.par_iter().map(|left| score_row(left, list2)).collect();

  rows.into_iter().flatten().collect()
}
