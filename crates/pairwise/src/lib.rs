//! Pairwise - Record Similarity Ranking
//!
//! Compares two lists of `(id, text)` records, scores every cross-pair with a
//! bag-of-words cosine similarity over raw term counts, and ranks the pairs
//! from most to least similar.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod record;
pub mod report;
pub mod similarity;

pub use engine::{compare_all, compare_with, CompareOptions};
pub use error::{PairwiseError, Result};
pub use record::{ComparisonResult, Record};
pub use similarity::score;
