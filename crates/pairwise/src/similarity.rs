//! Bag-of-words cosine similarity over raw term counts

use std::collections::HashMap;

/// Split on whitespace and lowercase every token
pub fn tokenize(text: &str) -> Vec<String> {
  text.split_whitespace().map(str::to_lowercase).filter(|token| !token.is_empty()).collect()
}

/// Build term-frequency vectors for two texts over their shared vocabulary.
///
/// The vocabulary is the union of both token sets, enumerated in order of
/// first appearance (text1 first). Both vectors use that same ordering.
pub fn term_vectors(text1: &str, text2: &str) -> (Vec<u32>, Vec<u32>) {
  let tokens1 = tokenize(text1);
  let tokens2 = tokenize(text2);

  let mut vocabulary: HashMap<&str, usize> = HashMap::new();
  for token in tokens1.iter().chain(tokens2.iter()) {
    let next = vocabulary.len();
    vocabulary.entry(token.as_str()).or_insert(next);
  }

  let mut vec1 = vec![0u32; vocabulary.len()];
  let mut vec2 = vec![0u32; vocabulary.len()];

  for token in &tokens1 {
    vec1[vocabulary[token.as_str()]] += 1;
  }
  for token in &tokens2 {
    vec2[vocabulary[token.as_str()]] += 1;
  }

  (vec1, vec2)
}

/// Cosine similarity between two count vectors
pub fn cosine(a: &[u32], b: &[u32]) -> f64 {
  if a.len() != b.len() {
    return 0.0;
  }

  let (dot, magnitude_a, magnitude_b) =
    a.iter().zip(b.iter()).fold((0u64, 0u64, 0u64), |(dot, ma, mb), (&x, &y)| {
      let (x, y) = (u64::from(x), u64::from(y));
      (dot + x * y, ma + x * x, mb + y * y)
    });

  if magnitude_a == 0 || magnitude_b == 0 {
    return 0.0;
  }

  // sqrt of the product keeps identical vectors at exactly 1.0
  let denominator = (magnitude_a as f64 * magnitude_b as f64).sqrt();
  (dot as f64 / denominator).min(1.0)
}

/// Similarity of two texts in `[0.0, 1.0]`.
///
/// Texts without any tokens score `0.0` against everything, including
/// another empty text.
pub fn score(text1: &str, text2: &str) -> f64 {
  let (vec1, vec2) = term_vectors(text1, text2);
  cosine(&vec1, &vec2)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tokenize_splits_on_any_whitespace() {
    assert_eq!(tokenize("The  user\tcan\nLOG in"), vec!["the", "user", "can", "log", "in"]);
  }

  #[test]
  fn test_tokenize_keeps_punctuation() {
    assert_eq!(tokenize("log in, please!"), vec!["log", "in,", "please!"]);
  }

  #[test]
  fn test_tokenize_empty() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("   \t\n ").is_empty());
  }

  #[test]
  fn test_term_vectors_share_vocabulary() {
    let (vec1, vec2) = term_vectors("cat cat dog", "cat dog dog");
    assert_eq!(vec1, vec![2, 1]);
    assert_eq!(vec2, vec![1, 2]);
  }

  #[test]
  fn test_term_vectors_disjoint_terms() {
    let (vec1, vec2) = term_vectors("alpha beta", "gamma");
    assert_eq!(vec1, vec![1, 1, 0]);
    assert_eq!(vec2, vec![0, 0, 1]);
  }

  #[test]
  fn test_cosine_mismatched_lengths() {
    assert_eq!(cosine(&[1, 2], &[1]), 0.0);
  }

  #[test]
  fn test_cosine_zero_vector() {
    assert_eq!(cosine(&[0, 0], &[1, 1]), 0.0);
    assert_eq!(cosine(&[], &[]), 0.0);
  }

  #[test]
  fn test_score_identical_text() {
    assert_eq!(score("the user can log in", "the user can log in"), 1.0);
    assert_eq!(score("a a b c c c", "a a b c c c"), 1.0);
  }

  #[test]
  fn test_score_ignores_word_order() {
    assert_eq!(score("cat dog", "dog cat"), 1.0);
  }

  #[test]
  fn test_score_ignores_case() {
    assert_eq!(score("Cat DOG", "cat dog"), 1.0);
  }

  #[test]
  fn test_score_uses_raw_counts() {
    assert_eq!(score("cat cat dog", "cat dog dog"), 0.8);
  }

  #[test]
  fn test_score_no_overlap() {
    assert_eq!(score("login page", "billing report"), 0.0);
  }

  #[test]
  fn test_score_empty_text_is_dissimilar() {
    assert_eq!(score("something", ""), 0.0);
    assert_eq!(score("", "something"), 0.0);
    assert_eq!(score("", ""), 0.0);
    assert_eq!(score("  ", "\t"), 0.0);
  }

  #[test]
  fn test_score_is_symmetric_and_bounded() {
    let texts = [
      "the user can log in",
      "as an admin I can reset a user password",
      "user user user",
      "completely unrelated text here",
      "",
      "Log In log in LOG IN",
    ];

    for a in &texts {
      for b in &texts {
        let forward = score(a, b);
        assert_eq!(forward, score(b, a), "asymmetric for {a:?} / {b:?}");
        assert!((0.0..=1.0).contains(&forward), "out of range for {a:?} / {b:?}");
      }
    }
  }

  #[test]
  fn test_score_partial_overlap() {
    // [1,1,1,0] . [0,1,1,1] = 2, norms sqrt(3) each
    let similarity = score("a b c", "b c d");
    assert!((similarity - 2.0 / 3.0).abs() < 1e-12);
  }
}
