//! Fuzzy similarity between canonical skill names

use serde::Serialize;
use std::collections::HashSet;

const SUBSTRING_SCORE: f64 = 0.9;
const PREFIX_SCORE: f64 = 0.8;
const PREFIX_RATIO: f64 = 0.7;
const WORD_PARTIAL_WEIGHT: f64 = 0.8;
const MIN_COMPARABLE_LEN: usize = 2;
const MIN_WORD_LEN: usize = 3;

/// Best candidate for a skill, `candidate` is `None` when nothing scored above zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestMatch<'a> {
    pub candidate: Option<&'a str>,
    pub index: Option<usize>,
    pub score: f64,
}

/// Split on whitespace, hyphens and slashes
fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '/')
        .filter(|w| !w.is_empty())
        .collect()
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

fn jaccard(a: &str, b: &str) -> f64 {
    let set_a: HashSet<&str> = words(a).into_iter().collect();
    let set_b: HashSet<&str> = words(b).into_iter().collect();

    let intersection = set_a.intersection(&set_b).count();
    if intersection == 0 {
        return 0.0;
    }
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

/// Similarity in [0, 1]; the first rule that applies decides the score.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a < MIN_COMPARABLE_LEN || len_b < MIN_COMPARABLE_LEN {
        return 0.0;
    }

    if a.contains(b) || b.contains(a) {
        return SUBSTRING_SCORE;
    }

    let longer = len_a.max(len_b) as f64;
    if common_prefix_len(a, b) as f64 >= PREFIX_RATIO * longer {
        return PREFIX_SCORE;
    }

    jaccard(a, b)
}

/// Word-level partial overlap: words of `a` that prefix, or are prefixed by,
/// some word of `b`, both longer than two characters.
pub fn word_partial_score(a: &str, b: &str) -> f64 {
    let words_a = words(a);
    let words_b = words(b);
    let denominator = words_a.len().max(words_b.len());
    if denominator == 0 {
        return 0.0;
    }

    let common = words_a
        .iter()
        .filter(|wa| wa.chars().count() >= MIN_WORD_LEN)
        .filter(|wa| {
            words_b.iter().any(|wb| {
                wb.chars().count() >= MIN_WORD_LEN && (wa.starts_with(*wb) || wb.starts_with(**wa))
            })
        })
        .count();

    common as f64 / denominator as f64 * WORD_PARTIAL_WEIGHT
}

/// Best-scoring candidate for `skill`. Ties go to the earlier candidate.
pub fn best_match<'a, S: AsRef<str>>(skill: &str, candidates: &'a [S]) -> BestMatch<'a> {
    let mut best = BestMatch {
        candidate: None,
        index: None,
        score: 0.0,
    };

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate = candidate.as_ref();
        let score = similarity(skill, candidate).max(word_partial_score(skill, candidate));
        if score > best.score {
            best = BestMatch {
                candidate: Some(candidate),
                index: Some(index),
                score,
            };
        }
    }

    best
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: similarity is symmetric.
        #[test]
        fn similarity_is_symmetric(a in "[a-z /-]{0,16}", b in "[a-z /-]{0,16}") {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        /// Property: similarity and best match scores stay within [0, 1].
        #[test]
        fn scores_are_bounded(a in "[a-z /-]{0,16}", b in prop::collection::vec("[a-z /-]{0,16}", 0..5)) {
            let best = best_match(&a, &b);
            prop_assert!((0.0..=1.0).contains(&best.score));
            for candidate in &b {
                let s = similarity(&a, candidate);
                prop_assert!((0.0..=1.0).contains(&s));
            }
        }
    }
}
