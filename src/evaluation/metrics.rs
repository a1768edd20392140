//! Response quality metrics.
//!
//! - BLEU: modified n-gram precision (n = 1..4) with a brevity penalty
//! - ROUGE-L: longest-common-subsequence F-measure over stemmed tokens

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;

/// Maximum n-gram order for BLEU.
const MAX_ORDER: usize = 4;

/// Numerator substituted for zero n-gram matches (smoothing method 1).
const SMOOTHING_EPSILON: f64 = 0.1;

fn ngram_counts(tokens: &[&str], n: usize) -> HashMap<Vec<String>, usize> {
    let mut counts = HashMap::new();
    if tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        let key: Vec<String> = window.iter().map(|t| t.to_string()).collect();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Clipped n-gram matches and total candidate n-grams.
fn modified_precision(reference: &[&str], candidate: &[&str], n: usize) -> (usize, usize) {
    let candidate_counts = ngram_counts(candidate, n);
    let reference_counts = ngram_counts(reference, n);

    let matches = candidate_counts
        .iter()
        .map(|(ngram, count)| (*count).min(reference_counts.get(ngram).copied().unwrap_or(0)))
        .sum();
    let total = candidate.len().saturating_sub(n - 1).max(1);

    (matches, total)
}

/// Sentence-level BLEU of `candidate` against a single `reference`.
///
/// Tokens are whitespace-separated and case-sensitive. Uniform weights over
/// 1- to 4-grams. Higher-order precisions with no matches are smoothed to
/// `0.1 / total` so short answers do not collapse to zero; a candidate with no
/// unigram overlap at all still scores 0.
pub fn bleu(reference: &str, candidate: &str) -> f64 {
    let reference: Vec<&str> = reference.split_whitespace().collect();
    let candidate: Vec<&str> = candidate.split_whitespace().collect();

    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let precisions: Vec<(usize, usize)> = (1..=MAX_ORDER)
        .map(|n| modified_precision(&reference, &candidate, n))
        .collect();

    if precisions[0].0 == 0 {
        return 0.0;
    }

    let weight = 1.0 / MAX_ORDER as f64;
    let log_sum: f64 = precisions
        .iter()
        .map(|&(matches, total)| {
            let p = if matches == 0 {
                SMOOTHING_EPSILON / total as f64
            } else {
                matches as f64 / total as f64
            };
            weight * p.ln()
        })
        .sum();

    brevity_penalty(reference.len(), candidate.len()) * log_sum.exp()
}

fn brevity_penalty(reference_len: usize, candidate_len: usize) -> f64 {
    if candidate_len > reference_len {
        1.0
    } else {
        (1.0 - reference_len as f64 / candidate_len as f64).exp()
    }
}

/// Tokens shorter than this are left unstemmed.
const MIN_STEM_LEN: usize = 4;

/// Lowercase ASCII alphanumeric tokens, Porter-stemmed, as ROUGE tokenizes.
fn rouge_tokens(text: &str) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    text.to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| {
            if t.len() >= MIN_STEM_LEN {
                stemmer.stem(t).into_owned()
            } else {
                t.to_string()
            }
        })
        .collect()
}

/// Longest common subsequence length.
fn lcs_length(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// ROUGE-L F-measure of `candidate` against `reference`, from 0.0 to 1.0.
pub fn rouge_l(reference: &str, candidate: &str) -> f64 {
    let reference = rouge_tokens(reference);
    let candidate = rouge_tokens(candidate);

    if reference.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let lcs = lcs_length(&reference, &candidate) as f64;
    let precision = lcs / candidate.len() as f64;
    let recall = lcs / reference.len() as f64;

    if precision + recall == 0.0 {
        return 0.0;
    }

    2.0 * precision * recall / (precision + recall)
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
