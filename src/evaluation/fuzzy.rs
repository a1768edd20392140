//! Fuzzy matching of logged queries against ground-truth questions.
//!
//! Scores follow the weighted-ratio scheme of the `fuzzywuzzy` family: a plain
//! edit-distance ratio, plus token-sorted and token-set variants, plus partial
//! (substring) variants when one string is much longer than the other.

use super::GroundTruth;
use std::collections::BTreeSet;
use tracing::trace;

/// Default score (0-100) a match must exceed.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 70.0;

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.9;
const LONG_PARTIAL_SCALE: f64 = 0.6;

/// Drop non-ASCII characters, lowercase, replace everything but letters and
/// digits with spaces, collapse whitespace.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Edit-distance ratio on a 0-100 scale, rounded. Empty input scores 0.
fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    (strsim::normalized_levenshtein(a, b) * 100.0).round()
}

/// Best ratio of the shorter string against every same-length window of the longer.
///
/// Inputs are normalized, so they are ASCII and byte slicing is safe.
fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut best = 0.0_f64;
    for start in 0..=longer.len() - shorter.len() {
        let window = &longer[start..start + shorter.len()];
        let score = strsim::normalized_levenshtein(shorter, window);
        if score > 0.995 {
            return 100.0;
        }
        best = best.max(score);
    }
    (best * 100.0).round()
}

fn token_sorted(normalized: &str) -> String {
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Compare the shared tokens against each side's full token set.
fn token_set_ratio(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |tokens: Vec<&str>| tokens.join(" ");
    let shared = join(left.intersection(&right).copied().collect());
    let with_rest = |rest: Vec<&str>| {
        if rest.is_empty() {
            shared.clone()
        } else if shared.is_empty() {
            join(rest)
        } else {
            format!("{} {}", shared, join(rest))
        }
    };
    let left_full = with_rest(left.difference(&right).copied().collect());
    let right_full = with_rest(right.difference(&left).copied().collect());

    scorer(&shared, &left_full)
        .max(scorer(&shared, &right_full))
        .max(scorer(&left_full, &right_full))
}

/// Similarity of two strings on a 0-100 scale.
///
/// Reordered or repeated words score close to 100. When one string is at least
/// half again as long as the other, substring matches count too, scaled down.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let base = ratio(&a, &b);
    let len_ratio = a.len().max(b.len()) as f64 / a.len().min(b.len()) as f64;

    let best = if len_ratio < 1.5 {
        let sorted = ratio(&token_sorted(&a), &token_sorted(&b)) * UNBASE_SCALE;
        let set = token_set_ratio(&a, &b, ratio) * UNBASE_SCALE;
        base.max(sorted).max(set)
    } else {
        let scale = if len_ratio > 8.0 { LONG_PARTIAL_SCALE } else { PARTIAL_SCALE };
        let partial = partial_ratio(&a, &b) * scale;
        let sorted =
            partial_ratio(&token_sorted(&a), &token_sorted(&b)) * UNBASE_SCALE * scale;
        let set = token_set_ratio(&a, &b, partial_ratio) * UNBASE_SCALE * scale;
        base.max(partial).max(sorted).max(set)
    };
    best.round()
}

/// The ground-truth question closest to `query`, if its score exceeds `threshold`.
///
/// The first question wins ties. `None` means the query has no usable reference.
pub fn find_closest_query<'a>(
    query: &str,
    ground_truth: &'a GroundTruth,
    threshold: f64,
) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;
    for question in ground_truth.questions() {
        let score = similarity(query, question);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((question, score));
        }
    }

    let (question, score) = best?;
    trace!(query, question, score, "closest ground-truth question");
    (score > threshold).then_some(question)
}
