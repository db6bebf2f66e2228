//! # Recipe Name Similarity
//!
//! Whole-string fuzzy matching used to decide whether a requested dish already
//! exists as a recipe. It provides:
//!
//! - Levenshtein edit distance over Unicode characters
//! - A 0-100 similarity score on case-folded, trimmed strings
//! - Best-match selection above a threshold
//! - Similarity-ranked filtering of a record list
//!
//! All functions are pure and allocate their own scratch space, so they can be
//! called from any number of request handlers at once.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::trace;

/// Default minimum score for [`find_best_match`] to accept a record
pub const DEFAULT_MATCH_THRESHOLD: f64 = 95.0;

/// Default minimum score for [`filter_and_sort_by_similarity`]
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.0;

/// Highest attainable similarity score
pub const MAX_SIMILARITY: f64 = 100.0;

/// Any record that can be matched by its name
///
/// Only the name is read; a record without one returns `None`.
pub trait Named {
    fn name(&self) -> Option<&str>;
}

impl Named for String {
    fn name(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Named for str {
    fn name(&self) -> Option<&str> {
        Some(self)
    }
}

impl Named for Option<String> {
    fn name(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl<T: Named + ?Sized> Named for &T {
    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

/// A record paired with its similarity to a search term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch<R> {
    /// The matched record
    pub record: R,
    /// Similarity score in the range 0.0-100.0
    pub similarity: f64,
}

impl<T: Clone> SimilarityMatch<&T> {
    /// Convert a borrowed match into one that owns its record
    pub fn cloned(self) -> SimilarityMatch<T> {
        SimilarityMatch {
            record: self.record.clone(),
            similarity: self.similarity,
        }
    }
}

/// Calculate the Levenshtein distance between two strings
///
/// Counts the single-character insertions, deletions and substitutions needed
/// to turn `a` into `b`. Characters are compared as-is; callers normalize case.
///
/// # Examples
/// ```
/// use recipe_matcher::similarity::levenshtein_distance;
///
/// assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
/// assert_eq!(levenshtein_distance("", "abc"), 3);
/// ```
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    // Keep the shorter string on the row axis.
    let (long, short) = if a_chars.len() >= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for i in 1..=long.len() {
        curr[0] = i;
        for j in 1..=short.len() {
            let cost = if long[i - 1] == short[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Calculate a 0-100 similarity score between two strings
///
/// Both strings are trimmed and lowercased first. Equal strings score exactly
/// 100 (two blank strings included); otherwise a blank side scores 0.
///
/// # Examples
/// ```
/// use recipe_matcher::similarity::calculate_similarity;
///
/// assert_eq!(calculate_similarity("Tomato Soup", " tomato soup "), 100.0);
/// assert_eq!(calculate_similarity("", "abc"), 0.0);
/// assert!(calculate_similarity("Chicken Curry", "Chicken Curyy") > 80.0);
/// ```
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    let a_norm = normalize(a);
    let b_norm = normalize(b);

    if a_norm == b_norm {
        return MAX_SIMILARITY;
    }

    if a_norm.is_empty() || b_norm.is_empty() {
        return 0.0;
    }

    let distance = levenshtein_distance(&a_norm, &b_norm);
    let max_len = a_norm.chars().count().max(b_norm.chars().count());

    let similarity = (max_len.saturating_sub(distance) as f64 / max_len as f64) * MAX_SIMILARITY;
    similarity.clamp(0.0, MAX_SIMILARITY)
}

/// Similarity between two possibly absent names
///
/// An absent name on either side scores 0, even against another absent name.
pub fn similarity_of_names(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => calculate_similarity(a, b),
        _ => 0.0,
    }
}

/// Range of normalized name lengths, in characters, that can score at least
/// `min_similarity` against `search_term`
///
/// Edit distance is never smaller than the length difference, so a name
/// outside `(min, max)` cannot reach the score. `None` as the upper bound
/// means any length qualifies, which is the case for a zero minimum.
///
/// # Examples
/// ```
/// use recipe_matcher::similarity::name_length_bounds;
///
/// assert_eq!(name_length_bounds("Pasta", 95.0), (4, Some(6)));
/// assert_eq!(name_length_bounds("Pasta", 0.0), (0, None));
/// ```
pub fn name_length_bounds(search_term: &str, min_similarity: f64) -> (usize, Option<usize>) {
    let len = normalize(search_term).chars().count() as f64;
    let ratio = (min_similarity / MAX_SIMILARITY).clamp(0.0, 1.0);

    if ratio.is_nan() || ratio <= 0.0 {
        return (0, None);
    }

    // Rounded outward so no qualifying length is cut off
    let min = (len * ratio).floor() as usize;
    let max = (len / ratio).ceil() as usize;
    (min, Some(max))
}

/// Find the record whose name is most similar to `search_term`
///
/// Only records scoring at least `threshold` are considered. Records without a
/// name are skipped, and on equal scores the earliest record wins. Returns
/// `None` for a blank search term or when nothing reaches the threshold.
///
/// A threshold of 0 accepts any named record: the first one is returned even
/// when it scores 0, and later records replace it only with a higher score.
///
/// # Examples
/// ```
/// use recipe_matcher::similarity::find_best_match;
///
/// let recipes = vec!["Pasta".to_string(), "Pastas".to_string()];
/// let best = find_best_match("pasta", &recipes, 95.0).unwrap();
/// assert_eq!(best.record, "Pasta");
/// assert_eq!(best.similarity, 100.0);
/// ```
pub fn find_best_match<'a, T: Named>(
    search_term: &str,
    records: &'a [T],
    threshold: f64,
) -> Option<SimilarityMatch<&'a T>> {
    if search_term.trim().is_empty() || records.is_empty() {
        return None;
    }

    let mut best: Option<SimilarityMatch<&'a T>> = None;

    for record in records {
        let name = match record.name() {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };

        let similarity = calculate_similarity(search_term, name);
        let beats_best = best
            .as_ref()
            .map_or(true, |current| similarity > current.similarity);

        if similarity >= threshold && beats_best {
            trace!(candidate = %name, similarity, "New best match");
            best = Some(SimilarityMatch { record, similarity });

            if similarity >= MAX_SIMILARITY {
                break;
            }
        }
    }

    best
}

/// Score every record against `search_term`, keep those at or above
/// `min_similarity`, and order them most similar first
///
/// Records without a name are scored as the empty string rather than skipped.
/// Equal scores keep their input order.
///
/// # Examples
/// ```
/// use recipe_matcher::similarity::filter_and_sort_by_similarity;
///
/// let recipes = vec!["Soup".to_string(), "Pastaa".to_string(), "Pasta".to_string()];
/// let ranked = filter_and_sort_by_similarity("Pasta", &recipes, 0.0);
/// assert_eq!(ranked.len(), 3);
/// assert_eq!(ranked[0].record, "Pasta");
/// ```
pub fn filter_and_sort_by_similarity<'a, T: Named>(
    search_term: &str,
    records: &'a [T],
    min_similarity: f64,
) -> Vec<SimilarityMatch<&'a T>> {
    if search_term.trim().is_empty() || records.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<SimilarityMatch<&'a T>> = records
        .iter()
        .map(|record| SimilarityMatch {
            record,
            similarity: calculate_similarity(search_term, record.name().unwrap_or("")),
        })
        .filter(|m| m.similarity >= min_similarity)
        .collect();

    // sort_by is stable, so ties keep input order
    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });

    matches
}
