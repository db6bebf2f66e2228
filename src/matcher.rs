//! # Recipe Matcher Service
//!
//! Configured entry point used by request handlers. It decides whether an
//! existing recipe can be reused for a requested dish instead of generating a
//! new one, and serves similarity-ranked, paginated searches.

use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use crate::config::MatchingConfig;
use crate::observability;
use crate::similarity::{filter_and_sort_by_similarity, find_best_match, Named, SimilarityMatch};
use crate::validation::validate_recipe_name;

/// Outcome of looking up a dish among existing recipes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum LookupDecision<R> {
    /// An existing recipe is similar enough to be reused
    Reuse(SimilarityMatch<R>),
    /// No existing recipe qualifies; a new one should be generated
    Generate,
}

impl<R> LookupDecision<R> {
    pub fn is_reuse(&self) -> bool {
        matches!(self, LookupDecision::Reuse(_))
    }

    /// The matched recipe, if any
    pub fn into_match(self) -> Option<SimilarityMatch<R>> {
        match self {
            LookupDecision::Reuse(m) => Some(m),
            LookupDecision::Generate => None,
        }
    }
}

impl<T: Clone> LookupDecision<&T> {
    /// Convert a borrowed decision into one that owns its recipe
    pub fn cloned(self) -> LookupDecision<T> {
        match self {
            LookupDecision::Reuse(m) => LookupDecision::Reuse(m.cloned()),
            LookupDecision::Generate => LookupDecision::Generate,
        }
    }
}

/// Pagination window for a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Number of ranked results to skip
    pub offset: usize,
    /// Page size; `None` uses the configured search limit
    pub limit: Option<usize>,
}

/// One page of ranked search results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage<R> {
    /// Number of results above the minimum similarity, before pagination
    pub total: usize,
    /// Offset this page starts at
    pub offset: usize,
    /// Results on this page, most similar first
    pub results: Vec<SimilarityMatch<R>>,
}

impl<T: Clone> SearchPage<&T> {
    /// Convert a borrowed page into one that owns its recipes
    pub fn cloned(self) -> SearchPage<T> {
        SearchPage {
            total: self.total,
            offset: self.offset,
            results: self.results.into_iter().map(SimilarityMatch::cloned).collect(),
        }
    }
}

/// Similarity matcher bound to a [`MatchingConfig`]
///
/// Holds only immutable settings, so one instance can be shared across
/// handlers behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RecipeMatcher {
    config: MatchingConfig,
}

impl RecipeMatcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Decide whether `dish_name` can reuse one of `candidates`
    ///
    /// Blank or overlong dish names always lead to [`LookupDecision::Generate`].
    pub fn find_existing<'a, T: Named>(
        &self,
        dish_name: &str,
        candidates: &'a [T],
    ) -> LookupDecision<&'a T> {
        let start = Instant::now();

        let dish_name = match validate_recipe_name(dish_name) {
            Ok(name) => name,
            Err(reason) => {
                debug!(reason, "Dish name rejected, recipe must be generated");
                observability::record_match_lookup(false, candidates.len(), None, start.elapsed());
                return LookupDecision::Generate;
            }
        };

        let best = find_best_match(dish_name, candidates, self.config.match_threshold);
        let similarity = best.as_ref().map(|m| m.similarity);

        debug!(
            dish_name = %dish_name,
            candidates = candidates.len(),
            threshold = self.config.match_threshold,
            similarity = ?similarity,
            reused = best.is_some(),
            "Recipe lookup completed"
        );
        observability::record_match_lookup(
            best.is_some(),
            candidates.len(),
            similarity,
            start.elapsed(),
        );

        match best {
            Some(m) => LookupDecision::Reuse(m),
            None => LookupDecision::Generate,
        }
    }

    /// Rank `records` by similarity to `term` and return one page
    pub fn search<'a, T: Named>(
        &self,
        term: &str,
        records: &'a [T],
        request: SearchRequest,
    ) -> SearchPage<&'a T> {
        let start = Instant::now();

        let ranked = filter_and_sort_by_similarity(term, records, self.config.min_similarity);
        let total = ranked.len();
        let limit = request
            .limit
            .unwrap_or(self.config.search_limit)
            .min(self.config.search_limit);

        let results: Vec<_> = ranked
            .into_iter()
            .skip(request.offset)
            .take(limit)
            .collect();

        debug!(
            term = %term,
            candidates = records.len(),
            total,
            offset = request.offset,
            returned = results.len(),
            "Recipe search completed"
        );
        observability::record_search(records.len(), results.len(), start.elapsed());

        SearchPage {
            total,
            offset: request.offset,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_existing_reuses_close_match() {
        let matcher = RecipeMatcher::default();
        let recipes = names(&["Beef Stew", "Tomato Soup"]);

        let decision = matcher.find_existing(" tomato soup ", &recipes);
        assert!(decision.is_reuse());
        let m = decision.into_match().unwrap();
        assert_eq!(m.record, "Tomato Soup");
        assert_eq!(m.similarity, 100.0);
    }

    #[test]
    fn test_find_existing_generates_below_threshold() {
        let matcher = RecipeMatcher::default();
        let recipes = names(&["Chicken Curry"]);

        // 92.3 is under the default 95 threshold
        assert_eq!(
            matcher.find_existing("Chicken Curyy", &recipes),
            LookupDecision::Generate
        );
    }

    #[test]
    fn test_find_existing_respects_configured_threshold() {
        let matcher = RecipeMatcher::new(MatchingConfig {
            match_threshold: 90.0,
            ..Default::default()
        });
        let recipes = names(&["Chicken Curry"]);

        assert!(matcher.find_existing("Chicken Curyy", &recipes).is_reuse());
    }

    #[test]
    fn test_find_existing_rejects_invalid_dish_names() {
        let matcher = RecipeMatcher::new(MatchingConfig {
            match_threshold: 0.0,
            ..Default::default()
        });
        let recipes = names(&["Pasta"]);

        assert_eq!(matcher.find_existing("   ", &recipes), LookupDecision::Generate);
        assert_eq!(
            matcher.find_existing(&"x".repeat(300), &recipes),
            LookupDecision::Generate
        );
    }

    #[test]
    fn test_zero_threshold_reuses_first_named_candidate() {
        let matcher = RecipeMatcher::new(MatchingConfig {
            match_threshold: 0.0,
            ..Default::default()
        });
        let recipes = names(&["", "xyz", "qrs"]);

        let m = matcher.find_existing("abc", &recipes).into_match().unwrap();
        assert_eq!(m.record, "xyz");
        assert_eq!(m.similarity, 0.0);
    }

    #[test]
    fn test_search_paginates_ranked_results() {
        let matcher = RecipeMatcher::default();
        let recipes = names(&["Soup", "Pastaa", "Pasta", "Pastas"]);

        let page = matcher.search(
            "Pasta",
            &recipes,
            SearchRequest {
                offset: 1,
                limit: Some(2),
            },
        );
        assert_eq!(page.total, 4);
        assert_eq!(page.offset, 1);
        let returned: Vec<&str> = page.results.iter().map(|m| m.record.as_str()).collect();
        // "Pastaa" and "Pastas" tie, so input order is kept
        assert_eq!(returned, vec!["Pastaa", "Pastas"]);
    }

    #[test]
    fn test_search_caps_limit_at_configured_maximum() {
        let matcher = RecipeMatcher::new(MatchingConfig {
            search_limit: 2,
            ..Default::default()
        });
        let recipes = names(&["Pasta", "Pastas", "Pastaa", "Pastry"]);

        let page = matcher.search(
            "Pasta",
            &recipes,
            SearchRequest {
                offset: 0,
                limit: Some(50),
            },
        );
        assert_eq!(page.total, 4);
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn test_search_offset_past_end() {
        let matcher = RecipeMatcher::default();
        let recipes = names(&["Pasta"]);

        let page = matcher.search(
            "Pasta",
            &recipes,
            SearchRequest {
                offset: 5,
                limit: None,
            },
        );
        assert_eq!(page.total, 1);
        assert!(page.results.is_empty());
    }
}
