//! # Recipe Matcher
//!
//! Fuzzy recipe-name matching for the recipe service. Before a dish is sent to
//! the AI generator, its name is compared against stored recipes so a close
//! enough existing recipe can be reused instead.

pub mod config;
pub mod db;
pub mod errors;
pub mod matcher;
pub mod observability;
pub mod observability_config;
pub mod similarity;
pub mod validation;

// Re-export types for easier access
pub use matcher::{LookupDecision, RecipeMatcher, SearchPage, SearchRequest};
pub use similarity::{
    calculate_similarity, filter_and_sort_by_similarity, find_best_match, levenshtein_distance,
    Named, SimilarityMatch,
};
