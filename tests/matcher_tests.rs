#[cfg(test)]
mod tests {
    use recipe_matcher::config::MatchingConfig;
    use recipe_matcher::{LookupDecision, RecipeMatcher, SearchRequest};
    use std::sync::Arc;

    fn stored_recipes() -> Vec<String> {
        ["Spaghetti Carbonara", "Chicken Tikka Masala", "Tomato Soup", "Tomato Salad"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_reuse_decision_owns_recipe_after_clone() {
        let matcher = RecipeMatcher::default();
        let recipes = stored_recipes();

        let decision = matcher
            .find_existing("spaghetti carbonara", &recipes)
            .cloned();
        drop(recipes);

        match decision {
            LookupDecision::Reuse(m) => {
                assert_eq!(m.record, "Spaghetti Carbonara");
                assert_eq!(m.similarity, 100.0);
            }
            LookupDecision::Generate => panic!("expected an existing recipe to be reused"),
        }
    }

    #[test]
    fn test_unknown_dish_is_generated() {
        let matcher = RecipeMatcher::default();
        let recipes = stored_recipes();

        let decision = matcher.find_existing("Beef Wellington", &recipes);
        assert!(!decision.is_reuse());
        assert!(decision.into_match().is_none());
    }

    #[test]
    fn test_empty_store_generates() {
        let matcher = RecipeMatcher::default();
        let recipes: Vec<String> = Vec::new();

        assert_eq!(
            matcher.find_existing("Tomato Soup", &recipes),
            LookupDecision::Generate
        );
    }

    #[test]
    fn test_search_with_minimum_similarity() {
        let matcher = RecipeMatcher::new(MatchingConfig {
            min_similarity: 50.0,
            ..Default::default()
        });
        let recipes = stored_recipes();

        let page = matcher.search("tomato soup", &recipes, SearchRequest::default());
        let names: Vec<&str> = page.results.iter().map(|m| m.record.as_str()).collect();
        assert_eq!(names, vec!["Tomato Soup", "Tomato Salad"]);
        assert_eq!(page.total, 2);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_search_blank_term_is_empty() {
        let matcher = RecipeMatcher::default();
        let recipes = stored_recipes();

        let page = matcher.search("  ", &recipes, SearchRequest::default());
        assert_eq!(page.total, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_decision_serialization() {
        let matcher = RecipeMatcher::default();
        let recipes = stored_recipes();

        let reuse = matcher.find_existing("Tomato Soup", &recipes);
        let json = serde_json::to_value(&reuse).unwrap();
        assert_eq!(json["decision"], "reuse");
        assert_eq!(json["record"], "Tomato Soup");
        assert_eq!(json["similarity"], 100.0);

        let generate = matcher.find_existing("Paella", &recipes);
        let json = serde_json::to_value(&generate).unwrap();
        assert_eq!(json["decision"], "generate");
    }

    #[test]
    fn test_matcher_shared_across_threads() {
        let matcher = Arc::new(RecipeMatcher::default());
        let recipes = Arc::new(stored_recipes());

        let handles: Vec<_> = ["Tomato Soup", "Tomato Salad", "Paella"]
            .into_iter()
            .map(|dish| {
                let matcher = Arc::clone(&matcher);
                let recipes = Arc::clone(&recipes);
                std::thread::spawn(move || matcher.find_existing(dish, recipes.as_slice()).is_reuse())
            })
            .collect();

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![true, true, false]);
    }
}
