//! Validation of recipe names and similarity thresholds

/// Maximum length of a recipe name, in characters
pub const MAX_RECIPE_NAME_LENGTH: usize = 255;

/// Validates a recipe name input
///
/// # Arguments
/// * `name` - The recipe name to validate
///
/// # Returns
/// * `Ok(&str)` - The trimmed recipe name if valid
/// * `Err(&str)` - Error type: "empty" or "too_long"
///
/// # Examples
/// ```
/// use recipe_matcher::validation::validate_recipe_name;
///
/// assert_eq!(validate_recipe_name("  Beef Stew "), Ok("Beef Stew"));
/// assert_eq!(validate_recipe_name(""), Err("empty"));
/// assert_eq!(validate_recipe_name(&"a".repeat(256)), Err("too_long"));
/// ```
pub fn validate_recipe_name(name: &str) -> Result<&str, &'static str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.chars().count() > MAX_RECIPE_NAME_LENGTH {
        return Err("too_long");
    }

    Ok(trimmed)
}

/// Validates a similarity threshold
///
/// # Returns
/// * `Ok(f64)` - The threshold if it lies within 0-100
/// * `Err(&str)` - Error type: "not_finite" or "out_of_range"
///
/// # Examples
/// ```
/// use recipe_matcher::validation::validate_similarity_threshold;
///
/// assert_eq!(validate_similarity_threshold(95.0), Ok(95.0));
/// assert_eq!(validate_similarity_threshold(101.0), Err("out_of_range"));
/// assert_eq!(validate_similarity_threshold(f64::NAN), Err("not_finite"));
/// ```
pub fn validate_similarity_threshold(value: f64) -> Result<f64, &'static str> {
    if !value.is_finite() {
        return Err("not_finite");
    }

    if !(0.0..=100.0).contains(&value) {
        return Err("out_of_range");
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_recipe_name() {
        assert_eq!(validate_recipe_name("Pasta"), Ok("Pasta"));
        assert_eq!(validate_recipe_name("\tPasta\n"), Ok("Pasta"));
        assert_eq!(validate_recipe_name("   "), Err("empty"));
        assert_eq!(validate_recipe_name(&"é".repeat(255)).map(|n| n.len()), Ok(510));
        assert_eq!(validate_recipe_name(&"é".repeat(256)), Err("too_long"));
    }

    #[test]
    fn test_validate_similarity_threshold() {
        assert_eq!(validate_similarity_threshold(0.0), Ok(0.0));
        assert_eq!(validate_similarity_threshold(100.0), Ok(100.0));
        assert_eq!(validate_similarity_threshold(-0.5), Err("out_of_range"));
        assert_eq!(validate_similarity_threshold(f64::INFINITY), Err("not_finite"));
    }
}
