//! Tag name rules.
//!
//! Tag names are unique case-insensitively. The registry itself accepts any
//! name; these checks run on the caller-facing side before a question is
//! created.

use crate::error::CoreError;

/// Minimum tag name length, in characters, after trimming.
pub const MIN_TAG_NAME_LEN: usize = 1;

/// Maximum tag name length, in characters, after trimming.
pub const MAX_TAG_NAME_LEN: usize = 15;

/// Minimum tags a question must declare.
pub const MIN_TAGS_PER_QUESTION: usize = 1;

/// Maximum tags a question may declare.
pub const MAX_TAGS_PER_QUESTION: usize = 5;

/// Default number of tags returned by the popular-tags sidebar query.
pub const DEFAULT_POPULAR_TAGS: i64 = 5;

/// Default number of tags returned for a user's most-used tags.
pub const DEFAULT_TOP_USER_TAGS: i64 = 3;

/// Trim surrounding whitespace from a tag name.
pub fn normalize_tag_name(name: &str) -> &str {
    name.trim()
}

/// The case-folded key two tag names are compared by.
pub fn tag_key(name: &str) -> String {
    normalize_tag_name(name).to_lowercase()
}

/// Validate a single tag name.
pub fn validate_tag_name(name: &str) -> Result<(), CoreError> {
    let len = normalize_tag_name(name).chars().count();
    if (MIN_TAG_NAME_LEN..=MAX_TAG_NAME_LEN).contains(&len) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Tag name must be {MIN_TAG_NAME_LEN}-{MAX_TAG_NAME_LEN} characters, got {len}: '{}'",
            normalize_tag_name(name)
        )))
    }
}

/// Validate the tag list for a new question.
///
/// Returns the trimmed names with case-insensitive duplicates removed (first
/// spelling wins), in input order.
pub fn validate_question_tags(names: &[String]) -> Result<Vec<String>, CoreError> {
    let mut seen = Vec::with_capacity(names.len());
    let mut unique = Vec::with_capacity(names.len());

    for name in names {
        validate_tag_name(name)?;
        let key = tag_key(name);
        if !seen.contains(&key) {
            seen.push(key);
            unique.push(normalize_tag_name(name).to_string());
        }
    }

    if unique.len() < MIN_TAGS_PER_QUESTION || unique.len() > MAX_TAGS_PER_QUESTION {
        return Err(CoreError::Validation(format!(
            "A question needs {MIN_TAGS_PER_QUESTION}-{MAX_TAGS_PER_QUESTION} tags, got {}",
            unique.len()
        )));
    }

    Ok(unique)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn key_ignores_case_and_padding() {
        assert_eq!(tag_key("  Python "), "python");
        assert_eq!(tag_key("SQL"), tag_key("sql"));
    }

    #[test]
    fn name_length_bounds() {
        assert!(validate_tag_name("a").is_ok());
        assert!(validate_tag_name("fifteen-chars-x").is_ok());
        assert_matches!(
            validate_tag_name("sixteen-chars-xx"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_tag_name("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn collapses_case_insensitive_duplicates() {
        let tags = validate_question_tags(&names(&["Python", "sql", "python "])).unwrap();
        assert_eq!(tags, vec!["Python".to_string(), "sql".to_string()]);
    }

    #[test]
    fn requires_between_one_and_five_tags() {
        assert_matches!(validate_question_tags(&[]), Err(CoreError::Validation(_)));
        assert!(validate_question_tags(&names(&["a", "b", "c", "d", "e"])).is_ok());
        assert_matches!(
            validate_question_tags(&names(&["a", "b", "c", "d", "e", "f"])),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn duplicates_do_not_count_toward_the_limit() {
        let tags = validate_question_tags(&names(&["a", "b", "c", "d", "e", "A"])).unwrap();
        assert_eq!(tags.len(), 5);
    }
}
