//! Free-text search terms for listings.
//!
//! Search is a literal, case-insensitive substring match. The raw term is
//! escaped for PostgreSQL `ILIKE` so user input such as `50%` or `snake_case`
//! matches those characters instead of acting as wildcards.

/// Escape character used in `ILIKE ... ESCAPE` clauses.
pub const LIKE_ESCAPE: char = '\\';

/// A trimmed, non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Build a term from optional caller input. Blank input means "no search".
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Self(t.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `%term%` pattern with `\`, `%` and `_` escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push(LIKE_ESCAPE);
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Convenience for the nullable `ILIKE` parameter listings bind.
pub fn like_pattern(raw: Option<&str>) -> Option<String> {
    SearchTerm::parse(raw).map(|t| t.like_pattern())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_no_search() {
        assert_eq!(SearchTerm::parse(None), None);
        assert_eq!(SearchTerm::parse(Some("")), None);
        assert_eq!(SearchTerm::parse(Some("   ")), None);
    }

    #[test]
    fn wraps_trimmed_term_in_wildcards() {
        let term = SearchTerm::parse(Some("  borrow checker ")).unwrap();
        assert_eq!(term.as_str(), "borrow checker");
        assert_eq!(term.like_pattern(), "%borrow checker%");
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(like_pattern(Some("50%")), Some("%50\\%%".to_string()));
        assert_eq!(
            like_pattern(Some("snake_case")),
            Some("%snake\\_case%".to_string())
        );
        assert_eq!(like_pattern(Some("a\\b")), Some("%a\\\\b%".to_string()));
    }

    #[test]
    fn regex_syntax_is_literal() {
        assert_eq!(
            like_pattern(Some("c++ (.*)")),
            Some("%c++ (.*)%".to_string())
        );
    }
}
