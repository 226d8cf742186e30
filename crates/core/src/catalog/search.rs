//! Normalized substring search terms.
//!
//! List endpoints filter by a caller-supplied query string over an explicit
//! list of searchable fields. The term is normalized once here; the
//! persistence layer folds it over its typed column list.

use serde::{Deserialize, Serialize};

/// A normalized, non-empty substring search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Parses a raw query string; whitespace-only input yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the normalized term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match over the given field values.
    ///
    /// Mirrors the SQL `ILIKE '%term%'` predicate the repositories build, so
    /// in-memory filtering stays consistent with the database.
    #[must_use]
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        let needle = self.0.to_lowercase();
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl std::fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let term = SearchTerm::parse("  jabón  ").unwrap();
        assert_eq!(term.as_str(), "jabón");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(SearchTerm::parse("").is_none());
        assert!(SearchTerm::parse("   ").is_none());
    }

    #[test]
    fn test_matches_any_case_insensitive() {
        let term = SearchTerm::parse("perez").unwrap();
        assert!(term.matches_any(&["PEREZ", "MARIA"]));
        assert!(term.matches_any(&["juan", "Lopez Perez"]));
        assert!(!term.matches_any(&["GOMEZ", "ANA"]));
    }

    #[test]
    fn test_matches_substring() {
        let term = SearchTerm::parse("017").unwrap();
        assert!(term.matches_any(&["F-0017"]));
    }
}
