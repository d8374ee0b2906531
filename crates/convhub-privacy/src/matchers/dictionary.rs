use regex::{Regex, RegexBuilder};

use super::PatternMatcher;
use convhub_core::{CategoryId, Match, MatcherError};

/// Whole-word matcher over a fixed list of terms.
///
/// The term list is compiled once. If compilation fails the matcher still
/// exists but reports the error from every `detect` call, so the engine can
/// skip the category instead of refusing to start.
pub struct DictionaryMatcher {
    category: CategoryId,
    confidence: f32,
    pattern: Option<Result<Regex, String>>,
}

impl DictionaryMatcher {
    pub fn new<S: AsRef<str>>(
        category: CategoryId,
        confidence: f32,
        terms: &[S],
        case_insensitive: bool,
    ) -> Self {
        let mut terms: Vec<&str> = terms
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .collect();
        // Longest first so alternation prefers "medicatiegebruik" over "medicatie"
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        terms.dedup();

        let pattern = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                    .case_insensitive(case_insensitive)
                    .build()
                    .map_err(|e| e.to_string()),
            )
        };

        Self {
            category,
            confidence,
            pattern,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }
}

impl PatternMatcher for DictionaryMatcher {
    fn category(&self) -> CategoryId {
        self.category
    }

    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError> {
        match &self.pattern {
            None => Ok(Vec::new()),
            Some(Err(reason)) => Err(MatcherError::InvalidPattern {
                category: self.category,
                reason: reason.clone(),
            }),
            Some(Ok(regex)) => Ok(regex
                .find_iter(text)
                .map(|m| Match::new(text, m.start(), m.end(), self.category, self.confidence))
                .collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_words_only() {
        let matcher =
            DictionaryMatcher::new(CategoryId::HealthData, 0.7, &["therapie"], true);
        let found = matcher.detect("Therapie en fysiotherapie").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "Therapie");
    }

    #[test]
    fn test_longest_term_preferred() {
        let matcher = DictionaryMatcher::new(
            CategoryId::HealthData,
            0.7,
            &["burn", "burn-out"],
            true,
        );
        let found = matcher.detect("na een burn-out").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "burn-out");
    }

    #[test]
    fn test_terms_are_escaped() {
        let matcher = DictionaryMatcher::new(CategoryId::Names, 0.8, &["a.b"], false);
        assert_eq!(matcher.detect("a.b").unwrap().len(), 1);
        assert!(matcher.detect("axb").unwrap().is_empty());
    }

    #[test]
    fn test_empty_dictionary() {
        let terms: [&str; 2] = ["", "  "];
        let matcher = DictionaryMatcher::new(CategoryId::Names, 0.8, &terms, false);
        assert!(matcher.is_empty());
        assert!(matcher.detect("Jansen").unwrap().is_empty());
    }

    #[test]
    fn test_broken_pattern_reports_error() {
        let matcher = DictionaryMatcher {
            category: CategoryId::HealthData,
            confidence: 0.7,
            pattern: Some(Err("compiled too big".to_string())),
        };
        match matcher.detect("tekst") {
            Err(MatcherError::InvalidPattern { category, reason }) => {
                assert_eq!(category, CategoryId::HealthData);
                assert_eq!(reason, "compiled too big");
            }
            other => panic!("expected invalid pattern, got {other:?}"),
        }
    }
}
