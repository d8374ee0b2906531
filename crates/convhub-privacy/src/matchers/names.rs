use lazy_static::lazy_static;
use regex::Regex;

use super::{longest_non_overlapping, DictionaryMatcher, PatternMatcher};
use convhub_core::{CategoryId, Match, MatcherError};

const TITLED_CONFIDENCE: f32 = 0.5;
const KNOWN_NAME_CONFIDENCE: f32 = 0.8;

lazy_static! {
    // Only the name after the title is captured, the title itself stays readable
    static ref TITLED_NAME: Regex = Regex::new(
        r"(?x)
        \b(?i:meneer|mevrouw|mevr\.?|mw\.?|dhr\.?|de\s+heer|dokter|dr\.?|mr\.?)\s+
        (?P<name>
            (?:(?:van|de|der|den|ter|ten|het)\s+)*
            \p{Lu}[\p{Ll}'-]+
            (?:\s+(?:(?:van|de|der|den|ter|ten|het)\s+)*\p{Lu}[\p{Ll}'-]+)*
        )"
    )
    .unwrap();
}

/// Heuristic person-name matcher: names after a title plus configured names
pub struct NameMatcher {
    known: DictionaryMatcher,
}

impl NameMatcher {
    pub fn new(known_names: &[String]) -> Self {
        Self {
            known: DictionaryMatcher::new(
                CategoryId::Names,
                KNOWN_NAME_CONFIDENCE,
                known_names,
                false,
            ),
        }
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl PatternMatcher for NameMatcher {
    fn category(&self) -> CategoryId {
        CategoryId::Names
    }

    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError> {
        let mut candidates: Vec<Match> = TITLED_NAME
            .captures_iter(text)
            .filter_map(|caps| caps.name("name"))
            .map(|m| Match::new(text, m.start(), m.end(), CategoryId::Names, TITLED_CONFIDENCE))
            .collect();

        candidates.extend(self.known.detect(text)?);

        Ok(longest_non_overlapping(candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(matcher: &NameMatcher, text: &str) -> Vec<(String, f32)> {
        matcher
            .detect(text)
            .unwrap()
            .into_iter()
            .map(|m| (m.matched_text, m.confidence))
            .collect()
    }

    #[test]
    fn test_titled_names() {
        let matcher = NameMatcher::default();
        assert_eq!(
            names(&matcher, "Ik sprak met mevrouw Jansen gisteren"),
            vec![("Jansen".to_string(), 0.5)]
        );
        assert_eq!(
            names(&matcher, "Dhr. van der Berg was aanwezig"),
            vec![("van der Berg".to_string(), 0.5)]
        );
    }

    #[test]
    fn test_title_without_name() {
        let matcher = NameMatcher::default();
        assert!(names(&matcher, "de meneer was aardig").is_empty());
        assert!(names(&matcher, "mevrouw [PRIVACY_FILTERED]").is_empty());
    }

    #[test]
    fn test_known_names() {
        let matcher = NameMatcher::new(&["Fatima El Amrani".to_string(), "Pieter".to_string()]);
        assert_eq!(
            names(&matcher, "Fatima El Amrani en Pieter"),
            vec![
                ("Fatima El Amrani".to_string(), 0.8),
                ("Pieter".to_string(), 0.8)
            ]
        );
    }

    #[test]
    fn test_known_name_overlapping_titled_name() {
        let matcher = NameMatcher::new(&["Jansen-Smit".to_string()]);
        assert_eq!(
            names(&matcher, "mevrouw Jansen-Smit"),
            vec![("Jansen-Smit".to_string(), 0.8)]
        );
    }
}
