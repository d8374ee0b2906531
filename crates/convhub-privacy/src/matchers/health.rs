use super::{DictionaryMatcher, PatternMatcher};
use convhub_core::{CategoryId, Match, MatcherError};

const CONFIDENCE: f32 = 0.7;

/// Medical vocabulary seen in municipal intake conversations
pub const DEFAULT_HEALTH_KEYWORDS: &[&str] = &[
    "diagnose",
    "diagnoses",
    "medicatie",
    "medicijnen",
    "therapie",
    "therapeut",
    "psychiater",
    "psycholoog",
    "psychose",
    "huisarts",
    "depressie",
    "depressief",
    "burn-out",
    "angststoornis",
    "verslaving",
    "ggz",
    "opname",
    "ziekenhuis",
    "ziekte",
    "kanker",
    "diabetes",
    "autisme",
    "adhd",
    "zwanger",
    "zwangerschap",
];

/// Dictionary-based health data matcher
pub struct HealthDataMatcher {
    dictionary: DictionaryMatcher,
}

impl HealthDataMatcher {
    /// Built-in keywords plus `extra`
    pub fn new(extra: &[String]) -> Self {
        let terms: Vec<&str> = DEFAULT_HEALTH_KEYWORDS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
            .collect();

        Self {
            dictionary: DictionaryMatcher::new(CategoryId::HealthData, CONFIDENCE, &terms, true),
        }
    }
}

impl Default for HealthDataMatcher {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl PatternMatcher for HealthDataMatcher {
    fn category(&self) -> CategoryId {
        CategoryId::HealthData
    }

    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError> {
        self.dictionary.detect(text)
    }
}
