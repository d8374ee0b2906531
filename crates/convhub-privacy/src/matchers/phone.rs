use lazy_static::lazy_static;
use regex::Regex;

use super::{touches_alphanumeric, PatternMatcher};
use convhub_core::{CategoryId, Match, MatcherError};

const CONFIDENCE: f32 = 0.9;

lazy_static! {
    // Prefix plus nine digits, single spaces or hyphens allowed between digits
    static ref PHONE: Regex = Regex::new(r"(?:\+31|0031|0)(?:[ -]?[0-9]){9}").unwrap();
}

/// Dutch landline and mobile numbers
pub struct PhoneMatcher;

impl PhoneMatcher {
    /// Accepts `0[1-9]\d{8}`, `+31[1-9]\d{8}` and `0031[1-9]\d{8}` after
    /// separators are removed.
    fn is_valid(candidate: &str) -> bool {
        let normalized: String = candidate
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();

        let subscriber = if let Some(rest) = normalized.strip_prefix("+31") {
            rest
        } else if let Some(rest) = normalized.strip_prefix("0031") {
            rest
        } else if let Some(rest) = normalized.strip_prefix('0') {
            rest
        } else {
            return false;
        };

        subscriber.len() == 9
            && subscriber.bytes().all(|b| b.is_ascii_digit())
            && !subscriber.starts_with('0')
    }
}

impl PatternMatcher for PhoneMatcher {
    fn category(&self) -> CategoryId {
        CategoryId::Phone
    }

    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError> {
        let mut matches = Vec::new();
        let mut pos = 0;

        while let Some(m) = PHONE.find_at(text, pos) {
            if !touches_alphanumeric(text, m.start(), m.end()) && Self::is_valid(m.as_str()) {
                matches.push(Match::new(text, m.start(), m.end(), CategoryId::Phone, CONFIDENCE));
                pos = m.end();
            } else {
                // A rejected candidate may hide a number starting inside it.
                // Candidates start with an ASCII '0' or '+'.
                pos = m.start() + 1;
            }
        }

        Ok(matches)
    }
}
