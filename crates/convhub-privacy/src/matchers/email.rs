use lazy_static::lazy_static;
use regex::Regex;

use super::PatternMatcher;
use convhub_core::{CategoryId, Match, MatcherError};

const CONFIDENCE: f32 = 0.95;

lazy_static! {
    // Simplified local@domain.tld shape, not full RFC 5322
    static ref EMAIL: Regex =
        Regex::new(r"\b[\p{L}\p{N}._%+-]+@[\p{L}\p{N}.-]+\.\p{L}{2,}\b").unwrap();
}

pub struct EmailMatcher;

impl PatternMatcher for EmailMatcher {
    fn category(&self) -> CategoryId {
        CategoryId::Email
    }

    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError> {
        if !text.contains('@') {
            return Ok(Vec::new());
        }

        Ok(EMAIL
            .find_iter(text)
            .map(|m| Match::new(text, m.start(), m.end(), CategoryId::Email, CONFIDENCE))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        let found = EmailMatcher.detect("contact: test@x.nl").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "test@x.nl");
        assert_eq!(found[0].start, 9);
        assert_eq!(found[0].confidence, 0.95);
    }

    #[test]
    fn test_multiple_emails() {
        let found = EmailMatcher
            .detect("j.jansen@gemeente.nl, p.de-vries+intake@mail.example.com")
            .unwrap();
        let texts: Vec<_> = found.iter().map(|m| m.matched_text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["j.jansen@gemeente.nl", "p.de-vries+intake@mail.example.com"]
        );
    }

    #[test]
    fn test_non_ascii_local_part() {
        let found = EmailMatcher.detect("mail josé@gemeente.nl").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "josé@gemeente.nl");
    }

    #[test]
    fn test_not_an_email() {
        assert!(EmailMatcher.detect("user@localhost").unwrap().is_empty());
        assert!(EmailMatcher.detect("@ 10 uur").unwrap().is_empty());
        assert!(EmailMatcher.detect("").unwrap().is_empty());
    }
}
