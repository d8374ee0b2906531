use lazy_static::lazy_static;
use regex::Regex;

use super::{longest_non_overlapping, PatternMatcher};
use convhub_core::{CategoryId, Match, MatcherError};

const IBAN_CONFIDENCE: f32 = 0.95;
const EURO_SIGN_CONFIDENCE: f32 = 0.85;
const KEYWORD_CONFIDENCE: f32 = 0.7;

const AMOUNT: &str = r"[0-9]+(?:\.[0-9]{3})*(?:,(?:[0-9]{2}|-))?";

lazy_static! {
    static ref IBAN: Regex = Regex::new(r"\bNL[0-9]{2} ?[A-Z]{4}(?: ?[0-9]){10}\b").unwrap();
    static ref EURO_SIGN: Regex = Regex::new(&format!(r"€\s?{AMOUNT}")).unwrap();
    static ref EURO_KEYWORD: Regex = Regex::new(&format!(
        r"(?i)\b{AMOUNT}\s?(?:euro|eur)\b|\beur\s?{AMOUNT}"
    ))
    .unwrap();
}

/// Bank account numbers and currency amounts
pub struct FinancialMatcher;

impl PatternMatcher for FinancialMatcher {
    fn category(&self) -> CategoryId {
        CategoryId::Financial
    }

    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError> {
        let rules: [(&Regex, f32); 3] = [
            (&IBAN, IBAN_CONFIDENCE),
            (&EURO_SIGN, EURO_SIGN_CONFIDENCE),
            (&EURO_KEYWORD, KEYWORD_CONFIDENCE),
        ];

        let candidates = rules
            .iter()
            .flat_map(|(regex, confidence)| {
                regex.find_iter(text).map(move |m| {
                    Match::new(text, m.start(), m.end(), CategoryId::Financial, *confidence)
                })
            })
            .collect();

        Ok(longest_non_overlapping(candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<(String, f32)> {
        FinancialMatcher
            .detect(text)
            .unwrap()
            .into_iter()
            .map(|m| (m.matched_text, m.confidence))
            .collect()
    }

    #[test]
    fn test_iban() {
        assert_eq!(
            detect("rekening NL91ABNA0417164300 graag"),
            vec![("NL91ABNA0417164300".to_string(), 0.95)]
        );
        assert_eq!(
            detect("NL91 ABNA 0417 1643 00"),
            vec![("NL91 ABNA 0417 1643 00".to_string(), 0.95)]
        );
    }

    #[test]
    fn test_euro_sign() {
        assert_eq!(
            detect("schuld van €1.250,50 open"),
            vec![("€1.250,50".to_string(), 0.85)]
        );
        assert_eq!(detect("€ 300,-"), vec![("€ 300,-".to_string(), 0.85)]);
    }

    #[test]
    fn test_keyword_amounts() {
        assert_eq!(
            detect("uitkering 1200 euro per maand"),
            vec![("1200 euro".to_string(), 0.7)]
        );
        assert_eq!(detect("EUR 45,00"), vec![("EUR 45,00".to_string(), 0.7)]);
    }

    #[test]
    fn test_overlapping_rules_keep_longest() {
        assert_eq!(
            detect("€ 100 euro"),
            vec![("100 euro".to_string(), 0.7)]
        );
    }

    #[test]
    fn test_plain_numbers_ignored() {
        assert!(detect("agendapunt 3 duurt 15 minuten").is_empty());
        assert!(detect("").is_empty());
    }
}
