use lazy_static::lazy_static;
use regex::Regex;

use super::{longest_non_overlapping, PatternMatcher};
use convhub_core::{CategoryId, Match, MatcherError};

const POSTAL_CONFIDENCE: f32 = 0.75;
const STREET_CONFIDENCE: f32 = 0.6;

const STREET: &str = r"[A-Z][a-z]+(?:straat|laan|weg|plein|gracht|kade|singel|dijk|hof|pad|steeg|dreef|markt|baan|park)";
const HOUSE_NUMBER: &str = r"[0-9]{1,5}(?:[ -]?[a-zA-Z])?";

lazy_static! {
    // Optional "Street 12a," before and a city name after the postal code
    static ref POSTAL: Regex = Regex::new(&format!(
        r"(?:\b{STREET}\s+{HOUSE_NUMBER},?\s+)?\b[1-9][0-9]{{3}}\s?(?P<letters>[A-Z]{{2}})\b(?:,?\s+[A-Z][a-z]+(?:[ -][A-Z][a-z]+)?)?"
    ))
    .unwrap();
    static ref STREET_NUMBER: Regex =
        Regex::new(&format!(r"\b{STREET}\s+{HOUSE_NUMBER}\b")).unwrap();
}

/// Dutch postal codes and street addresses
pub struct AddressMatcher;

impl PatternMatcher for AddressMatcher {
    fn category(&self) -> CategoryId {
        CategoryId::Address
    }

    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError> {
        let mut candidates = Vec::new();

        for caps in POSTAL.captures_iter(text) {
            // SA, SD and SS are never issued as postal code letters
            let letters = caps.name("letters").map(|m| m.as_str()).unwrap_or_default();
            if matches!(letters, "SA" | "SD" | "SS") {
                continue;
            }
            if let Some(whole) = caps.get(0) {
                candidates.push(Match::new(
                    text,
                    whole.start(),
                    whole.end(),
                    CategoryId::Address,
                    POSTAL_CONFIDENCE,
                ));
            }
        }

        for m in STREET_NUMBER.find_iter(text) {
            candidates.push(Match::new(
                text,
                m.start(),
                m.end(),
                CategoryId::Address,
                STREET_CONFIDENCE,
            ));
        }

        Ok(longest_non_overlapping(candidates))
    }
}
