use lazy_static::lazy_static;
use regex::Regex;

use super::{longest_non_overlapping, touches_alphanumeric, PatternMatcher};
use convhub_core::{CategoryId, Match, MatcherError};

const STANDALONE_CONFIDENCE: f32 = 0.95;
/// A 9-digit group inside a longer grouped number is less certain
const GROUPED_CONFIDENCE: f32 = 0.85;

const WEIGHTS: [i32; 9] = [9, 8, 7, 6, 5, 4, 3, 2, -1];

lazy_static! {
    // Digit runs with single space or dot separators, e.g. "1234.56.782"
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9](?:[ .]?[0-9])*").unwrap();
}

/// Dutch BSN eleven-test: weighted digit sum divisible by 11
pub fn passes_eleven_test(digits: &str) -> bool {
    let bytes = digits.as_bytes();
    if bytes.len() != 9 || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    if bytes.iter().all(|b| *b == b'0') {
        return false;
    }

    let sum: i32 = bytes
        .iter()
        .zip(WEIGHTS)
        .map(|(b, w)| i32::from(b - b'0') * w)
        .sum();
    sum.rem_euclid(11) == 0
}

/// Citizen service numbers that pass the eleven-test
pub struct BsnMatcher;

impl PatternMatcher for BsnMatcher {
    fn category(&self) -> CategoryId {
        CategoryId::Bsn
    }

    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError> {
        let mut matches = Vec::new();
        let mut grouped = Vec::new();
        if text.len() < 9 {
            return Ok(matches);
        }

        for run in DIGIT_RUN.find_iter(text) {
            if touches_alphanumeric(text, run.start(), run.end()) {
                continue;
            }

            let digits: String = run.as_str().chars().filter(char::is_ascii_digit).collect();
            if digits.len() == 9 {
                if passes_eleven_test(&digits) {
                    matches.push(Match::new(
                        text,
                        run.start(),
                        run.end(),
                        CategoryId::Bsn,
                        STANDALONE_CONFIDENCE,
                    ));
                }
                continue;
            }

            // Longer runs: consecutive groups holding exactly nine digits
            let mut groups = Vec::new();
            let mut offset = run.start();
            for group in run.as_str().split([' ', '.']) {
                groups.push((offset, group));
                offset += group.len() + 1;
            }

            for (i, &(start, _)) in groups.iter().enumerate() {
                let mut window = String::with_capacity(9);
                for &(group_start, group) in &groups[i..] {
                    window.push_str(group);
                    if window.len() > 9 {
                        break;
                    }
                    if window.len() == 9 {
                        if passes_eleven_test(&window) {
                            grouped.push(Match::new(
                                text,
                                start,
                                group_start + group.len(),
                                CategoryId::Bsn,
                                GROUPED_CONFIDENCE,
                            ));
                        }
                        break;
                    }
                }
            }
        }

        matches.extend(longest_non_overlapping(grouped));
        matches.sort_by_key(|m| m.start);
        Ok(matches)
    }
}
