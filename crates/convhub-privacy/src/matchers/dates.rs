use lazy_static::lazy_static;
use regex::Regex;

use super::{longest_non_overlapping, PatternMatcher};
use convhub_core::{CategoryId, Match, MatcherError};

const CONFIDENCE: f32 = 0.6;

const DAY: &str = r"(?:0?[1-9]|[12][0-9]|3[01])";
const MONTH_NAME: &str = r"(?:januari|februari|maart|april|mei|juni|juli|augustus|september|oktober|november|december|jan|feb|mrt|apr|jun|jul|aug|sept|sep|okt|nov|dec)";

lazy_static! {
    static ref NUMERIC: Regex = Regex::new(&format!(
        r"\b{DAY}[-/.](?:0?[1-9]|1[0-2])[-/.](?:[0-9]{{4}}|[0-9]{{2}})\b"
    ))
    .unwrap();
    static ref ISO: Regex =
        Regex::new(r"\b[0-9]{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12][0-9]|3[01])\b").unwrap();
    static ref WRITTEN: Regex = Regex::new(&format!(
        r"(?i)\b{DAY}\s+{MONTH_NAME}\b\.?(?:\s+[0-9]{{4}}\b)?"
    ))
    .unwrap();
}

/// Calendar dates such as birth dates
pub struct DateMatcher;

impl PatternMatcher for DateMatcher {
    fn category(&self) -> CategoryId {
        CategoryId::Dates
    }

    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError> {
        let candidates = [&*NUMERIC, &*ISO, &*WRITTEN]
            .into_iter()
            .flat_map(|regex| regex.find_iter(text))
            .map(|m| Match::new(text, m.start(), m.end(), CategoryId::Dates, CONFIDENCE))
            .collect();

        Ok(longest_non_overlapping(candidates))
    }
}
