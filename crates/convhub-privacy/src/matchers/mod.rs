//! Per-category pattern matchers
//!
//! Every matcher is a pure function of its input text. Overlapping candidates
//! inside one matcher are resolved by [`longest_non_overlapping`]: the longest
//! span wins, and on equal length the earliest start wins. Identical spans keep
//! the higher confidence.

mod address;
mod bsn;
mod dates;
mod dictionary;
mod email;
mod financial;
mod health;
mod names;
mod phone;

pub use address::AddressMatcher;
pub use bsn::{passes_eleven_test, BsnMatcher};
pub use dates::DateMatcher;
pub use dictionary::DictionaryMatcher;
pub use email::EmailMatcher;
pub use financial::FinancialMatcher;
pub use health::{HealthDataMatcher, DEFAULT_HEALTH_KEYWORDS};
pub use names::NameMatcher;
pub use phone::PhoneMatcher;

use convhub_core::{CategoryId, Match, MatcherError};

/// Detects spans of one category of sensitive data
pub trait PatternMatcher: Send + Sync {
    /// Category reported on every match
    fn category(&self) -> CategoryId;

    /// Find non-overlapping matches in `text`
    fn detect(&self, text: &str) -> Result<Vec<Match>, MatcherError>;
}

/// Configurable dictionaries for the heuristic matchers
#[derive(Debug, Clone, Default)]
pub struct MatcherOptions {
    /// Added to the built-in health keyword list
    pub health_keywords: Vec<String>,
    /// Names that are always redacted (e.g. meeting participants)
    pub known_names: Vec<String>,
}

/// Exactly one matcher per category
pub struct MatcherSet {
    bsn: Box<dyn PatternMatcher>,
    phone: Box<dyn PatternMatcher>,
    email: Box<dyn PatternMatcher>,
    address: Box<dyn PatternMatcher>,
    financial: Box<dyn PatternMatcher>,
    names: Box<dyn PatternMatcher>,
    dates: Box<dyn PatternMatcher>,
    health_data: Box<dyn PatternMatcher>,
}

impl MatcherSet {
    pub fn new(options: &MatcherOptions) -> Self {
        Self {
            bsn: Box::new(BsnMatcher),
            phone: Box::new(PhoneMatcher),
            email: Box::new(EmailMatcher),
            address: Box::new(AddressMatcher),
            financial: Box::new(FinancialMatcher),
            names: Box::new(NameMatcher::new(&options.known_names)),
            dates: Box::new(DateMatcher),
            health_data: Box::new(HealthDataMatcher::new(&options.health_keywords)),
        }
    }

    pub fn get(&self, category: CategoryId) -> &dyn PatternMatcher {
        match category {
            CategoryId::Bsn => self.bsn.as_ref(),
            CategoryId::Phone => self.phone.as_ref(),
            CategoryId::Email => self.email.as_ref(),
            CategoryId::Address => self.address.as_ref(),
            CategoryId::Financial => self.financial.as_ref(),
            CategoryId::Names => self.names.as_ref(),
            CategoryId::Dates => self.dates.as_ref(),
            CategoryId::HealthData => self.health_data.as_ref(),
        }
    }

    /// Swap in a different matcher for the category it reports
    pub fn replace(&mut self, matcher: Box<dyn PatternMatcher>) {
        let slot = match matcher.category() {
            CategoryId::Bsn => &mut self.bsn,
            CategoryId::Phone => &mut self.phone,
            CategoryId::Email => &mut self.email,
            CategoryId::Address => &mut self.address,
            CategoryId::Financial => &mut self.financial,
            CategoryId::Names => &mut self.names,
            CategoryId::Dates => &mut self.dates,
            CategoryId::HealthData => &mut self.health_data,
        };
        *slot = matcher;
    }
}

impl Default for MatcherSet {
    fn default() -> Self {
        Self::new(&MatcherOptions::default())
    }
}

/// Keep the longest of overlapping candidates; earliest start on equal length.
/// Output is sorted by start.
pub fn longest_non_overlapping(mut candidates: Vec<Match>) -> Vec<Match> {
    candidates.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then(a.start.cmp(&b.start))
            .then(b.confidence.total_cmp(&a.confidence))
    });

    let mut kept: Vec<Match> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !kept.iter().any(|k| k.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }

    kept.sort_by_key(|m| m.start);
    kept
}

/// True when the span touches an ASCII letter or digit on either side
pub(crate) fn touches_alphanumeric(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.is_some_and(|c| c.is_ascii_alphanumeric())
        || after.is_some_and(|c| c.is_ascii_alphanumeric())
}
