//! Redaction engine
//!
//! Runs the enabled matchers over a string, resolves overlaps between
//! categories and substitutes the replacement text.
//!
//! Cross-category overlaps are resolved deterministically. Overlapping
//! candidates are merged into one span covering all of them, so no part of a
//! detected value survives next to a placeholder. The merged span is
//! attributed to its best candidate, ranked by confidence (higher first), then
//! span length (longer first), then category priority (bsn > phone > email >
//! address > financial > names > dates > health_data), then start offset.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

use convhub_core::{CategoryId, FilterPolicy, FilterResult, Match, MatcherError, PolicyError};

use crate::audit::{AuditRecord, AuditSink, FilteredSpan, MatcherFailure, TracingAuditSink};
use crate::matchers::{MatcherOptions, MatcherSet};

pub struct Redactor {
    matchers: MatcherSet,
    audit: Arc<dyn AuditSink>,
}

impl Redactor {
    /// Built-in matchers, audit records go to `tracing`
    pub fn new() -> Self {
        Self::with_matchers(MatcherSet::default())
    }

    pub fn with_options(options: &MatcherOptions) -> Self {
        Self::with_matchers(MatcherSet::new(options))
    }

    pub fn with_matchers(matchers: MatcherSet) -> Self {
        Self {
            matchers,
            audit: Arc::new(TracingAuditSink),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn matchers(&self) -> &MatcherSet {
        &self.matchers
    }

    /// Reject policies whose replacement text would be detected again,
    /// which would break idempotence.
    pub fn check_policy(&self, policy: &FilterPolicy) -> Result<(), PolicyError> {
        let replacement = policy.replacement_text();
        for &category in policy.enabled_categories() {
            let Ok(found) = self.matchers.get(category).detect(replacement) else {
                continue;
            };
            if found
                .iter()
                .any(|m| m.confidence >= policy.confidence_threshold())
            {
                return Err(PolicyError::ReplacementIsSensitive(category));
            }
        }
        Ok(())
    }

    /// Surviving, non-overlapping matches sorted by start, plus the matcher
    /// failures encountered along the way.
    pub fn detect(&self, text: &str, policy: &FilterPolicy) -> (Vec<Match>, Vec<MatcherError>) {
        let mut candidates = Vec::new();
        let mut failures = Vec::new();

        if text.is_empty() {
            return (candidates, failures);
        }

        for &category in policy.enabled_categories() {
            match self.run_matcher(category, text) {
                Ok(found) => candidates.extend(
                    found
                        .into_iter()
                        .filter(|m| m.confidence >= policy.confidence_threshold()),
                ),
                Err(e) => {
                    warn!(category = %category, error = %e, "Matcher failed, skipping category");
                    failures.push(e);
                }
            }
        }

        (resolve_overlaps(text, candidates), failures)
    }

    /// Redact `text` according to `policy`
    pub fn redact(&self, text: &str, policy: &FilterPolicy) -> FilterResult {
        if text.is_empty() || policy.enabled_categories().is_empty() {
            return FilterResult::unchanged(text);
        }

        let (selected, failures) = self.detect(text, policy);

        let mut filtered_text = String::with_capacity(text.len());
        let mut categories_filtered = BTreeMap::new();
        let mut last_end = 0;

        for span in &selected {
            filtered_text.push_str(&text[last_end..span.start]);
            filtered_text.push_str(policy.replacement_text());
            *categories_filtered.entry(span.category).or_insert(0) += 1;
            last_end = span.end;
        }
        filtered_text.push_str(&text[last_end..]);

        let filtered = if policy.log_filtered_content() {
            selected
                .iter()
                .map(|m| FilteredSpan {
                    category: m.category,
                    length: m.matched_text.chars().count(),
                })
                .collect()
        } else {
            Vec::new()
        };
        let record = AuditRecord::new(filtered, failures.iter().map(MatcherFailure::from).collect());
        if !record.is_empty() {
            self.audit.record(record);
        }

        FilterResult {
            filtered_text,
            categories_filtered,
            skipped_categories: failures.iter().map(MatcherError::category).collect(),
        }
    }

    /// Run one matcher and reject spans that do not fit the text
    fn run_matcher(&self, category: CategoryId, text: &str) -> Result<Vec<Match>, MatcherError> {
        let found = self.matchers.get(category).detect(text)?;

        let invalid = found.iter().find(|m| {
            m.start >= m.end
                || m.end > text.len()
                || !text.is_char_boundary(m.start)
                || !text.is_char_boundary(m.end)
        });
        if let Some(m) = invalid {
            return Err(MatcherError::Failed {
                category,
                reason: format!("span {}..{} is outside the text", m.start, m.end),
            });
        }

        Ok(found
            .into_iter()
            .map(|mut m| {
                // Category is owned by the slot, not by what the matcher reports
                m.category = category;
                m
            })
            .collect())
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

/// Ranking used to attribute a merged span; `Less` is the better candidate
fn rank(a: &Match, b: &Match) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| a.start.cmp(&b.start))
}

/// Merge overlapping candidates across categories, ordered by start
fn resolve_overlaps(text: &str, mut candidates: Vec<Match>) -> Vec<Match> {
    candidates.sort_by_key(|m| m.start);

    let mut resolved: Vec<Match> = Vec::with_capacity(candidates.len());
    let mut iter = candidates.into_iter();
    let Some(mut best) = iter.next() else {
        return resolved;
    };
    let (mut start, mut end) = (best.start, best.end);

    for candidate in iter {
        if candidate.start < end {
            end = end.max(candidate.end);
            if rank(&candidate, &best) == Ordering::Less {
                best = candidate;
            }
            continue;
        }
        resolved.push(Match::new(text, start, end, best.category, best.confidence));
        (start, end) = (candidate.start, candidate.end);
        best = candidate;
    }
    resolved.push(Match::new(text, start, end, best.category, best.confidence));

    resolved
}
