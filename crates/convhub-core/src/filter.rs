//! Match and result types shared by matchers and the redaction engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::CategoryId;

/// A detected span of sensitive data.
///
/// `start` and `end` are byte offsets into the scanned text and always lie on
/// char boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub category: CategoryId,
    pub matched_text: String,
    pub confidence: f32,
}

impl Match {
    pub fn new(text: &str, start: usize, end: usize, category: CategoryId, confidence: f32) -> Self {
        Self {
            start,
            end,
            category,
            matched_text: text[start..end].to_string(),
            confidence,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &Match) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Outcome of redacting one string
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub filtered_text: String,
    /// Substituted spans per category; categories without substitutions are absent
    pub categories_filtered: BTreeMap<CategoryId, usize>,
    /// Categories whose matcher failed during this call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_categories: Vec<CategoryId>,
}

impl FilterResult {
    pub fn unchanged(text: &str) -> Self {
        Self {
            filtered_text: text.to_string(),
            ..Default::default()
        }
    }

    /// Total number of substituted spans
    pub fn total(&self) -> usize {
        self.categories_filtered.values().sum()
    }
}
