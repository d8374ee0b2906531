//! Filter policy domain model

use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::PolicyError;
use crate::CategoryId;

pub const DEFAULT_REPLACEMENT: &str = "[PRIVACY_FILTERED]";
pub const DEFAULT_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Resolved settings for one filtering pass.
///
/// Fields are private: once built the policy can only be read, so every
/// component downstream sees the same values for the whole pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterPolicy {
    enabled_categories: BTreeSet<CategoryId>,
    replacement_text: String,
    confidence_threshold: f32,
    log_filtered_content: bool,
    max_depth: usize,
}

impl FilterPolicy {
    pub fn new(
        enabled_categories: impl IntoIterator<Item = CategoryId>,
        replacement_text: impl Into<String>,
        confidence_threshold: f32,
        log_filtered_content: bool,
    ) -> Result<Self, PolicyError> {
        Self::builder()
            .categories(enabled_categories)
            .replacement_text(replacement_text)
            .confidence_threshold(confidence_threshold)
            .log_filtered_content(log_filtered_content)
            .build()
    }

    pub fn builder() -> FilterPolicyBuilder {
        FilterPolicyBuilder::default()
    }

    /// Policy that filters nothing
    pub fn disabled() -> Self {
        Self {
            enabled_categories: BTreeSet::new(),
            ..Self::default()
        }
    }

    pub fn enabled_categories(&self) -> &BTreeSet<CategoryId> {
        &self.enabled_categories
    }

    pub fn is_enabled(&self, category: CategoryId) -> bool {
        self.enabled_categories.contains(&category)
    }

    pub fn replacement_text(&self) -> &str {
        &self.replacement_text
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn log_filtered_content(&self) -> bool {
        self.log_filtered_content
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            enabled_categories: CategoryId::ALL
                .into_iter()
                .filter(CategoryId::is_default_enabled)
                .collect(),
            replacement_text: DEFAULT_REPLACEMENT.to_string(),
            confidence_threshold: DEFAULT_THRESHOLD,
            log_filtered_content: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Validating builder for [`FilterPolicy`]
#[derive(Debug, Clone)]
pub struct FilterPolicyBuilder {
    enabled_categories: BTreeSet<CategoryId>,
    replacement_text: String,
    confidence_threshold: f32,
    log_filtered_content: bool,
    max_depth: usize,
}

impl Default for FilterPolicyBuilder {
    fn default() -> Self {
        let defaults = FilterPolicy::default();
        Self {
            enabled_categories: defaults.enabled_categories,
            replacement_text: defaults.replacement_text,
            confidence_threshold: defaults.confidence_threshold,
            log_filtered_content: defaults.log_filtered_content,
            max_depth: defaults.max_depth,
        }
    }
}

impl FilterPolicyBuilder {
    /// Replace the enabled set entirely
    pub fn categories(mut self, categories: impl IntoIterator<Item = CategoryId>) -> Self {
        self.enabled_categories = categories.into_iter().collect();
        self
    }

    pub fn enable(mut self, category: CategoryId) -> Self {
        self.enabled_categories.insert(category);
        self
    }

    pub fn disable(mut self, category: CategoryId) -> Self {
        self.enabled_categories.remove(&category);
        self
    }

    pub fn replacement_text(mut self, text: impl Into<String>) -> Self {
        self.replacement_text = text.into();
        self
    }

    pub fn confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn log_filtered_content(mut self, log: bool) -> Self {
        self.log_filtered_content = log;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn build(self) -> Result<FilterPolicy, PolicyError> {
        let threshold = self.confidence_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(PolicyError::ThresholdOutOfRange(threshold));
        }
        if self.replacement_text.is_empty() {
            return Err(PolicyError::EmptyReplacement);
        }
        if self.max_depth == 0 {
            return Err(PolicyError::InvalidDepth);
        }

        Ok(FilterPolicy {
            enabled_categories: self.enabled_categories,
            replacement_text: self.replacement_text,
            confidence_threshold: threshold,
            log_filtered_content: self.log_filtered_content,
            max_depth: self.max_depth,
        })
    }
}
