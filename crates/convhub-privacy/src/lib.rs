//! Privacy filter engine for ConversationHub
//!
//! Detects Dutch personal data (BSN, phone numbers, email addresses, postal
//! addresses, financial data and optionally names, dates and health terms)
//! and replaces it with a placeholder, either in a single string or in every
//! string leaf of a JSON payload.
//!
//! The two entry points used by the rest of the application are [`redact`]
//! and [`walk`]. Both run on a shared default [`Redactor`]; build your own
//! with [`Redactor::with_options`] to use configured dictionaries or a
//! different audit sink.

pub mod audit;
pub mod matchers;
pub mod redactor;
pub mod walker;

pub use audit::{AuditRecord, AuditSink, MemoryAuditSink, NoopAuditSink, TracingAuditSink};
pub use matchers::{MatcherOptions, MatcherSet, PatternMatcher};
pub use redactor::Redactor;
pub use walker::CategoryCounts;

use lazy_static::lazy_static;
use serde_json::Value;

use convhub_core::{FilterPolicy, FilterResult, Result};

lazy_static! {
    static ref DEFAULT_REDACTOR: Redactor = Redactor::new();
}

/// Redact a single string with the built-in matchers
pub fn redact(text: &str, policy: &FilterPolicy) -> FilterResult {
    DEFAULT_REDACTOR.redact(text, policy)
}

/// Redact every string leaf of a JSON value with the built-in matchers
pub fn walk(value: &Value, policy: &FilterPolicy) -> Result<Value> {
    DEFAULT_REDACTOR.walk(value, policy)
}
