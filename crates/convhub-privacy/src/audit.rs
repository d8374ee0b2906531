//! Audit side channel for the redaction engine
//!
//! Records describe what was filtered (category and length of each span) and
//! which matchers failed. They never contain the matched text itself. Sinks
//! receive at most one record per `redact` call and only ever append.

use serde::Serialize;
use std::sync::Mutex;
use time::OffsetDateTime;
use tracing::{info, warn};

use convhub_core::{CategoryId, MatcherError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredSpan {
    pub category: CategoryId,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatcherFailure {
    pub category: CategoryId,
    pub reason: String,
}

impl From<&MatcherError> for MatcherFailure {
    fn from(error: &MatcherError) -> Self {
        Self {
            category: error.category(),
            reason: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    #[serde(with = "time::serde::timestamp")]
    pub recorded_at: OffsetDateTime,
    pub filtered: Vec<FilteredSpan>,
    pub failures: Vec<MatcherFailure>,
}

impl AuditRecord {
    pub fn new(filtered: Vec<FilteredSpan>, failures: Vec<MatcherFailure>) -> Self {
        Self {
            recorded_at: OffsetDateTime::now_utc(),
            filtered,
            failures,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty() && self.failures.is_empty()
    }

    /// Compact `category:length` list, e.g. `bsn:9,email:14`
    pub fn span_summary(&self) -> String {
        self.filtered
            .iter()
            .map(|s| format!("{}:{}", s.category, s.length))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Receiver of audit records; must tolerate concurrent callers
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord);
}

/// Emits one structured log line per record on the `privacy_audit` target
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: AuditRecord) {
        if record.failures.is_empty() {
            info!(
                target: "privacy_audit",
                spans = record.filtered.len(),
                filtered = %record.span_summary(),
                "Privacy filter applied"
            );
        } else {
            let failures = record
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.category, f.reason))
                .collect::<Vec<_>>()
                .join("; ");
            warn!(
                target: "privacy_audit",
                spans = record.filtered.len(),
                filtered = %record.span_summary(),
                failures = %failures,
                "Privacy filter skipped failing matchers"
            );
        }
    }
}

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: AuditRecord) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _record: AuditRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_span_summary() {
        let record = AuditRecord::new(
            vec![
                FilteredSpan {
                    category: CategoryId::Bsn,
                    length: 9,
                },
                FilteredSpan {
                    category: CategoryId::Email,
                    length: 14,
                },
            ],
            Vec::new(),
        );
        assert_eq!(record.span_summary(), "bsn:9,email:14");
        assert!(!record.is_empty());
    }

    #[test]
    fn test_memory_sink_concurrent_appends() {
        let sink = Arc::new(MemoryAuditSink::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        sink.record(AuditRecord::new(Vec::new(), Vec::new()));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sink.records().len(), 200);
    }

    #[test]
    fn test_failure_from_matcher_error() {
        let error = MatcherError::Failed {
            category: CategoryId::Phone,
            reason: "boom".to_string(),
        };
        let failure = MatcherFailure::from(&error);
        assert_eq!(failure.category, CategoryId::Phone);
        assert!(failure.reason.contains("boom"));
    }

    #[test]
    fn test_record_serialization_has_no_raw_text() {
        let record = AuditRecord::new(
            vec![FilteredSpan {
                category: CategoryId::Bsn,
                length: 9,
            }],
            Vec::new(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["filtered"][0]["category"], "bsn");
        assert_eq!(json["filtered"][0]["length"], 9);
        assert!(json["recorded_at"].is_number());
    }
}
