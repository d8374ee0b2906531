use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use convhub_config::Config;
use convhub_core::FilterResult;
use convhub_privacy::{MemoryAuditSink, Redactor};

use super::{read_input, resolve_policy};

pub fn handle(
    config: &Config,
    text: Option<String>,
    file: Option<PathBuf>,
    stats: bool,
    audit: bool,
) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => read_input(file.as_deref())?,
    };

    let (config, sink) = audit_config(config, audit);
    let mut redactor = Redactor::with_options(&config.privacy.matcher_options());
    if let Some(sink) = &sink {
        redactor = redactor.with_audit(sink.clone());
    }

    let policy = resolve_policy(&config, &redactor)?;
    let result = redactor.redact(&text, &policy);

    print!("{}", result.filtered_text);
    if !result.filtered_text.ends_with('\n') {
        println!();
    }

    if stats {
        eprint!("{}", format_stats(&result));
    }
    if let Some(sink) = sink {
        for record in sink.records() {
            eprintln!("{}", serde_json::to_string(&record)?);
        }
    }

    Ok(())
}

/// Config for this run, plus the sink collecting span records when auditing
fn audit_config(config: &Config, audit: bool) -> (Config, Option<Arc<MemoryAuditSink>>) {
    let mut config = config.clone();
    if !audit {
        return (config, None);
    }
    // Span records are only produced when content logging is on
    config.privacy.log_filtered_content = true;
    (config, Some(Arc::new(MemoryAuditSink::new())))
}

fn format_stats(result: &FilterResult) -> String {
    let mut out = String::new();
    if result.categories_filtered.is_empty() {
        out.push_str("Nothing filtered.\n");
    } else {
        out.push_str(&format!("Filtered {} span(s):\n", result.total()));
        for (category, count) in &result.categories_filtered {
            out.push_str(&format!("  {}: {}\n", category, count));
        }
    }
    if !result.skipped_categories.is_empty() {
        let skipped: Vec<_> = result
            .skipped_categories
            .iter()
            .map(|c| c.as_str())
            .collect();
        out.push_str(&format!("Skipped (matcher failed): {}\n", skipped.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use convhub_core::CategoryId;

    #[test]
    fn test_audit_config() {
        let (config, sink) = audit_config(&Config::default(), false);
        assert!(sink.is_none());
        assert!(!config.privacy.log_filtered_content);

        let (config, sink) = audit_config(&Config::default(), true);
        assert!(sink.is_some_and(|sink| sink.records().is_empty()));
        assert!(config.privacy.log_filtered_content);
    }

    #[test]
    fn test_format_stats() {
        let mut result = FilterResult::unchanged("x");
        result.categories_filtered.insert(CategoryId::Email, 2);
        result.categories_filtered.insert(CategoryId::Bsn, 1);

        assert_eq!(
            format_stats(&result),
            "Filtered 3 span(s):\n  bsn: 1\n  email: 2\n"
        );
    }

    #[test]
    fn test_format_stats_nothing() {
        let mut result = FilterResult::unchanged("x");
        result.skipped_categories.push(CategoryId::Names);
        assert_eq!(
            format_stats(&result),
            "Nothing filtered.\nSkipped (matcher failed): names\n"
        );
    }
}
