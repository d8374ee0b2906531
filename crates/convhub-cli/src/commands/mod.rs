pub mod config;
pub mod redact;
pub mod serve;
pub mod walk;

use anyhow::Result;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use convhub_config::Config;
use convhub_core::FilterPolicy;
use convhub_privacy::Redactor;

/// Load the config from `path`, or from the default location
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Resolve the policy for a one-off command
pub fn resolve_policy(config: &Config, redactor: &Redactor) -> Result<FilterPolicy> {
    if !config.privacy.enabled {
        warn!("Privacy filtering is disabled in config, output is unchanged");
        return Ok(FilterPolicy::disabled());
    }
    let policy = config.privacy.resolve_policy()?;
    redactor.check_policy(&policy)?;
    Ok(policy)
}

/// Read a file, or stdin when `path` is `None` or `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convhub_core::CategoryId;

    #[test]
    fn test_resolve_policy_disabled() {
        let mut config = Config::default();
        config.privacy.enabled = false;
        let policy = resolve_policy(&config, &Redactor::new()).unwrap();
        assert!(policy.enabled_categories().is_empty());
    }

    #[test]
    fn test_resolve_policy_rejects_sensitive_replacement() {
        let mut config = Config::default();
        config.privacy.replacement_text = "info@example.org".to_string();
        assert!(resolve_policy(&config, &Redactor::new()).is_err());
    }

    #[test]
    fn test_resolve_policy_uses_filters() {
        let mut config = Config::default();
        config.privacy.filters.set(CategoryId::Dates, true);
        let policy = resolve_policy(&config, &Redactor::new()).unwrap();
        assert!(policy.is_enabled(CategoryId::Dates));
    }

    #[test]
    fn test_read_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "bel 0612345678").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "bel 0612345678");
    }
}
