use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use convhub_config::Config;
use convhub_privacy::Redactor;

use super::{read_input, resolve_policy};

pub fn handle(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let input = read_input(path.as_deref())?;

    let redactor = Redactor::with_options(&config.privacy.matcher_options());
    let policy = resolve_policy(config, &redactor)?;

    let (value, summary) = redactor
        .walk_bytes(input.as_bytes(), &policy)
        .context("Failed to filter JSON document")?;

    info!(
        filtered = summary.values().sum::<usize>(),
        "Filtered JSON document"
    );
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
