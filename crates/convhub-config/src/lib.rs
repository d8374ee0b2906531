use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use convhub_core::policy::{DEFAULT_MAX_DEPTH, DEFAULT_REPLACEMENT, DEFAULT_THRESHOLD};
use convhub_core::{CategoryId, FilterPolicy, PolicyError};
use convhub_privacy::MatcherOptions;

/// Static configuration for ConversationHub
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub privacy: PrivacyConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_replacement")]
    pub replacement_text: String,

    #[serde(default = "default_threshold")]
    pub confidence_threshold: f32,

    #[serde(default)]
    pub log_filtered_content: bool,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Added to the built-in health vocabulary
    #[serde(default)]
    pub health_keywords: Vec<String>,

    /// Names that are always filtered when `names` is enabled
    #[serde(default)]
    pub known_names: Vec<String>,

    #[serde(default)]
    pub filters: FilterFlags,
}

/// One switch per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterFlags {
    #[serde(default = "default_true")]
    pub bsn: bool,
    #[serde(default = "default_true")]
    pub phone: bool,
    #[serde(default = "default_true")]
    pub email: bool,
    #[serde(default = "default_true")]
    pub address: bool,
    #[serde(default = "default_true")]
    pub financial: bool,
    #[serde(default)]
    pub names: bool,
    #[serde(default)]
    pub dates: bool,
    #[serde(default)]
    pub health_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest JSON response body the privacy middleware will buffer
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_audio_days")]
    pub audio_files_days: u32,

    #[serde(default = "default_transcript_days")]
    pub transcripts_days: u32,

    #[serde(default = "default_export_days")]
    pub exports_days: u32,

    #[serde(default = "default_true")]
    pub auto_delete: bool,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            replacement_text: default_replacement(),
            confidence_threshold: default_threshold(),
            log_filtered_content: false,
            max_depth: default_max_depth(),
            health_keywords: Vec::new(),
            known_names: Vec::new(),
            filters: FilterFlags::default(),
        }
    }
}

impl Default for FilterFlags {
    fn default() -> Self {
        Self::from_categories(CategoryId::ALL.into_iter().filter(CategoryId::is_default_enabled))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            audio_files_days: default_audio_days(),
            transcripts_days: default_transcript_days(),
            exports_days: default_export_days(),
            auto_delete: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_replacement() -> String {
    DEFAULT_REPLACEMENT.to_string()
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_audio_days() -> u32 {
    30
}

fn default_transcript_days() -> u32 {
    90
}

fn default_export_days() -> u32 {
    7
}

impl FilterFlags {
    pub fn from_categories(categories: impl IntoIterator<Item = CategoryId>) -> Self {
        let mut flags = Self {
            bsn: false,
            phone: false,
            email: false,
            address: false,
            financial: false,
            names: false,
            dates: false,
            health_data: false,
        };
        for category in categories {
            *flags.flag_mut(category) = true;
        }
        flags
    }

    pub fn is_enabled(&self, category: CategoryId) -> bool {
        match category {
            CategoryId::Bsn => self.bsn,
            CategoryId::Phone => self.phone,
            CategoryId::Email => self.email,
            CategoryId::Address => self.address,
            CategoryId::Financial => self.financial,
            CategoryId::Names => self.names,
            CategoryId::Dates => self.dates,
            CategoryId::HealthData => self.health_data,
        }
    }

    pub fn set(&mut self, category: CategoryId, enabled: bool) {
        *self.flag_mut(category) = enabled;
    }

    pub fn enabled(&self) -> impl Iterator<Item = CategoryId> + '_ {
        CategoryId::ALL.into_iter().filter(|c| self.is_enabled(*c))
    }

    fn flag_mut(&mut self, category: CategoryId) -> &mut bool {
        match category {
            CategoryId::Bsn => &mut self.bsn,
            CategoryId::Phone => &mut self.phone,
            CategoryId::Email => &mut self.email,
            CategoryId::Address => &mut self.address,
            CategoryId::Financial => &mut self.financial,
            CategoryId::Names => &mut self.names,
            CategoryId::Dates => &mut self.dates,
            CategoryId::HealthData => &mut self.health_data,
        }
    }
}

impl PrivacyConfig {
    /// Build a fresh immutable policy from these settings
    pub fn resolve_policy(&self) -> Result<FilterPolicy, PolicyError> {
        FilterPolicy::builder()
            .categories(self.filters.enabled())
            .replacement_text(self.replacement_text.clone())
            .confidence_threshold(self.confidence_threshold)
            .log_filtered_content(self.log_filtered_content)
            .max_depth(self.max_depth)
            .build()
    }

    pub fn matcher_options(&self) -> MatcherOptions {
        MatcherOptions {
            health_keywords: self.health_keywords.clone(),
            known_names: self.known_names.clone(),
        }
    }
}

impl Config {
    /// Load config from default location or create default if not found,
    /// then apply environment overrides
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        let mut config = if path.exists() {
            Self::read(&path)?
        } else {
            let config = Config::default();
            config.save(&path)?;
            config
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Load config from an explicit path, then apply environment overrides
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env()?;
        Ok(config)
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Write config as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("nl", "conversationhub", "convhub") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.convhub/config.toml")
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let privacy = &mut self.privacy;
        if let Some(v) = lookup("PRIVACY_FILTER_ENABLED") {
            privacy.enabled = parse_bool("PRIVACY_FILTER_ENABLED", &v)?;
        }
        if let Some(v) = lookup("PRIVACY_REPLACEMENT_TEXT") {
            privacy.replacement_text = v;
        }
        if let Some(v) = lookup("PRIVACY_CONFIDENCE_THRESHOLD") {
            privacy.confidence_threshold = v
                .trim()
                .parse()
                .with_context(|| format!("PRIVACY_CONFIDENCE_THRESHOLD: invalid number '{}'", v))?;
        }
        if let Some(v) = lookup("PRIVACY_LOG_FILTERED_CONTENT") {
            privacy.log_filtered_content = parse_bool("PRIVACY_LOG_FILTERED_CONTENT", &v)?;
        }
        for category in CategoryId::ALL {
            let key = format!("PRIVACY_FILTER_{}", category.as_str().to_ascii_uppercase());
            if let Some(v) = lookup(&key) {
                privacy.filters.set(category, parse_bool(&key, &v)?);
            }
        }

        let retention = &mut self.retention;
        for (key, slot) in [
            ("DATA_RETENTION_AUDIO_DAYS", &mut retention.audio_files_days),
            ("DATA_RETENTION_TRANSCRIPTS_DAYS", &mut retention.transcripts_days),
            ("DATA_RETENTION_EXPORTS_DAYS", &mut retention.exports_days),
        ] {
            if let Some(v) = lookup(key) {
                *slot = v
                    .trim()
                    .parse()
                    .with_context(|| format!("{}: invalid number of days '{}'", key, v))?;
            }
        }
        if let Some(v) = lookup("AUTO_DELETE_ENABLED") {
            retention.auto_delete = parse_bool("AUTO_DELETE_ENABLED", &v)?;
        }

        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow!("{}: expected a boolean, got '{}'", key, other)),
    }
}
