use thiserror::Error;

use crate::CategoryId;

/// Invalid filter policy values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("Confidence threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f32),

    #[error("Replacement text must not be empty")]
    EmptyReplacement,

    #[error("Maximum walk depth must be at least 1")]
    InvalidDepth,

    #[error("Unknown privacy category: {0}")]
    UnknownCategory(String),

    #[error("Replacement text would itself be detected as {0}")]
    ReplacementIsSensitive(CategoryId),
}

/// Failure of a single category matcher.
///
/// The redaction engine recovers from these locally: the category is skipped
/// for the current call and the rest of the text is still filtered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatcherError {
    #[error("Invalid pattern for {category}: {reason}")]
    InvalidPattern { category: CategoryId, reason: String },

    #[error("Matcher for {category} failed: {reason}")]
    Failed { category: CategoryId, reason: String },
}

impl MatcherError {
    pub fn category(&self) -> CategoryId {
        match self {
            MatcherError::InvalidPattern { category, .. } | MatcherError::Failed { category, .. } => {
                *category
            }
        }
    }
}

/// Errors that propagate out of a filter pass to the caller
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload nesting exceeds maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("Invalid policy: {0}")]
    InvalidPolicy(#[from] PolicyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
