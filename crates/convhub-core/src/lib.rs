//! Core domain models for the ConversationHub privacy filter
//!
//! This crate contains:
//! - Sensitive-data categories
//! - The immutable filter policy
//! - Match and result types
//! - Error taxonomy

pub mod category;
pub mod error;
pub mod filter;
pub mod policy;

pub use category::CategoryId;
pub use error::{FilterError, MatcherError, PolicyError, Result};
pub use filter::{FilterResult, Match};
pub use policy::{FilterPolicy, FilterPolicyBuilder};
