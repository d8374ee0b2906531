//! HTTP surface for ConversationHub
//!
//! Every JSON response leaving the router passes through
//! [`middleware::privacy_filter`], so handlers never have to remember to
//! redact their own payloads.

pub mod middleware;
pub mod server;

pub use middleware::privacy_filter;
pub use server::{AppState, HubServer};
