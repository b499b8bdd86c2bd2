//! AI Text Proxy Library
//!
//! Forwards text-processing tasks (summarize/translate/generate) to an
//! OpenAI-compatible provider with primary/fallback failover, streaming, and
//! usage/cost accounting

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, AppState};
pub use models::{CompletionResult, StreamEvent, TaskKind, TaskRequest, TokenUsage, UsageRecord};
pub use services::{CompletionEngine, OpenAIClient, UsageTracker};
pub use utils::error::{AppError, AppResult, ProviderError};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
