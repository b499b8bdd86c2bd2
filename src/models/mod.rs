//! Data models module
//!
//! Defines the task API surface and the OpenAI provider wire structures

pub mod openai;
pub mod task;

pub use task::{
    CompletionResult, StreamEvent, TaskKind, TaskRequest, TokenUsage, UsageRecentResponse,
    UsageRecord,
};
