//! Service layer module
//!
//! Contains the prompt builder, provider HTTP client, completion engine,
//! and usage tracker

pub mod client;
pub mod engine;
pub mod prompt;
pub mod tracker;

pub use client::OpenAIClient;
pub use engine::CompletionEngine;
pub use tracker::UsageTracker;
