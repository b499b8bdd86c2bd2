//! Task API data models
//!
//! Defines the inbound task request, completion result, usage accounting
//! records and streaming event types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported text-processing tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Summarize,
    Translate,
    Generate,
}

impl TaskKind {
    /// Wire name of the task
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Summarize => "summarize",
            TaskKind::Translate => "translate",
            TaskKind::Generate => "generate",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound task request
///
/// `target_language` is required (and must be non-empty) when task is
/// `translate`; `options` carries optional model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Task to perform
    pub task: TaskKind,
    /// User-provided text
    pub input_text: String,
    /// Target language for translate tasks (optional otherwise)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    /// Optional model settings (recognized keys: temperature, max_tokens, genre)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, serde_json::Value>>,
}

impl TaskRequest {
    /// Sampling temperature from options, default 0.6
    pub fn temperature(&self) -> f32 {
        self.options
            .as_ref()
            .and_then(|opts| opts.get("temperature"))
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
            .unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Completion token cap from options, default 600
    pub fn max_tokens(&self) -> u32 {
        self.options
            .as_ref()
            .and_then(|opts| opts.get("max_tokens"))
            .and_then(|v| v.as_u64())
            .map(|v| v as u32)
            .unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Content descriptor for generate tasks (options key "genre")
    pub fn genre(&self) -> Option<&str> {
        self.options
            .as_ref()
            .and_then(|opts| opts.get("genre"))
            .and_then(|v| v.as_str())
    }
}

/// Default sampling temperature when the request carries none
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Default completion token cap when the request carries none
pub const DEFAULT_MAX_TOKENS: u32 = 600;

/// Token usage accounting for one completed request
///
/// `estimated_cost` is computed locally from configured rates, never taken
/// from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt token count
    pub prompt_tokens: u32,
    /// Completion token count
    pub completion_tokens: u32,
    /// Total token count
    pub total_tokens: u32,
    /// Locally estimated cost in USD
    #[serde(default)]
    pub estimated_cost: f64,
}

impl TokenUsage {
    /// Normalize provider-reported usage
    ///
    /// Missing prompt/completion counts default to 0; a missing total defaults
    /// to prompt + completion, but an explicit total is preserved even when it
    /// disagrees with the sum
    pub fn from_provider(usage: Option<crate::models::openai::ChatUsage>) -> Self {
        let (prompt, completion, total) = match usage {
            Some(u) => (
                u.prompt_tokens.unwrap_or(0),
                u.completion_tokens.unwrap_or(0),
                u.total_tokens,
            ),
            None => (0, 0, None),
        };
        Self {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: total.unwrap_or(prompt + completion),
            estimated_cost: 0.0,
        }
    }
}

/// Result of one completed (non-streaming) request
///
/// Immutable once constructed; not persisted beyond the response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResult {
    /// Unique request identifier
    pub id: String,
    /// Task that was performed
    pub task: TaskKind,
    /// Model that actually served the request (primary or fallback)
    pub model: String,
    /// Original input text
    pub input_text: String,
    /// Generated output text
    pub output_text: String,
    /// Token usage and estimated cost
    pub usage: TokenUsage,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

/// Persisted accounting record for one completed request
///
/// Owned by the usage tracker; never mutated, evicted oldest-first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Request identifier
    pub id: String,
    /// Task that was performed
    pub task: TaskKind,
    /// Model that served the request
    pub model: String,
    /// Prompt token count
    pub prompt_tokens: u32,
    /// Completion token count
    pub completion_tokens: u32,
    /// Total token count
    pub total_tokens: u32,
    /// Locally estimated cost in USD
    pub estimated_cost: f64,
    /// RFC 3339 record timestamp
    pub created_at: String,
}

/// Response body for GET /api/v1/usage/recent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecentResponse {
    /// Records ordered oldest to newest, most recent last
    pub items: Vec<UsageRecord>,
}

/// One event of a streamed completion
///
/// A stream is a finite, ordered, non-restartable sequence of chunk events
/// closed by exactly one terminal event (`End` or `Error`)
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental text delta (the delta only, not the accumulated text)
    Chunk { text: String },
    /// Terminal success event with final accounting
    End {
        usage: TokenUsage,
        model: String,
        task: TaskKind,
        estimated_cost: f64,
        id: String,
    },
    /// Terminal failure event
    Error { message: String },
}

impl StreamEvent {
    /// SSE event name
    pub fn event_name(&self) -> &'static str {
        match self {
            StreamEvent::Chunk { .. } => "chunk",
            StreamEvent::End { .. } => "end",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// SSE data payload
    pub fn sse_data(&self) -> serde_json::Value {
        match self {
            StreamEvent::Chunk { text } => serde_json::json!({ "text": text }),
            StreamEvent::End {
                usage,
                model,
                task,
                estimated_cost,
                id,
            } => serde_json::json!({
                "usage": usage,
                "model": model,
                "task": task,
                "estimated_cost": estimated_cost,
                "id": id,
            }),
            StreamEvent::Error { message } => serde_json::json!({ "message": message }),
        }
    }

    /// Whether this event closes the stream
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Chunk { .. })
    }
}
