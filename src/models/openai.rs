//! OpenAI API data models
//!
//! Defines the chat-completions request and response structures this service
//! exchanges with the provider

use serde::{Deserialize, Serialize};

/// Chat completion request structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name
    pub model: String,
    /// Message list
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Streaming options (usage reporting)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

/// Chat message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role (system/user/assistant)
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Streaming options
///
/// `include_usage` asks the provider to attach usage statistics to the final
/// stream chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

/// Chat completion response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Provider response ID
    #[serde(default)]
    pub id: String,
    /// Model used
    #[serde(default)]
    pub model: String,
    /// Choice list
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    /// Usage statistics (some providers omit this)
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// Chat completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Message content
    pub message: ChatChoiceMessage,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message inside a completion choice
///
/// `content` is nullable on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Usage statistics as reported by the provider
///
/// All fields optional so omission can be distinguished from zero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    #[serde(default)]
    pub completion_tokens: Option<u32>,
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

/// Streaming response chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamResponse {
    /// Provider response ID
    #[serde(default)]
    pub id: String,
    /// Model used
    #[serde(default)]
    pub model: String,
    /// Choice list (empty on the usage-only terminal chunk)
    #[serde(default)]
    pub choices: Vec<ChatStreamChoice>,
    /// Usage statistics, attached to the final chunk when requested
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// Streaming choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Delta content
    pub delta: ChatStreamDelta,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Streaming delta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamDelta {
    /// Role (first chunk only)
    #[serde(default)]
    pub role: Option<String>,
    /// Text delta
    #[serde(default)]
    pub content: Option<String>,
}

/// Provider error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    pub error: ProviderErrorDetail,
}

/// Provider error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderErrorDetail {
    /// Error message
    pub message: String,
    /// Error type
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Error code (optional)
    #[serde(default)]
    pub code: Option<String>,
}
