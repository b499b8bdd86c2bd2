//! HTTP client service
//!
//! Encapsulates HTTP communication with the OpenAI-compatible provider and
//! classifies failures at the provider-call boundary

use crate::config::Settings;
use crate::models::openai::{ChatRequest, ChatResponse, ChatStreamResponse, ProviderErrorBody};
use crate::utils::error::ProviderError;
use anyhow::{Context, Result};
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// OpenAI API client
///
/// Holds two HTTP clients so streaming requests can outlive the ordinary
/// request timeout
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    stream_client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAIClient {
    /// Create a new client instance
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.openai.timeout))
            .user_agent(concat!("aitextproxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let stream_client = Client::builder()
            .timeout(Duration::from_secs(settings.openai.stream_timeout))
            .user_agent(concat!("aitextproxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create streaming HTTP client")?;

        Ok(Self {
            client,
            stream_client,
            base_url: settings.openai.base_url.clone(),
            api_key: settings.openai.api_key.clone(),
        })
    }

    /// Send a chat completion request
    pub async fn chat_completions(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        debug!("Sending chat completion request for model {}", request.model);

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(classify_error_response(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            ProviderError::Malformed(format!("invalid completion response: {}", e))
        })
    }

    /// Open a streaming chat completion request
    ///
    /// Returns a pull-based event reader over the provider's SSE body
    pub async fn chat_completions_stream(&self, request: &ChatRequest) -> Result<ChatStream, ProviderError> {
        debug!("Opening streaming chat completion request for model {}", request.model);

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .stream_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(classify_error_response(response).await);
        }

        Ok(ChatStream::new(response))
    }
}

/// Classify a non-success provider response
async fn classify_error_response(response: Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.as_u16() == 429 {
        return ProviderError::RateLimit;
    }

    // Prefer the structured upstream message when the body parses
    let message = match serde_json::from_str::<ProviderErrorBody>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body,
    };

    ProviderError::Api {
        status: status.as_u16(),
        message,
    }
}

/// One parsed line of the provider's SSE body
#[derive(Debug)]
enum SseLine {
    /// A decoded stream chunk
    Event(ChatStreamResponse),
    /// The "[DONE]" end marker
    Done,
    /// Comment, blank line, or unparseable data
    Skip,
}

/// Parse a single SSE line
///
/// Format: "data: {json}" with a final "data: [DONE]" marker
fn parse_sse_line(line: &str) -> SseLine {
    let Some(data) = line.trim().strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let data = data.trim();

    if data == "[DONE]" {
        debug!("Received streaming response end marker");
        return SseLine::Done;
    }

    match serde_json::from_str::<ChatStreamResponse>(data) {
        Ok(chunk) => SseLine::Event(chunk),
        Err(e) => {
            warn!("Failed to parse streaming response chunk: {} - data: {}", e, data);
            SseLine::Skip
        }
    }
}

/// Pull-based reader over a streaming chat completion response
///
/// Buffers raw bytes so events split across network chunks are reassembled;
/// the sequence is finite and non-restartable
pub struct ChatStream {
    inner: BoxStream<'static, reqwest::Result<Bytes>>,
    buffer: Vec<u8>,
    done: bool,
}

impl ChatStream {
    fn new(response: Response) -> Self {
        Self {
            inner: response.bytes_stream().boxed(),
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Next decoded stream chunk, or `None` once the stream is finished
    pub async fn next_event(&mut self) -> Result<Option<ChatStreamResponse>, ProviderError> {
        loop {
            // Drain complete lines already buffered
            while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line_bytes);

                match parse_sse_line(&line) {
                    SseLine::Event(chunk) => return Ok(Some(chunk)),
                    SseLine::Done => {
                        self.done = true;
                        return Ok(None);
                    }
                    SseLine::Skip => {}
                }
            }

            if self.done {
                return Ok(None);
            }

            match self.inner.next().await {
                Some(Ok(bytes)) => self.buffer.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    self.done = true;
                    return Err(ProviderError::Network(e));
                }
                None => {
                    self.done = true;
                    return Ok(None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        LoggingConfig, OpenAIConfig, PricingConfig, SecurityConfig, ServerConfig,
    };

    fn create_test_settings() -> Settings {
        Settings {
            server: ServerConfig {
                host: "localhost".to_string(),
                port: 8000,
            },
            openai: OpenAIConfig {
                api_key: "test_key".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                default_model: "gpt-4.1-mini".to_string(),
                fallback_model: "gpt-4o-mini".to_string(),
                timeout: 30,
                stream_timeout: 300,
            },
            pricing: PricingConfig {
                prompt_cost_per_1k: 0.15,
                completion_cost_per_1k: 0.60,
            },
            security: SecurityConfig {
                allowed_origin: "http://localhost:5173".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
            },
        }
    }

    #[test]
    fn test_client_creation() {
        let settings = create_test_settings();
        assert!(OpenAIClient::new(&settings).is_ok());
    }

    #[test]
    fn test_parse_sse_data_line() {
        let line = r#"data: {"id":"test","model":"gpt-4o-mini","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#;
        match parse_sse_line(line) {
            SseLine::Event(chunk) => {
                assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hello"));
            }
            other => panic!("Expected event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_sse_done_marker() {
        assert!(matches!(parse_sse_line("data: [DONE]"), SseLine::Done));
    }

    #[test]
    fn test_parse_sse_skips_noise() {
        assert!(matches!(parse_sse_line(""), SseLine::Skip));
        assert!(matches!(parse_sse_line(": keep-alive"), SseLine::Skip));
        assert!(matches!(parse_sse_line("data: not-json"), SseLine::Skip));
    }
}
