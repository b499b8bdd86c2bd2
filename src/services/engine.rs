//! Completion engine
//!
//! Orchestrates provider calls per request: prompt construction,
//! primary/fallback model failover, usage normalization, and streaming-chunk
//! aggregation

use crate::config::Settings;
use crate::models::openai::{ChatMessage, ChatRequest, ChatUsage, StreamOptions};
use crate::models::{CompletionResult, StreamEvent, TaskRequest, TokenUsage};
use crate::services::client::{ChatStream, OpenAIClient};
use crate::services::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::services::tracker::UsageTracker;
use crate::utils::error::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Buffered stream events between producer and SSE writer
const STREAM_CHANNEL_CAPACITY: usize = 100;

/// Per-request provider orchestration
///
/// Constructed once at startup and shared by all handlers; holds the model
/// pair and a tracker handle for streaming-path accounting
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    client: OpenAIClient,
    tracker: Arc<UsageTracker>,
    primary_model: String,
    fallback_model: String,
}

impl CompletionEngine {
    /// Create a new engine instance
    pub fn new(client: OpenAIClient, tracker: Arc<UsageTracker>, settings: &Settings) -> Self {
        Self {
            client,
            tracker,
            primary_model: settings.openai.default_model.clone(),
            fallback_model: settings.openai.fallback_model.clone(),
        }
    }

    /// Build the provider request for one task
    fn build_chat_request(&self, request: &TaskRequest, model: &str, stream: bool) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(request)),
            ],
            temperature: Some(request.temperature()),
            max_tokens: Some(request.max_tokens()),
            stream: stream.then_some(true),
            stream_options: stream.then_some(StreamOptions { include_usage: true }),
        }
    }

    /// Run a synchronous completion
    ///
    /// Attempts the primary model, retries once with the fallback, and fails
    /// with `ProviderFailure` only when both are exhausted. The returned
    /// usage carries a 0.0 cost placeholder; the boundary records the request
    /// and fills in the tracker's computed value
    pub async fn complete(&self, request: &TaskRequest) -> AppResult<CompletionResult> {
        let request_id = Uuid::new_v4().to_string();

        let chat_request = self.build_chat_request(request, &self.primary_model, false);
        let (response, model_used) = match self.client.chat_completions(&chat_request).await {
            Ok(response) => (response, self.primary_model.clone()),
            Err(primary_err) => {
                warn!(
                    "Primary model {} failed: {}, retrying with fallback {}",
                    self.primary_model, primary_err, self.fallback_model
                );
                let chat_request = self.build_chat_request(request, &self.fallback_model, false);
                match self.client.chat_completions(&chat_request).await {
                    Ok(response) => (response, self.fallback_model.clone()),
                    Err(fallback_err) => {
                        error!("Fallback model {} failed: {}", self.fallback_model, fallback_err);
                        return Err(AppError::ProviderFailure);
                    }
                }
            }
        };

        let output_text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(CompletionResult {
            id: request_id,
            task: request.task,
            model: model_used,
            input_text: request.input_text.clone(),
            output_text,
            usage: TokenUsage::from_provider(response.usage),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Run a streaming completion
    ///
    /// Returns the consuming end of a finite, ordered, non-restartable event
    /// sequence: zero or more `Chunk` events closed by exactly one `End` or
    /// `Error`
    pub fn stream(&self, request: TaskRequest) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let engine = self.clone();

        tokio::spawn(async move {
            engine.run_stream(request, tx).await;
        });

        rx
    }

    /// Open the provider stream, trying primary then fallback
    async fn open_stream(&self, request: &TaskRequest) -> Option<(ChatStream, String)> {
        let chat_request = self.build_chat_request(request, &self.primary_model, true);
        match self.client.chat_completions_stream(&chat_request).await {
            Ok(stream) => Some((stream, self.primary_model.clone())),
            Err(primary_err) => {
                warn!(
                    "Primary model {} stream failed: {}, retrying with fallback {}",
                    self.primary_model, primary_err, self.fallback_model
                );
                let chat_request = self.build_chat_request(request, &self.fallback_model, true);
                match self.client.chat_completions_stream(&chat_request).await {
                    Ok(stream) => Some((stream, self.fallback_model.clone())),
                    Err(fallback_err) => {
                        error!(
                            "Fallback model {} stream failed: {}",
                            self.fallback_model, fallback_err
                        );
                        None
                    }
                }
            }
        }
    }

    /// Produce the event sequence for one streaming request
    async fn run_stream(&self, request: TaskRequest, tx: mpsc::Sender<StreamEvent>) {
        let request_id = Uuid::new_v4().to_string();

        let Some((mut stream, model_used)) = self.open_stream(&request).await else {
            let _ = tx
                .send(StreamEvent::Error {
                    message: AppError::ProviderFailure.to_string(),
                })
                .await;
            return;
        };

        let mut accumulated = String::new();
        let mut reported_usage: Option<ChatUsage> = None;

        loop {
            match stream.next_event().await {
                Ok(Some(chunk)) => {
                    if let Some(delta) = chunk.choices.first().and_then(|c| c.delta.content.as_deref()) {
                        if !delta.is_empty() {
                            accumulated.push_str(delta);
                            let event = StreamEvent::Chunk { text: delta.to_string() };
                            if tx.send(event).await.is_err() {
                                debug!("Stream consumer disconnected, releasing provider stream");
                                return;
                            }
                        }
                    }
                    // Usage rides on one chunk, typically the last; last write wins
                    if let Some(usage) = chunk.usage {
                        reported_usage = Some(usage);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Provider stream interrupted: {}", e);
                    let _ = tx
                        .send(StreamEvent::Error {
                            message: "Stream interrupted by provider error".to_string(),
                        })
                        .await;
                    return;
                }
            }
        }

        let mut usage = TokenUsage::from_provider(reported_usage);
        let cost = self.tracker.record(&request_id, request.task, &model_used, &usage);
        usage.estimated_cost = cost;

        debug!(
            "Stream {} completed: {} chars aggregated, {} tokens",
            request_id,
            accumulated.len(),
            usage.total_tokens
        );

        let _ = tx
            .send(StreamEvent::End {
                usage,
                model: model_used,
                task: request.task,
                estimated_cost: cost,
                id: request_id,
            })
            .await;
    }
}
