//! Task completion handlers
//!
//! Validates inbound task requests, dispatches them to the completion
//! engine, and serializes results as JSON or Server-Sent-Events

use crate::handlers::AppState;
use crate::models::{CompletionResult, TaskKind, TaskRequest};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::create_task_log_summary;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// Handle synchronous task completion
///
/// POST /api/v1/ai
pub async fn handle_completion(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> AppResult<Json<CompletionResult>> {
    debug!("Received task request: {}", create_task_log_summary(&request));

    validate_task_request(&request).map_err(AppError::Validation)?;

    let mut result = state.engine.complete(&request).await?;

    // Cost computation lives in the tracker; the engine's placeholder is
    // overwritten before the response goes out
    let cost = state
        .tracker
        .record(&result.id, result.task, &result.model, &result.usage);
    result.usage.estimated_cost = cost;

    Ok(Json(result))
}

/// Handle streaming task completion
///
/// POST /api/v1/ai/stream
///
/// Emits named SSE events: `chunk` for each text delta, then one terminal
/// `end` (with usage and cost) or `error`
pub async fn handle_completion_stream(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> AppResult<Response> {
    debug!(
        "Received streaming task request: {}",
        create_task_log_summary(&request)
    );

    validate_task_request(&request).map_err(AppError::Validation)?;

    let rx = state.engine.stream(request);
    let stream = ReceiverStream::new(rx).map(|event| {
        Ok::<_, Infallible>(
            Event::default()
                .event(event.event_name())
                .data(event.sse_data().to_string()),
        )
    });

    let sse = Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    );

    debug!("Starting streaming response transmission");
    Ok(sse.into_response())
}

/// Validate a task request before it reaches the engine
fn validate_task_request(request: &TaskRequest) -> Result<(), String> {
    // Check input text
    if request.input_text.is_empty() {
        return Err("input_text cannot be empty".to_string());
    }

    // Check target language for translate tasks
    if request.task == TaskKind::Translate {
        match request.target_language.as_deref() {
            None => return Err("target_language is required for translate".to_string()),
            Some(target) if target.is_empty() => {
                return Err("target_language is required for translate".to_string())
            }
            Some(_) => {}
        }
    }

    // Check recognized options
    if let Some(options) = &request.options {
        if let Some(temperature) = options.get("temperature").and_then(|v| v.as_f64()) {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if let Some(max_tokens) = options.get("max_tokens").and_then(|v| v.as_i64()) {
            if max_tokens <= 0 {
                return Err("max_tokens must be greater than 0".to_string());
            }
            if max_tokens > 100000 {
                return Err("max_tokens cannot exceed 100000".to_string());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_request(task: TaskKind) -> TaskRequest {
        TaskRequest {
            task,
            input_text: "Hello".to_string(),
            target_language: None,
            options: None,
        }
    }

    #[test]
    fn test_validate_accepts_plain_request() {
        assert!(validate_task_request(&base_request(TaskKind::Summarize)).is_ok());
        assert!(validate_task_request(&base_request(TaskKind::Generate)).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_input() {
        let mut request = base_request(TaskKind::Summarize);
        request.input_text = String::new();
        assert!(validate_task_request(&request).is_err());
    }

    #[test]
    fn test_translate_requires_target_language() {
        // Absent
        let request = base_request(TaskKind::Translate);
        assert!(validate_task_request(&request).is_err());

        // Empty
        let mut request = base_request(TaskKind::Translate);
        request.target_language = Some(String::new());
        assert!(validate_task_request(&request).is_err());

        // Present and non-empty
        let mut request = base_request(TaskKind::Translate);
        request.target_language = Some("German".to_string());
        assert!(validate_task_request(&request).is_ok());
    }

    #[test]
    fn test_target_language_optional_for_other_tasks() {
        let request = base_request(TaskKind::Summarize);
        assert!(request.target_language.is_none());
        assert!(validate_task_request(&request).is_ok());
    }

    #[test]
    fn test_temperature_range_validation() {
        let mut options = HashMap::new();
        options.insert("temperature".to_string(), serde_json::json!(1.5));

        let mut request = base_request(TaskKind::Generate);
        request.options = Some(options.clone());
        assert!(validate_task_request(&request).is_ok());

        options.insert("temperature".to_string(), serde_json::json!(3.0));
        request.options = Some(options.clone());
        assert!(validate_task_request(&request).is_err());

        options.insert("temperature".to_string(), serde_json::json!(-0.5));
        request.options = Some(options);
        assert!(validate_task_request(&request).is_err());
    }

    #[test]
    fn test_max_tokens_validation() {
        let mut options = HashMap::new();
        options.insert("max_tokens".to_string(), serde_json::json!(0));

        let mut request = base_request(TaskKind::Generate);
        request.options = Some(options.clone());
        assert!(validate_task_request(&request).is_err());

        options.insert("max_tokens".to_string(), serde_json::json!(200000));
        request.options = Some(options.clone());
        assert!(validate_task_request(&request).is_err());

        options.insert("max_tokens".to_string(), serde_json::json!(512));
        request.options = Some(options);
        assert!(validate_task_request(&request).is_ok());
    }
}
