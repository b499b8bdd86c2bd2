//! Data model serialization and contract tests

use aitextproxy::models::openai::ChatUsage;
use aitextproxy::models::{
    CompletionResult, StreamEvent, TaskKind, TaskRequest, TokenUsage, UsageRecord,
};
use std::collections::HashMap;

#[test]
fn test_task_request_roundtrip() {
    let mut options = HashMap::new();
    options.insert("temperature".to_string(), serde_json::json!(0.4));
    options.insert("max_tokens".to_string(), serde_json::json!(256));

    let request = TaskRequest {
        task: TaskKind::Translate,
        input_text: "Bonjour le monde".to_string(),
        target_language: Some("English".to_string()),
        options: Some(options),
    };

    let json = serde_json::to_string(&request).unwrap();
    let deserialized: TaskRequest = serde_json::from_str(&json).unwrap();

    assert_eq!(deserialized.task, TaskKind::Translate);
    assert_eq!(deserialized.input_text, request.input_text);
    assert_eq!(deserialized.target_language, request.target_language);
    assert_eq!(deserialized.max_tokens(), 256);
}

#[test]
fn test_task_request_rejects_unknown_task() {
    let json = r#"{"task": "compose", "input_text": "hello"}"#;
    assert!(serde_json::from_str::<TaskRequest>(json).is_err());
}

#[test]
fn test_task_request_minimal_payload() {
    let json = r#"{"task": "summarize", "input_text": "hello"}"#;
    let request: TaskRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.task, TaskKind::Summarize);
    assert!(request.target_language.is_none());
    assert!(request.options.is_none());

    // Defaults apply when options are absent
    assert_eq!(request.temperature(), 0.6);
    assert_eq!(request.max_tokens(), 600);
}

#[test]
fn test_token_usage_total_defaulting() {
    // Omitted total falls back to the sum
    let usage = TokenUsage::from_provider(Some(ChatUsage {
        prompt_tokens: Some(7),
        completion_tokens: Some(5),
        total_tokens: None,
    }));
    assert_eq!(usage.total_tokens, 12);

    // An explicit total survives even when inconsistent with the sum
    let usage = TokenUsage::from_provider(Some(ChatUsage {
        prompt_tokens: Some(7),
        completion_tokens: Some(5),
        total_tokens: Some(40),
    }));
    assert_eq!(usage.total_tokens, 40);

    // Fully missing usage normalizes to zeros
    let usage = TokenUsage::from_provider(None);
    assert_eq!((usage.prompt_tokens, usage.completion_tokens, usage.total_tokens), (0, 0, 0));
}

#[test]
fn test_completion_result_serialization() {
    let result = CompletionResult {
        id: "req-123".to_string(),
        task: TaskKind::Generate,
        model: "gpt-4.1-mini".to_string(),
        input_text: "write a haiku".to_string(),
        output_text: "Autumn leaves fall".to_string(),
        usage: TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 3,
            total_tokens: 13,
            estimated_cost: 0.0033,
        },
        created_at: "2026-01-01T00:00:00+00:00".to_string(),
    };

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["task"], "generate");
    assert_eq!(value["model"], "gpt-4.1-mini");
    assert_eq!(value["usage"]["total_tokens"], 13);
    assert_eq!(value["usage"]["estimated_cost"], 0.0033);
}

#[test]
fn test_usage_record_serialization() {
    let record = UsageRecord {
        id: "req-9".to_string(),
        task: TaskKind::Summarize,
        model: "gpt-4o-mini".to_string(),
        prompt_tokens: 100,
        completion_tokens: 20,
        total_tokens: 120,
        estimated_cost: 0.027,
        created_at: "2026-01-01T00:00:00+00:00".to_string(),
    };

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["task"], "summarize");
    assert_eq!(value["prompt_tokens"], 100);
    assert_eq!(value["estimated_cost"], 0.027);
}

#[test]
fn test_stream_event_sse_mapping() {
    let chunk = StreamEvent::Chunk { text: " leaves".to_string() };
    assert_eq!(chunk.event_name(), "chunk");
    assert_eq!(chunk.sse_data()["text"], " leaves");

    let end = StreamEvent::End {
        usage: TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 3,
            total_tokens: 13,
            estimated_cost: 0.0033,
        },
        model: "gpt-4.1-mini".to_string(),
        task: TaskKind::Generate,
        estimated_cost: 0.0033,
        id: "req-1".to_string(),
    };
    assert_eq!(end.event_name(), "end");
    let data = end.sse_data();
    assert_eq!(data["model"], "gpt-4.1-mini");
    assert_eq!(data["task"], "generate");
    assert_eq!(data["id"], "req-1");
    assert_eq!(data["usage"]["prompt_tokens"], 10);

    let error = StreamEvent::Error { message: "Both primary and fallback models failed.".to_string() };
    assert_eq!(error.event_name(), "error");
    assert_eq!(error.sse_data()["message"], "Both primary and fallback models failed.");
}
