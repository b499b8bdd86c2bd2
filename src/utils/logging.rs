//! Request log summaries
//!
//! Builds compact JSON summaries of inbound requests for debug logging
//! without dumping user text into the log

use crate::models::TaskRequest;
use serde_json::{json, Value};

/// Create a log summary of an inbound task request
pub fn create_task_log_summary(request: &TaskRequest) -> Value {
    let option_keys: Vec<&str> = request
        .options
        .as_ref()
        .map(|opts| opts.keys().map(|k| k.as_str()).collect())
        .unwrap_or_default();

    json!({
        "task": request.task.as_str(),
        "input_chars": request.input_text.chars().count(),
        "target_language": request.target_language,
        "option_keys": option_keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskKind;
    use std::collections::HashMap;

    #[test]
    fn test_summary_omits_input_text() {
        let mut options = HashMap::new();
        options.insert("temperature".to_string(), json!(0.4));

        let request = TaskRequest {
            task: TaskKind::Summarize,
            input_text: "a very secret document".to_string(),
            target_language: None,
            options: Some(options),
        };

        let summary = create_task_log_summary(&request);
        let rendered = summary.to_string();

        assert!(!rendered.contains("secret"));
        assert_eq!(summary["task"], "summarize");
        assert_eq!(summary["input_chars"], 22);
        assert_eq!(summary["option_keys"][0], "temperature");
    }
}
