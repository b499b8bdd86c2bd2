//! Prompt construction
//!
//! Maps a task request to the provider-ready instruction text. Pure, no
//! failure modes beyond malformed input already rejected at the boundary.

use crate::models::{TaskKind, TaskRequest};

/// System role content sent with every request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Build the user instruction for a task request
pub fn build_prompt(request: &TaskRequest) -> String {
    match request.task {
        TaskKind::Summarize => format!(
            "Summarize the following text in a clear and concise way:\n\n{}",
            request.input_text
        ),
        TaskKind::Translate => {
            let target = request
                .target_language
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or("English");
            format!(
                "Translate the following text into {}:\n\n{}",
                target, request.input_text
            )
        }
        TaskKind::Generate => {
            let descriptor = request.genre().unwrap_or("content");
            format!(
                "Generate a {} based on this instruction:\n\n{}",
                descriptor, request.input_text
            )
        }
    }
}
