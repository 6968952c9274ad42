// src/models/feedback.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// The evaluator's output: a score on the configured scale (nominally 0-10)
/// and a list of improvement suggestions. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub score: f64,
    pub suggestions: Vec<String>,
}

/// DTO for requesting an evaluation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatePromptRequest {
    #[validate(length(min = 1, message = "Prompt must not be empty"))]
    pub user_prompt: String,
    #[validate(length(min = 1))]
    pub module_id: String,
    #[validate(length(min = 1))]
    pub exercise_id: String,
}
