// src/evaluator/groq.rs
//
// Client for the Groq OpenAI-compatible chat-completions API, plus the
// best-effort extraction of a feedback JSON object from the free-form text
// the model returns.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{feedback::Feedback, module::Exercise};

/// Fixed evaluation rubric sent as the system instruction.
const SYSTEM_PROMPT: &str = "You are an expert in prompt engineering evaluation. \n\
Your task is to evaluate a user's prompt engineering attempt based on the following criteria:\n\
1. Clarity and specificity of instructions\n\
2. Alignment with the given problem\n\
3. Effectiveness of structure and formatting\n\
4. Inclusion of necessary constraints and parameters\n\
5. Overall quality compared to the example\n\
\n\
Rate the prompt on a scale of 1-10 and provide 2-3 specific, constructive suggestions for improvement.\n\
Respond in valid JSON format with two fields: \"score\" (number between 1-10) and \"suggestions\" (array of strings).";

// First '{' through last '}'; the model often wraps the JSON in prose.
static JSON_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Why the primary path failed. Never surfaced to the caller; only decides
/// that the heuristic scorer takes over.
#[derive(Debug)]
pub enum UpstreamError {
    /// Network failure, timeout or non-success status.
    Unavailable(String),
    /// Response body did not contain a usable feedback object.
    Malformed(String),
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamError::Unavailable(msg) => write!(f, "upstream unavailable: {}", msg),
            UpstreamError::Malformed(msg) => write!(f, "malformed upstream response: {}", msg),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    /// Built once at startup. The timeout bounds every evaluation call, so a
    /// client without it is not acceptable and construction fails loudly.
    pub fn new(api_key: String, base_url: String, model: String, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to construct HTTP client");

        Self {
            http,
            api_key,
            base_url,
            model,
        }
    }

    /// Single call, no retry: any failure hands over to the fallback scorer.
    pub async fn request_evaluation(
        &self,
        user_prompt: &str,
        exercise: &Exercise,
    ) -> Result<Feedback, UpstreamError> {
        let user_message = build_user_message(user_prompt, exercise);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_message,
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpstreamError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| UpstreamError::Malformed("empty choices".to_string()))?;

        extract_feedback(content)
    }
}

fn build_user_message(user_prompt: &str, exercise: &Exercise) -> String {
    let model_answer_line = exercise
        .model_answer
        .as_deref()
        .map(|answer| format!("Model answer: {}\n", answer))
        .unwrap_or_default();

    format!(
        "Problem: {}\n\
         \n\
         Example prompt: {}\n\
         {}\n\
         User's prompt: {}\n\
         \n\
         Evaluate this prompt and provide a score (1-10) and 2-3 specific suggestions for improvement in JSON format.",
        exercise.problem, exercise.example, model_answer_line, user_prompt
    )
}

/// Extracts the first brace-delimited span from the model's reply and
/// deserializes it. A missing span or wrong field types is `Malformed`.
pub fn extract_feedback(content: &str) -> Result<Feedback, UpstreamError> {
    let span = JSON_SPAN
        .find(content)
        .ok_or_else(|| UpstreamError::Malformed("no JSON object in response".to_string()))?;

    serde_json::from_str::<Feedback>(span.as_str())
        .map_err(|e| UpstreamError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_wrapped_in_prose() {
        let content = "Sure! Here is my evaluation:\n\
            {\"score\": 8, \"suggestions\": [\"Add constraints\", \"Specify format\"]}\n\
            Let me know if you need more detail.";

        let feedback = extract_feedback(content).unwrap();
        assert_eq!(feedback.score, 8.0);
        assert_eq!(feedback.suggestions.len(), 2);
    }

    #[test]
    fn bare_json_object_parses() {
        let feedback =
            extract_feedback("{\"score\": 6.5, \"suggestions\": [\"Be more specific\"]}").unwrap();
        assert_eq!(feedback.score, 6.5);
    }

    #[test]
    fn text_without_braces_is_malformed() {
        let err = extract_feedback("I would rate this prompt a solid 7 out of 10.").unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }

    #[test]
    fn wrong_field_types_are_malformed() {
        let err = extract_feedback("{\"score\": \"eight\", \"suggestions\": []}").unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }

    #[test]
    fn missing_suggestions_is_malformed() {
        let err = extract_feedback("{\"score\": 7}").unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }

    #[test]
    fn user_message_includes_model_answer_when_present() {
        let exercise = Exercise {
            id: "zs-1".to_string(),
            title: "Basic Instructions".to_string(),
            description: "desc".to_string(),
            problem: "the problem".to_string(),
            example: "the example".to_string(),
            model_answer: Some("the reference".to_string()),
        };

        let message = build_user_message("my prompt", &exercise);
        assert!(message.contains("Model answer: the reference"));
        assert!(message.contains("User's prompt: my prompt"));
    }
}
