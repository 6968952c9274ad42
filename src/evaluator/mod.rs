// src/evaluator/mod.rs

pub mod groq;
pub mod heuristic;

use crate::{
    config::Config,
    models::{feedback::Feedback, module::Exercise},
};

use groq::GroqClient;

/// The evaluation pipeline: primary LLM path with a deterministic heuristic
/// fallback. Stateless per call; no caching, no retry, no circuit breaker.
pub struct PromptEvaluator {
    groq: Option<GroqClient>,
    max_score: f64,
}

impl PromptEvaluator {
    pub fn from_config(config: &Config) -> Self {
        let groq = config.groq_api_key.clone().map(|api_key| {
            GroqClient::new(
                api_key,
                config.groq_api_url.clone(),
                config.groq_model.clone(),
                config.groq_timeout_secs,
            )
        });

        if groq.is_none() {
            tracing::warn!("GROQ_API_KEY not set; evaluations will use the heuristic scorer");
        }

        Self {
            groq,
            max_score: config.max_score,
        }
    }

    /// Infallible: every upstream or parse failure degrades to the heuristic
    /// scorer rather than surfacing an error.
    pub async fn evaluate(&self, user_prompt: &str, exercise: &Exercise) -> Feedback {
        if let Some(client) = &self.groq {
            match client.request_evaluation(user_prompt, exercise).await {
                Ok(feedback) => return feedback,
                Err(e) => {
                    tracing::warn!("Groq evaluation failed, falling back: {}", e);
                }
            }
        }

        heuristic::fallback_feedback(
            user_prompt,
            &exercise.problem,
            &exercise.example,
            self.max_score,
        )
    }
}
