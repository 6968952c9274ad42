// src/handlers/evaluate.rs

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::feedback::{EvaluatePromptRequest, Feedback},
    state::AppState,
};

/// Evaluates a user's prompt against an exercise.
///
/// Always answers 200 with a `Feedback`: upstream failures degrade to the
/// heuristic scorer inside the evaluator, and an unknown exercise produces a
/// zero-score response rather than blocking the learner.
pub async fn evaluate_prompt(
    State(state): State<AppState>,
    Json(payload): Json<EvaluatePromptRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let exercise = state
        .store
        .get_exercise(&payload.module_id, &payload.exercise_id)
        .await?;

    let Some(exercise) = exercise else {
        return Ok(Json(Feedback {
            score: 0.0,
            suggestions: vec![
                "We couldn't find that exercise. Refresh the module and try again.".to_string(),
            ],
        }));
    };

    let feedback = state
        .evaluator
        .evaluate(&payload.user_prompt, &exercise)
        .await;

    Ok(Json(feedback))
}
