// src/handlers/leaderboard.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, state::AppState};

const LEADERBOARD_LIMIT: i64 = 10;

/// Retrieves the top users by points. Users with zero points are excluded;
/// ties break on completed-exercise count.
pub async fn get_leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let leaderboard = state.store.get_leaderboard(LEADERBOARD_LIMIT).await?;

    Ok(Json(leaderboard))
}
