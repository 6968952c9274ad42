// src/handlers/progress.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::progress::{CompleteExerciseRequest, ModuleProgress, ProgressSummary},
    state::AppState,
    utils::jwt::Claims,
};

/// Returns the caller's progress record, creating an empty one on first
/// access.
pub async fn get_progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let progress = state.store.get_progress(user_id).await?;

    Ok(Json(progress))
}

/// Derived completion overview: per-module counts, global counts, fully
/// completed modules and points. Computed on the fly, never stored.
pub async fn get_progress_summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let modules = state.store.get_all_modules().await?;
    let progress = state.store.get_progress(user_id).await?;

    let module_stats: Vec<ModuleProgress> = modules
        .iter()
        .map(|module| {
            let completed = module
                .exercises
                .iter()
                .filter(|ex| progress.is_completed(&module.id, &ex.id))
                .count();
            ModuleProgress {
                module_id: module.id.clone(),
                title: module.title.clone(),
                completed,
                total: module.exercises.len(),
            }
        })
        .collect();

    let total_exercises = module_stats.iter().map(|m| m.total).sum();
    let completed_exercises = module_stats.iter().map(|m| m.completed).sum();
    let completed_modules = module_stats
        .iter()
        .filter(|m| m.total > 0 && m.completed == m.total)
        .count();

    Ok(Json(ProgressSummary {
        modules: module_stats,
        completed_exercises,
        total_exercises,
        completed_modules,
        points: progress.points,
    }))
}

/// Marks an exercise as completed and awards the configured points.
///
/// Idempotent: repeating a completion returns the current state unchanged.
/// The (module, exercise) pair must exist in the catalog.
pub async fn complete_exercise(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CompleteExerciseRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    state
        .store
        .get_exercise(&payload.module_id, &payload.exercise_id)
        .await?
        .ok_or(AppError::NotFound("Exercise not found".to_string()))?;

    let progress = state
        .store
        .complete_exercise(
            user_id,
            &payload.module_id,
            &payload.exercise_id,
            state.config.point_award,
        )
        .await?;

    Ok(Json(progress))
}
