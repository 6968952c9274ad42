// src/handlers/module.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, state::AppState};

/// Lists the full learning catalog in display order.
pub async fn list_modules(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let modules = state.store.get_all_modules().await?;

    Ok(Json(modules))
}

/// Retrieves a single module with its exercises.
pub async fn get_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let module = state
        .store
        .get_module(&module_id)
        .await?
        .ok_or(AppError::NotFound("Module not found".to_string()))?;

    Ok(Json(module))
}
