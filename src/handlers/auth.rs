// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{
        AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    },
    state::AppState,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it, creates an empty
/// progress record alongside, and returns 201 with the user and a bearer
/// token. Duplicate email or username yields 409.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user = state
        .store
        .create_user(&payload.email, &payload.username, &hashed_password)
        .await?;

    let token = sign_jwt(user.id, &state.config.jwt_secret, state.config.jwt_expiration)?;

    tracing::info!("Registered user {}", user.username);

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Authenticates a user and returns a JWT token.
///
/// Unknown email and wrong password produce the identical 401 so account
/// existence cannot be probed.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    let user = state
        .store
        .get_user_by_email(&payload.email)
        .await?
        .ok_or_else(invalid)?;

    let is_valid = verify_password(&payload.password, &user.password)?;
    if !is_valid {
        return Err(invalid());
    }

    let token = sign_jwt(user.id, &state.config.jwt_secret, state.config.jwt_expiration)?;

    Ok(Json(AuthResponse { user, token }))
}

/// Returns the authenticated user.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or(AppError::Forbidden("Invalid token".to_string()))?;

    Ok(Json(user))
}

/// Records a reset token for a known email.
///
/// Always answers 200 with an empty object so callers cannot tell whether
/// the address exists. Token delivery (email) is out of scope; the token is
/// only written to the log.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if let Some(user) = state.store.get_user_by_email(&payload.email).await? {
        let token = Uuid::new_v4().simple().to_string();
        let expiry = Utc::now() + Duration::hours(1);

        state.store.set_reset_token(user.id, &token, expiry).await?;

        tracing::debug!("Reset token for {}: {}", payload.email, token);
    }

    Ok(Json(json!({})))
}

/// Replaces the password for a valid, unexpired reset token and clears the
/// token. An unknown or expired token leaves the stored hash untouched.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let invalid = || AppError::BadRequest("Invalid or expired reset token".to_string());

    let user = state
        .store
        .get_user_by_reset_token(&payload.token)
        .await?
        .ok_or_else(invalid)?;

    let expiry = user.reset_token_expiry.ok_or_else(invalid)?;
    if expiry < Utc::now() {
        return Err(invalid());
    }

    let hashed_password = hash_password(&payload.password)?;
    state.store.update_password(user.id, &hashed_password).await?;

    Ok(Json(json!({})))
}
