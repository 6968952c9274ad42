// src/storage/mod.rs

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    models::{
        leaderboard::LeaderboardEntry,
        module::{Exercise, Module},
        progress::UserProgress,
        user::User,
    },
};

pub use memory::MemStorage;
pub use postgres::PgStorage;

/// Store interface behind every handler.
///
/// `PgStorage` is the production implementation; `MemStorage` exists as a
/// test double so the HTTP surface can be exercised without a database.
#[async_trait]
pub trait Storage: Send + Sync {
    // User methods
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Creates the user together with an empty progress row.
    /// Fails with `Conflict` when the email or username is taken.
    async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;

    async fn set_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn get_user_by_reset_token(&self, token: &str) -> Result<Option<User>, AppError>;

    /// Replaces the password hash and clears any pending reset token.
    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError>;

    // Progress methods
    /// Lazily initializes an empty record on first access.
    async fn get_progress(&self, user_id: i64) -> Result<UserProgress, AppError>;

    /// Idempotent: a repeat completion returns the current state unchanged.
    /// The append and the point award happen as one atomic update.
    async fn complete_exercise(
        &self,
        user_id: i64,
        module_id: &str,
        exercise_id: &str,
        award: i32,
    ) -> Result<UserProgress, AppError>;

    // Catalog methods
    async fn get_all_modules(&self) -> Result<Vec<Module>, AppError>;
    async fn get_module(&self, module_id: &str) -> Result<Option<Module>, AppError>;
    async fn get_exercise(
        &self,
        module_id: &str,
        exercise_id: &str,
    ) -> Result<Option<Exercise>, AppError>;

    // Leaderboard
    async fn get_leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError>;
}
