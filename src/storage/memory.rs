// src/storage/memory.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        leaderboard::LeaderboardEntry,
        module::{Exercise, Module},
        progress::{CompletedExercise, UserProgress},
        user::User,
    },
};

use super::Storage;

/// In-memory store. Test double only; deployments use `PgStorage`.
pub struct MemStorage {
    modules: Vec<Module>,
    users: RwLock<Vec<User>>,
    progress: RwLock<HashMap<i64, UserProgress>>,
    next_id: AtomicI64,
}

impl MemStorage {
    pub fn new(modules: Vec<Module>) -> Self {
        Self {
            modules,
            users: RwLock::new(Vec::new()),
            progress: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Drops a user and their progress record, simulating a deleted account.
    pub async fn remove_user(&self, user_id: i64) {
        self.users.write().await.retain(|u| u.id != user_id);
        self.progress.write().await.remove(&user_id);
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }
        if users.iter().any(|u| u.username == username) {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: email.to_string(),
            username: username.to_string(),
            password: password_hash.to_string(),
            is_verified: true,
            reset_token: None,
            reset_token_expiry: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        users.push(user.clone());

        self.progress
            .write()
            .await
            .insert(user.id, UserProgress::default());

        Ok(user)
    }

    async fn set_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.reset_token = Some(token.to_string());
            user.reset_token_expiry = Some(expiry);
            user.updated_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn get_user_by_reset_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.password = password_hash.to_string();
            user.reset_token = None;
            user.reset_token_expiry = None;
            user.updated_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn get_progress(&self, user_id: i64) -> Result<UserProgress, AppError> {
        let mut progress = self.progress.write().await;
        Ok(progress.entry(user_id).or_default().clone())
    }

    async fn complete_exercise(
        &self,
        user_id: i64,
        module_id: &str,
        exercise_id: &str,
        award: i32,
    ) -> Result<UserProgress, AppError> {
        let mut progress = self.progress.write().await;
        let entry = progress.entry(user_id).or_default();

        if !entry.is_completed(module_id, exercise_id) {
            entry.completed_exercises.push(CompletedExercise {
                module_id: module_id.to_string(),
                exercise_id: exercise_id.to_string(),
                timestamp: Utc::now().timestamp_millis(),
            });
            entry.points += award;
        }

        Ok(entry.clone())
    }

    async fn get_all_modules(&self) -> Result<Vec<Module>, AppError> {
        Ok(self.modules.clone())
    }

    async fn get_module(&self, module_id: &str) -> Result<Option<Module>, AppError> {
        Ok(self.modules.iter().find(|m| m.id == module_id).cloned())
    }

    async fn get_exercise(
        &self,
        module_id: &str,
        exercise_id: &str,
    ) -> Result<Option<Exercise>, AppError> {
        Ok(self
            .modules
            .iter()
            .find(|m| m.id == module_id)
            .and_then(|m| m.exercises.iter().find(|e| e.id == exercise_id))
            .cloned())
    }

    async fn get_leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError> {
        let users = self.users.read().await;
        let progress = self.progress.read().await;

        let mut entries: Vec<LeaderboardEntry> = users
            .iter()
            .filter_map(|user| {
                let p = progress.get(&user.id)?;
                if p.points <= 0 {
                    return None;
                }
                Some(LeaderboardEntry {
                    user_id: user.id,
                    username: user.username.clone(),
                    points: p.points,
                    completed_exercises: p.completed_exercises.len() as i32,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.completed_exercises.cmp(&a.completed_exercises))
        });
        entries.truncate(limit as usize);

        Ok(entries)
    }
}
