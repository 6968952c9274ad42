// src/storage/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use crate::{
    error::AppError,
    models::{
        leaderboard::LeaderboardEntry,
        module::{Concept, Exercise, Module},
        progress::{CompletedExercise, UserProgress},
        user::User,
    },
};

use super::Storage;

const USER_COLUMNS: &str = "id, email, username, password, is_verified, \
     reset_token, reset_token_expiry, created_at, updated_at";

/// Production store backed by Postgres.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

#[derive(FromRow)]
struct ProgressRow {
    completed_exercises: Json<Vec<CompletedExercise>>,
    points: i32,
}

#[derive(FromRow)]
struct ModuleRow {
    id: String,
    title: String,
    description: String,
    objectives: Json<Vec<String>>,
    concepts: Json<Vec<Concept>>,
}

#[derive(FromRow)]
struct ExerciseRow {
    module_id: String,
    id: String,
    title: String,
    description: String,
    problem: String,
    example: String,
    model_answer: Option<String>,
}

impl From<ExerciseRow> for Exercise {
    fn from(row: ExerciseRow) -> Self {
        Exercise {
            id: row.id,
            title: row.title,
            description: row.description,
            problem: row.problem,
            example: row.example,
            model_answer: row.model_answer,
        }
    }
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts catalog content that isn't already present.
    /// Existing modules and exercises are left untouched.
    pub async fn seed_modules(&self, modules: &[Module]) -> Result<(), AppError> {
        for (m_pos, module) in modules.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO modules (id, title, description, objectives, concepts, position)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&module.id)
            .bind(&module.title)
            .bind(&module.description)
            .bind(Json(&module.objectives))
            .bind(Json(&module.concepts))
            .bind(m_pos as i32)
            .execute(&self.pool)
            .await?;

            for (e_pos, exercise) in module.exercises.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO exercises
                        (id, module_id, title, description, problem, example, model_answer, position)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    ON CONFLICT (module_id, id) DO NOTHING
                    "#,
                )
                .bind(&exercise.id)
                .bind(&module.id)
                .bind(&exercise.title)
                .bind(&exercise.description)
                .bind(&exercise.problem)
                .bind(&exercise.example)
                .bind(&exercise.model_answer)
                .bind(e_pos as i32)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    async fn exercises_for(&self, module_id: &str) -> Result<Vec<Exercise>, AppError> {
        let rows = sqlx::query_as::<_, ExerciseRow>(
            r#"
            SELECT module_id, id, title, description, problem, example, model_answer
            FROM exercises
            WHERE module_id = $1
            ORDER BY position
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Exercise::from).collect())
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        // Explicit duplicate checks give field-specific 409s; the unique
        // constraints still close the race window below.
        if self.get_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }
        if self.get_user_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, username, password, is_verified)
            VALUES ($1, $2, $3, TRUE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Postgres error code for unique violation is 23505
            if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
                AppError::Conflict("Email or username already exists".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        sqlx::query("INSERT INTO user_progress (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn set_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token = $1, reset_token_expiry = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(token)
        .bind(expiry)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_user_by_reset_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE reset_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password = $1, reset_token = NULL, reset_token_expiry = NULL, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_progress(&self, user_id: i64) -> Result<UserProgress, AppError> {
        let row = sqlx::query_as::<_, ProgressRow>(
            "SELECT completed_exercises, points FROM user_progress WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(UserProgress {
                completed_exercises: row.completed_exercises.0,
                points: row.points,
            }),
            None => {
                // Lazy initialization for accounts created before the
                // progress row existed.
                sqlx::query(
                    "INSERT INTO user_progress (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
                )
                .bind(user_id)
                .execute(&self.pool)
                .await?;

                Ok(UserProgress::default())
            }
        }
    }

    async fn complete_exercise(
        &self,
        user_id: i64,
        module_id: &str,
        exercise_id: &str,
        award: i32,
    ) -> Result<UserProgress, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO user_progress (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        // Row lock so concurrent completions of the same exercise cannot
        // double-award points.
        let row = sqlx::query_as::<_, ProgressRow>(
            "SELECT completed_exercises, points FROM user_progress WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut progress = UserProgress {
            completed_exercises: row.completed_exercises.0,
            points: row.points,
        };

        if progress.is_completed(module_id, exercise_id) {
            tx.commit().await?;
            return Ok(progress);
        }

        progress.completed_exercises.push(CompletedExercise {
            module_id: module_id.to_string(),
            exercise_id: exercise_id.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        });
        progress.points += award;

        sqlx::query(
            "UPDATE user_progress SET completed_exercises = $1, points = $2 WHERE user_id = $3",
        )
        .bind(Json(&progress.completed_exercises))
        .bind(progress.points)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(progress)
    }

    async fn get_all_modules(&self) -> Result<Vec<Module>, AppError> {
        let module_rows = sqlx::query_as::<_, ModuleRow>(
            "SELECT id, title, description, objectives, concepts FROM modules ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;

        let exercise_rows = sqlx::query_as::<_, ExerciseRow>(
            r#"
            SELECT e.module_id, e.id, e.title, e.description, e.problem, e.example, e.model_answer
            FROM exercises e
            JOIN modules m ON m.id = e.module_id
            ORDER BY m.position, e.position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut modules: Vec<Module> = module_rows
            .into_iter()
            .map(|row| Module {
                id: row.id,
                title: row.title,
                description: row.description,
                objectives: row.objectives.0,
                concepts: row.concepts.0,
                exercises: Vec::new(),
            })
            .collect();

        for row in exercise_rows {
            if let Some(module) = modules.iter_mut().find(|m| m.id == row.module_id) {
                module.exercises.push(Exercise::from(row));
            }
        }

        Ok(modules)
    }

    async fn get_module(&self, module_id: &str) -> Result<Option<Module>, AppError> {
        let row = sqlx::query_as::<_, ModuleRow>(
            "SELECT id, title, description, objectives, concepts FROM modules WHERE id = $1",
        )
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let exercises = self.exercises_for(module_id).await?;

        Ok(Some(Module {
            id: row.id,
            title: row.title,
            description: row.description,
            objectives: row.objectives.0,
            concepts: row.concepts.0,
            exercises,
        }))
    }

    async fn get_exercise(
        &self,
        module_id: &str,
        exercise_id: &str,
    ) -> Result<Option<Exercise>, AppError> {
        let row = sqlx::query_as::<_, ExerciseRow>(
            r#"
            SELECT module_id, id, title, description, problem, example, model_answer
            FROM exercises
            WHERE module_id = $1 AND id = $2
            "#,
        )
        .bind(module_id)
        .bind(exercise_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Exercise::from))
    }

    async fn get_leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT
                u.id AS user_id,
                u.username,
                p.points,
                jsonb_array_length(p.completed_exercises) AS completed_exercises
            FROM users u
            JOIN user_progress p ON p.user_id = u.id
            WHERE p.points > 0
            ORDER BY p.points DESC, jsonb_array_length(p.completed_exercises) DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
