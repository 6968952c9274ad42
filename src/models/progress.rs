// src/models/progress.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One completed-exercise record.
/// At most one exists per (user, module, exercise) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExercise {
    pub module_id: String,
    pub exercise_id: String,
    /// Completion time as Unix milliseconds.
    pub timestamp: i64,
}

/// Per-user progress: the completed-exercise list plus accumulated points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub completed_exercises: Vec<CompletedExercise>,
    pub points: i32,
}

impl UserProgress {
    pub fn is_completed(&self, module_id: &str, exercise_id: &str) -> bool {
        self.completed_exercises
            .iter()
            .any(|ex| ex.module_id == module_id && ex.exercise_id == exercise_id)
    }
}

/// DTO for completing an exercise.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteExerciseRequest {
    #[validate(length(min = 1))]
    pub module_id: String,
    #[validate(length(min = 1))]
    pub exercise_id: String,
}

/// Per-module completion counts, derived from catalog + progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: String,
    pub title: String,
    pub completed: usize,
    pub total: usize,
}

/// Derived overview across the whole catalog. Never stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub modules: Vec<ModuleProgress>,
    pub completed_exercises: usize,
    pub total_exercises: usize,
    /// Modules where every exercise is completed.
    pub completed_modules: usize,
    pub points: i32,
}
