// src/models/leaderboard.rs

use serde::Serialize;
use sqlx::FromRow;

/// Aggregated row for the leaderboard, joined from `users` and
/// `user_progress`. Ranked by points, then completed-exercise count.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub username: String,
    pub points: i32,
    pub completed_exercises: i32,
}
