// src/models/mod.rs

pub mod feedback;
pub mod leaderboard;
pub mod module;
pub mod progress;
pub mod user;
