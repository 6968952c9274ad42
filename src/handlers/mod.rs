// src/handlers/mod.rs

pub mod auth;
pub mod evaluate;
pub mod leaderboard;
pub mod module;
pub mod progress;
