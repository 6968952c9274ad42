// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 7 days).
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,

    /// Groq API key. When absent, every evaluation uses the heuristic scorer.
    pub groq_api_key: Option<String>,
    pub groq_api_url: String,
    pub groq_model: String,
    pub groq_timeout_secs: u64,

    /// Points awarded per completed exercise.
    pub point_award: i32,
    /// Upper bound of the feedback score scale.
    pub max_score: f64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7 * 24 * 3600);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let groq_api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());

        let groq_api_url = env::var("GROQ_API_URL")
            .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string());

        let groq_model =
            env::var("GROQ_MODEL").unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());

        let groq_timeout_secs = env::var("GROQ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let point_award = env::var("POINT_AWARD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let max_score = env::var("MAX_SCORE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10.0);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            groq_api_key,
            groq_api_url,
            groq_model,
            groq_timeout_secs,
            point_award,
            max_score,
        }
    }
}
