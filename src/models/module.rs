// src/models/module.rs

use serde::{Deserialize, Serialize};

/// A single prompt-writing task within a module.
/// Immutable reference data seeded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub title: String,
    pub description: String,

    /// The task the learner's prompt must address.
    pub problem: String,

    /// A canonical example prompt for a similar task.
    pub example: String,

    /// Optional reference answer shown after completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_answer: Option<String>,
}

/// A (term, definition) pair introducing a prompt-engineering concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub term: String,
    pub definition: String,
}

/// A themed unit of learning content.
/// Owns its exercises by composition; order matters for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    pub description: String,
    pub objectives: Vec<String>,
    pub concepts: Vec<Concept>,
    pub exercises: Vec<Exercise>,
}
