// src/evaluator/heuristic.rs
//
// Deterministic scorer used whenever the upstream LLM call fails or returns
// an unusable body. Scores from prompt length plus two bonuses: keyword
// overlap with the problem statement and structural similarity to the
// example prompt.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::feedback::Feedback;

static NUMBERED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s").expect("valid regex"));
static BULLET_POINTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[•*]|-\s").expect("valid regex"));
static SECTION_HEADERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][^.!?]*:").expect("valid regex"));
static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(write|create|generate|list|explain|analyze)").expect("valid regex")
});

pub const FALLBACK_DISCLAIMER: &str =
    "Note: This is a simplified evaluation. Try again later for AI-powered feedback.";

/// Produces degraded-mode feedback without any external call.
pub fn fallback_feedback(user_prompt: &str, problem: &str, example: &str, max_score: f64) -> Feedback {
    let prompt_length = user_prompt.chars().count();
    let has_problem_keywords = keyword_match(user_prompt, problem);
    let has_example_pattern = pattern_match(user_prompt, example);

    let mut score: f64;
    let mut suggestions: Vec<String> = Vec::new();

    // Basic length check
    if prompt_length < 20 {
        score = 3.0;
        suggestions.push(
            "Your prompt is too short. Consider adding more specific instructions.".to_string(),
        );
    } else if prompt_length < 50 {
        score = 5.0;
        suggestions
            .push("Your prompt could be more detailed to get better results.".to_string());
    } else {
        score = 7.0;
    }

    // Keyword matching improves score
    if has_problem_keywords {
        score += 1.0;
    } else {
        suggestions.push(
            "Try including more specific terms related to the exercise problem.".to_string(),
        );
    }

    // Pattern matching from example improves score
    if has_example_pattern {
        score += 2.0;
    } else {
        suggestions.push(
            "Your prompt could benefit from following the pattern shown in the example."
                .to_string(),
        );
    }

    score = score.min(max_score);

    // For high scores, add positive feedback
    if score >= 8.0 && suggestions.len() < 3 {
        suggestions.push("Great job! Your prompt is clear and well-structured.".to_string());
    }

    suggestions.push(FALLBACK_DISCLAIMER.to_string());

    Feedback { score, suggestions }
}

/// True when the prompt contains any of the first five "significant" words
/// (longer than 5 chars) of the problem statement, case-insensitively.
fn keyword_match(user_prompt: &str, problem: &str) -> bool {
    let prompt_lower = user_prompt.to_lowercase();
    problem
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 5)
        .take(5)
        .any(|word| prompt_lower.contains(word))
}

/// True when the two texts share at least one structural pattern.
fn pattern_match(user_prompt: &str, example: &str) -> bool {
    let prompt_structure = text_structure(user_prompt);
    let example_structure = text_structure(example);

    prompt_structure
        .iter()
        .any(|s| example_structure.contains(s))
}

/// Boolean structural features of a text. A text exhibiting none of them is
/// tagged "plain-text".
fn text_structure(text: &str) -> Vec<&'static str> {
    let mut patterns = Vec::new();

    if NUMBERED_LIST.is_match(text) {
        patterns.push("numbered-list");
    }
    if BULLET_POINTS.is_match(text) {
        patterns.push("bullet-points");
    }
    if SECTION_HEADERS.is_match(text) {
        patterns.push("section-headers");
    }
    if text.contains('?') {
        patterns.push("questions");
    }
    if COMMAND.is_match(text) {
        patterns.push("command");
    }

    if patterns.is_empty() {
        patterns.push("plain-text");
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEM: &str =
        "Craft a zero-shot prompt that asks the AI to generate a short poem about technology.";

    // Structure: plain-text (no list, bullet, header, question or leading verb).
    const PLAIN_EXAMPLE: &str = "Act as a historical scholar specializing in Ancient Rome \
         and explain the significance of the Colosseum in Roman society.";

    #[test]
    fn short_prompt_scores_base_three() {
        let feedback = fallback_feedback("Write a poem.", PROBLEM, PLAIN_EXAMPLE, 10.0);

        assert_eq!(feedback.score, 3.0);
        assert!(
            feedback
                .suggestions
                .iter()
                .any(|s| s.contains("too short"))
        );
        assert_eq!(feedback.suggestions.last().unwrap(), FALLBACK_DISCLAIMER);
    }

    #[test]
    fn medium_prompt_scores_base_five() {
        // 20 <= len < 50; question structure does not match the plain example
        let feedback = fallback_feedback("Anything good to say?", PROBLEM, PLAIN_EXAMPLE, 10.0);
        assert_eq!(feedback.score, 5.0);
    }

    #[test]
    fn long_prompt_scores_base_seven() {
        let prompt = "Could you compose a lovely haiku about mountains and rivers today?";
        let feedback = fallback_feedback(prompt, PROBLEM, PLAIN_EXAMPLE, 10.0);
        assert_eq!(feedback.score, 7.0);
    }

    #[test]
    fn keyword_bonus_awarded() {
        // "generate" is among the first five significant words of the problem
        let feedback = fallback_feedback(
            "Can you generate for me a quick piece about robots today?",
            PROBLEM,
            PLAIN_EXAMPLE,
            10.0,
        );
        assert_eq!(feedback.score, 8.0);
    }

    #[test]
    fn structure_bonus_awarded() {
        // Leading imperative verb shared with the example
        let example = "Write a poem about the ocean that has exactly 4 lines and mentions seagulls.";
        let feedback = fallback_feedback("Write a poem.", PROBLEM, example, 10.0);
        assert_eq!(feedback.score, 5.0);
    }

    #[test]
    fn score_clamped_to_max() {
        // Base 7 + keyword 1 + structure 2 = 10, clamped
        let prompt = "Generate a short poem about technology with 1. a metaphor and 2. a title";
        let example = "Generate a table of 3 healthy breakfast recipes with columns for meal name.";
        let feedback = fallback_feedback(prompt, PROBLEM, example, 10.0);
        assert_eq!(feedback.score, 10.0);
        assert_eq!(feedback.suggestions.last().unwrap(), FALLBACK_DISCLAIMER);
    }

    #[test]
    fn high_score_adds_praise() {
        let prompt = "Generate a short poem about technology with 1. a metaphor and 2. a title";
        let example = "Generate a table of 3 healthy breakfast recipes.";
        let feedback = fallback_feedback(prompt, PROBLEM, example, 10.0);
        assert!(feedback.suggestions.iter().any(|s| s.contains("Great job")));
    }

    #[test]
    fn plain_text_tags_intersect() {
        assert_eq!(text_structure("hello there"), vec!["plain-text"]);
        assert!(pattern_match("hello there", "general thoughts"));
    }

    #[test]
    fn structure_detection() {
        assert!(text_structure("Steps: 1. do this 2. do that").contains(&"numbered-list"));
        assert!(text_structure("- item one\n- item two").contains(&"bullet-points"));
        assert!(text_structure("Context: you are a pirate").contains(&"section-headers"));
        assert!(text_structure("what is the answer?").contains(&"questions"));
        assert!(text_structure("Explain the theory of relativity").contains(&"command"));
    }
}
