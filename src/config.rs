//! Application configuration constants.
//!
//! This module centralizes all configurable values so they are not
//! hardcoded throughout the codebase.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            if let Some(db) = config.database {
                if let Some(path) = db.path {
                    tracing::info!("Using database from config.toml: {}", path);
                    return PathBuf::from(path);
                }
            }
        }
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    // Default
    let default = PathBuf::from(crate::paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Study Configuration ====================

/// Words shown per page in the vocabulary view; also the day partition size.
pub const PAGE_SIZE: usize = 5;

/// Number of distractor meanings per speed-quiz question
pub const DISTRACTOR_COUNT: usize = 3;

/// Total options per quiz question (correct meaning + distractors)
pub const OPTION_COUNT: usize = DISTRACTOR_COUNT + 1;

/// Seconds allowed per speed-quiz question
pub const QUESTION_SECONDS: u32 = 5;

/// Default question-count target for a normal speed quiz
pub const DEFAULT_QUIZ_TARGET: usize = 10;

/// Milliseconds the answer ruling stays visible before the next question
pub const ANSWER_DISPLAY_MS: u64 = 1000;

/// Cards fetched per vocabulary request
pub const DEFAULT_VOCAB_COUNT: usize = 5;

/// Questions fetched per grammar set
pub const DEFAULT_GRAMMAR_COUNT: usize = 3;

// ==================== Topic Catalogs ====================

/// Topic meaning "my word bank": cards are built from the local catalog
/// instead of being freshly generated.
pub const WORDBANK_TOPIC: &str = "내 단어장";

/// Topic meaning "everything": mixed generation, no category restriction.
pub const ALL_TOPIC: &str = "전체";

/// Vocabulary view topic chips, in display order
pub const VOCAB_TOPICS: [&str; 7] = [
    WORDBANK_TOPIC,
    ALL_TOPIC,
    "독해 빈출",
    "유의어/반의어",
    "숙어/이어동사",
    "생활영어",
    "법률/행정 어휘",
];

/// Grammar view topic chips, in display order
pub const GRAMMAR_TOPICS: [&str; 7] = [
    ALL_TOPIC,
    "문장의 구조",
    "시제/태",
    "준동사",
    "관계사/접속사",
    "가정법",
    "일치/화법",
];

// ==================== Content Provider ====================

/// Gemini model used for card and question generation
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Sampling temperature for generation requests
pub const GEMINI_TEMPERATURE: f64 = 0.7;

/// Read the Gemini API key from the environment (.env supported).
pub fn gemini_api_key() -> Option<String> {
    let _ = dotenvy::dotenv();
    std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_count_matches_distractors() {
        assert_eq!(OPTION_COUNT, DISTRACTOR_COUNT + 1);
        assert_eq!(OPTION_COUNT, 4);
    }

    #[test]
    fn test_topic_catalogs_lead_with_defaults() {
        assert_eq!(VOCAB_TOPICS[0], WORDBANK_TOPIC);
        assert_eq!(GRAMMAR_TOPICS[0], ALL_TOPIC);
    }

    #[test]
    fn test_server_bind_addr_format() {
        assert_eq!(server_bind_addr(), format!("0.0.0.0:{}", SERVER_PORT));
    }
}
