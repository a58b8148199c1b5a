//! Project path functions - single source of truth for all file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//!
//! This allows running an isolated server instance for E2E testing:
//! ```bash
//! DATA_DIR=data/test cargo run
//! ```

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// SQLite database path
pub fn db_path() -> String {
    format!("{}/gongmaster.db", data_dir())
}

/// Static frontend assets directory - not under DATA_DIR
pub const STATIC_DIR: &str = "static";

#[cfg(test)]
mod tests {
    use super::*;

    // Note: We can't easily test env var override because OnceLock
    // initializes once. These tests verify the default behavior.

    #[test]
    fn test_data_dir_default() {
        let dir = data_dir();
        assert!(!dir.is_empty());
    }

    #[test]
    fn test_db_path_format() {
        let path = db_path();
        assert!(path.ends_with("/gongmaster.db"));
    }
}
