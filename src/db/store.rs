//! Persisted key-value records: vocabulary progress, incorrect words, stats.
//!
//! Three independent buckets, each stored as one JSON value and overwritten
//! whole on every save. A missing or malformed record falls back to its
//! default rather than surfacing an error.

use rusqlite::{params, Connection, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::LogOnError;
use crate::domain::{IncorrectSet, ProgressState, StatsCounters, WordEntry};

/// Bucket keys
pub const STATS_KEY: &str = "stats";
pub const PROGRESS_KEY: &str = "vocab_progress";
pub const INCORRECT_KEY: &str = "incorrect_words";

fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM store WHERE key = ?1")?;
    let mut rows = stmt.query(params![key])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row.get(0)?))
    } else {
        Ok(None)
    }
}

fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO store (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

/// Load a record, treating malformed JSON as absent.
fn load_record<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let Some(raw) = get_value(conn, key)? else {
        return Ok(None);
    };
    Ok(serde_json::from_str(&raw).log_warn(&format!("Discarding malformed '{}' record", key)))
}

fn save_record<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
    set_value(conn, key, &raw)
}

// ==================== Vocabulary Progress ====================

pub fn load_progress(conn: &Connection) -> Result<ProgressState> {
    Ok(load_record(conn, PROGRESS_KEY)?.unwrap_or_default())
}

pub fn save_progress(conn: &Connection, state: &ProgressState) -> Result<()> {
    save_record(conn, PROGRESS_KEY, state)
}

// ==================== Incorrect Words ====================

pub fn load_incorrect(conn: &Connection) -> Result<IncorrectSet> {
    Ok(load_record(conn, INCORRECT_KEY)?.unwrap_or_default())
}

pub fn save_incorrect(conn: &Connection, set: &IncorrectSet) -> Result<()> {
    save_record(conn, INCORRECT_KEY, set)
}

/// Record a missed word. Returns true if it was newly added.
pub fn add_incorrect(conn: &Connection, entry: &WordEntry) -> Result<bool> {
    let mut set = load_incorrect(conn)?;
    let added = set.insert(entry.clone());
    if added {
        save_incorrect(conn, &set)?;
    }
    Ok(added)
}

/// Clear a mastered word from the review queue, keyed by word string.
pub fn remove_incorrect(conn: &Connection, word: &str) -> Result<bool> {
    let mut set = load_incorrect(conn)?;
    let removed = set.remove(word);
    if removed {
        save_incorrect(conn, &set)?;
    }
    Ok(removed)
}

// ==================== Stats Counters ====================

pub fn load_stats(conn: &Connection) -> Result<StatsCounters> {
    Ok(load_record(conn, STATS_KEY)?.unwrap_or_default())
}

pub fn save_stats(conn: &Connection, stats: &StatsCounters) -> Result<()> {
    save_record(conn, STATS_KEY, stats)
}

/// Refresh the login date, creating the record on first visit.
///
/// The streak counter starts at 1 and has no day-over-day increment rule;
/// it is left untouched for existing records.
pub fn touch_login(conn: &Connection, today: &str) -> Result<StatsCounters> {
    let mut stats = load_stats(conn)?;
    if stats.last_login_date != today {
        stats.last_login_date = today.to_string();
        save_stats(conn, &stats)?;
    }
    Ok(stats)
}

pub fn increment_vocab_learned(conn: &Connection, n: i64) -> Result<StatsCounters> {
    let mut stats = load_stats(conn)?;
    stats.vocab_learned += n;
    save_stats(conn, &stats)?;
    Ok(stats)
}

pub fn increment_grammar_solved(conn: &Connection) -> Result<StatsCounters> {
    let mut stats = load_stats(conn)?;
    stats.grammar_solved += 1;
    save_stats(conn, &stats)?;
    Ok(stats)
}

pub fn increment_grammar_correct(conn: &Connection) -> Result<StatsCounters> {
    let mut stats = load_stats(conn)?;
    stats.grammar_correct += 1;
    save_stats(conn, &stats)?;
    Ok(stats)
}
