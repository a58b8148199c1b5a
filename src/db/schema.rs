use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS words (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      position INTEGER NOT NULL UNIQUE,
      word TEXT NOT NULL UNIQUE,
      meaning TEXT NOT NULL
    );

    -- Independent persisted records (stats / vocab_progress / incorrect_words),
    -- each a JSON value overwritten as a whole. No cross-record transactions.
    CREATE TABLE IF NOT EXISTS store (
      key TEXT PRIMARY KEY,
      value TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_words_position ON words(position);
    "#,
  )?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_migrations_are_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();

    let count: i64 = conn
      .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))
      .unwrap();
    assert_eq!(count, 0);
  }

  #[test]
  fn test_word_uniqueness_enforced() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();

    conn
      .execute(
        "INSERT INTO words (position, word, meaning) VALUES (0, 'abate', '약화되다')",
        [],
      )
      .unwrap();
    let dup = conn.execute(
      "INSERT INTO words (position, word, meaning) VALUES (1, 'abate', '다른 뜻')",
      [],
    );
    assert!(dup.is_err());
  }
}
