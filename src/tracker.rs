//! Vocabulary progress tracker: decides which slice of the word bank the
//! study view shows next and keeps the persisted cursor state consistent.
//!
//! Every mutation saves the full progress record synchronously so a reload
//! resumes exactly where the learner left off.

use rand::Rng;
use rusqlite::{Connection, Result};

use crate::db;
use crate::domain::{LearningMode, ProgressState, WordBank, WordEntry};

pub struct VocabularyTracker<'a> {
  bank: &'a WordBank,
  state: ProgressState,
}

impl<'a> VocabularyTracker<'a> {
  /// Load the persisted cursor, repairing it against the current bank.
  pub fn load(bank: &'a WordBank, conn: &Connection) -> Result<Self> {
    let state = db::load_progress(conn)?;
    let mut tracker = Self { bank, state };
    tracker.repair();
    Ok(tracker)
  }

  /// Build a tracker from explicit state (tests and in-memory use).
  pub fn with_state(bank: &'a WordBank, state: ProgressState) -> Self {
    let mut tracker = Self { bank, state };
    tracker.repair();
    tracker
  }

  pub fn state(&self) -> &ProgressState {
    &self.state
  }

  pub fn bank(&self) -> &WordBank {
    self.bank
  }

  /// Clamp day and cursor back into range. A stale record (e.g. from a
  /// differently sized bank) degrades to the nearest valid position.
  fn repair(&mut self) {
    let total = self.bank.total_days().max(1);
    self.state.day = self.state.day.clamp(1, total);
    if self.state.mode == LearningMode::Sequential {
      let start = self.day_start();
      let last = self.day_end().saturating_sub(1).max(start);
      self.state.cursor_index = self.state.cursor_index.clamp(start, last);
    }
  }

  fn day_start(&self) -> usize {
    self.bank.day_start(self.state.day)
  }

  fn day_end(&self) -> usize {
    self.bank.day_end(self.state.day)
  }

  /// Highest cursor that keeps a full window inside the current day.
  fn max_cursor(&self) -> usize {
    let start = self.day_start();
    let end = self.day_end();
    start.max(end.saturating_sub(self.bank.page_size()))
  }

  /// Jump to a day and reset the cursor to its start.
  /// Days outside `1..=total_days` are clamped.
  pub fn select_day(&mut self, conn: &Connection, day: u32) -> Result<()> {
    self.state.day = day.clamp(1, self.bank.total_days().max(1));
    self.state.cursor_index = self.day_start();
    self.persist(conn)
  }

  /// Move the cursor by `step` words, clamped so the displayed window never
  /// leaves the current day. No-op in random mode.
  pub fn advance(&mut self, conn: &Connection, step: isize) -> Result<()> {
    if self.state.mode != LearningMode::Sequential {
      return Ok(());
    }
    let moved = self.state.cursor_index as isize + step;
    self.state.cursor_index =
      (moved.max(0) as usize).clamp(self.day_start(), self.max_cursor());
    self.persist(conn)
  }

  /// Flip between sequential and random study. Switching back to sequential
  /// resets the cursor to the current day's start.
  pub fn toggle_mode(&mut self, conn: &Connection) -> Result<()> {
    self.state.mode = match self.state.mode {
      LearningMode::Sequential => LearningMode::Random,
      LearningMode::Random => {
        self.state.cursor_index = self.day_start();
        LearningMode::Sequential
      }
    };
    self.persist(conn)
  }

  /// The words to enrich and display: a deterministic slice in sequential
  /// mode, a fresh uniform sample (re-drawn each call) in random mode.
  pub fn current_window<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<WordEntry> {
    match self.state.mode {
      LearningMode::Sequential => {
        let start = self.state.cursor_index;
        let end = (start + self.bank.page_size()).min(self.day_end());
        self.bank.slice(start, end).to_vec()
      }
      LearningMode::Random => self.bank.random_sample(self.bank.page_size(), rng),
    }
  }

  /// Position within the current day, in [0,1]. Zero in random mode.
  pub fn progress_fraction(&self) -> f64 {
    if self.state.mode != LearningMode::Sequential {
      return 0.0;
    }
    let day_len = self.bank.day_len(self.state.day);
    if day_len == 0 {
      return 0.0;
    }
    let done = self.state.cursor_index.saturating_sub(self.day_start());
    (done as f64 / day_len as f64).clamp(0.0, 1.0)
  }

  /// Whether the "previous" affordance should be enabled.
  pub fn can_go_prev(&self) -> bool {
    self.state.mode == LearningMode::Sequential && self.state.cursor_index > self.day_start()
  }

  /// Whether the "next" affordance should be enabled.
  pub fn can_go_next(&self) -> bool {
    self.state.mode == LearningMode::Sequential
      && self.state.cursor_index + self.bank.page_size() < self.day_end()
  }

  fn persist(&self, conn: &Connection) -> Result<()> {
    db::save_progress(conn, &self.state)
  }
}
