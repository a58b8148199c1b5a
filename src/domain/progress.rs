use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::WordEntry;

/// How the vocabulary view walks the word bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningMode {
  Sequential,
  Random,
}

impl LearningMode {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "sequential" => Some(Self::Sequential),
      "random" => Some(Self::Random),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Sequential => "sequential",
      Self::Random => "random",
    }
  }
}

/// Persisted cursor state of the vocabulary view.
///
/// Invariant: in sequential mode `cursor_index` lies inside the current day's
/// index range. Random mode ignores the cursor entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
  #[serde(rename = "index")]
  pub cursor_index: usize,
  pub mode: LearningMode,
  pub day: u32,
}

impl Default for ProgressState {
  fn default() -> Self {
    Self {
      cursor_index: 0,
      mode: LearningMode::Sequential,
      day: 1,
    }
  }
}

/// Aggregate activity counters. Monotonic; never decremented.
///
/// `streak` is initialized to 1 and currently never incremented day-over-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCounters {
  pub vocab_learned: i64,
  pub grammar_solved: i64,
  pub grammar_correct: i64,
  pub streak: i64,
  pub last_login_date: String,
}

impl Default for StatsCounters {
  fn default() -> Self {
    Self {
      vocab_learned: 0,
      grammar_solved: 0,
      grammar_correct: 0,
      streak: 1,
      last_login_date: String::new(),
    }
  }
}

/// Words the learner has answered wrong, driving the "오답 집중 공략" quiz.
/// Ordered, unique by word string (meaning text plays no part in identity).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncorrectSet {
  entries: Vec<WordEntry>,
}

impl IncorrectSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn contains(&self, word: &str) -> bool {
    self.entries.iter().any(|e| e.word == word)
  }

  pub fn entries(&self) -> &[WordEntry] {
    &self.entries
  }

  /// Add a missed word unless it is already present.
  pub fn insert(&mut self, entry: WordEntry) -> bool {
    if self.contains(&entry.word) {
      return false;
    }
    self.entries.push(entry);
    true
  }

  /// Remove a mastered word, keyed by word string only.
  pub fn remove(&mut self, word: &str) -> bool {
    let before = self.entries.len();
    self.entries.retain(|e| e.word != word);
    before != self.entries.len()
  }

  pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<WordEntry> {
    let mut entries = self.entries.clone();
    entries.shuffle(rng);
    entries
  }
}
