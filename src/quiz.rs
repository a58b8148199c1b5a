//! Five-second speed quiz over the word bank.
//!
//! A session moves Intro -> Playing -> Result. Each question shows one word
//! and four meanings; the countdown auto-submits a timeout sentinel when it
//! reaches zero. Ticks carry the generation they were armed for, so a timer
//! left over from an earlier question is ignored instead of firing twice.

use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::{Connection, Result};
use serde::Serialize;

use crate::config;
use crate::db;
use crate::domain::{IncorrectSet, LearningMode, ProgressState, WordBank, WordEntry};

/// Submitted in place of an option index when the countdown expires.
pub const TIMEOUT_SENTINEL: isize = -1;

/// Shown as the selected answer for a timed-out question.
pub const TIMEOUT_LABEL: &str = "(시간 초과)";

/// Which pool the quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizSource {
  Normal,
  Incorrect,
}

impl QuizSource {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "normal" => Some(Self::Normal),
      "incorrect" => Some(Self::Incorrect),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Normal => "normal",
      Self::Incorrect => "incorrect",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizPhase {
  Intro,
  Playing,
  Result,
}

/// One prepared question: the prompt word and four shuffled meanings.
/// Distractor meanings are drawn without replacement from other bank entries;
/// two entries sharing a meaning text can therefore produce duplicate options.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
  pub word: String,
  pub meaning: String,
  pub options: Vec<String>,
  pub correct_index: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
  pub word: String,
  pub is_correct: bool,
  pub selected_answer: String,
}

/// What a countdown tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
  /// The tick belonged to an older question or an already answered one.
  Stale,
  /// Countdown still running; carries the seconds left.
  Counting(u32),
  /// Countdown hit zero and the timeout sentinel was submitted.
  TimedOut,
}

pub struct QuizSession {
  source: QuizSource,
  questions: Vec<QuizQuestion>,
  index: usize,
  results: Vec<QuizResult>,
  phase: QuizPhase,
  remaining: u32,
  generation: u64,
  answered: bool,
}

impl QuizSession {
  /// Build a normal quiz. Sequential study on the word-bank topic quizzes
  /// the current day only; otherwise the whole bank is fair game, capped
  /// at `target` questions. Returns None when no words are available.
  pub fn start_normal<R: Rng + ?Sized>(
    bank: &WordBank,
    progress: &ProgressState,
    target: usize,
    on_bank_topic: bool,
    rng: &mut R,
  ) -> Option<Self> {
    let targets = if progress.mode == LearningMode::Sequential && on_bank_topic {
      // A persisted day can be stale for the current bank; clamp before slicing.
      let day = progress.day.clamp(1, bank.total_days().max(1));
      let mut day_words = bank.day_slice(day).to_vec();
      day_words.shuffle(rng);
      day_words.truncate(target);
      day_words
    } else {
      bank.shuffled_capped(target, rng)
    };
    Self::with_targets(QuizSource::Normal, targets, bank, rng)
  }

  /// Build a review quiz over every currently incorrect word, in shuffled
  /// order and uncapped. Returns None when the review queue is empty.
  pub fn start_incorrect<R: Rng + ?Sized>(
    set: &IncorrectSet,
    bank: &WordBank,
    rng: &mut R,
  ) -> Option<Self> {
    Self::with_targets(QuizSource::Incorrect, set.shuffled(rng), bank, rng)
  }

  fn with_targets<R: Rng + ?Sized>(
    source: QuizSource,
    targets: Vec<WordEntry>,
    bank: &WordBank,
    rng: &mut R,
  ) -> Option<Self> {
    if targets.is_empty() {
      return None;
    }
    let questions = targets
      .iter()
      .map(|target| build_question(target, bank, rng))
      .collect();
    Some(Self {
      source,
      questions,
      index: 0,
      results: Vec::new(),
      phase: QuizPhase::Intro,
      remaining: config::QUESTION_SECONDS,
      generation: 0,
      answered: false,
    })
  }

  pub fn source(&self) -> QuizSource {
    self.source
  }

  pub fn phase(&self) -> QuizPhase {
    self.phase
  }

  pub fn question_count(&self) -> usize {
    self.questions.len()
  }

  pub fn question_index(&self) -> usize {
    self.index
  }

  pub fn current_question(&self) -> Option<&QuizQuestion> {
    self.questions.get(self.index)
  }

  pub fn remaining(&self) -> u32 {
    self.remaining
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn is_answered(&self) -> bool {
    self.answered
  }

  pub fn results(&self) -> &[QuizResult] {
    &self.results
  }

  pub fn correct_count(&self) -> usize {
    self.results.iter().filter(|r| r.is_correct).count()
  }

  /// Leave the intro screen and arm the first countdown.
  pub fn begin(&mut self) {
    if self.phase == QuizPhase::Intro {
      self.phase = QuizPhase::Playing;
      self.remaining = config::QUESTION_SECONDS;
    }
  }

  /// Apply one countdown second. Ticks from a generation other than the
  /// current one are dropped, as are ticks after the question was answered.
  pub fn tick(&mut self, conn: &Connection, generation: u64) -> Result<TickOutcome> {
    if self.phase != QuizPhase::Playing || generation != self.generation || self.answered {
      return Ok(TickOutcome::Stale);
    }
    self.remaining = self.remaining.saturating_sub(1);
    if self.remaining == 0 {
      self.submit_answer(conn, TIMEOUT_SENTINEL)?;
      return Ok(TickOutcome::TimedOut);
    }
    Ok(TickOutcome::Counting(self.remaining))
  }

  /// Record an answer for the current question. The first submission wins;
  /// later ones (including a late timeout) return None and change nothing.
  ///
  /// A wrong answer or timeout adds the word to the review queue. A correct
  /// answer removes it only during a review quiz.
  pub fn submit_answer(&mut self, conn: &Connection, choice: isize) -> Result<Option<bool>> {
    if self.phase != QuizPhase::Playing || self.answered {
      return Ok(None);
    }
    let Some(question) = self.questions.get(self.index) else {
      return Ok(None);
    };
    // Only a real option or the timeout sentinel counts as a submission.
    if choice >= 0 && choice as usize >= question.options.len() {
      return Ok(None);
    }
    self.answered = true;

    let is_correct = choice >= 0 && choice as usize == question.correct_index;
    let selected_answer = if choice < 0 {
      TIMEOUT_LABEL.to_string()
    } else {
      question.options[choice as usize].clone()
    };

    if is_correct {
      if self.source == QuizSource::Incorrect {
        db::remove_incorrect(conn, &question.word)?;
      }
    } else {
      db::add_incorrect(conn, &WordEntry::new(&question.word, &question.meaning))?;
    }

    self.results.push(QuizResult {
      word: question.word.clone(),
      is_correct,
      selected_answer,
    });
    Ok(Some(is_correct))
  }

  /// Move past an answered question: re-arm the countdown for the next one,
  /// or enter the result phase after the last. The generation bump retires
  /// whatever timer was serving the previous question.
  pub fn advance_question(&mut self) {
    if self.phase != QuizPhase::Playing || !self.answered {
      return;
    }
    self.generation += 1;
    if self.index + 1 < self.questions.len() {
      self.index += 1;
      self.answered = false;
      self.remaining = config::QUESTION_SECONDS;
    } else {
      self.phase = QuizPhase::Result;
    }
  }
}

/// Pair a target word with three distractor meanings drawn from other bank
/// entries without replacement, then shuffle the four options.
fn build_question<R: Rng + ?Sized>(
  target: &WordEntry,
  bank: &WordBank,
  rng: &mut R,
) -> QuizQuestion {
  let candidates: Vec<&WordEntry> = bank
    .words()
    .iter()
    .filter(|w| w.word != target.word)
    .collect();
  let count = config::DISTRACTOR_COUNT.min(candidates.len());
  let picked = rand::seq::index::sample(rng, candidates.len(), count);

  let mut options: Vec<(String, bool)> = picked
    .iter()
    .map(|i| (candidates[i].meaning.clone(), false))
    .collect();
  options.push((target.meaning.clone(), true));
  options.shuffle(rng);

  // Find the correct slot by marker, not by text: a distractor may carry
  // the same meaning text as the answer.
  let correct_index = options
    .iter()
    .position(|(_, correct)| *correct)
    .unwrap_or(0);

  QuizQuestion {
    word: target.word.clone(),
    meaning: target.meaning.clone(),
    options: options.into_iter().map(|(text, _)| text).collect(),
    correct_index,
  }
}
