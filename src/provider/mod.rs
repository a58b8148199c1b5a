//! AI content generation boundary.
//!
//! The rest of the app talks to a `ContentProvider` trait object; the only
//! live implementation calls Gemini. Responses are all-or-nothing: a batch
//! that fails validation is rejected whole, and retries are left to the
//! caller.

pub mod gemini;

use async_trait::async_trait;

use crate::config;
use crate::domain::{GrammarQuestion, VocabCard, WordEntry};

pub use gemini::GeminiProvider;

/// Why a content fetch produced nothing.
#[derive(Debug)]
pub enum ProviderError {
  /// No API key is configured.
  Unconfigured,
  /// The request never completed (transport failure, timeout).
  Request(String),
  /// The service answered with a non-success status.
  Service(String),
  /// The payload arrived but did not validate.
  Malformed(String),
}

impl std::fmt::Display for ProviderError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Unconfigured => write!(f, "Content provider is not configured"),
      Self::Request(e) => write!(f, "Content request failed: {}", e),
      Self::Service(e) => write!(f, "Content service error: {}", e),
      Self::Malformed(e) => write!(f, "Malformed content response: {}", e),
    }
  }
}

impl std::error::Error for ProviderError {}

#[async_trait]
pub trait ContentProvider: Send + Sync {
  /// Enrich `words` into study cards, or generate `count` fresh cards for
  /// `topic` when no explicit words are given.
  async fn fetch_vocab_cards(
    &self,
    words: Option<&[WordEntry]>,
    topic: &str,
    count: usize,
  ) -> Result<Vec<VocabCard>, ProviderError>;

  /// Generate `count` multiple-choice grammar questions for `topic`.
  async fn fetch_grammar_questions(
    &self,
    topic: &str,
    count: usize,
  ) -> Result<Vec<GrammarQuestion>, ProviderError>;
}

/// Reject a card batch unless it covers the request exactly: one card per
/// requested word in the same order, or `count` cards for topic generation.
pub fn validate_cards(
  cards: &[VocabCard],
  words: Option<&[WordEntry]>,
  count: usize,
) -> Result<(), ProviderError> {
  match words {
    Some(words) => {
      if cards.len() != words.len() {
        return Err(ProviderError::Malformed(format!(
          "expected {} cards, got {}",
          words.len(),
          cards.len()
        )));
      }
      for (card, entry) in cards.iter().zip(words) {
        if card.word != entry.word {
          return Err(ProviderError::Malformed(format!(
            "card order mismatch: expected '{}', got '{}'",
            entry.word, card.word
          )));
        }
      }
    }
    None => {
      if cards.len() != count {
        return Err(ProviderError::Malformed(format!(
          "expected {} cards, got {}",
          count,
          cards.len()
        )));
      }
    }
  }
  Ok(())
}

/// Reject a question batch unless every question is answerable: exactly
/// four options with the correct index in range.
pub fn validate_questions(
  questions: &[GrammarQuestion],
  count: usize,
) -> Result<(), ProviderError> {
  if questions.len() != count {
    return Err(ProviderError::Malformed(format!(
      "expected {} questions, got {}",
      count,
      questions.len()
    )));
  }
  for q in questions {
    if q.options.len() != config::OPTION_COUNT {
      return Err(ProviderError::Malformed(format!(
        "question '{}' has {} options",
        q.id,
        q.options.len()
      )));
    }
    if q.correct_index >= q.options.len() {
      return Err(ProviderError::Malformed(format!(
        "question '{}' has out-of-range answer index {}",
        q.id, q.correct_index
      )));
    }
  }
  Ok(())
}
