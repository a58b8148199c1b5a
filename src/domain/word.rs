use serde::{Deserialize, Serialize};

/// One entry of the built-in exam word bank. Order of entries defines the
/// day partition; entries are unique by `word`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
  pub word: String,
  pub meaning: String,
}

impl WordEntry {
  pub fn new(word: &str, meaning: &str) -> Self {
    Self {
      word: word.to_string(),
      meaning: meaning.to_string(),
    }
  }
}

/// Enriched study card produced by the content provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabCard {
  pub word: String,
  pub meaning: String,
  pub pronunciation: String,
  pub example_sentence: String,
  pub example_translation: String,
  pub synonyms: Vec<String>,
}

/// AI-generated multiple-choice grammar question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarQuestion {
  pub id: String,
  pub question_text: String,
  pub options: Vec<String>,
  pub correct_index: usize,
  pub explanation: String,
  pub topic: String,
}
