//! Gemini-backed content provider.
//!
//! Calls the `generateContent` REST endpoint with a JSON response schema so
//! the model answers in exactly the record shapes the app stores. Batches
//! that fail validation are rejected whole.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;
use crate::domain::{GrammarQuestion, VocabCard, WordEntry};
use crate::provider::{validate_cards, validate_questions, ContentProvider, ProviderError};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiProvider {
  client: reqwest::Client,
  api_key: String,
  model: String,
}

impl GeminiProvider {
  pub fn new(api_key: String) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_key,
      model: config::GEMINI_MODEL.to_string(),
    }
  }

  async fn generate(&self, prompt: &str, schema: Value) -> Result<String, ProviderError> {
    if self.api_key.is_empty() {
      return Err(ProviderError::Unconfigured);
    }
    let url = format!("{}/{}:generateContent", API_BASE, self.model);
    let body = json!({
      "contents": [{ "parts": [{ "text": prompt }] }],
      "generationConfig": {
        "responseMimeType": "application/json",
        "responseSchema": schema,
        "temperature": config::GEMINI_TEMPERATURE,
      },
    });

    let response = self
      .client
      .post(&url)
      .header("x-goog-api-key", &self.api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| ProviderError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let detail = response.text().await.unwrap_or_default();
      return Err(ProviderError::Service(format!("{}: {}", status, detail)));
    }

    let parsed: GenerateResponse = response
      .json()
      .await
      .map_err(|e| ProviderError::Malformed(e.to_string()))?;
    extract_text(parsed)
  }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
  async fn fetch_vocab_cards(
    &self,
    words: Option<&[WordEntry]>,
    topic: &str,
    count: usize,
  ) -> Result<Vec<VocabCard>, ProviderError> {
    let prompt = vocab_prompt(words, topic, count);
    let text = self.generate(&prompt, vocab_schema()).await?;
    let cards: Vec<VocabCard> =
      serde_json::from_str(&text).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    validate_cards(&cards, words, count)?;
    Ok(cards)
  }

  async fn fetch_grammar_questions(
    &self,
    topic: &str,
    count: usize,
  ) -> Result<Vec<GrammarQuestion>, ProviderError> {
    let prompt = grammar_prompt(topic, count);
    let text = self.generate(&prompt, grammar_schema()).await?;
    let questions: Vec<GrammarQuestion> =
      serde_json::from_str(&text).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    validate_questions(&questions, count)?;
    Ok(questions)
  }
}

// ==================== Wire format ====================

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
  parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
  text: Option<String>,
}

fn extract_text(response: GenerateResponse) -> Result<String, ProviderError> {
  response
    .candidates
    .and_then(|mut c| c.drain(..).next())
    .and_then(|c| c.content)
    .and_then(|c| c.parts)
    .and_then(|mut p| p.drain(..).next())
    .and_then(|p| p.text)
    .ok_or_else(|| ProviderError::Malformed("response carries no text part".to_string()))
}

// ==================== Prompts and schemas ====================

fn vocab_prompt(words: Option<&[WordEntry]>, topic: &str, count: usize) -> String {
  match words {
    Some(words) => {
      let word_list = words
        .iter()
        .map(|w| format!("{} (meaning: {})", w.word, w.meaning))
        .collect::<Vec<_>>()
        .join(", ");
      format!(
        "Create detailed vocabulary study cards for exactly these {} words: {}. \
         Use the provided Korean meanings as the primary definition. \
         Generate a phonetic pronunciation, a helpful example sentence, the Korean \
         translation of that sentence, and synonyms for each word. \
         Strictly maintain the order of the words provided.",
        words.len(),
        word_list
      )
    }
    None => {
      let topic_instruction = if topic == config::ALL_TOPIC {
        "Include a mix of high-frequency words from reading comprehension, synonyms, and idioms."
          .to_string()
      } else {
        format!(
          "Focus strictly on vocabulary related to the category: \"{}\".",
          topic
        )
      };
      format!(
        "Generate {} English vocabulary words specifically targeted for the Korean \
         9th/7th grade Civil Service Exam (공무원 시험). {} \
         Ensure meanings are accurate for the exam context.",
        count, topic_instruction
      )
    }
  }
}

fn grammar_prompt(topic: &str, count: usize) -> String {
  let topic_instruction = if topic == config::ALL_TOPIC {
    "Include a mix of topics commonly found in the exam (e.g., Tenses, Relatives, \
     Subjunctive, Participles)."
      .to_string()
  } else {
    format!("Focus strictly on the grammar topic: \"{}\".", topic)
  };
  format!(
    "Create {} English grammar multiple-choice questions tailored for the Korean \
     Civil Service Exam (공무원 영어). The questions should mimic actual exam patterns \
     (e.g., finding the grammatically correct sentence, filling in the blank). {} \
     Provide detailed explanations in Korean helpful for a student.",
    count, topic_instruction
  )
}

fn vocab_schema() -> Value {
  json!({
    "type": "ARRAY",
    "items": {
      "type": "OBJECT",
      "properties": {
        "word": { "type": "STRING", "description": "The English word suitable for Korean civil service exams." },
        "meaning": { "type": "STRING", "description": "Korean meaning of the word." },
        "pronunciation": { "type": "STRING", "description": "Phonetic pronunciation guide (e.g., /.../)" },
        "exampleSentence": { "type": "STRING", "description": "An example sentence using the word." },
        "exampleTranslation": { "type": "STRING", "description": "Korean translation of the example sentence." },
        "synonyms": {
          "type": "ARRAY",
          "items": { "type": "STRING" },
          "description": "List of 2-3 synonyms."
        },
      },
      "required": ["word", "meaning", "pronunciation", "exampleSentence", "exampleTranslation", "synonyms"],
    },
  })
}

fn grammar_schema() -> Value {
  json!({
    "type": "ARRAY",
    "items": {
      "type": "OBJECT",
      "properties": {
        "id": { "type": "STRING", "description": "Unique ID" },
        "questionText": { "type": "STRING", "description": "The grammar question text, often with a blank or underlining." },
        "options": {
          "type": "ARRAY",
          "items": { "type": "STRING" },
          "description": "Array of 4 multiple choice options."
        },
        "correctIndex": { "type": "INTEGER", "description": "Index (0-3) of the correct answer." },
        "explanation": { "type": "STRING", "description": "Detailed explanation in Korean why the answer is correct and others are wrong." },
        "topic": { "type": "STRING", "description": "Grammar topic (e.g., Subjunctive, Relative Clauses)." },
      },
      "required": ["id", "questionText", "options", "correctIndex", "explanation", "topic"],
    },
  })
}
