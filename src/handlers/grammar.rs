//! AI-generated grammar question endpoints.
//!
//! Questions are not stored server-side; the client keeps the set it was
//! handed and reports each ruling back so the counters stay accurate.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::db;
use crate::domain::{GrammarQuestion, StatsCounters};
use crate::handlers::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct QuestionsQuery {
  pub topic: Option<String>,
  pub count: Option<usize>,
}

/// Questions per set, clamped to keep generation requests small.
const MAX_QUESTION_COUNT: usize = 10;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsResponse {
  pub topic: String,
  pub questions: Vec<GrammarQuestion>,
}

pub async fn grammar_questions(
  State(state): State<AppState>,
  Query(query): Query<QuestionsQuery>,
) -> ApiResult<QuestionsResponse> {
  let topic = query.topic.unwrap_or_else(|| config::ALL_TOPIC.to_string());
  let count = query
    .count
    .unwrap_or(config::DEFAULT_GRAMMAR_COUNT)
    .clamp(1, MAX_QUESTION_COUNT);

  let Some(token) = state.grammar_view.begin_fetch() else {
    return Err(ApiError::conflict("A question fetch is already in progress"));
  };
  let outcome = state.provider.fetch_grammar_questions(&topic, count).await;
  let current = state.grammar_view.finish_fetch(token);

  let questions = outcome?;
  if !current {
    tracing::debug!(
      "Dropping '{}' questions: view changed while fetch was in flight",
      topic
    );
    return Err(ApiError::conflict("The view changed while fetching"));
  }

  Ok(Json(QuestionsResponse { topic, questions }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarAnswerRequest {
  pub selected_index: usize,
  pub correct_index: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarAnswerResponse {
  pub is_correct: bool,
  #[serde(flatten)]
  pub stats: StatsCounters,
}

/// Score one answered question: every answer counts as solved, matching
/// indices additionally as correct.
pub async fn answer_grammar(
  State(state): State<AppState>,
  Json(req): Json<GrammarAnswerRequest>,
) -> ApiResult<GrammarAnswerResponse> {
  let conn = db::try_lock(&state.db)?;
  let mut stats = db::increment_grammar_solved(&conn)?;
  let is_correct = req.selected_index == req.correct_index;
  if is_correct {
    stats = db::increment_grammar_correct(&conn)?;
  }
  Ok(Json(GrammarAnswerResponse { is_correct, stats }))
}
