//! Vocabulary study view: day navigation plus AI-enriched study cards.

use axum::extract::{Query, State};
use axum::Json;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::db;
use crate::domain::{LearningMode, VocabCard, WordEntry};
use crate::handlers::{ApiError, ApiResult};
use crate::state::AppState;
use crate::tracker::VocabularyTracker;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabViewResponse {
  pub day: u32,
  pub total_days: u32,
  pub mode: &'static str,
  pub progress: f64,
  pub can_prev: bool,
  pub can_next: bool,
  pub words: Vec<WordEntry>,
}

fn view_of(state: &AppState, conn: &Connection) -> Result<VocabViewResponse, ApiError> {
  let tracker = VocabularyTracker::load(state.bank.as_ref(), conn)?;
  let mut rng = rand::rng();
  Ok(VocabViewResponse {
    day: tracker.state().day,
    total_days: state.bank.total_days(),
    mode: tracker.state().mode.as_str(),
    progress: tracker.progress_fraction(),
    can_prev: tracker.can_go_prev(),
    can_next: tracker.can_go_next(),
    words: tracker.current_window(&mut rng),
  })
}

pub async fn vocab_view(State(state): State<AppState>) -> ApiResult<VocabViewResponse> {
  let conn = db::try_lock(&state.db)?;
  Ok(Json(view_of(&state, &conn)?))
}

#[derive(Deserialize)]
pub struct DayRequest {
  pub day: u32,
}

pub async fn select_day(
  State(state): State<AppState>,
  Json(req): Json<DayRequest>,
) -> ApiResult<VocabViewResponse> {
  let conn = db::try_lock(&state.db)?;
  let mut tracker = VocabularyTracker::load(state.bank.as_ref(), &conn)?;
  tracker.select_day(&conn, req.day)?;
  state.vocab_view.invalidate();
  Ok(Json(view_of(&state, &conn)?))
}

#[derive(Deserialize)]
pub struct AdvanceRequest {
  pub step: isize,
}

pub async fn advance_vocab(
  State(state): State<AppState>,
  Json(req): Json<AdvanceRequest>,
) -> ApiResult<VocabViewResponse> {
  let conn = db::try_lock(&state.db)?;
  let mut tracker = VocabularyTracker::load(state.bank.as_ref(), &conn)?;
  tracker.advance(&conn, req.step)?;
  state.vocab_view.invalidate();
  Ok(Json(view_of(&state, &conn)?))
}

#[derive(Deserialize)]
pub struct ModeRequest {
  pub mode: String,
}

pub async fn set_mode(
  State(state): State<AppState>,
  Json(req): Json<ModeRequest>,
) -> ApiResult<VocabViewResponse> {
  let target = LearningMode::from_str(&req.mode)
    .ok_or_else(|| ApiError::bad_request(format!("Unknown mode '{}'", req.mode)))?;

  let conn = db::try_lock(&state.db)?;
  let mut tracker = VocabularyTracker::load(state.bank.as_ref(), &conn)?;
  if tracker.state().mode != target {
    tracker.toggle_mode(&conn)?;
    state.vocab_view.invalidate();
  }
  Ok(Json(view_of(&state, &conn)?))
}

#[derive(Deserialize)]
pub struct CardsQuery {
  pub topic: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsResponse {
  pub topic: String,
  pub cards: Vec<VocabCard>,
}

/// Fetch AI study cards for a topic. The word-bank topic enriches the
/// tracker's current window; other topics generate fresh words. Every
/// delivered card counts toward the learned total.
pub async fn vocab_cards(
  State(state): State<AppState>,
  Query(query): Query<CardsQuery>,
) -> ApiResult<CardsResponse> {
  let topic = query
    .topic
    .unwrap_or_else(|| config::WORDBANK_TOPIC.to_string());

  let Some(token) = state.vocab_view.begin_fetch() else {
    return Err(ApiError::conflict("A card fetch is already in progress"));
  };
  let outcome = fetch_cards(&state, &topic).await;
  let current = state.vocab_view.finish_fetch(token);

  let cards = outcome?;
  if !current {
    tracing::debug!("Dropping '{}' cards: view changed while fetch was in flight", topic);
    return Err(ApiError::conflict("The view changed while fetching"));
  }

  let conn = db::try_lock(&state.db)?;
  db::increment_vocab_learned(&conn, cards.len() as i64)?;
  Ok(Json(CardsResponse { topic, cards }))
}

async fn fetch_cards(state: &AppState, topic: &str) -> Result<Vec<VocabCard>, ApiError> {
  if topic == config::WORDBANK_TOPIC {
    // Enrich the exact words the learner is looking at. The lock is held
    // only while picking them, never across the provider call.
    let words = {
      let conn = db::try_lock(&state.db)?;
      let tracker = VocabularyTracker::load(state.bank.as_ref(), &conn)?;
      tracker.current_window(&mut rand::rng())
    };
    if words.is_empty() {
      return Err(ApiError::not_found("The word bank is empty"));
    }
    let count = words.len();
    let cards = state
      .provider
      .fetch_vocab_cards(Some(&words), topic, count)
      .await?;
    Ok(cards)
  } else {
    let cards = state
      .provider
      .fetch_vocab_cards(None, topic, config::DEFAULT_VOCAB_COUNT)
      .await?;
    Ok(cards)
  }
}
