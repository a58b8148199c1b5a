//! Speed-quiz session endpoints.
//!
//! The server holds at most one session. The client drives the countdown by
//! posting one tick per second, tagged with the generation it was armed for;
//! ticks from a superseded question are dropped by the session itself.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::db;
use crate::handlers::{lock_quiz, ApiError, ApiResult};
use crate::quiz::{
  QuizPhase, QuizQuestion, QuizResult, QuizSession, QuizSource, TIMEOUT_SENTINEL,
};
use crate::state::AppState;
use crate::tracker::VocabularyTracker;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStateResponse {
  pub source: QuizSource,
  pub phase: QuizPhase,
  pub question_index: usize,
  pub question_count: usize,
  pub remaining: u32,
  pub generation: u64,
  pub answered: bool,
  pub question: Option<QuizQuestion>,
  pub results: Vec<QuizResult>,
  pub correct_count: usize,
  /// How long the client should show the ruling before advancing.
  pub answer_display_ms: u64,
}

fn snapshot(session: &QuizSession) -> QuizStateResponse {
  QuizStateResponse {
    source: session.source(),
    phase: session.phase(),
    question_index: session.question_index(),
    question_count: session.question_count(),
    remaining: session.remaining(),
    generation: session.generation(),
    answered: session.is_answered(),
    question: match session.phase() {
      QuizPhase::Result => None,
      _ => session.current_question().cloned(),
    },
    results: session.results().to_vec(),
    correct_count: session.correct_count(),
    answer_display_ms: config::ANSWER_DISPLAY_MS,
  }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartQuizRequest {
  pub source: String,
  #[serde(default)]
  pub target_count: Option<usize>,
  #[serde(default)]
  pub topic: Option<String>,
}

/// Start a new quiz, replacing any previous session.
pub async fn start_quiz(
  State(state): State<AppState>,
  Json(req): Json<StartQuizRequest>,
) -> ApiResult<QuizStateResponse> {
  let source = QuizSource::from_str(&req.source)
    .ok_or_else(|| ApiError::bad_request(format!("Unknown quiz source '{}'", req.source)))?;

  let conn = db::try_lock(&state.db)?;
  let mut rng = rand::rng();
  let session = match source {
    QuizSource::Normal => {
      // Loading through the tracker clamps a stale persisted record back
      // into the current bank's day range before any slicing happens.
      let tracker = VocabularyTracker::load(state.bank.as_ref(), &conn)?;
      let on_bank_topic = req
        .topic
        .as_deref()
        .is_none_or(|t| t == config::WORDBANK_TOPIC);
      QuizSession::start_normal(
        state.bank.as_ref(),
        tracker.state(),
        req.target_count.unwrap_or(config::DEFAULT_QUIZ_TARGET),
        on_bank_topic,
        &mut rng,
      )
    }
    QuizSource::Incorrect => {
      let set = db::load_incorrect(&conn)?;
      QuizSession::start_incorrect(&set, state.bank.as_ref(), &mut rng)
    }
  };

  let Some(mut session) = session else {
    return Err(ApiError::conflict("No words available for a quiz"));
  };
  session.begin();

  let mut slot = lock_quiz(&state)?;
  let response = snapshot(&session);
  *slot = Some(session);
  Ok(Json(response))
}

pub async fn quiz_state(State(state): State<AppState>) -> ApiResult<QuizStateResponse> {
  let slot = lock_quiz(&state)?;
  let session = slot
    .as_ref()
    .ok_or_else(|| ApiError::not_found("No quiz in progress"))?;
  Ok(Json(snapshot(session)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerQuizRequest {
  pub option_index: isize,
}

pub async fn answer_quiz(
  State(state): State<AppState>,
  Json(req): Json<AnswerQuizRequest>,
) -> ApiResult<QuizStateResponse> {
  let conn = db::try_lock(&state.db)?;
  let mut slot = lock_quiz(&state)?;
  let session = slot
    .as_mut()
    .ok_or_else(|| ApiError::not_found("No quiz in progress"))?;

  let valid = req.option_index == TIMEOUT_SENTINEL
    || session
      .current_question()
      .is_some_and(|q| (0..q.options.len() as isize).contains(&req.option_index));
  if !valid {
    return Err(ApiError::bad_request(format!(
      "Option index {} is out of range",
      req.option_index
    )));
  }

  session.submit_answer(&conn, req.option_index)?;
  Ok(Json(snapshot(session)))
}

#[derive(Deserialize)]
pub struct TickRequest {
  pub generation: u64,
}

pub async fn tick_quiz(
  State(state): State<AppState>,
  Json(req): Json<TickRequest>,
) -> ApiResult<QuizStateResponse> {
  let conn = db::try_lock(&state.db)?;
  let mut slot = lock_quiz(&state)?;
  let session = slot
    .as_mut()
    .ok_or_else(|| ApiError::not_found("No quiz in progress"))?;
  session.tick(&conn, req.generation)?;
  Ok(Json(snapshot(session)))
}

pub async fn next_question(State(state): State<AppState>) -> ApiResult<QuizStateResponse> {
  let mut slot = lock_quiz(&state)?;
  let session = slot
    .as_mut()
    .ok_or_else(|| ApiError::not_found("No quiz in progress"))?;
  session.advance_question();
  Ok(Json(snapshot(session)))
}

#[derive(Serialize)]
pub struct QuizIdleResponse {
  pub phase: &'static str,
}

/// Abandon the quiz: the session is discarded and nothing further is
/// persisted. Answers already submitted keep their review-queue effects.
pub async fn quit_quiz(State(state): State<AppState>) -> ApiResult<QuizIdleResponse> {
  let mut slot = lock_quiz(&state)?;
  if slot.take().is_none() {
    return Err(ApiError::not_found("No quiz in progress"));
  }
  Ok(Json(QuizIdleResponse { phase: "intro" }))
}

/// Dismiss the result screen, returning to the intro state.
pub async fn acknowledge_quiz(State(state): State<AppState>) -> ApiResult<QuizIdleResponse> {
  let mut slot = lock_quiz(&state)?;
  match slot.as_ref().map(QuizSession::phase) {
    None => Err(ApiError::not_found("No quiz in progress")),
    Some(QuizPhase::Result) => {
      *slot = None;
      Ok(Json(QuizIdleResponse { phase: "intro" }))
    }
    Some(_) => Err(ApiError::conflict("The quiz is still in progress")),
  }
}
