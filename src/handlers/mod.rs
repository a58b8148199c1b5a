pub mod grammar;
pub mod home;
pub mod quiz;
pub mod vocab;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::db::DbLockError;
use crate::provider::ProviderError;
use crate::state::AppState;

pub use grammar::{answer_grammar, grammar_questions};
pub use home::home_summary;
pub use quiz::{
  acknowledge_quiz, answer_quiz, next_question, quit_quiz, quiz_state, start_quiz, tick_quiz,
};
pub use vocab::{advance_vocab, select_day, set_mode, vocab_cards, vocab_view};

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// The full application router: JSON API plus the static frontend.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/home", get(home_summary))
    .route("/api/vocab/view", get(vocab_view))
    .route("/api/vocab/cards", get(vocab_cards))
    .route("/api/vocab/day", post(select_day))
    .route("/api/vocab/advance", post(advance_vocab))
    .route("/api/vocab/mode", post(set_mode))
    .route("/api/quiz/start", post(start_quiz))
    .route("/api/quiz/state", get(quiz_state))
    .route("/api/quiz/answer", post(answer_quiz))
    .route("/api/quiz/tick", post(tick_quiz))
    .route("/api/quiz/next", post(next_question))
    .route("/api/quiz/quit", post(quit_quiz))
    .route("/api/quiz/acknowledge", post(acknowledge_quiz))
    .route("/api/grammar/questions", get(grammar_questions))
    .route("/api/grammar/answer", post(answer_grammar))
    .fallback_service(ServeDir::new(crate::paths::STATIC_DIR))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// JSON error envelope for the API routes.
pub struct ApiError {
  status: StatusCode,
  message: String,
}

impl ApiError {
  fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status,
      message: message.into(),
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(StatusCode::NOT_FOUND, message)
  }

  pub fn conflict(message: impl Into<String>) -> Self {
    Self::new(StatusCode::CONFLICT, message)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status, Json(json!({ "error": self.message }))).into_response()
  }
}

impl From<DbLockError> for ApiError {
  fn from(e: DbLockError) -> Self {
    Self::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
  }
}

impl From<rusqlite::Error> for ApiError {
  fn from(e: rusqlite::Error) -> Self {
    tracing::error!("Database error: {}", e);
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
  }
}

impl From<ProviderError> for ApiError {
  fn from(e: ProviderError) -> Self {
    let status = match e {
      ProviderError::Unconfigured => StatusCode::SERVICE_UNAVAILABLE,
      ProviderError::Request(_) | ProviderError::Service(_) | ProviderError::Malformed(_) => {
        StatusCode::BAD_GATEWAY
      }
    };
    tracing::warn!("Content provider error: {}", e);
    Self::new(status, e.to_string())
  }
}

/// Lock the active quiz slot, treating a poisoned lock like a busy database.
pub(crate) fn lock_quiz(
  state: &AppState,
) -> Result<std::sync::MutexGuard<'_, Option<crate::quiz::QuizSession>>, ApiError> {
  state.quiz.lock().map_err(|_| ApiError::from(DbLockError))
}
