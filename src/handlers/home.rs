use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;

use crate::db;
use crate::domain::StatsCounters;
use crate::handlers::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSummary {
  #[serde(flatten)]
  pub stats: StatsCounters,
  pub incorrect_count: usize,
  pub total_days: u32,
  pub current_day: u32,
}

/// Dashboard numbers. Visiting refreshes the stored login date.
pub async fn home_summary(State(state): State<AppState>) -> ApiResult<HomeSummary> {
  let conn = db::try_lock(&state.db)?;
  let today = Local::now().format("%Y-%m-%d").to_string();
  let stats = db::touch_login(&conn, &today)?;
  let incorrect_count = db::load_incorrect(&conn)?.len();
  let progress = db::load_progress(&conn)?;

  Ok(Json(HomeSummary {
    stats,
    incorrect_count,
    total_days: state.bank.total_days(),
    current_day: progress.day,
  }))
}
