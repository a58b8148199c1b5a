use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gongmaster::provider::GeminiProvider;
use gongmaster::state::AppState;
use gongmaster::{config, db, handlers};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gongmaster=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = db::init_db(&db_path).expect("Failed to initialize database");

  let bank = {
    let conn = pool.lock().expect("Database lock failed during startup");
    db::seed_word_bank(&conn).expect("Failed to seed word bank");
    db::load_word_bank(&conn).expect("Failed to load word bank")
  };
  tracing::info!(
    "Word bank loaded: {} words over {} days",
    bank.len(),
    bank.total_days()
  );

  let api_key = config::gemini_api_key().unwrap_or_else(|| {
    tracing::warn!("GEMINI_API_KEY is not set; content requests will fail");
    String::new()
  });
  let provider = Arc::new(GeminiProvider::new(api_key));

  let state = AppState::new(pool, Arc::new(bank), provider);

  let app = handlers::router(state);

  let bind_addr = config::server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config::SERVER_PORT);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
