//! End-to-end API tests against the full router, backed by a temporary
//! database and a scripted content provider.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use gongmaster::db;
use gongmaster::domain::{GrammarQuestion, LearningMode, ProgressState, VocabCard, WordEntry};
use gongmaster::handlers;
use gongmaster::provider::{ContentProvider, ProviderError};
use gongmaster::state::AppState;

struct FakeProvider {
  topics: Mutex<Vec<String>>,
  fail: bool,
}

impl FakeProvider {
  fn new() -> Arc<Self> {
    Arc::new(Self {
      topics: Mutex::new(Vec::new()),
      fail: false,
    })
  }

  fn failing() -> Arc<Self> {
    Arc::new(Self {
      topics: Mutex::new(Vec::new()),
      fail: true,
    })
  }

  fn topics_seen(&self) -> Vec<String> {
    self.topics.lock().unwrap().clone()
  }
}

fn card_for(entry: &WordEntry) -> VocabCard {
  VocabCard {
    word: entry.word.clone(),
    meaning: entry.meaning.clone(),
    pronunciation: format!("/{}/", entry.word),
    example_sentence: format!("The word {} appears here.", entry.word),
    example_translation: "예문 번역".to_string(),
    synonyms: vec!["synonym".to_string()],
  }
}

#[async_trait]
impl ContentProvider for FakeProvider {
  async fn fetch_vocab_cards(
    &self,
    words: Option<&[WordEntry]>,
    topic: &str,
    count: usize,
  ) -> Result<Vec<VocabCard>, ProviderError> {
    self.topics.lock().unwrap().push(topic.to_string());
    if self.fail {
      return Err(ProviderError::Service("scripted failure".to_string()));
    }
    match words {
      Some(words) => Ok(words.iter().map(card_for).collect()),
      None => Ok(
        (0..count)
          .map(|i| card_for(&WordEntry::new(&format!("generated{i}"), "생성된 뜻")))
          .collect(),
      ),
    }
  }

  async fn fetch_grammar_questions(
    &self,
    topic: &str,
    count: usize,
  ) -> Result<Vec<GrammarQuestion>, ProviderError> {
    self.topics.lock().unwrap().push(topic.to_string());
    if self.fail {
      return Err(ProviderError::Service("scripted failure".to_string()));
    }
    Ok(
      (0..count)
        .map(|i| GrammarQuestion {
          id: format!("q{i}"),
          question_text: "Choose the grammatically correct sentence.".to_string(),
          options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
          correct_index: 1,
          explanation: "해설".to_string(),
          topic: topic.to_string(),
        })
        .collect(),
    )
  }
}

struct TestApp {
  server: TestServer,
  provider: Arc<FakeProvider>,
  _temp: TempDir,
}

fn spawn_app(provider: Arc<FakeProvider>) -> TestApp {
  let temp = TempDir::new().unwrap();
  let pool = db::init_db(&temp.path().join("test.db")).unwrap();
  let bank = {
    let conn = pool.lock().unwrap();
    db::seed_word_bank(&conn).unwrap();
    db::load_word_bank(&conn).unwrap()
  };
  let state = AppState::new(pool, Arc::new(bank), provider.clone());
  let server = TestServer::new(handlers::router(state)).unwrap();
  TestApp {
    server,
    provider,
    _temp: temp,
  }
}

async fn home(app: &TestApp) -> Value {
  app.server.get("/api/home").await.json::<Value>()
}

/// Answer the current quiz question and move on. Returns the updated state.
async fn answer_and_advance(app: &TestApp, correctly: bool) -> Value {
  let state = app.server.get("/api/quiz/state").await.json::<Value>();
  let question = &state["question"];
  let correct = question["correctIndex"].as_i64().unwrap();
  let choice = if correctly { correct } else { (correct + 1) % 4 };

  app
    .server
    .post("/api/quiz/answer")
    .json(&json!({ "optionIndex": choice }))
    .await
    .assert_status_ok();
  app.server.post("/api/quiz/next").await.json::<Value>()
}

#[tokio::test]
async fn home_reports_fresh_stats_and_day_partition() {
  let app = spawn_app(FakeProvider::new());
  let summary = home(&app).await;

  assert_eq!(summary["streak"], 1);
  assert_eq!(summary["vocabLearned"], 0);
  assert_eq!(summary["incorrectCount"], 0);
  assert_eq!(summary["currentDay"], 1);
  // 60 seeded words, 5 per day
  assert_eq!(summary["totalDays"], 12);
  assert!(summary["lastLoginDate"].as_str().unwrap().len() == 10);
}

#[tokio::test]
async fn vocab_view_starts_on_day_one() {
  let app = spawn_app(FakeProvider::new());
  let view = app.server.get("/api/vocab/view").await.json::<Value>();

  assert_eq!(view["day"], 1);
  assert_eq!(view["mode"], "sequential");
  assert_eq!(view["words"].as_array().unwrap().len(), 5);
  assert_eq!(view["words"][0]["word"], "abate");
}

#[tokio::test]
async fn selecting_a_day_jumps_the_window() {
  let app = spawn_app(FakeProvider::new());
  let view = app
    .server
    .post("/api/vocab/day")
    .json(&json!({ "day": 3 }))
    .await
    .json::<Value>();

  assert_eq!(view["day"], 3);
  assert_eq!(view["words"][0]["word"], "tentative");

  // Out-of-range days clamp instead of erroring.
  let view = app
    .server
    .post("/api/vocab/day")
    .json(&json!({ "day": 99 }))
    .await
    .json::<Value>();
  assert_eq!(view["day"], 12);
}

#[tokio::test]
async fn switching_mode_changes_the_window_source() {
  let app = spawn_app(FakeProvider::new());
  let view = app
    .server
    .post("/api/vocab/mode")
    .json(&json!({ "mode": "random" }))
    .await
    .json::<Value>();
  assert_eq!(view["mode"], "random");
  assert_eq!(view["words"].as_array().unwrap().len(), 5);

  let response = app
    .server
    .post("/api/vocab/mode")
    .json(&json!({ "mode": "shuffled" }))
    .await;
  response.assert_status_bad_request();
}

#[tokio::test]
async fn bank_topic_cards_enrich_the_current_window() {
  let app = spawn_app(FakeProvider::new());
  let response = app
    .server
    .get("/api/vocab/cards")
    .add_query_param("topic", "내 단어장")
    .await
    .json::<Value>();

  let cards = response["cards"].as_array().unwrap();
  assert_eq!(cards.len(), 5);
  assert_eq!(cards[0]["word"], "abate");
  assert_eq!(cards[0]["meaning"], "약화되다, 누그러지다");
  assert!(cards[0]["exampleSentence"].is_string());

  // Every delivered card counts toward the learned total.
  assert_eq!(home(&app).await["vocabLearned"], 5);
}

#[tokio::test]
async fn topic_cards_are_freshly_generated() {
  let app = spawn_app(FakeProvider::new());
  let response = app
    .server
    .get("/api/vocab/cards")
    .add_query_param("topic", "법률/행정 어휘")
    .await
    .json::<Value>();

  assert_eq!(response["cards"].as_array().unwrap().len(), 5);
  assert_eq!(app.provider.topics_seen(), vec!["법률/행정 어휘"]);
}

#[tokio::test]
async fn provider_failure_surfaces_and_counts_nothing() {
  let app = spawn_app(FakeProvider::failing());
  let response = app
    .server
    .get("/api/vocab/cards")
    .add_query_param("topic", "전체")
    .await;

  assert_eq!(response.status_code(), 502);
  assert_eq!(home(&app).await["vocabLearned"], 0);

  // The fetch slot was released; a retry reaches the provider again.
  let retry = app.server.get("/api/vocab/cards").await;
  assert_eq!(retry.status_code(), 502);
  assert_eq!(app.provider.topics_seen().len(), 2);
}

#[tokio::test]
async fn quiz_runs_to_completion_and_tracks_misses() {
  let app = spawn_app(FakeProvider::new());
  let state = app
    .server
    .post("/api/quiz/start")
    .json(&json!({ "source": "normal" }))
    .await
    .json::<Value>();

  // Sequential study on the bank topic quizzes the current day only.
  assert_eq!(state["phase"], "playing");
  assert_eq!(state["questionCount"], 5);
  assert_eq!(state["remaining"], 5);

  // Miss the first question, answer the rest correctly.
  let mut state = answer_and_advance(&app, false).await;
  for _ in 0..4 {
    state = answer_and_advance(&app, true).await;
  }

  assert_eq!(state["phase"], "result");
  assert_eq!(state["results"].as_array().unwrap().len(), 5);
  assert_eq!(state["correctCount"], 4);
  assert_eq!(home(&app).await["incorrectCount"], 1);

  // Dismissing the result screen discards the session.
  let idle = app.server.post("/api/quiz/acknowledge").await.json::<Value>();
  assert_eq!(idle["phase"], "intro");
  let response = app.server.get("/api/quiz/state").await;
  assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn review_quiz_clears_words_answered_correctly() {
  let app = spawn_app(FakeProvider::new());

  // Seed the review queue with one miss.
  app
    .server
    .post("/api/quiz/start")
    .json(&json!({ "source": "normal" }))
    .await
    .assert_status_ok();
  answer_and_advance(&app, false).await;
  let idle = app.server.post("/api/quiz/quit").await.json::<Value>();
  assert_eq!(idle["phase"], "intro");
  assert_eq!(home(&app).await["incorrectCount"], 1);

  let state = app
    .server
    .post("/api/quiz/start")
    .json(&json!({ "source": "incorrect" }))
    .await
    .json::<Value>();
  assert_eq!(state["questionCount"], 1);

  let state = answer_and_advance(&app, true).await;
  assert_eq!(state["phase"], "result");
  assert_eq!(home(&app).await["incorrectCount"], 0);
}

#[tokio::test]
async fn quiz_start_repairs_a_stale_progress_record() {
  let temp = TempDir::new().unwrap();
  let pool = db::init_db(&temp.path().join("test.db")).unwrap();
  let bank = {
    let conn = pool.lock().unwrap();
    db::seed_word_bank(&conn).unwrap();
    // A record left behind by a larger catalog points past the last day.
    db::save_progress(
      &conn,
      &ProgressState {
        cursor_index: 195,
        mode: LearningMode::Sequential,
        day: 40,
      },
    )
    .unwrap();
    db::load_word_bank(&conn).unwrap()
  };
  let state = AppState::new(pool, Arc::new(bank), FakeProvider::new());
  let server = TestServer::new(handlers::router(state)).unwrap();

  let quiz = server
    .post("/api/quiz/start")
    .json(&json!({ "source": "normal" }))
    .await
    .json::<Value>();
  assert_eq!(quiz["phase"], "playing");
  assert_eq!(quiz["questionCount"], 5);

  // The handler must still be healthy afterwards.
  let response = server.get("/api/vocab/view").await;
  response.assert_status_ok();
}

#[tokio::test]
async fn out_of_range_answer_is_a_bad_request() {
  let app = spawn_app(FakeProvider::new());
  let state = app
    .server
    .post("/api/quiz/start")
    .json(&json!({ "source": "normal" }))
    .await
    .json::<Value>();
  assert_eq!(state["answerDisplayMs"], 1000);

  for bad in [7, -2] {
    let response = app
      .server
      .post("/api/quiz/answer")
      .json(&json!({ "optionIndex": bad }))
      .await;
    response.assert_status_bad_request();
  }

  // The question stays open for a real answer afterwards.
  let state = answer_and_advance(&app, true).await;
  assert_eq!(state["results"].as_array().unwrap().len(), 1);
  assert_eq!(state["correctCount"], 1);
}

#[tokio::test]
async fn empty_review_queue_cannot_start_a_quiz() {
  let app = spawn_app(FakeProvider::new());
  let response = app
    .server
    .post("/api/quiz/start")
    .json(&json!({ "source": "incorrect" }))
    .await;
  assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn countdown_expiry_submits_the_timeout_sentinel() {
  let app = spawn_app(FakeProvider::new());
  let state = app
    .server
    .post("/api/quiz/start")
    .json(&json!({ "source": "normal" }))
    .await
    .json::<Value>();
  let generation = state["generation"].as_u64().unwrap();

  let mut state = state;
  for _ in 0..5 {
    state = app
      .server
      .post("/api/quiz/tick")
      .json(&json!({ "generation": generation }))
      .await
      .json::<Value>();
  }

  assert_eq!(state["answered"], true);
  let result = &state["results"][0];
  assert_eq!(result["isCorrect"], false);
  assert_eq!(result["selectedAnswer"], "(시간 초과)");
  assert_eq!(home(&app).await["incorrectCount"], 1);
}

#[tokio::test]
async fn ticks_from_a_previous_question_are_ignored() {
  let app = spawn_app(FakeProvider::new());
  let state = app
    .server
    .post("/api/quiz/start")
    .json(&json!({ "source": "normal" }))
    .await
    .json::<Value>();
  let old_generation = state["generation"].as_u64().unwrap();

  let state = answer_and_advance(&app, true).await;
  assert_eq!(state["questionIndex"], 1);
  assert_eq!(state["remaining"], 5);

  let state = app
    .server
    .post("/api/quiz/tick")
    .json(&json!({ "generation": old_generation }))
    .await
    .json::<Value>();
  assert_eq!(state["remaining"], 5);
}

#[tokio::test]
async fn quiz_endpoints_require_a_session() {
  let app = spawn_app(FakeProvider::new());
  let response = app
    .server
    .post("/api/quiz/answer")
    .json(&json!({ "optionIndex": 0 }))
    .await;
  assert_eq!(response.status_code(), 404);

  let response = app
    .server
    .post("/api/quiz/start")
    .json(&json!({ "source": "speed" }))
    .await;
  response.assert_status_bad_request();
}

#[tokio::test]
async fn grammar_flow_updates_counters() {
  let app = spawn_app(FakeProvider::new());
  let response = app
    .server
    .get("/api/grammar/questions")
    .add_query_param("topic", "가정법")
    .await
    .json::<Value>();
  let questions = response["questions"].as_array().unwrap();
  assert_eq!(questions.len(), 3);
  assert_eq!(questions[0]["options"].as_array().unwrap().len(), 4);

  let ruling = app
    .server
    .post("/api/grammar/answer")
    .json(&json!({ "selectedIndex": 1, "correctIndex": 1 }))
    .await
    .json::<Value>();
  assert_eq!(ruling["isCorrect"], true);
  assert_eq!(ruling["grammarSolved"], 1);
  assert_eq!(ruling["grammarCorrect"], 1);

  let ruling = app
    .server
    .post("/api/grammar/answer")
    .json(&json!({ "selectedIndex": 0, "correctIndex": 1 }))
    .await
    .json::<Value>();
  assert_eq!(ruling["isCorrect"], false);
  assert_eq!(ruling["grammarSolved"], 2);
  assert_eq!(ruling["grammarCorrect"], 1);
}

#[tokio::test]
async fn progress_survives_a_restart() {
  let temp = TempDir::new().unwrap();
  let db_path = temp.path().join("test.db");

  {
    let pool = db::init_db(&db_path).unwrap();
    let bank = {
      let conn = pool.lock().unwrap();
      db::seed_word_bank(&conn).unwrap();
      db::load_word_bank(&conn).unwrap()
    };
    let state = AppState::new(pool, Arc::new(bank), FakeProvider::new());
    let server = TestServer::new(handlers::router(state)).unwrap();
    server
      .post("/api/vocab/day")
      .json(&json!({ "day": 7 }))
      .await
      .assert_status_ok();
  }

  let pool = db::init_db(&db_path).unwrap();
  let bank = {
    let conn = pool.lock().unwrap();
    db::seed_word_bank(&conn).unwrap();
    db::load_word_bank(&conn).unwrap()
  };
  let state = AppState::new(pool, Arc::new(bank), FakeProvider::new());
  let server = TestServer::new(handlers::router(state)).unwrap();

  let view = server.get("/api/vocab/view").await.json::<Value>();
  assert_eq!(view["day"], 7);
  assert_eq!(view["words"][0]["word"], "waive");
}
