//! Shared application state passed to all handlers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::db::DbPool;
use crate::domain::WordBank;
use crate::provider::ContentProvider;
use crate::quiz::QuizSession;

/// Guards one AI-content view against overlapping and outdated fetches.
///
/// A fetch claims the single in-flight slot and takes an epoch token; any
/// navigation that changes what the view should show bumps the epoch, so a
/// response that lands afterwards is recognized as stale and discarded.
pub struct ViewGuard {
  epoch: AtomicU64,
  in_flight: AtomicBool,
}

impl ViewGuard {
  pub fn new() -> Self {
    Self {
      epoch: AtomicU64::new(0),
      in_flight: AtomicBool::new(false),
    }
  }

  /// Claim the fetch slot. Returns the epoch token to pass to
  /// `finish_fetch`, or None while another fetch is still running.
  pub fn begin_fetch(&self) -> Option<u64> {
    if self.in_flight.swap(true, Ordering::SeqCst) {
      return None;
    }
    Some(self.epoch.load(Ordering::SeqCst))
  }

  /// Release the fetch slot. Returns false when the view moved on while
  /// the fetch was in flight, in which case the result must be dropped.
  pub fn finish_fetch(&self, token: u64) -> bool {
    let current = self.epoch.load(Ordering::SeqCst) == token;
    self.in_flight.store(false, Ordering::SeqCst);
    current
  }

  /// Mark every in-flight fetch for this view as outdated.
  pub fn invalidate(&self) {
    self.epoch.fetch_add(1, Ordering::SeqCst);
  }
}

impl Default for ViewGuard {
  fn default() -> Self {
    Self::new()
  }
}

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
  /// Shared database connection
  pub db: DbPool,

  /// The fixed word catalog, loaded once at startup
  pub bank: Arc<WordBank>,

  /// AI content generation backend
  pub provider: Arc<dyn ContentProvider>,

  /// The single active speed-quiz session, if any
  pub quiz: Arc<Mutex<Option<QuizSession>>>,

  /// Fetch guard for the vocabulary card view
  pub vocab_view: Arc<ViewGuard>,

  /// Fetch guard for the grammar question view
  pub grammar_view: Arc<ViewGuard>,
}

impl AppState {
  pub fn new(db: DbPool, bank: Arc<WordBank>, provider: Arc<dyn ContentProvider>) -> Self {
    Self {
      db,
      bank,
      provider,
      quiz: Arc::new(Mutex::new(None)),
      vocab_view: Arc::new(ViewGuard::new()),
      grammar_view: Arc::new(ViewGuard::new()),
    }
  }
}
