//! The fixed, ordered word catalog and its day partition.
//!
//! Days are derived, never stored: day n (1-indexed) covers bank indices
//! `[(n-1)*page_size, n*page_size)`. The last day may be short.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config;
use crate::domain::WordEntry;

#[derive(Debug, Clone)]
pub struct WordBank {
  words: Vec<WordEntry>,
  page_size: usize,
}

impl WordBank {
  pub fn new(words: Vec<WordEntry>) -> Self {
    Self::with_page_size(words, config::PAGE_SIZE)
  }

  pub fn with_page_size(words: Vec<WordEntry>, page_size: usize) -> Self {
    assert!(page_size > 0, "page_size must be positive");
    Self { words, page_size }
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  pub fn words(&self) -> &[WordEntry] {
    &self.words
  }

  pub fn get(&self, index: usize) -> Option<&WordEntry> {
    self.words.get(index)
  }

  /// Number of days covering the whole bank (last day may be short).
  pub fn total_days(&self) -> u32 {
    self.words.len().div_ceil(self.page_size) as u32
  }

  /// First bank index of a day (1-indexed day).
  pub fn day_start(&self, day: u32) -> usize {
    (day as usize - 1) * self.page_size
  }

  /// One past the last bank index of a day.
  pub fn day_end(&self, day: u32) -> usize {
    (self.day_start(day) + self.page_size).min(self.words.len())
  }

  /// Number of words assigned to a day.
  pub fn day_len(&self, day: u32) -> usize {
    self.day_end(day) - self.day_start(day)
  }

  pub fn day_slice(&self, day: u32) -> &[WordEntry] {
    &self.words[self.day_start(day)..self.day_end(day)]
  }

  pub fn slice(&self, start: usize, end: usize) -> &[WordEntry] {
    &self.words[start.min(self.words.len())..end.min(self.words.len())]
  }

  /// Uniform sample of `count` words without replacement from the whole bank.
  pub fn random_sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<WordEntry> {
    let count = count.min(self.words.len());
    let picked = rand::seq::index::sample(rng, self.words.len(), count);
    picked.iter().map(|i| self.words[i].clone()).collect()
  }

  /// The whole bank in shuffled order, capped at `count` entries.
  pub fn shuffled_capped<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<WordEntry> {
    let mut all: Vec<WordEntry> = self.words.clone();
    all.shuffle(rng);
    all.truncate(count);
    all
  }
}
