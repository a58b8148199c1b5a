pub mod bank;
pub mod progress;
pub mod word;

pub use bank::WordBank;
pub use progress::{IncorrectSet, LearningMode, ProgressState, StatsCounters};
pub use word::{GrammarQuestion, VocabCard, WordEntry};
