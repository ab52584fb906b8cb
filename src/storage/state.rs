//! The persisted application state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::DailyStats;
use crate::vocab::catalog::DEFAULT_CATEGORY;
use crate::vocab::Ledger;

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Everything that survives a restart. Every field defaults so that older or
/// partial records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub stats: DailyStats,
    #[serde(default = "default_category")]
    pub current_category: String,
    /// Words answered wrongly at least once, in order of first miss
    #[serde(default)]
    pub wrong_words: Vec<String>,
    #[serde(default)]
    pub review_data: Ledger,
}

impl AppState {
    /// State for a first launch
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            stats: DailyStats::initial(now),
            current_category: default_category(),
            wrong_words: Vec::new(),
            review_data: Ledger::new(),
        }
    }

    /// Copy with `word_id` added to the wrong-word notebook
    pub fn with_miss(&self, word_id: &str) -> Self {
        let mut next = self.clone();
        if !next.wrong_words.iter().any(|w| w == word_id) {
            next.wrong_words.push(word_id.to_string());
        }
        next
    }
}
