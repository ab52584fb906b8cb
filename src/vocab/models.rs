//! Data models for vocabulary entries and their review progress

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single word in a word pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    /// Stable identifier, unique across all packs
    pub id: String,
    /// Source-language text (the word being learned)
    pub en: String,
    /// Target-language text (the learner's native gloss)
    pub cn: String,
    /// Name of the owning category
    pub category: String,
}

impl VocabularyEntry {
    pub fn new(id: &str, en: &str, cn: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            en: en.to_string(),
            cn: cn.to_string(),
            category: category.to_string(),
        }
    }
}

/// Spaced repetition progress for one mastered word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub word_id: String,
    /// Last exposure or review outcome, stored as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_review_time: DateTime<Utc>,
    /// Index into the interval table; equal to the table length once graduated
    #[serde(default)]
    pub stage: usize,
}

impl ReviewRecord {
    pub fn new(word_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            word_id: word_id.to_string(),
            last_review_time: now,
            stage: 0,
        }
    }
}

/// Every review record, keyed by word id.
///
/// On disk this is a plain map. When loading, the map key wins over a
/// disagreeing `wordId` inside the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, ReviewRecord>",
    into = "BTreeMap<String, ReviewRecord>"
)]
pub struct Ledger {
    records: BTreeMap<String, ReviewRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word_id: &str) -> Option<&ReviewRecord> {
        self.records.get(word_id)
    }

    pub fn contains(&self, word_id: &str) -> bool {
        self.records.contains_key(word_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ReviewRecord> {
        self.records.values()
    }

    /// Return a copy of this ledger with `record` stored under its word id
    pub fn with_record(&self, record: ReviewRecord) -> Self {
        let mut records = self.records.clone();
        records.insert(record.word_id.clone(), record);
        Self { records }
    }
}

impl From<BTreeMap<String, ReviewRecord>> for Ledger {
    fn from(mut records: BTreeMap<String, ReviewRecord>) -> Self {
        for (key, record) in records.iter_mut() {
            if record.word_id != *key {
                log::warn!(
                    "ledger: record stored under {} names {}, keeping the key",
                    key,
                    record.word_id
                );
                record.word_id = key.clone();
            }
        }
        Self { records }
    }
}

impl From<Ledger> for BTreeMap<String, ReviewRecord> {
    fn from(ledger: Ledger) -> Self {
        ledger.records
    }
}

impl FromIterator<ReviewRecord> for Ledger {
    fn from_iter<I: IntoIterator<Item = ReviewRecord>>(iter: I) -> Self {
        Self {
            records: iter
                .into_iter()
                .map(|r| (r.word_id.clone(), r))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_serializes_epoch_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let record = ReviewRecord {
            word_id: "apple".to_string(),
            last_review_time: at,
            stage: 2,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["wordId"], "apple");
        assert_eq!(json["lastReviewTime"], 1_700_000_000_123i64);
        assert_eq!(json["stage"], 2);
    }

    #[test]
    fn test_ledger_is_a_plain_map_on_disk() {
        let at = Utc.timestamp_millis_opt(0).unwrap();
        let ledger: Ledger = vec![ReviewRecord::new("cat", at), ReviewRecord::new("dog", at)]
            .into_iter()
            .collect();

        let json = serde_json::to_value(&ledger).unwrap();
        assert!(json.is_object());
        assert_eq!(json["cat"]["wordId"], "cat");

        let back: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn test_with_record_leaves_original_untouched() {
        let at = Utc.timestamp_millis_opt(0).unwrap();
        let ledger = Ledger::new().with_record(ReviewRecord::new("cat", at));
        let updated = ledger.with_record(ReviewRecord::new("dog", at));

        assert_eq!(ledger.len(), 1);
        assert_eq!(updated.len(), 2);
        assert!(updated.contains("cat"));
    }

    #[test]
    fn test_mismatched_key_is_normalized_on_load() {
        let json = r#"{ "a": { "wordId": "b", "lastReviewTime": 0, "stage": 2 } }"#;
        let ledger: Ledger = serde_json::from_str(json).unwrap();

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("a").unwrap().word_id, "a");
        assert!(!ledger.contains("b"));
    }
}
