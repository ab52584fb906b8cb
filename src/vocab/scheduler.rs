//! Staged spaced repetition
//!
//! Every mastered word sits at a stage that indexes a fixed table of spacing
//! intervals. A word is due once the interval of its current stage has elapsed
//! since its last review. Success moves the word one stage up, failure drops it
//! back to stage 0. A word whose stage reaches the table length has graduated
//! and is never due again.
//!
//! Default table: 1 hour, 1 day, 3 days, 7 days, 14 days, 30 days.

use chrono::{DateTime, Duration, Utc};

use super::models::{Ledger, ReviewRecord};

/// Longest interval accepted from configuration (about a century)
const MAX_INTERVAL_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// Ordered spacing intervals, one per stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTable {
    intervals: Vec<Duration>,
}

impl IntervalTable {
    /// Build a table from explicit intervals. An empty list yields the default table.
    pub fn new(intervals: Vec<Duration>) -> Self {
        if intervals.is_empty() {
            return Self::default();
        }
        Self { intervals }
    }

    /// Build a table from whole seconds, as written in the config file
    pub fn from_secs(secs: &[u64]) -> Self {
        Self::new(
            secs.iter()
                .map(|s| Duration::seconds(i64::try_from(*s).unwrap_or(i64::MAX).min(MAX_INTERVAL_SECS)))
                .collect(),
        )
    }

    /// Number of stages before graduation
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Interval for a stage, `None` once graduated
    pub fn interval(&self, stage: usize) -> Option<Duration> {
        self.intervals.get(stage).copied()
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self {
            intervals: vec![
                Duration::hours(1),
                Duration::days(1),
                Duration::days(3),
                Duration::days(7),
                Duration::days(14),
                Duration::days(30),
            ],
        }
    }
}

/// What `mark_mastered` did to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mastery {
    /// The word had no record; one was created
    First,
    /// The word already had a record; its schedule was restarted
    Reset,
}

/// Pure scheduling rules over a ledger value.
///
/// None of the operations mutate their input; each returns a new ledger.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    table: IntervalTable,
}

impl Scheduler {
    pub fn new(table: IntervalTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &IntervalTable {
        &self.table
    }

    /// Stage at which a record is graduated
    pub fn graduated_stage(&self) -> usize {
        self.table.len()
    }

    pub fn is_graduated(&self, record: &ReviewRecord) -> bool {
        record.stage >= self.graduated_stage()
    }

    /// Mark a word as mastered, starting (or restarting) its schedule at stage 0.
    ///
    /// The word id is not checked against the catalog.
    pub fn mark_mastered(&self, ledger: &Ledger, word_id: &str, now: DateTime<Utc>) -> (Ledger, Mastery) {
        let mastery = if ledger.contains(word_id) {
            Mastery::Reset
        } else {
            Mastery::First
        };
        (ledger.with_record(ReviewRecord::new(word_id, now)), mastery)
    }

    /// Apply a review outcome. Words without a record are ignored.
    pub fn record_review_outcome(
        &self,
        ledger: &Ledger,
        word_id: &str,
        success: bool,
        now: DateTime<Utc>,
    ) -> Ledger {
        let Some(existing) = ledger.get(word_id) else {
            log::debug!("scheduler: ignoring review of unknown word {}", word_id);
            return ledger.clone();
        };

        let stage = if success {
            (existing.stage + 1).min(self.graduated_stage())
        } else {
            0
        };

        ledger.with_record(ReviewRecord {
            word_id: word_id.to_string(),
            last_review_time: now,
            stage,
        })
    }

    /// Whether a single record is due at `now`. Equality with the interval counts as due.
    pub fn is_due(&self, record: &ReviewRecord, now: DateTime<Utc>) -> bool {
        match self.table.interval(record.stage) {
            Some(interval) => now - record.last_review_time >= interval,
            None => false,
        }
    }

    /// Records due for review at `now`, in ledger order
    pub fn due_set<'a>(&self, ledger: &'a Ledger, now: DateTime<Utc>) -> Vec<&'a ReviewRecord> {
        ledger.records().filter(|r| self.is_due(r, now)).collect()
    }

    /// When a record next becomes due, `None` once graduated
    pub fn next_due_at(&self, record: &ReviewRecord) -> Option<DateTime<Utc>> {
        self.table
            .interval(record.stage)
            .map(|interval| record.last_review_time + interval)
    }
}

/// Format a duration as a compact label (`now`, `45m`, `1h`, `3d`, `2w`, `1mo`, `1y`)
pub fn format_interval(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    let days = duration.num_days();

    if minutes <= 0 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{}m", minutes)
    } else if days < 1 {
        format!("{}h", duration.num_hours())
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
