//! The owning context for a learner's state
//!
//! A `Session` holds the current `AppState` snapshot and the store it came from.
//! Every mutation computes a new snapshot with the pure scheduler and tracker
//! functions, writes it through to the store, and publishes it to subscribers.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::progress::{tracker, DailyStats};
use crate::storage::{AppState, StateStore};
use crate::vocab::{Mastery, ReviewRecord, Scheduler};

pub struct Session {
    state: AppState,
    store: Box<dyn StateStore>,
    scheduler: Scheduler,
    notifier: watch::Sender<AppState>,
    /// False when an unreadable record could not be moved aside; nothing is saved then
    writable: bool,
}

impl Session {
    /// Load the stored state (or start fresh) and apply the day rollover.
    ///
    /// An unreadable record is set aside before anything is written, so a
    /// fresh start never overwrites it.
    pub fn open(store: Box<dyn StateStore>, scheduler: Scheduler, now: DateTime<Utc>) -> Self {
        let mut writable = true;
        let loaded = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                log::info!("session: no saved state, starting fresh");
                AppState::initial(now)
            }
            Err(e) => {
                log::error!("session: failed to load saved state, starting fresh: {}", e);
                match store.set_aside() {
                    Ok(Some(backup)) => log::warn!("session: unreadable state kept at {}", backup),
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("session: could not set unreadable state aside, not saving: {}", e);
                        writable = false;
                    }
                }
                AppState::initial(now)
            }
        };

        let state = AppState {
            stats: tracker::on_session_start(&loaded.stats, now),
            ..loaded
        };

        let (notifier, _) = watch::channel(state.clone());
        let session = Self {
            state,
            store,
            scheduler,
            notifier,
            writable,
        };
        session.persist();
        session
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Receive every new snapshot after it has been written
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.notifier.subscribe()
    }

    /// Words due for review at `now`
    pub fn due_words(&self, now: DateTime<Utc>) -> Vec<ReviewRecord> {
        self.scheduler
            .due_set(&self.state.review_data, now)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn daily_progress(&self) -> f64 {
        tracker::daily_progress(&self.state.stats)
    }

    /// Mark a word as mastered. Only the first mastery counts toward the stats.
    pub fn mark_mastered(&mut self, word_id: &str, now: DateTime<Utc>) -> Mastery {
        let (review_data, mastery) = self
            .scheduler
            .mark_mastered(&self.state.review_data, word_id, now);

        let stats = match mastery {
            Mastery::First => tracker::on_first_mastery(&self.state.stats, now),
            Mastery::Reset => DailyStats {
                last_active: now,
                ..self.state.stats.clone()
            },
        };

        log::debug!("session: {} mastered ({:?})", word_id, mastery);
        self.commit(AppState {
            stats,
            review_data,
            ..self.state.clone()
        });
        mastery
    }

    /// Apply a review outcome; a miss also lands in the wrong-word notebook.
    /// Words that were never mastered are ignored.
    pub fn record_review(&mut self, word_id: &str, success: bool, now: DateTime<Utc>) {
        if !self.state.review_data.contains(word_id) {
            log::debug!("session: review of unmastered word {} ignored", word_id);
            return;
        }

        let review_data = self
            .scheduler
            .record_review_outcome(&self.state.review_data, word_id, success, now);
        let next = AppState {
            review_data,
            ..self.state.clone()
        };
        let next = if success { next } else { next.with_miss(word_id) };
        self.commit(next);
    }

    /// Note a wrong answer outside the review flow (game or quiz)
    pub fn record_miss(&mut self, word_id: &str) {
        self.commit(self.state.with_miss(word_id));
    }

    pub fn award_stars(&mut self, amount: u32) {
        self.commit(AppState {
            stats: tracker::award_stars(&self.state.stats, amount),
            ..self.state.clone()
        });
    }

    pub fn set_category(&mut self, category: &str) {
        self.commit(AppState {
            current_category: category.to_string(),
            ..self.state.clone()
        });
    }

    pub fn set_daily_goal(&mut self, goal: u32) {
        let mut next = self.state.clone();
        next.stats.daily_goal = goal;
        self.commit(next);
    }

    fn commit(&mut self, next: AppState) {
        if next == self.state {
            return;
        }
        self.state = next;
        self.persist();
        self.notifier.send_replace(self.state.clone());
    }

    fn persist(&self) {
        if !self.writable {
            return;
        }
        // Best effort: the in-memory state stays authoritative
        if let Err(e) = self.store.save(&self.state) {
            log::error!("session: failed to save state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use std::fs;
    use tempfile::TempDir;

    use crate::storage::{JsonFileStore, MemoryStore};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 14, 12, 0, 0).unwrap()
    }

    fn open_session() -> (Session, MemoryStore) {
        let store = MemoryStore::new();
        let session = Session::open(Box::new(store.clone()), Scheduler::default(), t0());
        (session, store)
    }

    #[test]
    fn test_fresh_start_is_saved() {
        let (session, store) = open_session();

        assert_eq!(session.state().stats.stars, 5);
        assert!(session.state().review_data.is_empty());
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn test_remastery_does_not_double_count() {
        let (mut session, _store) = open_session();

        assert_eq!(session.mark_mastered("w1", t0()), Mastery::First);
        assert_eq!(session.mark_mastered("w2", t0()), Mastery::First);
        assert_eq!(session.mark_mastered("w1", t0() + Duration::minutes(5)), Mastery::Reset);

        let stats = &session.state().stats;
        assert_eq!(stats.words_mastered, 2);
        assert_eq!(stats.words_learned_today, 2);
        assert_eq!(stats.last_active, t0() + Duration::minutes(5));
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let (mut session, store) = open_session();

        session.mark_mastered("u2-cat", t0());
        session.award_stars(4);
        session.set_category("Unit 2 动物王国");
        assert_eq!(store.saves(), 4);

        let saved = store.load().unwrap().unwrap();
        assert_eq!(&saved, session.state());
    }

    #[test]
    fn test_ignored_review_does_not_write() {
        let (mut session, store) = open_session();
        session.record_review("ghost", true, t0());

        assert_eq!(store.saves(), 1);
        assert!(session.state().wrong_words.is_empty());
    }

    #[test]
    fn test_failed_review_lands_in_notebook() {
        let (mut session, _store) = open_session();
        session.mark_mastered("u2-cat", t0());

        let later = t0() + Duration::hours(2);
        assert_eq!(session.due_words(later).len(), 1);

        session.record_review("u2-cat", false, later);
        assert_eq!(session.state().wrong_words, vec!["u2-cat"]);
        assert!(session.due_words(later).is_empty());
        assert_eq!(session.due_words(later + Duration::hours(1)).len(), 1);
    }

    #[test]
    fn test_subscribers_see_new_snapshots() {
        let (mut session, _store) = open_session();
        let mut rx = session.subscribe();
        assert!(!rx.has_changed().unwrap());

        session.award_stars(10);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().stats.stars, 15);
    }

    #[test]
    fn test_open_rolls_over_stale_day() {
        let json = r#"{
            "stats": { "stars": 20, "wordsLearnedToday": 7, "lastActive": "2026-04-10T12:00:00Z" },
            "currentCategory": "Unit 2 动物王国"
        }"#;
        let store = MemoryStore::with_json(json);
        let session = Session::open(Box::new(store.clone()), Scheduler::default(), t0());

        assert_eq!(session.state().stats.words_learned_today, 0);
        assert_eq!(session.state().stats.last_active, t0());
        assert_eq!(session.state().stats.stars, 20);
        assert_eq!(session.state().current_category, "Unit 2 动物王国");

        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.stats.words_learned_today, 0);
    }

    #[test]
    fn test_open_same_instant_keeps_count() {
        let json = r#"{ "stats": { "wordsLearnedToday": 7, "lastActive": "2026-04-14T12:00:00Z" } }"#;
        let session = Session::open(Box::new(MemoryStore::with_json(json)), Scheduler::default(), t0());
        assert_eq!(session.state().stats.words_learned_today, 7);
    }

    #[test]
    fn test_corrupt_state_falls_back_to_initial() {
        let store = MemoryStore::with_json("{ definitely not json");
        let session = Session::open(Box::new(store.clone()), Scheduler::default(), t0());

        assert_eq!(session.state(), &AppState::initial(t0()));
        assert_eq!(store.set_aside_json().as_deref(), Some("{ definitely not json"));
    }

    #[test]
    fn test_unreadable_file_survives_open() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();
        let original = r#"{
            "stats": { "stars": -3, "lastActive": "2026-04-14T08:00:00Z" },
            "reviewData": { "u2-cat": { "wordId": "u2-cat", "lastReviewTime": 1776153600000, "stage": 4 } }
        }"#;
        let store = JsonFileStore::new(data_dir.clone());
        fs::write(store.state_path(), original).unwrap();

        let session = Session::open(Box::new(JsonFileStore::new(data_dir.clone())), Scheduler::default(), t0());
        assert!(session.state().review_data.is_empty());

        let backups: Vec<_> = fs::read_dir(&data_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), original);

        // The fresh state now lives in the regular file
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_record_miss_dedups_and_writes_through() {
        let (mut session, store) = open_session();

        session.record_miss("u2-dog");
        session.record_miss("u1-math");
        session.record_miss("u2-dog");

        assert_eq!(session.state().wrong_words, vec!["u2-dog", "u1-math"]);
        assert_eq!(store.saves(), 3);
        assert_eq!(store.load().unwrap().unwrap().wrong_words, vec!["u2-dog", "u1-math"]);
    }

    #[test]
    fn test_save_failure_keeps_state_in_memory() {
        let (mut session, store) = open_session();
        store.fail_saves(true);

        session.award_stars(3);
        assert_eq!(session.state().stats.stars, 8);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn test_daily_goal_drives_progress() {
        let (mut session, _store) = open_session();
        session.set_daily_goal(4);
        session.mark_mastered("a", t0());
        session.mark_mastered("b", t0());

        assert!((session.daily_progress() - 0.5).abs() < 1e-9);
    }
}
