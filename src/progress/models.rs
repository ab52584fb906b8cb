//! Daily stats data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of new words per day
pub const DEFAULT_DAILY_GOAL: u32 = 15;

/// Stars a brand new learner starts with
pub const STARTING_STARS: u32 = 5;

fn default_stars() -> u32 {
    STARTING_STARS
}

fn default_streak() -> u32 {
    1
}

fn default_daily_goal() -> u32 {
    DEFAULT_DAILY_GOAL
}

/// Learner-wide counters persisted with the review ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// Reward currency; only ever increased
    #[serde(default = "default_stars")]
    pub stars: u32,
    /// Words mastered for the first time, all time
    #[serde(default)]
    pub words_mastered: u32,
    #[serde(default)]
    pub study_minutes: u32,
    /// Consecutive active days
    #[serde(default = "default_streak")]
    pub streak: u32,
    /// Last state-touching activity
    #[serde(default = "Utc::now")]
    pub last_active: DateTime<Utc>,
    /// Words mastered for the first time since the last day rollover
    #[serde(default)]
    pub words_learned_today: u32,
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
}

impl DailyStats {
    /// Stats for a learner who has never opened the app
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            stars: STARTING_STARS,
            words_mastered: 0,
            study_minutes: 0,
            streak: 1,
            last_active: now,
            words_learned_today: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
        }
    }
}

impl Default for DailyStats {
    fn default() -> Self {
        Self::initial(Utc::now())
    }
}
