//! Daily goal, streak and star bookkeeping
//!
//! All functions take the current stats by reference and return an updated copy.

use chrono::{DateTime, Local, TimeZone, Utc};

use super::models::DailyStats;

/// Roll the daily counters over if `now` falls on a later local calendar day
/// than the last activity. Must run once per load, before today's count is read.
pub fn on_session_start(stats: &DailyStats, now: DateTime<Utc>) -> DailyStats {
    on_session_start_in(stats, now, &Local)
}

/// [`on_session_start`] against an explicit time zone's day boundaries
pub fn on_session_start_in<Tz: TimeZone>(stats: &DailyStats, now: DateTime<Utc>, tz: &Tz) -> DailyStats {
    let last_day = stats.last_active.with_timezone(tz).date_naive();
    let today = now.with_timezone(tz).date_naive();

    if last_day == today {
        return stats.clone();
    }

    // A streak survives only if the previous activity was yesterday
    let streak = if last_day.succ_opt() == Some(today) {
        stats.streak.saturating_add(1)
    } else {
        1
    };

    log::info!(
        "tracker: new day {} (last active {}), resetting {} words learned, streak {}",
        today,
        last_day,
        stats.words_learned_today,
        streak,
    );

    DailyStats {
        words_learned_today: 0,
        last_active: now,
        streak,
        ..stats.clone()
    }
}

/// Count a word mastered for the first time
pub fn on_first_mastery(stats: &DailyStats, now: DateTime<Utc>) -> DailyStats {
    DailyStats {
        words_mastered: stats.words_mastered.saturating_add(1),
        words_learned_today: stats.words_learned_today.saturating_add(1),
        last_active: now,
        ..stats.clone()
    }
}

pub fn award_stars(stats: &DailyStats, amount: u32) -> DailyStats {
    DailyStats {
        stars: stats.stars.saturating_add(amount),
        ..stats.clone()
    }
}

/// Fraction of today's goal reached, capped at 1.0. A zero goal counts as met.
pub fn daily_progress(stats: &DailyStats) -> f64 {
    if stats.daily_goal == 0 {
        return 1.0;
    }
    (f64::from(stats.words_learned_today) / f64::from(stats.daily_goal)).min(1.0)
}

pub fn goal_reached(stats: &DailyStats) -> bool {
    stats.words_learned_today >= stats.daily_goal
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, hour, 0, 0).unwrap()
    }

    fn stats_active_at(last_active: DateTime<Utc>) -> DailyStats {
        DailyStats {
            words_learned_today: 7,
            streak: 4,
            ..DailyStats::initial(last_active)
        }
    }

    #[test]
    fn test_rollover_resets_today_count() {
        let stats = stats_active_at(at(10, 18));
        let now = at(11, 8);

        let rolled = on_session_start_in(&stats, now, &Utc);
        assert_eq!(rolled.words_learned_today, 0);
        assert_eq!(rolled.last_active, now);
        assert_eq!(rolled.stars, stats.stars);
    }

    #[test]
    fn test_same_day_is_unchanged() {
        let stats = stats_active_at(at(10, 1));
        let rolled = on_session_start_in(&stats, at(10, 23), &Utc);
        assert_eq!(rolled, stats);
    }

    #[test]
    fn test_rollover_uses_zone_day_boundaries() {
        // 23:00 UTC and 01:00 UTC next day are the same day at UTC+3
        let zone = chrono::FixedOffset::east_opt(3 * 3600).unwrap();
        let stats = stats_active_at(at(10, 22));

        let rolled = on_session_start_in(&stats, at(11, 1), &zone);
        assert_eq!(rolled, stats);

        let rolled = on_session_start_in(&stats, at(11, 1), &Utc);
        assert_eq!(rolled.words_learned_today, 0);
    }

    #[test]
    fn test_streak_carries_over_consecutive_days() {
        let stats = stats_active_at(at(10, 12));
        assert_eq!(on_session_start_in(&stats, at(11, 12), &Utc).streak, 5);
        assert_eq!(on_session_start_in(&stats, at(13, 12), &Utc).streak, 1);
    }

    #[test]
    fn test_first_mastery_counts() {
        let now = at(10, 12);
        let stats = DailyStats::initial(now - Duration::hours(1));
        let stats = on_first_mastery(&stats, now);
        let stats = on_first_mastery(&stats, now);

        assert_eq!(stats.words_mastered, 2);
        assert_eq!(stats.words_learned_today, 2);
        assert_eq!(stats.last_active, now);
    }

    #[test]
    fn test_award_stars() {
        let stats = DailyStats::initial(at(10, 12));
        let stats = award_stars(&stats, 12);
        assert_eq!(stats.stars, 17);

        let rich = DailyStats { stars: u32::MAX - 1, ..stats };
        assert_eq!(award_stars(&rich, 10).stars, u32::MAX);
    }

    #[test]
    fn test_daily_progress() {
        let mut stats = DailyStats::initial(at(10, 12));
        assert_eq!(daily_progress(&stats), 0.0);

        stats.words_learned_today = 3;
        assert!((daily_progress(&stats) - 0.2).abs() < 1e-9);
        assert!(!goal_reached(&stats));

        stats.words_learned_today = 40;
        assert_eq!(daily_progress(&stats), 1.0);
        assert!(goal_reached(&stats));

        stats.daily_goal = 0;
        assert_eq!(daily_progress(&stats), 1.0);
    }
}
