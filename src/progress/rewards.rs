//! Star rewards for finished rounds

/// Stars per correct quiz answer
pub const QUIZ_STARS_PER_CORRECT: u32 = 5;

/// Flat bonus for clearing the matching game
pub const MATCH_GAME_WIN_BONUS: u32 = 10;

/// Stars per word reviewed in a review session
pub const REVIEW_STARS_PER_WORD: u32 = 2;

/// Reward for completing a review session that started with `due_count` words
pub fn review_session_reward(due_count: usize) -> u32 {
    u32::try_from(due_count)
        .unwrap_or(u32::MAX)
        .saturating_mul(REVIEW_STARS_PER_WORD)
}

/// Reward for clearing the matching game with `correct` right answers
pub fn match_game_reward(correct: u32) -> u32 {
    correct.saturating_add(MATCH_GAME_WIN_BONUS)
}

/// Reward for a finished quiz
pub fn quiz_reward(correct: u32) -> u32 {
    correct.saturating_mul(QUIZ_STARS_PER_CORRECT)
}
