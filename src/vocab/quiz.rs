//! Multiple-choice rounds: the matching game, the quiz and the review flow

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::catalog::Catalog;
use super::models::VocabularyEntry;
use crate::progress::rewards;

/// One prompt with its shuffled answer options
#[derive(Debug, Clone)]
pub struct Question {
    pub word: VocabularyEntry,
    pub options: Vec<String>,
}

impl Question {
    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.word.en
    }
}

/// Build a question for `word` with up to `distractors` wrong options drawn from the catalog
pub fn build_question<R: Rng + ?Sized>(
    word: &VocabularyEntry,
    catalog: &Catalog,
    distractors: usize,
    rng: &mut R,
) -> Question {
    let mut seen = HashSet::new();
    let pool: Vec<&str> = catalog
        .all_words()
        .map(|w| w.en.as_str())
        .filter(|en| *en != word.en && seen.insert(*en))
        .collect();

    let mut options: Vec<String> = pool
        .choose_multiple(rng, distractors)
        .map(|en| en.to_string())
        .collect();
    options.push(word.en.clone());
    options.shuffle(rng);

    Question {
        word: word.clone(),
        options,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundKind {
    /// Five random words, three lives
    MatchGame,
    /// Ten random words, one attempt each
    Quiz,
    /// Every due word, one attempt each
    Review,
}

impl RoundKind {
    pub fn distractors(self) -> usize {
        match self {
            RoundKind::MatchGame | RoundKind::Review => 3,
            RoundKind::Quiz => 2,
        }
    }

    /// How many random words a round draws; review rounds use the due set instead
    pub fn question_count(self) -> Option<usize> {
        match self {
            RoundKind::MatchGame => Some(5),
            RoundKind::Quiz => Some(10),
            RoundKind::Review => None,
        }
    }

    pub fn lives(self) -> Option<u32> {
        match self {
            RoundKind::MatchGame => Some(3),
            RoundKind::Quiz | RoundKind::Review => None,
        }
    }
}

/// Result of answering the current question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub word_id: String,
    pub correct: bool,
}

#[derive(Debug, Clone)]
pub struct Round {
    kind: RoundKind,
    questions: Vec<Question>,
    index: usize,
    correct: u32,
    lives: Option<u32>,
}

impl Round {
    /// Start a game or quiz on randomly drawn catalog words
    pub fn random<R: Rng + ?Sized>(kind: RoundKind, catalog: &Catalog, rng: &mut R) -> Self {
        let words: Vec<&VocabularyEntry> = catalog.all_words().collect();
        let count = kind.question_count().unwrap_or(words.len());
        let picked: Vec<VocabularyEntry> = words
            .choose_multiple(rng, count)
            .map(|w| (*w).clone())
            .collect();
        Self::from_words(kind, &picked, catalog, rng)
    }

    /// Start a round on the given words, in the given order
    pub fn from_words<R: Rng + ?Sized>(
        kind: RoundKind,
        words: &[VocabularyEntry],
        catalog: &Catalog,
        rng: &mut R,
    ) -> Self {
        let questions = words
            .iter()
            .map(|w| build_question(w, catalog, kind.distractors(), rng))
            .collect();
        Self {
            kind,
            questions,
            index: 0,
            correct: 0,
            lives: kind.lives(),
        }
    }

    pub fn kind(&self) -> RoundKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn lives(&self) -> Option<u32> {
        self.lives
    }

    pub fn current(&self) -> Option<&Question> {
        if self.is_over() {
            None
        } else {
            self.questions.get(self.index)
        }
    }

    /// Ran out of lives
    pub fn is_lost(&self) -> bool {
        self.lives == Some(0)
    }

    pub fn is_over(&self) -> bool {
        self.is_lost() || self.index >= self.questions.len()
    }

    /// Answer the current question. In the matching game a wrong answer costs a
    /// life and the same question stays up; elsewhere every answer moves on.
    pub fn answer(&mut self, choice: &str) -> Option<Answer> {
        let question = self.current()?;
        let answer = Answer {
            word_id: question.word.id.clone(),
            correct: question.is_correct(choice),
        };

        if answer.correct {
            self.correct += 1;
            self.index += 1;
        } else if let Some(lives) = self.lives.as_mut() {
            *lives = lives.saturating_sub(1);
        } else {
            self.index += 1;
        }

        Some(answer)
    }

    /// Stars earned once the round is over; nothing while it is still running
    pub fn reward(&self) -> u32 {
        if !self.is_over() {
            return 0;
        }
        match self.kind {
            RoundKind::MatchGame if self.is_lost() => 0,
            RoundKind::MatchGame => rewards::match_game_reward(self.correct),
            RoundKind::Quiz => rewards::quiz_reward(self.correct),
            RoundKind::Review => rewards::review_session_reward(self.questions.len()),
        }
    }
}
