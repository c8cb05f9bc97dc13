use chrono::{DateTime, Utc};
use composition_core::model::{GameResult, GameSettings, Level, Progress, Question};

use crate::error::GameError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    Finished,
}

/// Outcome of a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub progress: Progress,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Score keeping for one timed round.
///
/// Holds the current question and the running tally. It knows nothing about time;
/// the controller decides when the round ends and calls [`GameSession::finish`].
#[derive(Debug, Clone)]
pub struct GameSession {
    level: Level,
    settings: GameSettings,
    question: Option<Question>,
    count_of_right_answers: u32,
    count_of_questions: u32,
    progress: Progress,
    phase: GamePhase,
    started_at: DateTime<Utc>,
    result: Option<GameResult>,
}

impl GameSession {
    #[must_use]
    pub fn new(
        level: Level,
        settings: GameSettings,
        first_question: Question,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            level,
            settings,
            question: Some(first_question),
            count_of_right_answers: 0,
            count_of_questions: 0,
            progress: Progress::compute(0, 0, &settings),
            phase: GamePhase::Running,
            started_at,
            result: None,
        }
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// The question awaiting an answer; `None` once finished.
    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// Score `selection` against the current question and move on to `next_question`.
    ///
    /// Any value is accepted; one that is not among the options simply counts as wrong.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Finished` if the round is over.
    pub fn choose_answer(
        &mut self,
        selection: i64,
        next_question: Question,
    ) -> Result<AnswerOutcome, GameError> {
        if self.is_finished() {
            return Err(GameError::Finished);
        }
        let Some(current) = self.question.replace(next_question) else {
            return Err(GameError::Finished);
        };

        let correct = current.is_right(selection);
        if correct {
            self.count_of_right_answers = self.count_of_right_answers.saturating_add(1);
        }
        self.count_of_questions = self.count_of_questions.saturating_add(1);
        self.progress = Progress::compute(
            self.count_of_right_answers,
            self.count_of_questions,
            &self.settings,
        );

        Ok(AnswerOutcome {
            correct,
            progress: self.progress,
        })
    }

    /// End the round and produce its result.
    ///
    /// The winner is decided from the progress at this instant only.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Finished` if the round was already finished.
    pub fn finish(&mut self, finished_at: DateTime<Utc>) -> Result<&GameResult, GameError> {
        if self.is_finished() {
            return Err(GameError::Finished);
        }
        self.phase = GamePhase::Finished;
        self.question = None;

        let result = self.result.insert(GameResult {
            winner: self.progress.is_winning(),
            count_of_right_answers: self.count_of_right_answers,
            count_of_questions: self.count_of_questions,
            settings: self.settings,
            started_at: self.started_at,
            finished_at,
        });
        Ok(result)
    }
}
