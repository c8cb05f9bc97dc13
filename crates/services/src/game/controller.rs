use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use composition_core::Clock;
use composition_core::model::{GameResult, GameSettings, Level, Progress};
use composition_core::time::format_countdown;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::countdown::{Countdown, CountdownHandle, CountdownListener};
use super::session::{AnswerOutcome, GameSession};
use super::state::GameState;
use crate::error::GameError;
use crate::repository::GameRepository;
use crate::resources::TextResources;

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

struct Inner {
    session: GameSession,
    disposed: bool,
}

struct Shared {
    inner: Mutex<Inner>,
    state: watch::Sender<GameState>,
    repository: Arc<dyn GameRepository>,
    resources: Arc<dyn TextResources>,
    clock: Clock,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &GameSession, formatted_time: Option<String>) {
        self.state.send_modify(|state| {
            let time = formatted_time
                .unwrap_or_else(|| std::mem::take(&mut state.formatted_time));
            *state = GameState::from_session(session, time, self.resources.as_ref());
        });
    }
}

impl CountdownListener for Shared {
    fn on_tick(&self, remaining: Duration) {
        let inner = self.lock();
        if inner.disposed || inner.session.is_finished() {
            return;
        }
        let remaining_ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
        let formatted = format_countdown(remaining_ms);
        debug!(remaining_ms, "tick");
        self.state.send_modify(|state| state.formatted_time = formatted);
    }

    fn on_finish(&self) {
        let mut inner = self.lock();
        if inner.disposed {
            return;
        }
        let finished_at = self.clock.now();
        let result = match inner.session.finish(finished_at) {
            Ok(result) => result.clone(),
            Err(_) => return,
        };
        info!(
            level = %inner.session.level(),
            winner = result.winner,
            right = result.count_of_right_answers,
            questions = result.count_of_questions,
            percent = result.percent_of_right_answers(),
            "game finished"
        );
        self.publish(&inner.session, Some(format_countdown(0)));
    }
}

/// Drives one timed round: owns the countdown, the current question and the score.
///
/// State is published through a `watch` channel; subscribers always see the latest
/// snapshot. Answers and countdown events are serialized on one lock, so no question
/// is produced after the round has finished. Dropping the controller stops the
/// countdown before returning.
pub struct GameController {
    shared: Arc<Shared>,
    countdown: CountdownHandle,
}

impl GameController {
    /// Fetch settings for `level`, publish the first question and start the countdown.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SettingsUnavailable` or `GameError::QuestionGenerationFailed`
    /// when a provider fails, and `GameError::RuntimeUnavailable` outside a runtime.
    pub fn start(
        level: Level,
        repository: Arc<dyn GameRepository>,
        resources: Arc<dyn TextResources>,
        clock: Clock,
    ) -> Result<Self, GameError> {
        let settings = repository
            .game_settings(level)
            .map_err(|source| GameError::SettingsUnavailable { level, source })?;
        let question = repository
            .generate_question(settings.max_sum_value())
            .map_err(GameError::QuestionGenerationFailed)?;

        let session = GameSession::new(level, settings, question, clock.now());
        let total_ms = settings.game_time_millis();
        let initial =
            GameState::from_session(&session, format_countdown(total_ms), resources.as_ref());
        let (state, _) = watch::channel(initial);

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                session,
                disposed: false,
            }),
            state,
            repository,
            resources,
            clock,
        });

        let listener: Arc<dyn CountdownListener> = shared.clone();
        let countdown =
            Countdown::new(Duration::from_millis(total_ms), TICK_INTERVAL).start(listener)?;

        info!(
            %level,
            seconds = settings.game_time_in_seconds(),
            min_right = settings.min_count_of_right_answers(),
            min_percent = settings.min_percent_of_right_answers(),
            max_sum = settings.max_sum_value(),
            "game started"
        );

        Ok(Self { shared, countdown })
    }

    /// Submit the player's pick for the current question.
    ///
    /// The next question is obtained before the score changes, so a provider failure
    /// leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Finished` once time has run out, or
    /// `GameError::QuestionGenerationFailed` if no next question can be produced.
    pub fn choose_answer(&self, selection: i64) -> Result<AnswerOutcome, GameError> {
        let mut inner = self.shared.lock();
        if inner.session.is_finished() {
            warn!(selection, "answer rejected: game already finished");
            return Err(GameError::Finished);
        }

        let max_sum = inner.session.settings().max_sum_value();
        let next = self
            .shared
            .repository
            .generate_question(max_sum)
            .map_err(GameError::QuestionGenerationFailed)?;
        let outcome = inner.session.choose_answer(selection, next)?;

        debug!(
            selection,
            correct = outcome.correct,
            right = outcome.progress.count_of_right_answers,
            questions = outcome.progress.count_of_questions,
            "answer scored"
        );
        self.shared.publish(&inner.session, None);
        Ok(outcome)
    }

    /// A receiver of state snapshots; it starts out holding the current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.shared.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.shared.state.borrow().clone()
    }

    #[must_use]
    pub fn settings(&self) -> GameSettings {
        *self.shared.lock().session.settings()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.shared.lock().session.progress()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.shared.lock().session.is_finished()
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.shared.lock().session.result().cloned()
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        // Taking the lock waits out a callback already in flight.
        self.shared.lock().disposed = true;
        self.countdown.cancel();
        debug!("game controller disposed");
    }
}
