use composition_core::model::{GameResult, Progress, Question};

use super::session::GameSession;
use crate::resources::{TextResources, TextTemplate};

/// Everything the view layer renders, published as one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Remaining time as `MM:SS`.
    pub formatted_time: String,
    pub question: Option<Question>,
    pub progress: Progress,
    pub percent_of_right_answers: u32,
    pub progress_answers: String,
    pub enough_count: bool,
    pub enough_percent: bool,
    pub min_percent: u32,
    /// Set exactly once, when time runs out.
    pub result: Option<GameResult>,
}

impl GameState {
    pub(crate) fn from_session(
        session: &GameSession,
        formatted_time: String,
        resources: &dyn TextResources,
    ) -> Self {
        let progress = session.progress();
        let settings = session.settings();
        Self {
            formatted_time,
            question: session.question().cloned(),
            progress,
            percent_of_right_answers: progress.percent_of_right_answers,
            progress_answers: resources.format(
                TextTemplate::ProgressAnswers,
                &[
                    progress.count_of_right_answers,
                    settings.min_count_of_right_answers(),
                ],
            ),
            enough_count: progress.is_count_sufficient,
            enough_percent: progress.is_percent_sufficient,
            min_percent: settings.min_percent_of_right_answers(),
            result: session.result().cloned(),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }
}
