use serde::{Deserialize, Serialize};

use crate::model::settings::GameSettings;

/// Percent of right answers, floored. Zero when nothing was answered yet.
///
/// This is the exact `floor(100 * right / total)`. Scaling a floating-point ratio
/// instead, as in `((right / total as f64) * 100) as u32`, truncates float artifacts
/// down a whole point (29/50 gives 57). Integer arithmetic deliberately avoids that.
#[must_use]
pub fn percent_of_right_answers(count_of_right_answers: u32, count_of_questions: u32) -> u32 {
    if count_of_questions == 0 {
        return 0;
    }
    let percent = u64::from(count_of_right_answers) * 100 / u64::from(count_of_questions);
    u32::try_from(percent).unwrap_or(u32::MAX)
}

/// Running score of a session, recomputed after every answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub count_of_right_answers: u32,
    pub count_of_questions: u32,
    pub percent_of_right_answers: u32,
    pub is_count_sufficient: bool,
    pub is_percent_sufficient: bool,
}

impl Progress {
    #[must_use]
    pub fn compute(
        count_of_right_answers: u32,
        count_of_questions: u32,
        settings: &GameSettings,
    ) -> Self {
        let percent = percent_of_right_answers(count_of_right_answers, count_of_questions);
        Self {
            count_of_right_answers,
            count_of_questions,
            percent_of_right_answers: percent,
            is_count_sufficient: count_of_right_answers >= settings.min_count_of_right_answers(),
            is_percent_sufficient: percent >= settings.min_percent_of_right_answers(),
        }
    }

    /// Both thresholds are met.
    #[must_use]
    pub fn is_winning(&self) -> bool {
        self.is_count_sufficient && self.is_percent_sufficient
    }
}
