use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::progress::percent_of_right_answers;
use crate::model::settings::GameSettings;

/// Final outcome of a session, produced once when time runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: bool,
    pub count_of_right_answers: u32,
    pub count_of_questions: u32,
    pub settings: GameSettings,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl GameResult {
    #[must_use]
    pub fn percent_of_right_answers(&self) -> u32 {
        percent_of_right_answers(self.count_of_right_answers, self.count_of_questions)
    }
}
