use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("visible number {visible_number} must be in 1..{sum}")]
    InvalidVisibleNumber { sum: u32, visible_number: u32 },

    #[error("options must contain the right answer {0}")]
    MissingRightAnswer(u32),

    #[error("options must be distinct")]
    DuplicateOption,

    #[error("max sum {max_sum_value} cannot produce {required} distinct options")]
    NotEnoughOptions { max_sum_value: u32, required: u32 },
}

/// A single "sum = visible + ?" puzzle.
///
/// The player sees `sum` and `visible_number` and picks the missing part among `options`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    sum: u32,
    visible_number: u32,
    options: Vec<u32>,
}

impl Question {
    /// Builds a question, checking that it is answerable.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the visible number does not split `sum` into two
    /// positive parts, or `options` is not a distinct set holding the right answer.
    pub fn new(sum: u32, visible_number: u32, options: Vec<u32>) -> Result<Self, QuestionError> {
        if visible_number == 0 || visible_number >= sum {
            return Err(QuestionError::InvalidVisibleNumber {
                sum,
                visible_number,
            });
        }
        let right_answer = sum - visible_number;
        if !options.contains(&right_answer) {
            return Err(QuestionError::MissingRightAnswer(right_answer));
        }
        let mut sorted = options.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != options.len() {
            return Err(QuestionError::DuplicateOption);
        }

        Ok(Self {
            sum,
            visible_number,
            options,
        })
    }

    #[must_use]
    pub fn sum(&self) -> u32 {
        self.sum
    }

    #[must_use]
    pub fn visible_number(&self) -> u32 {
        self.visible_number
    }

    #[must_use]
    pub fn options(&self) -> &[u32] {
        &self.options
    }

    #[must_use]
    pub fn right_answer(&self) -> u32 {
        self.sum - self.visible_number
    }

    /// Any integer may be offered; only the hidden part counts as right.
    #[must_use]
    pub fn is_right(&self, selection: i64) -> bool {
        selection == i64::from(self.right_answer())
    }
}
