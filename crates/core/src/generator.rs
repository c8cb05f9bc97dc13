//! Random question generation.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{MIN_SUM_VALUE, Question, QuestionError};

/// Number of answer options shown for each question.
pub const COUNT_OF_OPTIONS: u32 = 6;

const MIN_ANSWER_VALUE: u32 = 1;

/// Generates a question whose sum does not exceed `max_sum_value`.
///
/// Wrong options are drawn from a window of `count_of_options` around the right
/// answer, clamped to `[1, max_sum_value)`, so they stay plausible.
///
/// # Errors
///
/// Returns `QuestionError::NotEnoughOptions` when the window cannot hold
/// `count_of_options` distinct values.
pub fn generate_question<R: Rng + ?Sized>(
    rng: &mut R,
    max_sum_value: u32,
    count_of_options: u32,
) -> Result<Question, QuestionError> {
    if max_sum_value < MIN_SUM_VALUE || count_of_options == 0 {
        return Err(QuestionError::NotEnoughOptions {
            max_sum_value,
            required: count_of_options,
        });
    }

    let sum = rng.random_range(MIN_SUM_VALUE..=max_sum_value);
    let visible_number = rng.random_range(MIN_ANSWER_VALUE..sum);
    let right_answer = sum - visible_number;

    let from = right_answer
        .saturating_sub(count_of_options)
        .max(MIN_ANSWER_VALUE);
    let to = max_sum_value.min(right_answer.saturating_add(count_of_options));

    let mut wrong: Vec<u32> = (from..to).filter(|value| *value != right_answer).collect();
    let wanted = usize::try_from(count_of_options - 1).unwrap_or(usize::MAX);
    if wrong.len() < wanted {
        return Err(QuestionError::NotEnoughOptions {
            max_sum_value,
            required: count_of_options,
        });
    }
    wrong.shuffle(rng);
    wrong.truncate(wanted);

    let mut options = wrong;
    options.push(right_answer);
    options.shuffle(rng);

    Question::new(sum, visible_number, options)
}
