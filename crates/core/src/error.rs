use thiserror::Error;

use crate::model::{GameSettingsError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Settings(#[from] GameSettingsError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}
