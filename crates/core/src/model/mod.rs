mod level;
mod progress;
mod question;
mod result;
mod settings;

pub use level::{Level, ParseLevelError};
pub use progress::{Progress, percent_of_right_answers};
pub use question::{Question, QuestionError};
pub use result::GameResult;
pub use settings::{GameSettings, GameSettingsError, MIN_SUM_VALUE};
