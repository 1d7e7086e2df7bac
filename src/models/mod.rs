mod question;
mod settings;

pub use question::{OptionLabel, QuizOptions, QuizQuestion};
pub use settings::{Difficulty, QUESTION_COUNTS, QuizSettings};
