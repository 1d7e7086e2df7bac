use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Question counts a quiz can be started with.
pub const QUESTION_COUNTS: [usize; 4] = [5, 10, 15, 20];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings a quiz session is started with. A session never changes its
/// settings; new settings mean a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    pub topic: String,
    pub number_of_questions: usize,
    pub difficulty: Difficulty,
}

impl QuizSettings {
    pub fn new(topic: impl Into<String>, number_of_questions: usize, difficulty: Difficulty) -> Self {
        Self {
            topic: topic.into(),
            number_of_questions,
            difficulty,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }

        if !QUESTION_COUNTS.contains(&self.number_of_questions) {
            return Err(ValidationError::UnsupportedQuestionCount(
                self.number_of_questions,
            ));
        }

        Ok(())
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self::new("", QUESTION_COUNTS[0], Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_settings() {
        assert!(QuizSettings::new("Algebra", 5, Difficulty::Easy).validate().is_ok());
        assert!(QuizSettings::new("Rust", 20, Difficulty::Hard).validate().is_ok());

        assert!(matches!(
            QuizSettings::new("", 5, Difficulty::Easy).validate(),
            Err(ValidationError::EmptyTopic)
        ));
        assert!(matches!(
            QuizSettings::new("   ", 5, Difficulty::Easy).validate(),
            Err(ValidationError::EmptyTopic)
        ));
        assert!(matches!(
            QuizSettings::new("Algebra", 0, Difficulty::Easy).validate(),
            Err(ValidationError::UnsupportedQuestionCount(0))
        ));
        assert!(matches!(
            QuizSettings::new("Algebra", 7, Difficulty::Easy).validate(),
            Err(ValidationError::UnsupportedQuestionCount(7))
        ));
    }

    #[test]
    fn test_difficulty_cycles() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.next().previous(), difficulty);
        }
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
    }
}
