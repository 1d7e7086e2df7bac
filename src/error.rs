//! Error types shared across the crate.

use std::io;

use thiserror::Error;

use crate::provider::ParseError;
use crate::session::QuizStatus;

/// Failure to obtain a question from the generation endpoint.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Request to the generation endpoint failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-success reply; carries the message reported by the endpoint.
    #[error("{0}")]
    Api(String),

    #[error("No text in response")]
    EmptyResponse,

    #[error("Could not parse the generated question: {0}")]
    Malformed(#[from] ParseError),

    #[error("Unable to generate unique question after multiple attempts")]
    Duplicate,
}

// The request URL never reaches a message or a log line.
impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

/// Settings rejected before a session is started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a topic")]
    EmptyTopic,

    #[error("Unsupported number of questions: {0}")]
    UnsupportedQuestionCount(usize),
}

/// An intent that the session cannot accept in its current state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("No quiz has been started")]
    NotStarted,

    #[error("Quiz is busy ({0})")]
    Busy(QuizStatus),

    #[error("Quiz is already completed")]
    Completed,

    #[error("Question {0} is not available yet")]
    NoQuestion(usize),

    #[error("Question {0} has already been answered")]
    AlreadyAnswered(usize),

    #[error("Nothing to retry")]
    NothingToRetry,
}

/// Error type for running the quiz application.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid quiz settings: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
