//! Question generation.
//!
//! [`QuestionProvider`] turns a topic and difficulty into a [`QuizQuestion`]
//! by prompting a [`CompletionClient`], parsing the reply and rejecting
//! questions already handed out in the session.

mod gemini;
mod parser;
mod prompt;
mod registry;

use std::future::Future;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::models::{Difficulty, QuizQuestion};

pub use gemini::{GeminiClient, GenerationConfig};
pub use parser::{ParseError, parse_question};
pub use prompt::build_prompt;
pub use registry::UsedQuestions;

/// Re-attempts after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// A text-generation backend.
pub trait CompletionClient {
    /// Sends one prompt and returns the raw reply text.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// What to do with a reply that does not follow the requested layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Count the reply as a failed attempt.
    #[default]
    Retry,
    /// Hand out [`QuizQuestion::placeholder`] instead.
    Placeholder,
}

pub struct QuestionProvider<C> {
    client: C,
    max_retries: u32,
    on_malformed: MalformedPolicy,
}

impl<C: CompletionClient> QuestionProvider<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            on_malformed: MalformedPolicy::default(),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Generates a question not yet in `used` and registers it there.
    ///
    /// Duplicates, malformed replies (under [`MalformedPolicy::Retry`]) and
    /// endpoint failures all consume the same retry budget. When the budget
    /// runs out the error of the last attempt is returned.
    pub async fn generate(
        &self,
        topic: &str,
        difficulty: Difficulty,
        used: &mut UsedQuestions,
    ) -> Result<QuizQuestion, GenerationError> {
        let prompt = build_prompt(topic, difficulty);
        let attempts = self.max_retries + 1;
        debug!(topic, %difficulty, attempts, "generating question");

        let mut attempt = 1;
        loop {
            match self.attempt(&prompt, used).await {
                Ok(question) => {
                    used.insert(&question.question);
                    return Ok(question);
                }
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    warn!(attempt, remaining = attempts - attempt, "Question attempt failed: {}", e);
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(
        &self,
        prompt: &str,
        used: &UsedQuestions,
    ) -> Result<QuizQuestion, GenerationError> {
        let reply = self.client.complete(prompt).await?;

        let question = match parse_question(&reply) {
            Ok(question) => question,
            Err(e) => match self.on_malformed {
                MalformedPolicy::Retry => return Err(e.into()),
                MalformedPolicy::Placeholder => {
                    warn!("Malformed reply ({}), using placeholder question", e);
                    QuizQuestion::placeholder()
                }
            },
        };

        if used.contains(&question.question) {
            return Err(GenerationError::Duplicate);
        }

        Ok(question)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted [`CompletionClient`] for tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Replays canned replies in order. Once the script runs out every call
    /// fails with an API error.
    #[derive(Default)]
    pub struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, GenerationError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.into()));
            self
        }

        pub fn question(self, text: &str, correct: char) -> Self {
            self.reply(reply_for(text, correct))
        }

        pub fn fail(self, message: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(GenerationError::Api(message.to_string())));
            self
        }

        pub fn push_question(&self, text: &str, correct: char) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(reply_for(text, correct)));
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Api("script exhausted".to_string())))
        }
    }

    /// A well-formed model reply for `text` with `correct` as the answer.
    pub fn reply_for(text: &str, correct: char) -> String {
        format!(
            "Question: {text}\nA. first\nB. second\nC. third\nD. fourth\nCorrect Answer: {correct}\nExplanation: Because."
        )
    }
}
