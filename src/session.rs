//! Quiz session state machine.
//!
//! [`QuizOrchestrator`] owns the one [`QuizSession`] of the process and is
//! the only place session state changes. Intents are processed one at a
//! time; question generation is the only suspension point, and while it runs
//! the status reads [`QuizStatus::Loading`] (first question) or
//! [`QuizStatus::Fetching`] (any later one).

use std::collections::BTreeMap;
use std::fmt;

use tracing::{error, info};
use uuid::Uuid;

use crate::error::{GenerationError, IntentError, ValidationError};
use crate::models::{OptionLabel, QuizQuestion, QuizSettings};
use crate::provider::{CompletionClient, QuestionProvider, UsedQuestions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizStatus {
    #[default]
    Idle,
    Loading,
    Fetching,
    Completed,
    Error,
}

impl QuizStatus {
    pub fn is_busy(self) -> bool {
        matches!(self, QuizStatus::Loading | QuizStatus::Fetching)
    }
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizStatus::Idle => "idle",
            QuizStatus::Loading => "loading",
            QuizStatus::Fetching => "fetching",
            QuizStatus::Completed => "completed",
            QuizStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// State of one quiz run.
///
/// Question slots are filled front to back, so slot `i` is filled exactly
/// when `i < questions().len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizSession {
    id: Option<Uuid>,
    settings: QuizSettings,
    questions: Vec<QuizQuestion>,
    current_question_index: usize,
    user_answers: BTreeMap<usize, OptionLabel>,
    status: QuizStatus,
    error: Option<String>,
    used_questions: UsedQuestions,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the running session, `None` before the first start.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn status(&self) -> QuizStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_started(&self) -> bool {
        self.id.is_some()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.question(self.current_question_index)
    }

    pub fn total_questions(&self) -> usize {
        self.settings.number_of_questions
    }

    pub fn user_answers(&self) -> &BTreeMap<usize, OptionLabel> {
        &self.user_answers
    }

    pub fn answer_for(&self, index: usize) -> Option<OptionLabel> {
        self.user_answers.get(&index).copied()
    }

    pub fn is_current_answered(&self) -> bool {
        self.user_answers.contains_key(&self.current_question_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.total_questions()
    }

    pub fn used_questions(&self) -> &UsedQuestions {
        &self.used_questions
    }

    fn begin(&mut self, settings: QuizSettings) {
        self.used_questions.clear();
        self.id = Some(Uuid::new_v4());
        self.settings = settings;
        self.questions.clear();
        self.current_question_index = 0;
        self.user_answers.clear();
        self.error = None;
    }

    fn reset(&mut self) {
        self.used_questions.clear();
        *self = Self::default();
    }

    fn fail(&mut self, err: GenerationError) {
        error!(session = ?self.id, "Question generation failed: {}", err);
        self.status = QuizStatus::Error;
        self.error = Some(err.to_string());
    }
}

/// Drives a [`QuizSession`] with questions from a [`QuestionProvider`].
pub struct QuizOrchestrator<C> {
    provider: QuestionProvider<C>,
    session: QuizSession,
}

impl<C> QuizOrchestrator<C> {
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn provider(&self) -> &QuestionProvider<C> {
        &self.provider
    }

    /// Records an answer for the current question. A question can be
    /// answered once; correctness is derived later from the stored label.
    pub fn answer(&mut self, label: OptionLabel) -> Result<(), IntentError> {
        let session = &mut self.session;
        match session.status {
            QuizStatus::Idle | QuizStatus::Error => {}
            QuizStatus::Completed => return Err(IntentError::Completed),
            status => return Err(IntentError::Busy(status)),
        }

        let index = session.current_question_index;
        if session.question(index).is_none() {
            return Err(IntentError::NoQuestion(index));
        }
        if session.user_answers.contains_key(&index) {
            return Err(IntentError::AlreadyAnswered(index));
        }

        session.user_answers.insert(index, label);
        info!(session = ?session.id, index, %label, "Answer recorded");
        Ok(())
    }

    /// Returns to the initial empty state, whatever the current status.
    pub fn reset(&mut self) {
        if self.session.is_started() {
            info!(session = ?self.session.id, "Quiz reset");
        }
        self.session.reset();
    }
}

impl<C: CompletionClient> QuizOrchestrator<C> {
    pub fn new(provider: QuestionProvider<C>) -> Self {
        Self {
            provider,
            session: QuizSession::new(),
        }
    }

    /// Starts a new session and generates its first question.
    ///
    /// Invalid settings are rejected before anything changes. A generation
    /// failure is not an `Err`: it leaves the session in
    /// [`QuizStatus::Error`] with no questions.
    pub async fn start(&mut self, settings: QuizSettings) -> Result<(), ValidationError> {
        settings.validate()?;

        self.session.begin(settings);
        info!(
            session = ?self.session.id,
            topic = %self.session.settings.topic,
            questions = self.session.settings.number_of_questions,
            difficulty = %self.session.settings.difficulty,
            "Quiz started"
        );

        self.fetch_slot(0).await;
        Ok(())
    }

    /// Moves to the next question, generating it first, or completes the
    /// quiz when the current question is the last one.
    ///
    /// On a generation failure the index stays on the current question and
    /// the session moves to [`QuizStatus::Error`].
    pub async fn advance(&mut self) -> Result<(), IntentError> {
        match self.session.status {
            QuizStatus::Idle => {}
            QuizStatus::Completed => return Err(IntentError::Completed),
            QuizStatus::Error if !self.session.questions.is_empty() => {}
            QuizStatus::Error => return Err(IntentError::NotStarted),
            status => return Err(IntentError::Busy(status)),
        }
        if !self.session.is_started() {
            return Err(IntentError::NotStarted);
        }

        let next = self.session.current_question_index + 1;
        if next >= self.session.total_questions() {
            self.session.status = QuizStatus::Completed;
            self.session.error = None;
            info!(
                session = ?self.session.id,
                answered = self.session.user_answers.len(),
                "Quiz completed"
            );
            return Ok(());
        }

        self.fetch_slot(next).await;
        Ok(())
    }

    /// Re-attempts the generation that put the session into
    /// [`QuizStatus::Error`].
    pub async fn retry(&mut self) -> Result<(), IntentError> {
        if self.session.status != QuizStatus::Error || !self.session.is_started() {
            return Err(IntentError::NothingToRetry);
        }

        if self.session.questions.is_empty() {
            self.fetch_slot(0).await;
            Ok(())
        } else {
            self.advance().await
        }
    }

    /// Generates the question for `slot`, which must be the first unfilled
    /// one, and makes it current on success.
    async fn fetch_slot(&mut self, slot: usize) {
        debug_assert_eq!(slot, self.session.questions.len());

        self.session.status = if slot == 0 {
            QuizStatus::Loading
        } else {
            QuizStatus::Fetching
        };

        let session = &mut self.session;
        let result = self
            .provider
            .generate(
                &session.settings.topic,
                session.settings.difficulty,
                &mut session.used_questions,
            )
            .await;

        match result {
            Ok(question) => {
                session.questions.push(question);
                session.current_question_index = slot;
                session.status = QuizStatus::Idle;
                session.error = None;
            }
            Err(e) => session.fail(e),
        }
    }
}
