use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::ValidationError;
use crate::models::{Difficulty, OptionLabel, QUESTION_COUNTS, QuizSettings};
use crate::provider::CompletionClient;
use crate::session::{QuizOrchestrator, QuizSession, QuizStatus};

const NUM_OPTIONS: usize = 4;
const MAX_TOPIC_LENGTH: usize = 80;

/// What the terminal shows, derived from the session and any queued intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Loading,
    Quiz,
    Error,
    Result,
}

/// Intents that need a question generated and therefore run between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Start(QuizSettings),
    Advance,
    Retry,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Topic,
    Questions,
    Difficulty,
}

/// Input state of the settings screen.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub topic: String,
    pub difficulty: Difficulty,
    pub focus: FormField,
    pub error: Option<String>,
    count_index: usize,
}

impl SetupForm {
    pub fn from_settings(settings: &QuizSettings) -> Self {
        Self {
            topic: settings.topic.clone(),
            difficulty: settings.difficulty,
            focus: FormField::default(),
            error: None,
            count_index: QUESTION_COUNTS
                .iter()
                .position(|&count| count == settings.number_of_questions)
                .unwrap_or(0),
        }
    }

    pub fn number_of_questions(&self) -> usize {
        QUESTION_COUNTS[self.count_index]
    }

    pub fn settings(&self) -> QuizSettings {
        QuizSettings::new(self.topic.trim(), self.number_of_questions(), self.difficulty)
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormField::Topic => FormField::Questions,
            FormField::Questions => FormField::Difficulty,
            FormField::Difficulty => FormField::Topic,
        };
    }

    pub fn focus_previous(&mut self) {
        self.focus = match self.focus {
            FormField::Topic => FormField::Difficulty,
            FormField::Questions => FormField::Topic,
            FormField::Difficulty => FormField::Questions,
        };
    }

    /// Cycles the focused selector forward. No effect on the topic field.
    pub fn increase(&mut self) {
        match self.focus {
            FormField::Topic => {}
            FormField::Questions => {
                self.count_index = (self.count_index + 1) % QUESTION_COUNTS.len();
            }
            FormField::Difficulty => self.difficulty = self.difficulty.next(),
        }
    }

    pub fn decrease(&mut self) {
        match self.focus {
            FormField::Topic => {}
            FormField::Questions => {
                self.count_index =
                    (self.count_index + QUESTION_COUNTS.len() - 1) % QUESTION_COUNTS.len();
            }
            FormField::Difficulty => self.difficulty = self.difficulty.previous(),
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.focus == FormField::Topic && self.topic.chars().count() < MAX_TOPIC_LENGTH {
            self.topic.push(c);
            self.error = None;
        }
    }

    pub fn pop_char(&mut self) {
        if self.focus == FormField::Topic {
            self.topic.pop();
            self.error = None;
        }
    }
}

pub struct App<C> {
    quiz: QuizOrchestrator<C>,
    form: SetupForm,
    pending: Option<Intent>,
    selected_option: usize,
    result_scroll: usize,
    started_at: Option<Instant>,
    finished_in: Option<Duration>,
}

impl<C> App<C> {
    pub fn screen(&self) -> Screen {
        if self.pending.is_some() {
            return Screen::Loading;
        }

        let session = self.quiz.session();
        match session.status() {
            QuizStatus::Loading | QuizStatus::Fetching => Screen::Loading,
            QuizStatus::Error => Screen::Error,
            QuizStatus::Completed => Screen::Result,
            QuizStatus::Idle if session.is_started() => Screen::Quiz,
            QuizStatus::Idle => Screen::Setup,
        }
    }

    pub fn session(&self) -> &QuizSession {
        self.quiz.session()
    }

    pub fn quiz(&self) -> &QuizOrchestrator<C> {
        &self.quiz
    }

    pub fn form(&self) -> &SetupForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SetupForm {
        &mut self.form
    }

    pub fn pending(&self) -> Option<&Intent> {
        self.pending.as_ref()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    /// Time spent on the quiz; frozen once it is completed.
    pub fn elapsed(&self) -> Duration {
        match (self.finished_in, self.started_at) {
            (Some(finished), _) => finished,
            (None, Some(started)) => started.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn select_next_option(&mut self) {
        if !self.session().is_current_answered() {
            self.selected_option = (self.selected_option + 1) % NUM_OPTIONS;
        }
    }

    pub fn select_previous_option(&mut self) {
        if !self.session().is_current_answered() {
            self.selected_option = (self.selected_option + NUM_OPTIONS - 1) % NUM_OPTIONS;
        }
    }

    /// Queues a start with the form's settings, or shows why they are invalid.
    pub fn submit_form(&mut self) -> Result<(), ValidationError> {
        let settings = self.form.settings();
        if let Err(e) = settings.validate() {
            self.form.error = Some(e.to_string());
            return Err(e);
        }

        self.form.error = None;
        self.pending = Some(Intent::Start(settings));
        Ok(())
    }

    /// Records `label` for the current question. Returns false if the
    /// session refused it.
    pub fn answer(&mut self, label: OptionLabel) -> bool {
        match self.quiz.answer(label) {
            Ok(()) => {
                self.selected_option = label.index();
                true
            }
            Err(e) => {
                warn!("Answer ignored: {}", e);
                false
            }
        }
    }

    /// Enter on the question screen: answer with the highlighted option,
    /// or move on once the question has been answered.
    pub fn confirm(&mut self) {
        if self.session().is_current_answered() {
            self.pending = Some(Intent::Advance);
        } else if let Some(label) = OptionLabel::from_index(self.selected_option) {
            self.answer(label);
        }
    }

    pub fn retry(&mut self) {
        if self.session().status() == QuizStatus::Error {
            self.pending = Some(Intent::Retry);
        }
    }

    /// Drops the session and returns to the settings screen, keeping the
    /// last settings filled in.
    pub fn new_quiz(&mut self) {
        if self.session().is_started() {
            self.form = SetupForm::from_settings(self.session().settings());
        }
        self.quiz.reset();
        self.pending = None;
        self.selected_option = 0;
        self.result_scroll = 0;
        self.started_at = None;
        self.finished_in = None;
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.session().questions().len().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }
}

impl<C: CompletionClient> App<C> {
    pub fn new(quiz: QuizOrchestrator<C>, initial: &QuizSettings) -> Self {
        Self {
            quiz,
            form: SetupForm::from_settings(initial),
            pending: None,
            selected_option: 0,
            result_scroll: 0,
            started_at: None,
            finished_in: None,
        }
    }

    /// Runs the queued intent, if any. Returns whether one ran.
    pub async fn run_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(intent) => {
                self.dispatch(intent).await;
                true
            }
            None => false,
        }
    }

    pub async fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Start(settings) => {
                self.started_at = None;
                self.finished_in = None;
                if let Err(e) = self.quiz.start(settings).await {
                    self.form.error = Some(e.to_string());
                }
            }
            Intent::Advance => {
                if let Err(e) = self.quiz.advance().await {
                    warn!("Advance ignored: {}", e);
                }
            }
            Intent::Retry => {
                if let Err(e) = self.quiz.retry().await {
                    warn!("Retry ignored: {}", e);
                }
            }
        }

        self.selected_option = 0;
        self.result_scroll = 0;
        match self.session().status() {
            QuizStatus::Idle if self.started_at.is_none() && self.session().is_started() => {
                self.started_at = Some(Instant::now());
            }
            QuizStatus::Completed if self.finished_in.is_none() => {
                self.finished_in = Some(self.elapsed());
            }
            _ => {}
        }
    }
}
