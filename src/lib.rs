//! # topic-quiz
//!
//! A terminal quiz whose multiple-choice questions are generated on demand by
//! a language model.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use topic_quiz::{AppConfig, Quiz, QuizError, QuizSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = AppConfig::load(None)?;
//!     let quiz = Quiz::from_config(&config, &QuizSettings::default())?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run().await
//! }
//! ```
//!
//! The pieces can also be driven directly: a [`QuizOrchestrator`] takes any
//! [`CompletionClient`] and exposes the `start` / `answer` / `advance` /
//! `retry` / `reset` intents without a terminal.

mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod provider;
pub mod results;
pub mod session;
pub mod terminal;
mod ui;

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing::{debug, info};

pub use app::{App, FormField, Intent, Screen, SetupForm};
pub use config::AppConfig;
pub use error::{GenerationError, IntentError, QuizError, ValidationError};
pub use models::{Difficulty, OptionLabel, QuizOptions, QuizQuestion, QuizSettings};
pub use provider::{CompletionClient, GeminiClient, MalformedPolicy, QuestionProvider};
pub use session::{QuizOrchestrator, QuizSession, QuizStatus};

/// Redraw interval, so the question timer keeps ticking without input.
const TICK: Duration = Duration::from_millis(250);

/// A quiz that can be run in the terminal.
pub struct Quiz<C> {
    app: App<C>,
}

impl Quiz<GeminiClient> {
    /// Builds a quiz backed by the Gemini endpoint described in `config`.
    pub fn from_config(config: &AppConfig, initial: &QuizSettings) -> Result<Self, QuizError> {
        let client = GeminiClient::from_config(&config.provider)?;
        let provider = QuestionProvider::new(client)
            .with_max_retries(config.provider.max_retries)
            .with_malformed_policy(config.provider.on_malformed);
        Ok(Self::new(provider, initial))
    }
}

impl<C: CompletionClient> Quiz<C> {
    /// `initial` prefills the settings screen.
    pub fn new(provider: QuestionProvider<C>, initial: &QuizSettings) -> Self {
        Self {
            app: App::new(QuizOrchestrator::new(provider), initial),
        }
    }

    /// Skips the settings screen and starts with the prefilled settings.
    pub fn start_immediately(mut self) -> Result<Self, QuizError> {
        self.app.submit_form()?;
        Ok(self)
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut guard = terminal::TerminalGuard::enter()?;
        let result = run_event_loop(guard.terminal(), &mut self.app).await;
        info!("Quiz closed");
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App<C> {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App<C> {
        &mut self.app
    }
}

async fn run_event_loop<C: CompletionClient>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App<C>,
) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Generation runs after the loading frame is on screen.
        if app.run_pending().await {
            continue;
        }

        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input<C>(app: &mut App<C>, key: KeyCode) -> bool {
    match app.screen() {
        Screen::Setup => handle_setup_input(app, key),
        Screen::Loading => matches!(key, KeyCode::Esc),
        Screen::Quiz => handle_quiz_input(app, key),
        Screen::Error => handle_error_input(app, key),
        Screen::Result => handle_result_input(app, key),
    }
}

fn handle_setup_input<C>(app: &mut App<C>, key: KeyCode) -> bool {
    let form = app.form_mut();
    match key {
        KeyCode::Esc => return true,
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Right => form.increase(),
        KeyCode::Left => form.decrease(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) => form.push_char(c),
        // A rejected form keeps its message in `form.error` for the setup screen.
        KeyCode::Enter => {
            if let Err(e) = app.submit_form() {
                debug!("Settings rejected: {}", e);
            }
        }
        _ => {}
    }
    false
}

fn handle_quiz_input<C>(app: &mut App<C>, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.confirm(),
        KeyCode::Char(c @ ('a'..='d' | 'A'..='D')) => {
            if let Some(label) = OptionLabel::from_char(c.to_ascii_uppercase()) {
                app.answer(label);
            }
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            if let Some(label) = OptionLabel::from_index(index) {
                app.answer(label);
            }
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

fn handle_error_input<C>(app: &mut App<C>, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => app.retry(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.new_quiz(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

fn handle_result_input<C>(app: &mut App<C>, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char('n') => app.new_quiz(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::ScriptedClient;

    fn quiz(client: ScriptedClient) -> Quiz<ScriptedClient> {
        Quiz::new(
            QuestionProvider::new(client).with_max_retries(0),
            &QuizSettings::new("", 5, Difficulty::Medium),
        )
    }

    #[tokio::test]
    async fn test_keys_drive_a_quiz() {
        let mut quiz = quiz(ScriptedClient::new().question("Capital of France?", 'C'));
        let app = quiz.app_mut();

        for c in "Geography".chars() {
            assert!(!handle_input(app, KeyCode::Char(c)));
        }
        assert!(!handle_input(app, KeyCode::Tab));
        assert!(!handle_input(app, KeyCode::Tab));
        assert!(!handle_input(app, KeyCode::Right));
        assert_eq!(app.form().difficulty, Difficulty::Hard);

        assert!(!handle_input(app, KeyCode::Enter));
        assert_eq!(app.screen(), Screen::Loading);
        app.run_pending().await;
        assert_eq!(app.screen(), Screen::Quiz);
        assert_eq!(app.session().settings().topic, "Geography");

        assert!(!handle_input(app, KeyCode::Char('c')));
        assert_eq!(app.session().answer_for(0), Some(OptionLabel::C));
        // Already answered; further answer keys are ignored.
        assert!(!handle_input(app, KeyCode::Char('2')));
        assert_eq!(app.session().answer_for(0), Some(OptionLabel::C));

        assert!(handle_input(app, KeyCode::Char('q')));
    }

    #[test]
    fn test_q_is_typed_into_topic() {
        let mut quiz = quiz(ScriptedClient::new());
        let app = quiz.app_mut();

        assert!(!handle_input(app, KeyCode::Char('q')));
        assert_eq!(app.form().topic, "q");
        assert!(handle_input(app, KeyCode::Esc));
    }

    #[test]
    fn test_enter_with_empty_topic_stays_on_setup() {
        let mut quiz = quiz(ScriptedClient::new());
        let app = quiz.app_mut();

        assert!(!handle_input(app, KeyCode::Enter));
        assert_eq!(app.screen(), Screen::Setup);
        assert_eq!(app.pending(), None);
        assert_eq!(app.form().error.as_deref(), Some("Please enter a topic"));
    }

    #[test]
    fn test_start_immediately_validates() {
        let result = quiz(ScriptedClient::new()).start_immediately();
        assert!(matches!(
            result,
            Err(QuizError::Validation(ValidationError::EmptyTopic))
        ));

        let quiz = Quiz::new(
            QuestionProvider::new(ScriptedClient::new()),
            &QuizSettings::new("Rust", 10, Difficulty::Hard),
        )
        .start_immediately()
        .unwrap();
        assert_eq!(
            quiz.app().pending(),
            Some(&Intent::Start(QuizSettings::new("Rust", 10, Difficulty::Hard)))
        );
    }
}
