//! Loading and error screens.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, Intent};
use crate::session::QuizSession;

pub fn render_loading<C>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let session = app.session();
    let message = match app.pending() {
        Some(Intent::Start(settings)) => format!(
            "Generating a {} question on {}...",
            settings.difficulty, settings.topic
        ),
        Some(Intent::Advance) | Some(Intent::Retry) if !session.questions().is_empty() => format!(
            "Loading question {} of {}...",
            session.current_question_index() + 2,
            session.total_questions()
        ),
        _ => "Loading question...".to_string(),
    };

    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(5),
        Constraint::Percentage(40),
    ])
    .split(area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TOPIC QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Yellow))),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

pub fn render_error(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let chunks = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Length(11),
        Constraint::Percentage(30),
    ])
    .split(area);
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(70),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "SOMETHING WENT WRONG",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            session.error().unwrap_or("An unknown error occurred"),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(""),
        Line::from("r retry  ·  n new quiz  ·  q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(widget, columns[1]);
}
