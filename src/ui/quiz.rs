use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{OptionLabel, QuizOptions, QuizQuestion};
use crate::results;

use super::format_elapsed;

pub fn render<C>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let session = app.session();
    let Some(question) = session.current_question() else {
        return;
    };
    let answer = session.answer_for(session.current_question_index());

    let mut constraints = vec![
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
    ];
    if question.code_snippet.is_some() {
        constraints.push(Constraint::Min(6));
    }
    constraints.extend([
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]);
    let chunks = Layout::vertical(constraints).margin(1).split(area);
    let mut chunks = chunks.iter().copied();
    let mut next_chunk = || chunks.next().unwrap_or_default();

    render_header(frame, next_chunk(), app);
    render_topic(frame, next_chunk(), app);
    render_progress(frame, next_chunk(), results::progress(session));
    next_chunk();
    render_question_text(frame, next_chunk(), &question.question);
    if let Some(code) = &question.code_snippet {
        render_code_block(frame, next_chunk(), code);
    }
    render_options(
        frame,
        next_chunk(),
        &question.options,
        app.selected_option(),
        answer.map(|label| (label, question.correct_answer)),
    );
    if let Some(label) = answer {
        render_feedback(frame, next_chunk(), question, label);
    } else {
        next_chunk();
    }
    render_controls(frame, next_chunk(), answer.is_some(), session.is_last_question());
}

fn render_header<C>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let session = app.session();
    let position = format!(
        "Question {} of {}",
        session.current_question_index() + 1,
        session.total_questions()
    );
    frame.render_widget(Paragraph::new(position).fg(Color::Gray).bold(), area);

    let timer = Paragraph::new(format_elapsed(app.elapsed()))
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(timer, area);
}

fn render_topic<C>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let settings = app.session().settings();
    let widget = Paragraph::new(format!(
        "Topic: {}  |  Difficulty: {}",
        settings.topic, settings.difficulty
    ))
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_progress(frame: &mut Frame, area: Rect, progress: f64) {
    let widget = Gauge::default()
        .ratio(progress.clamp(0.0, 1.0))
        .label("")
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black));
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_code_block(frame: &mut Frame, area: Rect, code: &str) {
    let code_lines: Vec<Line> = code
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::Yellow))))
        .collect();

    let widget = Paragraph::new(code_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

/// `outcome` is the chosen and the correct label once the question has
/// been answered.
fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &QuizOptions,
    selected: usize,
    outcome: Option<(OptionLabel, OptionLabel)>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(8);

    for (label, option) in options.iter() {
        let (marker, style) = match outcome {
            Some((_, correct)) if label == correct => {
                ("✓", Style::default().fg(Color::Green).bold())
            }
            Some((chosen, _)) if label == chosen => ("✗", Style::default().fg(Color::Red).bold()),
            Some(_) => (" ", Style::default().fg(Color::DarkGray)),
            None if label.index() == selected => (">", Style::default().fg(Color::Cyan).bold()),
            None => (" ", Style::default().fg(Color::Gray)),
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option, style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, question: &QuizQuestion, answer: OptionLabel) {
    let verdict = if question.is_correct(answer) {
        Line::from(Span::styled(
            "Correct!",
            Style::default().fg(Color::Green).bold(),
        ))
    } else {
        Line::from(Span::styled(
            format!("Incorrect. The correct answer is {}.", question.correct_answer),
            Style::default().fg(Color::Red).bold(),
        ))
    };

    let content = vec![
        verdict,
        Line::from(""),
        Line::from(Span::styled(
            question.explanation.as_str(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let widget = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, answered: bool, last: bool) {
    let hint = match (answered, last) {
        (false, _) => "j/k navigate  ·  enter select  ·  a-d answer  ·  q quit",
        (true, false) => "enter next question  ·  q quit",
        (true, true) => "enter finish quiz  ·  q quit",
    };
    let widget = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
