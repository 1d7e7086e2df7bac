use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{FormField, SetupForm};

pub fn render(frame: &mut Frame, area: Rect, form: &SetupForm) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Fill(1),
    ])
    .split(area);
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(64),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TOPIC QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("Generated questions on any topic".fg(Color::DarkGray)),
        Line::from(""),
        field_line(
            "Topic",
            format!("{}_", form.topic),
            form.focus == FormField::Topic,
        ),
        Line::from(""),
        field_line(
            "Questions",
            format!("< {} >", form.number_of_questions()),
            form.focus == FormField::Questions,
        ),
        Line::from(""),
        field_line(
            "Difficulty",
            format!("< {} >", form.difficulty),
            form.focus == FormField::Difficulty,
        ),
        Line::from(""),
    ];

    match &form.error {
        Some(error) => content.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ))),
        None => content.push(Line::from("")),
    }

    content.push(Line::from(""));
    content.push(Line::from(
        "tab next field  ·  ←/→ change  ·  enter start  ·  esc quit".fg(Color::DarkGray),
    ));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(2)),
    );

    frame.render_widget(widget, columns[1]);
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let (marker, style) = if focused {
        (">", Style::default().fg(Color::Cyan).bold())
    } else {
        (" ", Style::default().fg(Color::Gray))
    };

    Line::from(vec![
        Span::styled(format!("{} {:<11}", marker, label), style),
        Span::styled(value, style),
    ])
}
