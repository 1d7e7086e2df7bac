use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::results::{self, QuestionReview, QuizResults};

use super::format_elapsed;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render<C>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let session = app.session();
    let summary = QuizResults::from_session(session);
    let grade_color = get_grade_color(summary.percentage());

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], app, &summary, grade_color);
    render_question_breakdown(frame, chunks[2], &results::review(session), app.result_scroll());
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary<C>(
    frame: &mut Frame,
    area: Rect,
    app: &App<C>,
    summary: &QuizResults,
    grade_color: Color,
) {
    let settings = app.session().settings();
    let content = vec![
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                summary.correct,
                summary.total,
                summary.percentage()
            ),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(summary.performance_message().fg(Color::Gray)),
        Line::from(""),
        Line::from(
            format!(
                "Correct {}  ·  Incorrect {}  ·  Time {}",
                summary.correct,
                summary.incorrect(),
                format_elapsed(app.elapsed())
            )
            .fg(Color::DarkGray),
        ),
        Line::from(
            format!("{}  ·  {}", settings.topic, settings.difficulty).fg(Color::DarkGray),
        ),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(
    frame: &mut Frame,
    area: Rect,
    reviews: &[QuestionReview<'_>],
    scroll: usize,
) {
    let lines: Vec<Line> = reviews
        .iter()
        .map(|review| {
            let (symbol, color) = if review.is_correct() {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            let chosen = review
                .user_answer
                .map_or_else(|| "-".to_string(), |label| label.to_string());

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", review.index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate_question(&review.question.question),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("  you {} · answer {}", chosen, review.question.correct_answer),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let char_count = first_line.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH || first_line.len() < text.len() {
        let truncated: String = first_line.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        first_line.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r new quiz  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_question() {
        assert_eq!(truncate_question("Short?"), "Short?");
        assert_eq!(truncate_question("Line one\nline two"), "Line one...");

        let long = "x".repeat(QUESTION_PREVIEW_LENGTH + 5);
        assert_eq!(
            truncate_question(&long),
            format!("{}...", "x".repeat(QUESTION_PREVIEW_LENGTH))
        );
    }

    #[test]
    fn test_grade_color() {
        assert_eq!(get_grade_color(100.0), Color::Green);
        assert_eq!(get_grade_color(80.0), Color::Cyan);
        assert_eq!(get_grade_color(60.0), Color::Yellow);
        assert_eq!(get_grade_color(20.0), Color::Red);
    }
}
