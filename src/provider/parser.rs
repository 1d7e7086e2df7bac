//! Extraction of a [`QuizQuestion`] from the model's free-text reply.
//!
//! The reply is expected to follow the layout requested by the prompt:
//!
//! ```text
//! Question: <text>
//! A. <option>
//! B. <option>
//! C. <option>
//! D. <option>
//! Correct Answer: <letter>
//! Explanation: <text>
//! ```
//!
//! A fenced code block between the question and the options becomes the
//! question's code snippet.

use thiserror::Error;

use crate::models::{OptionLabel, QuizOptions, QuizQuestion};

const QUESTION_PREFIX: &str = "Question:";
const CORRECT_ANSWER_PREFIX: &str = "Correct Answer:";
const EXPLANATION_PREFIX: &str = "Explanation:";
const CODE_FENCE: &str = "```";
const EMPHASIS: [char; 3] = ['*', '_', '#'];
const MISSING_EXPLANATION: &str = "No explanation provided.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no question line")]
    MissingQuestion,

    #[error("option {0} is missing")]
    MissingOption(OptionLabel),

    #[error("no correct answer letter")]
    MissingCorrectAnswer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Option(OptionLabel),
    CorrectAnswer,
    Explanation,
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    text: &'a str,
    in_code: bool,
    fence: bool,
}

impl<'a> Line<'a> {
    fn is_blank(&self) -> bool {
        !self.in_code && self.text.trim().is_empty()
    }

    fn marker(&self) -> Option<Marker> {
        if self.in_code || self.fence {
            return None;
        }

        let body = self.body();
        if body.starts_with(CORRECT_ANSWER_PREFIX) {
            return Some(Marker::CorrectAnswer);
        }
        if body.starts_with(EXPLANATION_PREFIX) {
            return Some(Marker::Explanation);
        }

        let mut chars = body.chars();
        let label = chars.next().and_then(OptionLabel::from_char)?;
        (chars.next() == Some('.')).then_some(Marker::Option(label))
    }

    /// Line text without leading markdown emphasis, so `**Question:**` and
    /// `## Question:` read as `Question:`.
    fn body(&self) -> &'a str {
        self.text
            .trim_start()
            .trim_start_matches(EMPHASIS)
            .trim_start()
    }

    fn starts_question(&self) -> bool {
        !self.in_code && self.body().starts_with(QUESTION_PREFIX)
    }

    /// Text following the marker or prefix on this line. Emphasis closing the
    /// label (`**Question:** text`) is dropped with it.
    fn content_after(&self, prefix_len: usize) -> &'a str {
        let trimmed = self.text.trim_start();
        let body = self.body();
        let closing = trimmed[..trimmed.len() - body.len()]
            .trim_matches(|c: char| c == '#' || c.is_whitespace());
        let rest = &body[prefix_len..];
        rest.strip_prefix(closing).unwrap_or(rest).trim()
    }
}

fn classify(text: &str) -> Vec<Line<'_>> {
    let mut in_code = false;
    text.lines()
        .map(|text| {
            let fence = text.trim_start().starts_with(CODE_FENCE);
            let line = Line {
                text,
                in_code: in_code && !fence,
                fence,
            };
            if fence {
                in_code = !in_code;
            }
            line
        })
        .collect()
}

/// Parses a model reply into a question.
pub fn parse_question(text: &str) -> Result<QuizQuestion, ParseError> {
    let normalized = text.replace("\r\n", "\n");
    let lines = classify(&normalized);

    let start = lines
        .iter()
        .position(Line::starts_question)
        .ok_or(ParseError::MissingQuestion)?;

    let (question, after_question) = parse_question_text(&lines, start);
    if question.is_empty() {
        return Err(ParseError::MissingQuestion);
    }

    let options_start = find_marker(&lines, after_question, |m| matches!(m, Marker::Option(_)))
        .unwrap_or(lines.len());
    let code_snippet = parse_code_block(&lines[after_question..options_start]);

    let mut texts = Vec::with_capacity(OptionLabel::ALL.len());
    for label in OptionLabel::ALL {
        let index = find_marker(&lines, after_question, |m| m == Marker::Option(label))
            .ok_or(ParseError::MissingOption(label))?;
        texts.push(section_text(&lines, index, 2, |line| {
            line.fence || line.marker().is_some()
        }));
    }
    let [a, b, c, d]: [String; 4] = texts
        .try_into()
        .map_err(|_| ParseError::MissingOption(OptionLabel::A))?;

    let correct_answer = find_marker(&lines, after_question, |m| m == Marker::CorrectAnswer)
        .and_then(|index| parse_answer_letter(lines[index].content_after(CORRECT_ANSWER_PREFIX.len())))
        .ok_or(ParseError::MissingCorrectAnswer)?;

    let explanation = find_marker(&lines, after_question, |m| m == Marker::Explanation)
        .map(|index| section_text(&lines, index, EXPLANATION_PREFIX.len(), |_| false))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| MISSING_EXPLANATION.to_string());

    Ok(QuizQuestion {
        question,
        options: QuizOptions::new(a, b, c, d),
        correct_answer,
        explanation,
        code_snippet,
    })
}

/// Question text runs until a blank line, a code fence, or the first marker.
fn parse_question_text(lines: &[Line<'_>], start: usize) -> (String, usize) {
    let mut parts = vec![lines[start].content_after(QUESTION_PREFIX.len())];
    let mut cursor = start + 1;

    while let Some(line) = lines.get(cursor) {
        if line.is_blank() || line.fence || line.marker().is_some() {
            break;
        }
        parts.push(line.text.trim());
        cursor += 1;
    }

    let question = parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    (question, cursor)
}

fn find_marker(lines: &[Line<'_>], from: usize, wanted: impl Fn(Marker) -> bool) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| line.marker().is_some_and(&wanted))
        .map(|(index, _)| index)
}

/// Collects the text after a marker plus its continuation lines, stopping at
/// a blank line or wherever `stop` says.
fn section_text(
    lines: &[Line<'_>],
    index: usize,
    prefix_len: usize,
    stop: impl Fn(&Line<'_>) -> bool,
) -> String {
    let mut parts = vec![lines[index].content_after(prefix_len)];

    for line in &lines[index + 1..] {
        if line.is_blank() || stop(line) {
            break;
        }
        parts.push(line.text.trim());
    }

    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_code_block(lines: &[Line<'_>]) -> Option<String> {
    let open = lines.iter().position(|line| line.fence)?;
    let code: Vec<&str> = lines[open + 1..]
        .iter()
        .take_while(|line| !line.fence)
        .map(|line| line.text)
        .collect();

    if code.iter().all(|line| line.trim().is_empty()) {
        None
    } else {
        Some(code.join("\n"))
    }
}

fn parse_answer_letter(text: &str) -> Option<OptionLabel> {
    text.trim_start_matches(|c: char| c == '*' || c == '(' || c.is_whitespace())
        .chars()
        .next()
        .and_then(OptionLabel::from_char)
}
